use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Prefix of every sensor's unique id.
pub const DOMAIN: &str = "heizoel24mex";

// ---------------------------------------------------------------------------
// MexField
// ---------------------------------------------------------------------------

/// The known dashboard fields, one sensor each.
///
/// Variant names match the vendor JSON keys exactly, so the serde
/// representation doubles as the wire key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum MexField {
    MaxVolume,
    CurrentVolume,
    CurrentVolumePercentage,
    Usage,
    LastOrderPrice,
    RemainingDays,
    BatteryPercentage,
    SensorId,
}

impl MexField {
    pub const ALL: [MexField; 8] = [
        MexField::MaxVolume,
        MexField::CurrentVolume,
        MexField::CurrentVolumePercentage,
        MexField::Usage,
        MexField::LastOrderPrice,
        MexField::RemainingDays,
        MexField::BatteryPercentage,
        MexField::SensorId,
    ];

    /// Vendor JSON key inside `Items[0]`.
    pub const fn key(self) -> &'static str {
        match self {
            MexField::MaxVolume => "MaxVolume",
            MexField::CurrentVolume => "CurrentVolume",
            MexField::CurrentVolumePercentage => "CurrentVolumePercentage",
            MexField::Usage => "Usage",
            MexField::LastOrderPrice => "LastOrderPrice",
            MexField::RemainingDays => "RemainingDays",
            MexField::BatteryPercentage => "BatteryPercentage",
            MexField::SensorId => "SensorId",
        }
    }

    /// Stable id, e.g. `heizoel24mex.mex_MaxVolume`.
    pub fn unique_id(self) -> String {
        format!("{DOMAIN}.mex_{}", self.key())
    }

    pub fn descriptor(self) -> &'static FieldDescriptor {
        match self {
            MexField::MaxVolume => &FieldDescriptor {
                name: "Oil free capacity",
                unit: Some(unit::LITERS),
                device_class: Some(DeviceClass::Gas),
                state_class: Some(StateClass::TotalIncreasing),
                icon: "mdi:storage-tank-outline",
                suggested_display_precision: None,
            },
            MexField::CurrentVolume => &FieldDescriptor {
                name: "Oil in stock",
                unit: Some(unit::LITERS),
                device_class: Some(DeviceClass::Volume),
                state_class: Some(StateClass::Total),
                icon: "mdi:storage-tank",
                suggested_display_precision: None,
            },
            MexField::CurrentVolumePercentage => &FieldDescriptor {
                name: "Oil fill level",
                unit: Some(unit::PERCENTAGE),
                device_class: None,
                state_class: Some(StateClass::Measurement),
                icon: "mdi:gauge",
                suggested_display_precision: None,
            },
            MexField::Usage => &FieldDescriptor {
                name: "Oil usage",
                unit: Some(unit::LITERS_PER_DAY),
                device_class: None,
                state_class: Some(StateClass::Measurement),
                icon: "mdi:oil",
                suggested_display_precision: Some(2),
            },
            MexField::LastOrderPrice => &FieldDescriptor {
                name: "Last order price",
                unit: Some(unit::CURRENCY_PER_LITER),
                device_class: None,
                state_class: Some(StateClass::Measurement),
                icon: "mdi:cash",
                suggested_display_precision: Some(4),
            },
            MexField::RemainingDays => &FieldDescriptor {
                name: "Oil remaining",
                unit: Some(unit::DAYS),
                device_class: None,
                state_class: None,
                icon: "mdi:timer",
                suggested_display_precision: None,
            },
            MexField::BatteryPercentage => &FieldDescriptor {
                name: "MEX Battery level",
                unit: Some(unit::PERCENTAGE),
                device_class: None,
                state_class: Some(StateClass::Measurement),
                icon: "mdi:battery",
                suggested_display_precision: None,
            },
            MexField::SensorId => &FieldDescriptor {
                name: "MEX Sensor ID",
                unit: None,
                device_class: None,
                state_class: Some(StateClass::Measurement),
                icon: "mdi:water-circle",
                suggested_display_precision: None,
            },
        }
    }
}

impl fmt::Display for MexField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for MexField {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        MexField::ALL
            .into_iter()
            .find(|f| f.key() == s)
            .ok_or_else(|| anyhow::anyhow!("unknown MEX field: {s:?}"))
    }
}

// ---------------------------------------------------------------------------
// Descriptor metadata
// ---------------------------------------------------------------------------

/// Unit labels as shown to the user.
pub mod unit {
    pub const LITERS: &str = "L";
    pub const PERCENTAGE: &str = "%";
    pub const LITERS_PER_DAY: &str = "L/day";
    pub const CURRENCY_PER_LITER: &str = "cur/L";
    pub const DAYS: &str = "d";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    Gas,
    Volume,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StateClass {
    Measurement,
    Total,
    TotalIncreasing,
}

/// Static presentation metadata of one sensor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub unit: Option<&'static str>,
    pub device_class: Option<DeviceClass>,
    pub state_class: Option<StateClass>,
    pub icon: &'static str,
    pub suggested_display_precision: Option<u8>,
}
