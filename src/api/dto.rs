use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::{
    coordinator::UpdateStatus,
    sensors::{
        descriptor::{DeviceClass, StateClass},
        MexField, SensorState,
    },
};

/// One sensor: its static descriptor plus the current value.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SensorStateDto {
    /// e.g. `heizoel24mex.mex_CurrentVolume`
    pub unique_id: String,
    /// Vendor field key.
    pub key: MexField,
    pub name: String,
    pub unit: Option<String>,
    pub device_class: Option<DeviceClass>,
    pub state_class: Option<StateClass>,
    pub icon: String,
    pub suggested_display_precision: Option<u8>,
    /// Derived value; `null` when unavailable.
    #[schema(value_type = Option<Object>)]
    pub value: Option<Value>,
    /// Full raw sensor record; only present on `SensorId`.
    #[schema(value_type = Option<Object>)]
    pub attributes: Option<Map<String, Value>>,
    /// When the underlying snapshot was fetched.
    pub fetched_at: Option<DateTime<Utc>>,
}

impl From<SensorState> for SensorStateDto {
    fn from(s: SensorState) -> Self {
        let d = s.field.descriptor();
        Self {
            unique_id: s.field.unique_id(),
            key: s.field,
            name: d.name.to_owned(),
            unit: d.unit.map(str::to_owned),
            device_class: d.device_class,
            state_class: d.state_class,
            icon: d.icon.to_owned(),
            suggested_display_precision: d.suggested_display_precision,
            value: s.value,
            attributes: s.attributes,
            fetched_at: s.fetched_at,
        }
    }
}

/// Outcome of the last poll cycle.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateStatusDto {
    pub last_update_success: bool,
    /// `connectivity` or `authentication`.
    pub failure_kind: Option<String>,
    pub failure_message: Option<String>,
    pub last_attempt: Option<DateTime<Utc>>,
    pub last_success: Option<DateTime<Utc>>,
    pub poll_interval_secs: u64,
}

impl UpdateStatusDto {
    pub fn new(s: UpdateStatus, poll_interval_secs: u64) -> Self {
        Self {
            last_update_success: s.last_update_success,
            failure_kind: s.failure_kind.map(str::to_owned),
            failure_message: s.failure_message,
            last_attempt: s.last_attempt,
            last_success: s.last_success,
            poll_interval_secs,
        }
    }
}
