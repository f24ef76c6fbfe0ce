use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Number, Value};
use thiserror::Error;
use tracing::info;

use super::descriptor::MexField;
use crate::{mex::models::RawReading, snapshot::Snapshot};

/// Why a single field could not be derived. Never aborts a poll cycle.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DerivationError {
    #[error("{0} not available")]
    Missing(&'static str),

    #[error("{field} is not numeric: {value}")]
    NotNumeric { field: &'static str, value: Value },

    #[error("{0} is out of range")]
    OutOfRange(&'static str),
}

impl MexField {
    /// Displayed value of this field for `reading`.
    ///
    /// - `LastOrderPrice`: vendor hundredths → currency units (`1234` → `12.34`).
    /// - `MaxVolume`: free capacity, i.e. `MaxVolume - CurrentVolume`.
    /// - everything else is passed through; absent or `null` yields `Ok(None)`.
    pub fn derive(self, reading: &RawReading) -> Result<Option<Value>, DerivationError> {
        match self {
            MexField::LastOrderPrice => {
                let price = numeric(reading, MexField::LastOrderPrice)?;
                Ok(float_value(price.as_f64() / 100.0))
            }
            MexField::MaxVolume => {
                let max = numeric(reading, MexField::MaxVolume)?;
                let current = numeric(reading, MexField::CurrentVolume)?;
                match (max.as_i64(), current.as_i64()) {
                    (Some(m), Some(c)) => m
                        .checked_sub(c)
                        .map(|free| Some(Value::from(free)))
                        .ok_or(DerivationError::OutOfRange(MexField::MaxVolume.key())),
                    _ => Ok(float_value(max.as_f64() - current.as_f64())),
                }
            }
            field => Ok(reading.get(field.key()).filter(|v| !v.is_null()).cloned()),
        }
    }
}

/// Numeric view of a raw field.
#[derive(Debug, Clone, Copy)]
enum Num {
    Int(i64),
    Float(f64),
}

impl Num {
    fn as_i64(self) -> Option<i64> {
        match self {
            Num::Int(i) => Some(i),
            Num::Float(_) => None,
        }
    }

    fn as_f64(self) -> f64 {
        match self {
            Num::Int(i) => i as f64,
            Num::Float(f) => f,
        }
    }
}

fn numeric(reading: &RawReading, field: MexField) -> Result<Num, DerivationError> {
    let key = field.key();
    match reading.get(key) {
        None | Some(Value::Null) => Err(DerivationError::Missing(key)),
        Some(Value::Number(n)) => Ok(n
            .as_i64()
            .map(Num::Int)
            .or_else(|| n.as_f64().map(Num::Float))
            .unwrap_or(Num::Float(f64::NAN))),
        Some(other) => Err(DerivationError::NotNumeric {
            field: key,
            value: other.clone(),
        }),
    }
}

fn float_value(f: f64) -> Option<Value> {
    Number::from_f64(f).map(Value::Number)
}

// ---------------------------------------------------------------------------
// SensorState
// ---------------------------------------------------------------------------

/// Current state of one sensor as exposed to consumers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorState {
    pub field: MexField,
    /// `None` when no snapshot exists yet or the derivation failed.
    pub value: Option<Value>,
    /// Full `Items[0]` record; only set for `SensorId`.
    pub attributes: Option<RawReading>,
    pub fetched_at: Option<DateTime<Utc>>,
}

impl SensorState {
    pub fn unavailable(field: MexField) -> Self {
        Self {
            field,
            value: None,
            attributes: None,
            fetched_at: None,
        }
    }

    /// Derive the state of `field` from `snapshot`.
    ///
    /// Derivation failures are logged and leave the value unset.
    pub fn from_snapshot(field: MexField, snapshot: &Snapshot) -> Self {
        let value = match field.derive(&snapshot.reading) {
            Ok(v) => v,
            Err(e) => {
                info!(field = %field, error = %e, "Sensor value not available");
                None
            }
        };

        Self {
            field,
            value,
            attributes: (field == MexField::SensorId).then(|| snapshot.reading.clone()),
            fetched_at: Some(snapshot.fetched_at),
        }
    }
}

/// States of all known sensors, in `MexField::ALL` order.
pub fn derive_all(snapshot: Option<&Snapshot>) -> Vec<SensorState> {
    MexField::ALL
        .into_iter()
        .map(|field| match snapshot {
            Some(s) => SensorState::from_snapshot(field, s),
            None => SensorState::unavailable(field),
        })
        .collect()
}
