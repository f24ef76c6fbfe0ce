pub mod descriptor;
pub mod entity;

pub use descriptor::{FieldDescriptor, MexField, DOMAIN};
pub use entity::{derive_all, DerivationError, SensorState};
