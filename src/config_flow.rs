//! Credential validation performed once when an account is configured.

use thiserror::Error;
use tracing::warn;

use crate::{error::MexError, mex::MexClient};

/// Title under which a configured account is stored.
pub const ENTRY_TITLE: &str = "Heizöl24 Mex Sensor";

#[derive(Error, Debug)]
pub enum ConfigFlowError {
    #[error("cannot connect: {0}")]
    CannotConnect(#[source] MexError),

    #[error("invalid credentials")]
    InvalidAuth,
}

impl ConfigFlowError {
    /// Form error key shown next to the credential fields.
    pub fn error_key(&self) -> &'static str {
        match self {
            Self::CannotConnect(_) => "cannot_connect",
            Self::InvalidAuth => "invalid_auth",
        }
    }
}

impl From<MexError> for ConfigFlowError {
    fn from(e: MexError) -> Self {
        match e {
            MexError::Authentication => Self::InvalidAuth,
            other => Self::CannotConnect(other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    pub title: &'static str,
}

/// Check that `client`'s credentials can log in.
///
/// The session opened here is dropped; the first scheduled poll logs in again.
pub async fn validate_input(client: &MexClient) -> Result<EntryInfo, ConfigFlowError> {
    client.login().await.map_err(|e| {
        warn!(username = %client.username(), error = %e, "Credential validation failed");
        ConfigFlowError::from(e)
    })?;

    Ok(EntryInfo { title: ENTRY_TITLE })
}
