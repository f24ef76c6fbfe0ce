//! Error types for talking to the Heizöl24 API.

use thiserror::Error;

/// Result type alias for vendor API operations.
pub type Result<T> = std::result::Result<T, MexError>;

/// Terminal outcome of a failed poll cycle.
#[derive(Error, Debug)]
pub enum MexError {
    /// Transport failure or unparseable response at the login or read step.
    #[error("cannot connect to Heizöl24 API: {0}")]
    Connectivity(String),

    /// The login endpoint answered with a falsy `Success`.
    #[error("Heizöl24 login rejected the configured credentials")]
    Authentication,
}

impl MexError {
    pub(crate) fn connectivity(context: &str, err: impl std::fmt::Display) -> Self {
        Self::Connectivity(format!("{context}: {err}"))
    }

    /// Authentication failures should prompt for new credentials rather than
    /// a blind retry.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Authentication)
    }

    /// Short machine-readable tag used in status reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Connectivity(_) => "connectivity",
            Self::Authentication => "authentication",
        }
    }
}
