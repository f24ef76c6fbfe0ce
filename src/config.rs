use std::{path::PathBuf, time::Duration};

use anyhow::{bail, Context, Result};
use secrecy::SecretString;

/// Vendor login endpoint used when `MEX_LOGIN_URL` is not set.
pub const DEFAULT_LOGIN_URL: &str = "https://api.heizoel24.de/app/api/app/Login";

/// Vendor dashboard endpoint used when `MEX_DATA_URL` is not set.
pub const DEFAULT_DATA_URL: &str =
    "https://api.heizoel24.de/app/api/app/GetDashboardData/1/1/1/0/0/0";

/// 12 hours.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 12 * 60 * 60;

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// Account credentials for the Heizöl24 portal.
///
/// Supplied once at setup and never mutated afterwards. The password is kept
/// behind `SecretString` so it never shows up in `Debug` output.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
    pub login_url: String,
    pub data_url: String,
    /// Polling interval in seconds.
    pub poll_interval_secs: u64,
    pub server_host: String,
    pub server_port: u16,
    /// When set, raw vendor responses are written below this directory.
    pub response_dump_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_vars<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String> {
            var(key)
                .filter(|v| !v.is_empty())
                .with_context(|| format!("missing required env var: {key}"))
        };
        let optional = |key: &str, default: &str| -> String {
            var(key).unwrap_or_else(|| default.to_owned())
        };

        Ok(Self {
            credentials: Credentials::new(required("MEX_USERNAME")?, required("MEX_PASSWORD")?),
            login_url: optional("MEX_LOGIN_URL", DEFAULT_LOGIN_URL),
            data_url: optional("MEX_DATA_URL", DEFAULT_DATA_URL),
            poll_interval_secs: parse_interval(&optional(
                "POLL_INTERVAL_SECS",
                &DEFAULT_POLL_INTERVAL_SECS.to_string(),
            ))?,
            server_host: optional("SERVER_HOST", "0.0.0.0"),
            server_port: optional("SERVER_PORT", "8080")
                .parse()
                .context("SERVER_PORT must be a valid port number")?,
            response_dump_dir: var("RESPONSE_DUMP_DIR")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
        })
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

fn parse_interval(raw: &str) -> Result<u64> {
    let secs: u64 = raw
        .trim()
        .parse()
        .context("POLL_INTERVAL_SECS must be a positive integer")?;
    if secs == 0 {
        bail!("POLL_INTERVAL_SECS must be a positive integer, got 0");
    }
    Ok(secs)
}
