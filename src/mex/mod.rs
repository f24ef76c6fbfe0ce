pub mod models;

use std::{path::PathBuf, sync::Arc};

use reqwest::Client;
use secrecy::ExposeSecret;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{
    config::{Config, Credentials},
    error::{MexError, Result},
    response_store,
};

use self::models::{first_item, LoginRequest, LoginResponse, RawReading};

/// Client for the Heizöl24 app API.
///
/// Every call to [`MexClient::fetch`] opens a fresh HTTP session with its own
/// cookie jar, so each poll cycle authenticates independently and the login
/// cookies serve as the auth context for the read that follows.
#[derive(Debug, Clone)]
pub struct MexClient {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    login_url: String,
    data_url: String,
    credentials: Credentials,
    response_dump_dir: Option<PathBuf>,
}

impl MexClient {
    pub fn new(config: &Config) -> Self {
        Self::from_parts(
            config.credentials.clone(),
            &config.login_url,
            &config.data_url,
            config.response_dump_dir.clone(),
        )
    }

    pub fn from_parts(
        credentials: Credentials,
        login_url: &str,
        data_url: &str,
        response_dump_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                login_url: login_url.to_owned(),
                data_url: data_url.to_owned(),
                credentials,
                response_dump_dir,
            }),
        }
    }

    pub fn username(&self) -> &str {
        &self.inner.credentials.username
    }

    /// One login attempt in a throwaway session.
    pub async fn login(&self) -> Result<()> {
        let http = new_session()?;
        self.login_with(&http).await
    }

    /// Log in, then read the dashboard once and return its first item.
    ///
    /// No read request is issued when the login is rejected.
    pub async fn fetch(&self) -> Result<RawReading> {
        let http = new_session()?;
        self.login_with(&http).await?;

        let url = &self.inner.data_url;
        debug!(url = %url, "Fetching dashboard data");

        let bytes = http
            .get(url)
            .send()
            .await
            .map_err(|e| MexError::connectivity("dashboard request failed", e))?
            .error_for_status()
            .map_err(|e| MexError::connectivity("dashboard endpoint returned error status", e))?
            .bytes()
            .await
            .map_err(|e| MexError::connectivity("failed to read dashboard response body", e))?;

        self.dump("dashboard", &bytes).await;

        let payload: Value = serde_json::from_slice(&bytes)
            .map_err(|e| MexError::connectivity("failed to parse dashboard response", e))?;

        let reading = first_item(&payload).unwrap_or_else(|| {
            warn!("Dashboard response carries no sensor item; every field will be unset");
            RawReading::new()
        });

        info!(fields = reading.len(), "Dashboard data fetched");
        Ok(reading)
    }

    async fn login_with(&self, http: &Client) -> Result<()> {
        let url = &self.inner.login_url;
        let creds = &self.inner.credentials;
        debug!(url = %url, username = %creds.username, "Logging in");

        let body = LoginRequest::new(&creds.username, creds.password.expose_secret());

        // The status code is not checked: a rejected login may come back with
        // a non-2xx status and a perfectly valid `{"Success": false}` body.
        let bytes = http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| MexError::connectivity("login request failed", e))?
            .bytes()
            .await
            .map_err(|e| MexError::connectivity("failed to read login response body", e))?;

        self.dump("login", &bytes).await;

        let resp: LoginResponse = serde_json::from_slice(&bytes)
            .map_err(|e| MexError::connectivity("failed to parse login response", e))?;

        match resp.succeeded() {
            Some(true) => {
                debug!(username = %creds.username, "Login accepted");
                Ok(())
            }
            Some(false) => {
                warn!(username = %creds.username, "Login rejected");
                Err(MexError::Authentication)
            }
            None => Err(MexError::Connectivity(
                "login response has no Success field".to_owned(),
            )),
        }
    }

    async fn dump(&self, endpoint: &str, bytes: &[u8]) {
        if let Some(dir) = &self.inner.response_dump_dir {
            response_store::save(dir, endpoint, bytes).await;
        }
    }
}

fn new_session() -> Result<Client> {
    Client::builder()
        .cookie_store(true)
        .build()
        .map_err(|e| MexError::connectivity("failed to build HTTP session", e))
}
