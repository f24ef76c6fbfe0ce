//! Checks `MEX_USERNAME` / `MEX_PASSWORD` with a single login.
//!
//! Prints the entry title on success, otherwise the form error key
//! (`cannot_connect` or `invalid_auth`) and exits non-zero.

use std::process::ExitCode;

use anyhow::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use heizoel24_mex::{config::Config, config_flow, mex::MexClient};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    let client = MexClient::new(&config);

    match config_flow::validate_input(&client).await {
        Ok(info) => {
            println!("{}", info.title);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            println!("{}", e.error_key());
            eprintln!("{e}");
            Ok(ExitCode::FAILURE)
        }
    }
}
