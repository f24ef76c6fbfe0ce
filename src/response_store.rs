//! Saves raw Heizöl24 response bodies to `{dir}/{endpoint}/{timestamp}.json`
//! for offline analysis.
//!
//! Errors are logged and swallowed; capturing is best-effort and must never
//! interrupt a poll cycle.
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, warn};

/// Write `bytes` to `{dir}/{endpoint}/{timestamp}.json` and return the path
/// on success.
///
/// - `endpoint`: sub-directory name, e.g. `"login"` or `"dashboard"`.
/// - `bytes`: the raw HTTP response body as received.
pub async fn save(dir: &Path, endpoint: &str, bytes: &[u8]) -> Option<PathBuf> {
    let ts = chrono::Utc::now().format("%Y%m%dT%H%M%S%.3fZ");
    let dir = dir.join(endpoint);
    let path = dir.join(format!("{ts}.json"));

    if let Err(e) = fs::create_dir_all(&dir).await {
        warn!(path = %path.display(), error = %e, "response_store: failed to create directory");
        return None;
    }

    // Pretty-print the JSON if valid; fall back to raw bytes otherwise.
    let content = serde_json::from_slice::<serde_json::Value>(bytes)
        .ok()
        .and_then(|v| serde_json::to_vec_pretty(&v).ok())
        .unwrap_or_else(|| bytes.to_vec());

    match fs::write(&path, &content).await {
        Ok(()) => {
            debug!(path = %path.display(), bytes = content.len(), "response_store: saved");
            Some(path)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "response_store: failed to write response file");
            None
        }
    }
}
