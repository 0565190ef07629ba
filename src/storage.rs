use crate::models::Payload;
use std::path::Path;
use tokio::fs;
use tracing::error;

/// Loads the last persisted payload snapshot so the dashboard can render
/// before (or without) reaching the API. A missing file is the normal first
/// run; anything unreadable is logged and ignored.
pub async fn load_snapshot(path: &Path) -> Option<Payload> {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(payload) => Some(payload),
            Err(err) => {
                error!("failed to parse snapshot file: {err}");
                None
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
        Err(err) => {
            error!("failed to read snapshot file: {err}");
            None
        }
    }
}

pub async fn persist_snapshot(path: &Path, payload: &Payload) -> Result<(), std::io::Error> {
    let body = serde_json::to_vec_pretty(payload).map_err(std::io::Error::other)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, body).await
}
