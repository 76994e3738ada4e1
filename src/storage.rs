use crate::errors::AppError;
use crate::models::HubData;
use std::path::Path;
use tokio::fs;
use tracing::{error, info};

pub async fn load_data(path: &Path) -> HubData {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice::<HubData>(&bytes) {
            Ok(data) => {
                info!(users = data.users.len(), "loaded data from {}", path.display());
                data
            }
            Err(err) => {
                error!("failed to parse data file: {err}");
                HubData::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => HubData::default(),
        Err(err) => {
            error!("failed to read data file: {err}");
            HubData::default()
        }
    }
}

/// Writes a sibling temp file, then renames it over `path`.
pub async fn persist_data(path: &Path, data: &HubData) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(data).map_err(AppError::internal)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, payload).await.map_err(AppError::internal)?;
    fs::rename(&tmp, path).await.map_err(AppError::internal)?;
    Ok(())
}
