use crate::errors::{AppError, HubError};
use crate::models::{HubData, UserProfile};
use crate::storage::persist_data;
use chrono::Utc;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub data: Arc<Mutex<HubData>>,
}

impl AppState {
    pub fn new(data_path: PathBuf, data: HubData) -> Self {
        Self {
            data_path,
            data: Arc::new(Mutex::new(data)),
        }
    }

    /// Snapshot of a user's profile.
    pub async fn profile(&self, uid: &str) -> Result<UserProfile, AppError> {
        let data = self.data.lock().await;
        data.users
            .get(uid)
            .map(|doc| doc.profile.clone())
            .ok_or_else(|| HubError::UserNotFound(uid.to_string()).into())
    }

    /// Runs `apply` on a copy of the user's data. The copy is written to the
    /// data file first and only then replaces the in-memory state, so a
    /// rejected change or a failed write leaves both untouched.
    pub async fn update_profile<T>(
        &self,
        uid: &str,
        apply: impl FnOnce(&mut UserProfile) -> Result<T, HubError>,
    ) -> Result<T, AppError> {
        self.update_data(uid, |data| {
            let doc = data
                .users
                .get_mut(uid)
                .ok_or_else(|| HubError::UserNotFound(uid.to_string()))?;
            let out = apply(&mut doc.profile)?;
            doc.updated_at = Utc::now();
            Ok(out)
        })
        .await
    }

    /// Like [`AppState::update_profile`], with access to the whole document.
    pub async fn update_data<T>(
        &self,
        uid: &str,
        apply: impl FnOnce(&mut HubData) -> Result<T, HubError>,
    ) -> Result<T, AppError> {
        let mut data = self.data.lock().await;
        if !data.users.contains_key(uid) {
            return Err(HubError::UserNotFound(uid.to_string()).into());
        }

        let mut next = data.clone();
        let out = apply(&mut next)?;
        persist_data(&self.data_path, &next).await?;
        *data = next;
        Ok(out)
    }
}
