// src/core/profile_store.rs
//! Persistence seam for the most recent profile

use std::sync::Arc;

use crate::app_log;
use crate::core::config_manager::{AppConfig, StorageBackend};
use crate::core::csv_store::CsvProfileStore;
use crate::core::database::{Database, ProfileRepository};
use crate::error::{CoachError, Result};
use crate::types::Profile;

#[rocket::async_trait]
pub trait ProfileStore: Send + Sync {
    /// Persist a freshly analysed profile.
    async fn save(&self, profile: &Profile) -> Result<()>;

    /// The most recently saved profile, if any was ever saved.
    async fn latest(&self) -> Result<Option<Profile>>;

    /// Short human-readable description of where profiles go.
    fn location(&self) -> String;
}

/// Open the backend selected in the configuration.
pub async fn open_profile_store(config: &AppConfig) -> Result<Arc<dyn ProfileStore>> {
    match config.storage {
        StorageBackend::Csv => {
            app_log!(info, "Using CSV profile store: {}", config.csv_file.display());
            Ok(Arc::new(CsvProfileStore::new(config.csv_file.clone())))
        }
        StorageBackend::Database => {
            app_log!(info, "Using SQLite profile store: {}", config.database_path.display());
            let db = Database::new(&config.database_path)
                .await
                .map_err(|e| CoachError::persistence("Failed to open database", format!("{:#}", e)))?;
            Ok(Arc::new(ProfileRepository::new(db)))
        }
    }
}
