//! Application state.

use anyhow::Context;

use stamp_jobs::JobStore;

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub jobs: JobStore,
}

impl AppState {
    /// Create new application state, ensuring working directories exist.
    pub async fn new(config: ApiConfig) -> anyhow::Result<Self> {
        tokio::fs::create_dir_all(&config.upload_dir)
            .await
            .with_context(|| format!("creating upload dir {}", config.upload_dir.display()))?;
        tokio::fs::create_dir_all(&config.output_dir)
            .await
            .with_context(|| format!("creating output dir {}", config.output_dir.display()))?;

        Ok(Self {
            config,
            jobs: JobStore::new(),
        })
    }
}
