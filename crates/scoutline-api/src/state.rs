//! Application state management

use scoutline_core::{Config, context_error, context_error::Result};
use scoutline_database::Repository;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Config,
    /// Profile, order and settings store
    pub repo: Arc<dyn Repository>,
    /// Base directory for uploaded media
    pub media_dir: PathBuf,
    /// Lower-case md5 hex digests of accepted admin tokens
    pub admin_token_hashes: HashSet<String>,
    /// When the server started
    pub started_at: Instant,
}

impl AppState {
    /// Create new application state
    ///
    /// # Errors
    ///
    /// Returns an error if the media directory cannot be created.
    pub fn new(config: Config, repo: Arc<dyn Repository>) -> Result<Self> {
        let media_dir = config.storage.media_dir.clone();
        std::fs::create_dir_all(&media_dir)?;

        let admin_token_hashes = config
            .security
            .admin_token_hashes
            .iter()
            .map(|hash| hash.trim().to_ascii_lowercase())
            .collect();

        Ok(Self {
            config,
            repo,
            media_dir,
            admin_token_hashes,
            started_at: Instant::now(),
        })
    }

    /// Whether a bearer token hashes to one of the configured admin hashes
    #[must_use]
    pub fn is_admin_token(&self, token: &str) -> bool {
        let digest = format!("{:x}", md5::compute(token));
        self.admin_token_hashes.contains(&digest)
    }

    /// Directory a media file uploaded on `date` is stored in
    #[must_use]
    pub fn get_storage_path(&self, date: chrono::NaiveDate) -> PathBuf {
        if self.config.storage.organize_by_date {
            self.media_dir
                .join(date.format("%Y").to_string())
                .join(date.format("%m").to_string())
                .join(date.format("%d").to_string())
        } else {
            self.media_dir.clone()
        }
    }

    /// Seconds since the state was created
    #[must_use]
    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    /// Check if the application is properly configured
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails.
    pub fn validate(&self) -> Result<()> {
        if !self.media_dir.exists() {
            return Err(context_error!(
                "Media directory does not exist: {}",
                self.media_dir.display()
            ));
        }

        // Try to create a test file to verify write permissions
        let test_file = self.media_dir.join(".write_test");
        std::fs::write(&test_file, "test")?;
        std::fs::remove_file(&test_file)?;

        if self.admin_token_hashes.is_empty() {
            tracing::warn!("No admin token hashes configured; every mutating request will be rejected");
        }

        Ok(())
    }
}
