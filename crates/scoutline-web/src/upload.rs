//! Upload progress tracking
//!
//! The progress bar is hidden both before an upload starts (0) and once it
//! has finished (100), and shown strictly in between.

use parking_lot::Mutex;
use std::sync::Arc;

/// Whether a progress bar should be shown for `pct`
#[must_use]
pub const fn progress_visible(pct: u8) -> bool {
    pct > 0 && pct < 100
}

/// Progress of one media upload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadTask {
    progress: u8,
    attempt: u32,
}

impl UploadTask {
    /// Task that has not started
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a progress report
    ///
    /// Values above 100 are clamped; reports lower than the current progress
    /// are ignored within one attempt.
    pub fn report(&mut self, pct: u32) {
        let pct = u8::try_from(pct.min(100)).unwrap_or(100);
        if pct > self.progress {
            self.progress = pct;
        }
    }

    /// Current percentage
    #[must_use]
    pub const fn progress(&self) -> u8 {
        self.progress
    }

    /// Whether the progress bar is shown
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        progress_visible(self.progress)
    }

    /// Whether the upload reached 100
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.progress >= 100
    }

    /// Number of attempts started after the first
    #[must_use]
    pub const fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Begin a new attempt from 0
    pub fn restart(&mut self) {
        self.progress = 0;
        self.attempt += 1;
    }
}

/// Upload task shared with a progress callback
pub type SharedUploadTask = Arc<Mutex<UploadTask>>;

/// Callback for [`ApiClient::upload_media`](crate::api_client::ApiClient::upload_media)
/// that feeds `task`
pub fn progress_reporter(task: &SharedUploadTask) -> impl Fn(u8) + Send + Sync + 'static {
    let task = Arc::clone(task);
    move |pct| task.lock().report(u32::from(pct))
}
