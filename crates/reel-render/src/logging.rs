//! Structured job logging.

use tracing::{error, info, warn};

use reel_models::{JobId, JobStage};

/// Job logger keyed by job id, with stage context on every line.
#[derive(Debug, Clone)]
pub struct JobLogger {
    job_id: String,
}

impl JobLogger {
    /// Create a logger for one render job.
    pub fn new(job_id: &JobId) -> Self {
        Self {
            job_id: job_id.to_string(),
        }
    }

    /// Log entry into a pipeline stage.
    pub fn log_stage(&self, stage: JobStage) {
        info!(job_id = %self.job_id, stage = %stage, "Stage started");
    }

    /// Log a progress update.
    pub fn log_progress(&self, stage: JobStage, message: &str) {
        info!(job_id = %self.job_id, stage = %stage, "{}", message);
    }

    /// Log a recoverable degradation.
    pub fn log_warning(&self, stage: JobStage, message: &str) {
        warn!(job_id = %self.job_id, stage = %stage, "{}", message);
    }

    /// Log a fatal job error.
    pub fn log_error(&self, stage: JobStage, message: &str) {
        error!(job_id = %self.job_id, stage = %stage, "{}", message);
    }

    /// Log job completion.
    pub fn log_completion(&self, message: &str) {
        info!(job_id = %self.job_id, stage = %JobStage::Done, "{}", message);
    }

    /// Get the job ID.
    pub fn job_id(&self) -> &str {
        &self.job_id
    }
}
