//! Printing Job Model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Printing job status (forward only)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum JobStatus {
    New,
    InProgress,
    Completed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    /// Re-applying the current status is allowed; going back is not.
    pub fn can_advance_to(&self, next: JobStatus) -> bool {
        next >= *self
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Printing job entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PrintingJob {
    pub id: i64,
    pub job_number: String,
    pub order_id: i64,
    pub assigned_to: Option<i64>,
    pub notes: Option<String>,
    pub status: JobStatus,
    pub started_at: Option<i64>,
    pub completed_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create printing job payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrintingJobCreate {
    pub order_id: i64,
    pub assigned_to: Option<i64>,
    pub notes: Option<String>,
}

/// Update printing job status payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrintingJobStatusUpdate {
    pub status: JobStatus,
}
