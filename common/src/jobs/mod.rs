use serde::{Deserialize, Serialize};

/// Lifecycle of a background job as reported by the status endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum JobStatus {
    Pending,
    InProgress(u32),
    Completed(String),
    Failed(String),
}
