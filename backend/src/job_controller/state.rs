//! Registry of background merge jobs started over HTTP.
//!
//! - `JobsState`: cloneable handle shared as Actix app data. Holds the status map
//!   and the sender side of the update channel.
//! - `JobUpdate`: a status change reported by a running job.
//! - `start_job_updater`: the single task that applies updates to the map, so
//!   workers never need the write lock themselves.

use common::jobs::JobStatus;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

#[derive(Clone)]
pub struct JobsState {
    /// Job id to its latest reported status.
    pub jobs: Arc<RwLock<HashMap<String, JobStatus>>>,
    /// Where running jobs push their `JobUpdate`s.
    pub tx: mpsc::Sender<JobUpdate>,
}

#[derive(Debug)]
pub struct JobUpdate {
    pub(crate) job_id: String,
    pub(crate) status: JobStatus,
}

impl JobsState {
    /// Creates an empty registry whose updates flow through `tx`.
    ///
    /// # Arguments
    /// * `tx` - Sender half of the channel drained by `start_job_updater`.
    pub fn new(tx: mpsc::Sender<JobUpdate>) -> Self {
        Self {
            jobs: Arc::new(RwLock::new(HashMap::new())),
            tx,
        }
    }

    /// Creates a fresh job id and records it as `Pending`.
    pub async fn register(&self) -> String {
        let job_id = Uuid::new_v4().to_string();
        self.jobs
            .write()
            .await
            .insert(job_id.clone(), JobStatus::Pending);
        job_id
    }

    /// Latest reported status of `job_id`, or `None` if it was never registered.
    pub async fn status(&self, job_id: &str) -> Option<JobStatus> {
        self.jobs.read().await.get(job_id).cloned()
    }

    /// Reports from a blocking worker thread. Updates are dropped once the
    /// updater has shut down.
    pub fn report_blocking(&self, job_id: &str, status: JobStatus) {
        let _ = self.tx.blocking_send(JobUpdate {
            job_id: job_id.to_string(),
            status,
        });
    }

    /// Reports from async code, waiting for channel capacity.
    pub async fn report(&self, job_id: &str, status: JobStatus) {
        let _ = self
            .tx
            .send(JobUpdate {
                job_id: job_id.to_string(),
                status,
            })
            .await;
    }
}

/// Applies every `JobUpdate` received on `rx` until all senders are gone.
pub async fn start_job_updater(state: JobsState, mut rx: mpsc::Receiver<JobUpdate>) {
    while let Some(update) = rx.recv().await {
        let mut jobs = state.jobs.write().await;
        jobs.insert(update.job_id, update.status);
    }
}
