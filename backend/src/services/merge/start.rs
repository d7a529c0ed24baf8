//! Starts a merge run as a background job.
//!
//! The handler registers the job as `Pending` and answers with its id at once.
//! A spawned task then runs `sync::run_merge` through `spawn_blocking`, since
//! the run does SQLite, network and image work. Stage changes are reported as
//! `InProgress(pct)`; the outcome becomes `Completed(summary)` or
//! `Failed(cause)`.

use crate::job_controller::state::JobsState;
use crate::sync::{run_merge, SyncContext};
use actix_web::{web, HttpResponse, Responder};
use common::jobs::JobStatus;
use common::model::merge::DeliveryMode;
use common::requests::StartMergeRequest;
use log::error;

/// Handles `POST /api/merge/start`.
///
/// Registers a merge job and returns at once; clients poll
/// `GET /api/merge/status/{job_id}` for progress and the final summary.
///
/// # Arguments
/// * `state` - The shared `JobsState` the job reports into.
/// * `ctx` - The `SyncContext` the run executes with.
/// * `payload` - The external store location and optional remote endpoint.
///
/// # Returns
/// `{"job_id": ...}` on success, or `400` when no external store is given.
pub(crate) async fn process(
    state: web::Data<JobsState>,
    ctx: web::Data<SyncContext>,
    payload: web::Json<StartMergeRequest>,
) -> impl Responder {
    let req = payload.into_inner();
    if req.external_store.trim().is_empty() {
        return HttpResponse::BadRequest()
            .json(serde_json::json!({ "error": "No destination db provided" }));
    }
    let job_id = schedule_merge_job(state.get_ref().clone(), ctx.get_ref().clone(), req).await;
    HttpResponse::Ok().json(serde_json::json!({ "job_id": job_id }))
}

/// Registers a `Pending` job and spawns the task that drives it.
///
/// The run itself goes through `spawn_blocking`. Each stage start is reported
/// as `InProgress(pct)` from the worker thread, and the outcome is reported
/// once the blocking task has joined.
///
/// # Arguments
/// * `state` - The application's shared `JobsState`.
/// * `ctx` - The `SyncContext` moved into the worker.
/// * `req` - The external store and delivery target.
///
/// # Returns
/// The new job id.
async fn schedule_merge_job(state: JobsState, ctx: SyncContext, req: StartMergeRequest) -> String {
    let job_id = state.register().await;
    let job_id_for_task = job_id.clone();

    tokio::spawn(async move {
        let job_id = job_id_for_task;
        let worker_state = state.clone();
        let worker_job_id = job_id.clone();
        let mode = DeliveryMode::from_endpoint(req.remote_endpoint);

        let handle = tokio::task::spawn_blocking(move || {
            run_merge(&ctx, &req.external_store, &mode, |stage| {
                worker_state
                    .report_blocking(&worker_job_id, JobStatus::InProgress(stage.progress()));
            })
        });

        let status = match handle.await {
            Ok(Ok(summary)) => JobStatus::Completed(summary.to_string()),
            Ok(Err(e)) => JobStatus::Failed(format!("Failed to merge: {}", e)),
            Err(e) => {
                error!("Merge job {} did not finish: {}", job_id, e);
                JobStatus::Failed(format!("Task join error: {}", e))
            }
        };
        state.report(&job_id, status).await;
    });

    job_id
}
