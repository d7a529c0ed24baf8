use crate::job_controller::state::JobsState;
use actix_web::{web, HttpResponse, Responder};

/// Handles `GET /api/merge/status/{job_id}`.
///
/// # Arguments
/// * `job_id` - The id returned by `POST /api/merge/start`.
/// * `state` - The shared `JobsState`.
///
/// # Returns
/// The job's latest `JobStatus` as JSON, or `404` for an id that was never
/// registered.
pub(crate) async fn process(job_id: web::Path<String>, state: web::Data<JobsState>) -> impl Responder {
    match state.status(&job_id.into_inner()).await {
        Some(status) => HttpResponse::Ok().json(status),
        None => HttpResponse::NotFound().body("Job ID not found"),
    }
}
