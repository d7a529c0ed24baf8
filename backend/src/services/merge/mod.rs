//! # Merge jobs over HTTP
//!
//! Routes under `/api/merge`:
//!
//! *   **`POST /start`** (`start::process`): takes a `StartMergeRequest`, registers
//!     a background job and returns `{"job_id": ...}` right away. The run itself
//!     executes on the blocking pool.
//!
//! *   **`GET /status/{job_id}`** (`get_status::process`): the job's current
//!     `JobStatus`, or `404` for an unknown id.

mod get_status;
mod start;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/merge";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/start", post().to(start::process))
        .route("/status/{job_id}", get().to(get_status::process))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::job_controller::state::{start_job_updater, JobsState};
    use crate::store::cache::tests::record;
    use crate::store::cache::CacheStore;
    use crate::store::external::tests::external_store;
    use crate::sync::testing::StubTransport;
    use crate::sync::SyncContext;
    use actix_web::http::StatusCode;
    use actix_web::{test, web, App};
    use common::jobs::JobStatus;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::mpsc;

    #[actix_web::test]
    async fn start_then_poll_until_completed() {
        let dir = tempfile::tempdir().unwrap();
        let store = external_store(dir.path());
        let cache = CacheStore::open_in_memory().unwrap();
        cache.put_attraction(&record("a1", None)).unwrap();
        let config = AppConfig {
            output_dir: dir.path().join("out"),
            ..AppConfig::default()
        };
        let ctx = SyncContext::new(cache, Arc::new(StubTransport::default()), &config).unwrap();

        let (tx, rx) = mpsc::channel(100);
        let jobs = JobsState::new(tx);
        tokio::spawn(start_job_updater(jobs.clone(), rx));

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(jobs.clone()))
                .app_data(web::Data::new(ctx))
                .service(configure_routes()),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/merge/start")
            .set_json(json!({ "external_store": store }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let job_id = body["job_id"].as_str().unwrap().to_string();

        let mut status = JobStatus::Pending;
        for _ in 0..200 {
            let req = test::TestRequest::get()
                .uri(&format!("/api/merge/status/{job_id}"))
                .to_request();
            status = test::call_and_read_body_json(&app, req).await;
            if matches!(status, JobStatus::Completed(_) | JobStatus::Failed(_)) {
                break;
            }
            actix_web::rt::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(
            status,
            JobStatus::Completed("Finished with 1 failed images\n\t[a1]".to_string())
        );
    }

    #[actix_web::test]
    async fn unknown_job_is_not_found() {
        let (tx, _rx) = mpsc::channel(1);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(JobsState::new(tx)))
                .service(configure_routes()),
        )
        .await;
        let req = test::TestRequest::get()
            .uri("/api/merge/status/nope")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
