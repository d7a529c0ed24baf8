use super::validate::{validate, wrap};
use crate::error::Result;
use crate::services::error_response;
use crate::store::cache::CacheStore;
use actix_web::{web, HttpResponse, Responder};
use log::{info, warn};

/// Handles `POST /api/attractions/add`.
///
/// The body is validated and stored on the blocking pool, since the cache lock
/// may be held by a merge run.
///
/// # Arguments
/// * `cache` - The shared `CacheStore`, injected by Actix.
/// * `body` - The raw JSON submission.
///
/// # Returns
/// `200` with an empty body once stored, `400` with `{"error": ...}` when the
/// submission is rejected, or `500` when the cache refuses the write (for
/// instance a duplicate id).
pub(crate) async fn process(cache: web::Data<CacheStore>, body: web::Bytes) -> impl Responder {
    let cache = cache.get_ref().clone();
    // The cache may be held by a running merge; wait for it off the event loop.
    match web::block(move || add_attraction(&cache, &body)).await {
        Ok(Ok(id)) => {
            info!("Accepted attraction {}", id);
            HttpResponse::Ok().finish()
        }
        Ok(Err(e)) => {
            warn!("Rejected attraction: {}", e);
            error_response(&e)
        }
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Validates `body` and stores the resulting record. Returns the new id.
pub fn add_attraction(cache: &CacheStore, body: &[u8]) -> Result<String> {
    let record = wrap(validate(body)?)?;
    cache.put_attraction(&record)?;
    Ok(record.id)
}
