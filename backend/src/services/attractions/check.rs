use crate::config::AppConfig;
use crate::error::Result;
use crate::matching::{matching_names, normalize};
use crate::services::error_response;
use crate::store::cache::CacheStore;
use actix_web::{web, HttpResponse, Responder};
use common::requests::CheckQuery;

/// Handles `GET /api/attractions/check?name=...`.
///
/// # Arguments
/// * `cache` - The shared `CacheStore` holding the known titles.
/// * `config` - Supplies the similarity threshold.
/// * `query` - The candidate name as typed by the submitter.
///
/// # Returns
/// A JSON array of display names likely to be duplicates of `name`, possibly
/// empty, or `500` if the titles cannot be read.
pub(crate) async fn process(
    cache: web::Data<CacheStore>,
    config: web::Data<AppConfig>,
    query: web::Query<CheckQuery>,
) -> impl Responder {
    let cache = cache.get_ref().clone();
    let threshold = config.match_threshold;
    let name = query.into_inner().name;
    match web::block(move || similar_names(&cache, &name, threshold)).await {
        Ok(Ok(names)) => HttpResponse::Ok().json(names),
        Ok(Err(e)) => error_response(&e),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Display names of cached titles whose compare id scores above `threshold`
/// against the normalized `name`, in title insertion order.
pub fn similar_names(cache: &CacheStore, name: &str, threshold: f64) -> Result<Vec<String>> {
    let titles = cache.read_all_titles()?;
    Ok(matching_names(&normalize(name), &titles, threshold))
}
