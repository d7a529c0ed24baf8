pub mod attractions;
pub mod merge;

use crate::error::Error;
use actix_web::HttpResponse;
use serde_json::json;

/// Maps a service error to its JSON error response: validation failures are the
/// client's fault, everything else is ours.
pub(crate) fn error_response(err: &Error) -> HttpResponse {
    let body = json!({ "error": err.to_string() });
    match err {
        Error::Validation(_) => HttpResponse::BadRequest().json(body),
        _ => HttpResponse::InternalServerError().json(body),
    }
}
