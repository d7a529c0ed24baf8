//! # Attraction ingestion and lookup
//!
//! Routes under `/api/attractions`:
//!
//! *   **`POST /add`** (`add::process`): runs the JSON body through the
//!     validation gate, derives the record and its title, and stores both in the
//!     cache in one transaction. `200` with an empty body on success, `400` with
//!     `{"error": ...}` for rejected input, `500` for storage faults.
//!
//! *   **`GET /check?name=...`** (`check::process`): normalizes `name` and
//!     returns, as a JSON array, the display names of cached titles similar
//!     enough to be likely duplicates.

mod add;
mod check;
pub mod validate;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/attractions";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/add", post().to(add::process))
        .route("/check", get().to(check::process))
}
