use serde::Deserialize;

/// Request payload for `POST /api/merge/start`.
///
/// When `remote_endpoint` is present the processed images are posted there as a
/// single JSON batch, otherwise they are written to the local output directory.
#[derive(Debug, Clone, Deserialize)]
pub struct StartMergeRequest {
    pub external_store: String,
    #[serde(default)]
    pub remote_endpoint: Option<String>,
}

/// Query string of `GET /api/attractions/check`.
#[derive(Debug, Deserialize)]
pub struct CheckQuery {
    pub name: String,
}
