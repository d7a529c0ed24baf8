use serde::{Deserialize, Serialize};
use std::fmt;

/// Where the processed images of a merge run end up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryMode {
    /// One JPEG per attraction in the configured output directory.
    Local,
    /// A single JSON batch posted to the given endpoint.
    Remote { endpoint: String },
}

impl DeliveryMode {
    pub fn from_endpoint(endpoint: Option<String>) -> Self {
        match endpoint {
            Some(endpoint) => DeliveryMode::Remote { endpoint },
            None => DeliveryMode::Local,
        }
    }
}

/// Outcome of one completed merge run.
///
/// A run in which every record failed is still a completed run; it is told apart
/// only by `failed.len()` matching the number of records that were drained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeSummary {
    pub mode: DeliveryMode,
    /// Records drained from the cache at the start of the run.
    pub total: usize,
    /// Images written (local) or included in the posted batch (remote).
    pub delivered: usize,
    /// Ids of records that dropped out at some stage, in the order they failed.
    pub failed: Vec<String>,
    /// Transport failure of the remote batch. Never itemised into `failed`.
    pub delivery_error: Option<String>,
}

impl MergeSummary {
    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }
}

impl fmt::Display for MergeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let DeliveryMode::Remote { endpoint } = &self.mode {
            writeln!(f, "Sent {} images to {}.", self.delivered, endpoint)?;
        }
        write!(
            f,
            "Finished with {} failed images\n\t[{}]",
            self.failed.len(),
            self.failed.join(" ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(mode: DeliveryMode, failed: &[&str]) -> MergeSummary {
        MergeSummary {
            mode,
            total: 3,
            delivered: 3 - failed.len(),
            failed: failed.iter().map(|s| s.to_string()).collect(),
            delivery_error: None,
        }
    }

    #[test]
    fn local_status_lists_failed_ids() {
        let s = summary(DeliveryMode::Local, &["a", "b"]);
        assert_eq!(s.to_string(), "Finished with 2 failed images\n\t[a b]");
    }

    #[test]
    fn remote_status_names_endpoint() {
        let s = summary(
            DeliveryMode::Remote {
                endpoint: "http://sink/images".to_string(),
            },
            &[],
        );
        assert_eq!(
            s.to_string(),
            "Sent 3 images to http://sink/images.\nFinished with 0 failed images\n\t[]"
        );
    }

    #[test]
    fn endpoint_selects_mode() {
        assert_eq!(DeliveryMode::from_endpoint(None), DeliveryMode::Local);
        assert!(matches!(
            DeliveryMode::from_endpoint(Some("x".into())),
            DeliveryMode::Remote { .. }
        ));
    }
}
