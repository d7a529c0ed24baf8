//! Name normalization and approximate duplicate matching.
//!
//! Both ingestion (deriving a record id) and lookup (normalizing the query) run
//! names through `normalize`; lookup then ranks cached titles with `similarity`.

mod normalize;
mod similarity;

pub use normalize::normalize;
pub use similarity::similarity;

use common::model::attraction::Title;

/// Display names of the titles whose compare id scores at least `threshold`
/// against `query_id`, in title order.
pub fn matching_names(query_id: &str, titles: &[Title], threshold: f64) -> Vec<String> {
    titles
        .iter()
        .filter(|title| similarity(query_id, &title.compare_id) >= threshold)
        .map(|title| title.display_name.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_names_keeps_order_and_threshold() {
        let titles = vec![
            Title::new("trakucastle", "Trakų Castle"),
            Title::new("hillofcrosses", "Hill of Crosses"),
            Title::new("trakaicastle", "Trakai Castle"),
        ];
        let query = normalize("Trakai castle");
        assert_eq!(
            matching_names(&query, &titles, 0.5),
            vec!["Trakų Castle".to_string(), "Trakai Castle".to_string()]
        );
        assert!(matching_names(&query, &titles, 1.01).is_empty());
    }
}
