use super::transport::ImageTransport;
use super::{Downloadable, FailureList};
use crate::error::Error;
use common::model::attraction::AttractionRecord;
use rayon::prelude::*;
use rayon::ThreadPool;

/// Splits records into downloadables (those with an image url) and failures
/// (those without).
pub fn collect_downloadables(
    records: &[AttractionRecord],
    failures: &mut FailureList,
) -> Vec<Downloadable> {
    let mut pending = Vec::with_capacity(records.len());
    for record in records {
        match record.image_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => pending.push(Downloadable::new(&record.id, url)),
            _ => failures.record(&record.id, "no image url"),
        }
    }
    pending
}

/// Fetches every pending image on `pool`. Items whose fetch fails are moved to
/// `failures`; the survivors keep their input order.
pub fn download(
    pending: Vec<Downloadable>,
    transport: &dyn ImageTransport,
    pool: &ThreadPool,
    failures: &mut FailureList,
) -> Vec<Downloadable> {
    let results: Vec<Result<Downloadable, (String, Error)>> = pool.install(|| {
        pending
            .into_par_iter()
            .map(|mut item| match transport.fetch(&item.source_url) {
                Ok(bytes) => {
                    item.raw_bytes = bytes;
                    Ok(item)
                }
                Err(e) => Err((item.id, e)),
            })
            .collect()
    });

    let mut fetched = Vec::with_capacity(results.len());
    for result in results {
        match result {
            Ok(item) => fetched.push(item),
            Err((id, e)) => failures.record(&id, e),
        }
    }
    fetched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::cache::tests::record;
    use crate::sync::testing::StubTransport;
    use rayon::ThreadPoolBuilder;

    #[test]
    fn records_without_url_fail_immediately() {
        let mut failures = FailureList::new();
        let records = vec![
            record("a1", Some("http://img/a1")),
            record("b2", None),
            record("c3", Some("   ")),
            record("d4", Some("http://img/d4")),
        ];
        let pending = collect_downloadables(&records, &mut failures);

        let ids: Vec<_> = pending.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "d4"]);
        assert_eq!(failures.ids(), ["b2", "c3"]);
    }

    #[test]
    fn failed_fetches_are_recorded_and_order_is_kept() {
        let pool = ThreadPoolBuilder::new().num_threads(3).build().unwrap();
        let transport = StubTransport::default()
            .with_image("http://img/1", vec![1])
            .with_image("http://img/3", vec![3])
            .with_image("http://img/4", vec![4]);
        let pending = (1..=4)
            .map(|i| Downloadable::new(format!("r{i}"), format!("http://img/{i}")))
            .collect();

        let mut failures = FailureList::new();
        let fetched = download(pending, &transport, &pool, &mut failures);

        let got: Vec<_> = fetched
            .iter()
            .map(|d| (d.id.as_str(), d.raw_bytes.clone()))
            .collect();
        assert_eq!(got, vec![("r1", vec![1]), ("r3", vec![3]), ("r4", vec![4])]);
        assert_eq!(failures.ids(), ["r2"]);
    }
}
