//! # External Store Writer
//!
//! Moves a drained batch of attractions into the authoritative store.
//!
//! Delivery is at-most-once: the cache's attraction rows are cleared whether or
//! not the external insert succeeded, so a failed batch is not replayed by the
//! next run. The image url is not part of the external schema.

use crate::error::{Error, Result};
use crate::store::cache::CacheSession;
use crate::store::{values_clause, ROWS_PER_STATEMENT};
use common::model::attraction::AttractionRecord;
use log::{error, info};
use rusqlite::types::ToSql;
use rusqlite::{Connection, OpenFlags};

/// Opens an existing store. A path that does not exist is a storage fault rather
/// than a fresh empty database.
pub fn open_existing(location: &str) -> Result<Connection> {
    Connection::open_with_flags(
        location,
        OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_URI | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(Error::Storage)
}

/// Inserts `records` into the store at `location`, then clears the cache's
/// attraction rows regardless of the outcome.
pub fn write_batch(
    location: &str,
    records: &[AttractionRecord],
    cache: &CacheSession<'_>,
) -> Result<()> {
    let written = open_existing(location).and_then(|mut conn| insert_all(&mut conn, records));

    match cache.clear_attractions() {
        Ok(cleared) => info!("Cleared {} cached attractions", cleared),
        Err(e) => {
            error!("Failed to clear cache after external write: {}", e);
            written?;
            return Err(e);
        }
    }

    match &written {
        Ok(()) => info!("Wrote {} attractions to {}", records.len(), location),
        Err(e) => error!("External write to {} failed, batch dropped: {}", location, e),
    }
    written
}

fn insert_all(conn: &mut Connection, records: &[AttractionRecord]) -> Result<()> {
    if records.is_empty() {
        return Ok(());
    }
    let tx = conn.transaction().map_err(Error::Storage)?;
    for chunk in records.chunks(ROWS_PER_STATEMENT) {
        let sql = format!(
            "INSERT INTO destinations (id, category, description, location, copyright) VALUES {}",
            values_clause(chunk.len(), 5)
        );
        let params: Vec<&dyn ToSql> = chunk
            .iter()
            .flat_map(|r| {
                [
                    &r.id as &dyn ToSql,
                    &r.category as &dyn ToSql,
                    &r.description as &dyn ToSql,
                    &r.location as &dyn ToSql,
                    &r.image_copyright as &dyn ToSql,
                ]
            })
            .collect();
        tx.execute(&sql, params.as_slice()).map_err(Error::Storage)?;
    }
    tx.commit().map_err(Error::Storage)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::store::cache::tests::record;
    use crate::store::cache::CacheStore;
    use std::path::Path;

    pub(crate) fn external_store(dir: &Path) -> String {
        let path = dir.join("external.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE destinations (
                id TEXT, category TEXT, description TEXT, location TEXT, copyright TEXT
            )",
        )
        .unwrap();
        path.to_string_lossy().into_owned()
    }

    fn external_count(location: &str) -> i64 {
        Connection::open(location)
            .unwrap()
            .query_row("SELECT COUNT(*) FROM destinations", [], |row| row.get(0))
            .unwrap()
    }

    fn seeded_cache(ids: &[&str]) -> CacheStore {
        let cache = CacheStore::open_in_memory().unwrap();
        for id in ids {
            cache.put_attraction(&record(id, None)).unwrap();
        }
        cache
    }

    #[test]
    fn successful_write_empties_attractions_and_keeps_titles() {
        let dir = tempfile::tempdir().unwrap();
        let location = external_store(dir.path());
        let cache = seeded_cache(&["a1", "b2", "c3"]);

        let titles_before = cache.read_all_titles().unwrap().len();
        {
            let session = cache.session();
            let records = session.read_all_attractions().unwrap();
            write_batch(&location, &records, &session).unwrap();
        }

        assert_eq!(external_count(&location), 3);
        assert!(matches!(cache.read_all_attractions(), Err(Error::EmptyCache)));
        assert_eq!(cache.read_all_titles().unwrap().len(), titles_before);
    }

    #[test]
    fn failed_write_still_clears_cache() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.db").to_string_lossy().into_owned();
        let cache = seeded_cache(&["a1"]);

        let err = {
            let session = cache.session();
            let records = session.read_all_attractions().unwrap();
            write_batch(&missing, &records, &session).unwrap_err()
        };

        assert!(matches!(err, Error::Storage(_)));
        assert!(matches!(cache.read_all_attractions(), Err(Error::EmptyCache)));
        assert!(!Path::new(&missing).exists());
    }

    #[test]
    fn external_schema_omits_url() {
        let dir = tempfile::tempdir().unwrap();
        let location = external_store(dir.path());
        let cache = CacheStore::open_in_memory().unwrap();
        let mut r = record("d4", Some("http://img/d4.jpg"));
        r.image_copyright = Some("Author".into());
        cache.put_attraction(&r).unwrap();

        let session = cache.session();
        let records = session.read_all_attractions().unwrap();
        write_batch(&location, &records, &session).unwrap();

        let copyright: Option<String> = Connection::open(&location)
            .unwrap()
            .query_row("SELECT copyright FROM destinations WHERE id = 'd4'", [], |row| row.get(0))
            .unwrap();
        assert_eq!(copyright.as_deref(), Some("Author"));
    }

    #[test]
    fn large_batches_are_split_across_statements() {
        let dir = tempfile::tempdir().unwrap();
        let location = external_store(dir.path());
        let records: Vec<_> = (0..2500).map(|i| record(&format!("r{i}"), None)).collect();

        let mut conn = open_existing(&location).unwrap();
        insert_all(&mut conn, &records).unwrap();
        assert_eq!(external_count(&location), 2500);
    }
}
