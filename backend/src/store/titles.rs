//! Seeding the cache's titles from an existing external store, so that lookups
//! also see attractions that were merged before this cache existed.

use crate::error::{Error, Result};
use crate::matching::normalize;
use crate::store::cache::CacheStore;
use common::model::attraction::Title;
use log::{info, warn};
use rusqlite::{Connection, OpenFlags};

/// Reads every stored description in the external store at `location` and adds
/// a title for each recoverable name. Returns the number of titles added.
pub fn initialize_titles(location: &str, cache: &CacheStore) -> Result<usize> {
    let conn = Connection::open_with_flags(
        location,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_URI | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(Error::Storage)?;

    let mut stmt = conn
        .prepare("SELECT description FROM destinations")
        .map_err(Error::Storage)?;
    let descriptions = stmt
        .query_map([], |row| row.get::<_, Option<String>>(0))
        .map_err(Error::Storage)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(Error::Storage)?;

    let mut skipped = 0usize;
    let titles: Vec<Title> = descriptions
        .iter()
        .filter_map(|description| {
            let name = description.as_deref().and_then(name_from_description);
            if name.is_none() {
                skipped += 1;
            }
            name
        })
        .map(|name| Title::new(normalize(&name), name))
        .collect();

    if skipped > 0 {
        warn!("Skipped {} descriptions without a readable name", skipped);
    }
    let added = cache.insert_titles(&titles)?;
    info!("Seeded {} titles from {}", added, location);
    Ok(added)
}

fn name_from_description(description: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(description).ok()?;
    value.get("name")?.as_str().map(str::to_string)
}
