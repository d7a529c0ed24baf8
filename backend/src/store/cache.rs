//! # Cache Store
//!
//! The local holding area for accepted attractions. Ingestion writes to it, the
//! lookup endpoint reads its titles, and a merge run drains its attractions into
//! the external store.
//!
//! One connection is opened at startup and shared through `CacheStore` (cloned
//! into the Actix app data and into merge jobs). Access is serialized by a mutex;
//! a merge run holds a `CacheSession` from the moment it reads the attractions
//! until it has cleared them, so a record submitted concurrently either lands in
//! that snapshot or waits and survives the clear.

use crate::error::{Error, Result};
use crate::store::insert_titles;
use common::model::attraction::{AttractionRecord, Title};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS destinations (
    id          TEXT PRIMARY KEY,
    category    TEXT NOT NULL,
    description TEXT NOT NULL,
    location    TEXT NOT NULL,
    name        TEXT NOT NULL,
    url         TEXT,
    copyright   TEXT
);
CREATE TABLE IF NOT EXISTS titles (
    compare TEXT NOT NULL,
    display TEXT NOT NULL
);
";

#[derive(Clone)]
pub struct CacheStore {
    conn: Arc<Mutex<Connection>>,
}

/// Exclusive access to the cache for the duration of a borrow.
pub struct CacheSession<'a> {
    conn: MutexGuard<'a, Connection>,
}

impl CacheStore {
    /// Opens (creating if needed) the cache database at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path).map_err(Error::Write)?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(Error::Write)?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA).map_err(Error::Write)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn session(&self) -> CacheSession<'_> {
        // A panic while holding the lock cannot leave SQLite half-written, so a
        // poisoned guard is still usable.
        let conn = self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        CacheSession { conn }
    }

    pub fn put_attraction(&self, record: &AttractionRecord) -> Result<()> {
        self.session().put_attraction(record)
    }

    pub fn read_all_attractions(&self) -> Result<Vec<AttractionRecord>> {
        self.session().read_all_attractions()
    }

    pub fn read_all_titles(&self) -> Result<Vec<Title>> {
        self.session().read_all_titles()
    }

    pub fn clear_attractions(&self) -> Result<usize> {
        self.session().clear_attractions()
    }

    pub fn insert_titles(&self, titles: &[Title]) -> Result<usize> {
        self.session().insert_titles(titles)
    }
}

impl CacheSession<'_> {
    /// Inserts the record and its title in one transaction.
    pub fn put_attraction(&mut self, record: &AttractionRecord) -> Result<()> {
        let tx = self.conn.transaction().map_err(Error::Write)?;
        tx.execute(
            "INSERT INTO destinations (id, category, description, location, name, url, copyright)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                record.id,
                record.category,
                record.description,
                record.location,
                record.name,
                record.image_url,
                record.image_copyright,
            ],
        )
        .map_err(Error::Write)?;
        insert_titles(&tx, &[Title::from(record)]).map_err(Error::Write)?;
        // Dropping an uncommitted transaction rolls it back.
        tx.commit().map_err(Error::Write)
    }

    /// Every cached attraction, in insertion order. An empty cache is an error.
    pub fn read_all_attractions(&self) -> Result<Vec<AttractionRecord>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, category, description, location, name, url, copyright
                 FROM destinations ORDER BY rowid",
            )
            .map_err(Error::Read)?;
        let records = stmt
            .query_map([], |row| {
                Ok(AttractionRecord {
                    id: row.get(0)?,
                    category: row.get(1)?,
                    description: row.get(2)?,
                    location: row.get(3)?,
                    name: row.get(4)?,
                    image_url: row.get(5)?,
                    image_copyright: row.get(6)?,
                })
            })
            .map_err(Error::Read)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(Error::Read)?;

        if records.is_empty() {
            return Err(Error::EmptyCache);
        }
        Ok(records)
    }

    /// Every cached title. Unlike attractions, none at all is a valid result.
    pub fn read_all_titles(&self) -> Result<Vec<Title>> {
        let mut stmt = self
            .conn
            .prepare("SELECT compare, display FROM titles ORDER BY rowid")
            .map_err(Error::Read)?;
        let titles = stmt
            .query_map([], |row| Ok(Title::new(row.get::<_, String>(0)?, row.get::<_, String>(1)?)))
            .map_err(Error::Read)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(Error::Read)?;
        Ok(titles)
    }

    /// Deletes every attraction row. Titles are left alone.
    pub fn clear_attractions(&self) -> Result<usize> {
        self.conn
            .execute("DELETE FROM destinations", [])
            .map_err(Error::Write)
    }

    /// Inserts every title in one transaction, so a failure leaves none behind.
    pub fn insert_titles(&mut self, titles: &[Title]) -> Result<usize> {
        let tx = self.conn.transaction().map_err(Error::Write)?;
        let inserted = insert_titles(&tx, titles).map_err(Error::Write)?;
        tx.commit().map_err(Error::Write)?;
        Ok(inserted)
    }
}
