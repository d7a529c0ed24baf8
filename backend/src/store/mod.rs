//! SQLite access for the local cache and the external store.
//!
//! - `cache`: the service-local store of accepted attractions and their titles.
//! - `external`: bulk writes into the authoritative store during a merge run.
//! - `titles`: seeding the cache's titles from an existing external store.

pub mod cache;
pub mod external;
pub mod titles;

use common::model::attraction::Title;
use rusqlite::types::ToSql;
use rusqlite::{Connection, Transaction};

/// Anything that can run a single parameterised statement.
///
/// Implemented by plain connections and by transactions so that helpers such as
/// `insert_titles` can take part in a caller's transaction or run standalone.
pub trait Executor {
    fn execute(&self, sql: &str, params: &[&dyn ToSql]) -> rusqlite::Result<usize>;
}

impl Executor for Connection {
    fn execute(&self, sql: &str, params: &[&dyn ToSql]) -> rusqlite::Result<usize> {
        Connection::execute(self, sql, params)
    }
}

impl Executor for Transaction<'_> {
    fn execute(&self, sql: &str, params: &[&dyn ToSql]) -> rusqlite::Result<usize> {
        Connection::execute(self, sql, params)
    }
}

/// Rows per multi-row `INSERT`, keeping the bound parameter count well under
/// SQLite's limit.
pub(crate) const ROWS_PER_STATEMENT: usize = 1000;

/// Builds `"(?, ?), (?, ?), ..."` for `rows` rows of `columns` placeholders.
pub(crate) fn values_clause(rows: usize, columns: usize) -> String {
    let row = format!("({})", vec!["?"; columns].join(", "));
    vec![row; rows].join(", ")
}

/// Inserts titles `ROWS_PER_STATEMENT` at a time. An empty slice is a no-op.
///
/// The chunks are separate statements; pass a `Transaction` to make the whole
/// insert all-or-nothing.
pub fn insert_titles(executor: &impl Executor, titles: &[Title]) -> rusqlite::Result<usize> {
    let mut inserted = 0;
    for chunk in titles.chunks(ROWS_PER_STATEMENT) {
        let sql = format!(
            "INSERT INTO titles (compare, display) VALUES {}",
            values_clause(chunk.len(), 2)
        );
        let params: Vec<&dyn ToSql> = chunk
            .iter()
            .flat_map(|t| [&t.compare_id as &dyn ToSql, &t.display_name as &dyn ToSql])
            .collect();
        inserted += executor.execute(&sql, &params)?;
    }
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_clause_has_no_trailing_comma() {
        assert_eq!(values_clause(1, 2), "(?, ?)");
        assert_eq!(values_clause(2, 3), "(?, ?, ?), (?, ?, ?)");
    }

    #[test]
    fn insert_titles_works_on_connection_and_transaction() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE titles (compare TEXT NOT NULL, display TEXT NOT NULL)")
            .unwrap();

        assert_eq!(insert_titles(&conn, &[]).unwrap(), 0);
        assert_eq!(
            insert_titles(&conn, &[Title::new("a", "A"), Title::new("b", "B")]).unwrap(),
            2
        );

        let tx = conn.transaction().unwrap();
        insert_titles(&tx, &[Title::new("c", "C")]).unwrap();
        tx.rollback().unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM titles", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn insert_titles_splits_past_the_variable_limit() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE titles (compare TEXT NOT NULL, display TEXT NOT NULL)")
            .unwrap();
        let titles: Vec<_> = (0..20_000)
            .map(|i| Title::new(format!("place{i}"), format!("Place {i}")))
            .collect();

        assert_eq!(insert_titles(&conn, &titles).unwrap(), 20_000);
    }
}
