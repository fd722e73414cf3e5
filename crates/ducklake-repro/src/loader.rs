//! Table creation and fixture rows.

use chrono::{Duration, NaiveDateTime};
use duckdb::params;

use crate::connector::LakeSession;
use crate::error::ReproError;

/// Category the query filters on.
pub const FILTER_CATEGORY: &str = "A";

/// The category that must never come back from the filtered query.
pub const OTHER_CATEGORY: &str = "B";

/// One scenario row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestRow {
    pub id: String,
    pub category: String,
    pub created_at: NaiveDateTime,
}

/// Build `pairs` A/B row pairs, in insertion order.
///
/// Pair `i` is `a_{i}` then `b_{i}`, both stamped `i` minutes before `now`.
pub fn fixture_rows(now: NaiveDateTime, pairs: usize) -> Vec<TestRow> {
    let mut rows = Vec::with_capacity(pairs * 2);
    for i in 0..pairs {
        let created_at = now - Duration::minutes(i as i64);
        rows.push(TestRow {
            id: format!("a_{}", i),
            category: FILTER_CATEGORY.to_string(),
            created_at,
        });
        rows.push(TestRow {
            id: format!("b_{}", i),
            category: OTHER_CATEGORY.to_string(),
            created_at,
        });
    }
    rows
}

fn create_table_sql(table: &str) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {} (
            id VARCHAR NOT NULL,
            category VARCHAR NOT NULL,
            created_at TIMESTAMP NOT NULL
        );",
        table
    )
}

/// Create the scenario table if it does not exist yet.
pub fn create_table(session: &LakeSession) -> Result<(), ReproError> {
    let sql = create_table_sql(&session.table());
    tracing::debug!(sql = %sql, "Creating table");
    session
        .connection()
        .execute_batch(&sql)
        .map_err(|e| ReproError::statement(&sql, e))
}

/// Insert rows one statement at a time, in order. Returns the number inserted.
pub fn insert_rows(session: &LakeSession, rows: &[TestRow]) -> Result<usize, ReproError> {
    let sql = format!("INSERT INTO {} VALUES (?, ?, ?)", session.table());
    for row in rows {
        tracing::debug!(id = %row.id, category = %row.category, "Inserting row");
        session
            .connection()
            .execute(&sql, params![row.id, row.category, row.created_at])
            .map_err(|e| ReproError::statement(&sql, e))?;
    }
    Ok(rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::{memory_lake, LakeSession};
    use chrono::NaiveDate;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_fixture_rows_order_and_ids() {
        let rows = fixture_rows(noon(), 3);
        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["a_0", "b_0", "a_1", "b_1", "a_2", "b_2"]);
        assert_eq!(rows.iter().filter(|r| r.category == "A").count(), 3);
        assert_eq!(rows.iter().filter(|r| r.category == "B").count(), 3);
    }

    #[test]
    fn test_fixture_timestamps_decrease_per_pair() {
        let rows = fixture_rows(noon(), 3);
        for pair in rows.chunks(2) {
            assert_eq!(pair[0].created_at, pair[1].created_at);
        }
        assert_eq!(rows[0].created_at, noon());
        assert_eq!(rows[2].created_at, noon() - Duration::minutes(1));
        assert_eq!(rows[4].created_at, noon() - Duration::minutes(2));
    }

    #[test]
    fn test_fixture_zero_pairs() {
        assert!(fixture_rows(noon(), 0).is_empty());
    }

    #[test]
    fn test_create_and_insert() {
        let session = memory_lake();
        create_table(&session).unwrap();
        // Second create is a no-op.
        create_table(&session).unwrap();

        let inserted = insert_rows(&session, &fixture_rows(noon(), 3)).unwrap();
        assert_eq!(inserted, 6);

        let (count, distinct): (i64, i64) = session
            .connection()
            .query_row(
                "SELECT count(*), count(DISTINCT id) FROM lake.test_data",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(count, 6);
        assert_eq!(distinct, 6);

        let newest: String = session
            .connection()
            .query_row(
                "SELECT strftime(max(created_at), '%Y-%m-%d %H:%M:%S') FROM lake.test_data",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(newest, "2024-05-01 12:00:00");
    }

    #[test]
    fn test_insert_without_table_fails_with_sql() {
        let session = memory_lake();
        let err = insert_rows(&session, &fixture_rows(noon(), 1)).unwrap_err();
        match err {
            ReproError::Statement { sql, .. } => {
                assert_eq!(sql, "INSERT INTO lake.test_data VALUES (?, ?, ?)");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_table_persists_across_sessions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lake.duckdb");
        let attach = format!("ATTACH '{}' AS lake;", path.display());

        {
            let session = LakeSession::open("lake").unwrap();
            session.connection().execute_batch(&attach).unwrap();
            create_table(&session).unwrap();
            insert_rows(&session, &fixture_rows(noon(), 2)).unwrap();
        }

        let session = LakeSession::open("lake").unwrap();
        session.connection().execute_batch(&attach).unwrap();
        create_table(&session).unwrap();
        let count: i64 = session
            .connection()
            .query_row("SELECT count(*) FROM lake.test_data", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 4);
    }
}
