//! The filtered query and per-row classification.

use std::fmt;

use serde::Serialize;

use crate::connector::LakeSession;
use crate::error::ReproError;
use crate::loader::FILTER_CATEGORY;

/// Row limit of the probe query.
pub const QUERY_LIMIT: usize = 3;

/// Whether a returned row satisfies the `WHERE` clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RowStatus {
    #[serde(rename = "ok")]
    Ok,
    #[serde(rename = "BUG")]
    Bug,
}

impl fmt::Display for RowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowStatus::Ok => f.write_str("ok"),
            RowStatus::Bug => f.write_str("BUG"),
        }
    }
}

/// A row returned by the probe query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObservedRow {
    pub id: String,
    pub category: String,
    pub status: RowStatus,
}

impl ObservedRow {
    pub fn classify(id: String, category: String) -> Self {
        let status = if category == FILTER_CATEGORY {
            RowStatus::Ok
        } else {
            RowStatus::Bug
        };
        Self {
            id,
            category,
            status,
        }
    }
}

impl fmt::Display for ObservedRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  {} {} [{}]", self.id, self.category, self.status)
    }
}

/// Rows returned by one execution of the probe query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryRun {
    pub label: String,
    pub rows: Vec<ObservedRow>,
}

impl QueryRun {
    /// True if any row violated the filter.
    pub fn has_bug(&self) -> bool {
        self.rows.iter().any(|r| r.status == RowStatus::Bug)
    }

    pub fn ids(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.id.as_str()).collect()
    }
}

/// The probe query against `table`.
pub fn probe_sql(table: &str) -> String {
    format!(
        "SELECT id, category FROM {} WHERE category = '{}' ORDER BY created_at DESC LIMIT {}",
        table, FILTER_CATEGORY, QUERY_LIMIT
    )
}

/// Run the probe query and classify each returned row.
pub fn run_probe(session: &LakeSession, label: &str) -> Result<QueryRun, ReproError> {
    let sql = probe_sql(&session.table());
    let conn = session.connection();

    let mut stmt = conn.prepare(&sql).map_err(|e| ReproError::query(&sql, e))?;
    let mut rows = stmt.query([]).map_err(|e| ReproError::query(&sql, e))?;

    let mut observed = Vec::new();
    while let Some(row) = rows.next().map_err(|e| ReproError::query(&sql, e))? {
        let id: String = row.get(0).map_err(|e| ReproError::query(&sql, e))?;
        let category: String = row.get(1).map_err(|e| ReproError::query(&sql, e))?;
        let row = ObservedRow::classify(id, category);
        if row.status == RowStatus::Bug {
            tracing::warn!(label, id = %row.id, category = %row.category, "Row violates filter");
        }
        observed.push(row);
    }

    tracing::info!(label, rows = observed.len(), "Probe query finished");
    Ok(QueryRun {
        label: label.to_string(),
        rows: observed,
    })
}
