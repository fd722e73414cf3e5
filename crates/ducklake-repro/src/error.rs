//! Reproduction error types.

use std::fmt;

use thiserror::Error;

/// Connector setup steps, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupStep {
    LoadExtension,
    CreateSecret,
    AttachCatalog,
}

impl fmt::Display for SetupStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SetupStep::LoadExtension => "load extension",
            SetupStep::CreateSecret => "create secret",
            SetupStep::AttachCatalog => "attach catalog",
        };
        f.write_str(name)
    }
}

/// Stages of the flush transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushStage {
    /// Acquiring the dedicated connection.
    Connection,
    Begin,
    Call,
    Commit,
}

impl fmt::Display for FlushStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FlushStage::Connection => "failed to get connection",
            FlushStage::Begin => "failed to begin transaction",
            FlushStage::Call => "flush call failed",
            FlushStage::Commit => "failed to commit transaction",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while running the reproduction.
#[derive(Debug, Error)]
pub enum ReproError {
    /// Opening the in-memory database failed.
    #[error("Connection failed: {0}")]
    Connect(#[source] duckdb::Error),

    /// Extension, secret or catalog setup failed.
    #[error("Setup failed ({step}): {sql}\nError: {source}")]
    Setup {
        step: SetupStep,
        sql: String,
        #[source]
        source: duckdb::Error,
    },

    /// Table creation or row insertion failed.
    #[error("Exec failed: {sql}\nError: {source}")]
    Statement {
        sql: String,
        #[source]
        source: duckdb::Error,
    },

    /// Flushing inlined data failed. The transaction has been rolled back.
    #[error("Flush failed: {stage}: {source}")]
    Flush {
        stage: FlushStage,
        #[source]
        source: duckdb::Error,
    },

    /// Query preparation, execution or row scan failed.
    #[error("Query failed: {sql}\nError: {source}")]
    Query {
        sql: String,
        #[source]
        source: duckdb::Error,
    },

    /// Writing scenario output failed.
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),
}

impl ReproError {
    pub(crate) fn statement(sql: &str, source: duckdb::Error) -> Self {
        ReproError::Statement {
            sql: sql.to_string(),
            source,
        }
    }

    pub(crate) fn query(sql: &str, source: duckdb::Error) -> Self {
        ReproError::Query {
            sql: sql.to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_error() -> duckdb::Error {
        let conn = duckdb::Connection::open_in_memory().unwrap();
        conn.execute_batch("SELECT * FROM no_such_table").unwrap_err()
    }

    #[test]
    fn test_statement_error_shows_sql() {
        let err = ReproError::statement("INSERT INTO lake.test_data VALUES (?, ?, ?)", engine_error());
        let msg = err.to_string();
        assert!(msg.starts_with("Exec failed: INSERT INTO lake.test_data"));
        assert!(msg.contains("\nError: "));
        assert!(msg.contains("no_such_table"));
    }

    #[test]
    fn test_flush_error_names_stage() {
        let err = ReproError::Flush {
            stage: FlushStage::Begin,
            source: engine_error(),
        };
        assert!(err
            .to_string()
            .starts_with("Flush failed: failed to begin transaction: "));
    }

    #[test]
    fn test_setup_step_display() {
        assert_eq!(SetupStep::AttachCatalog.to_string(), "attach catalog");
        assert_eq!(FlushStage::Call.to_string(), "flush call failed");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed");
        let err: ReproError = io_err.into();
        assert!(matches!(err, ReproError::Output(_)));
    }
}
