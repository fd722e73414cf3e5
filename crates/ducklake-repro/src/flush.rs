//! Migration of inlined data to object storage.

use duckdb::Connection;

use crate::connector::LakeSession;
use crate::error::{FlushStage, ReproError};

/// Catalog procedure that writes inlined rows out as data files.
pub const FLUSH_PROCEDURE: &str = "ducklake_flush_inlined_data";

pub fn flush_sql(alias: &str) -> String {
    format!("CALL {}('{}');", FLUSH_PROCEDURE, alias)
}

/// Flush the session's catalog on a dedicated connection inside an explicit
/// transaction, the way a production caller invokes the procedure.
pub fn flush_inlined_data(session: &LakeSession) -> Result<(), ReproError> {
    let mut conn = session.dedicated_connection()?;
    let sql = flush_sql(session.alias());
    tracing::info!(alias = session.alias(), "Flushing inlined data");
    execute_in_transaction(&mut conn, &sql)
}

/// Run `sql` in a transaction on `conn`: commit on success, roll back on failure.
pub(crate) fn execute_in_transaction(conn: &mut Connection, sql: &str) -> Result<(), ReproError> {
    let tx = conn.transaction().map_err(|source| ReproError::Flush {
        stage: FlushStage::Begin,
        source,
    })?;

    if let Err(source) = tx.execute_batch(sql) {
        if let Err(e) = tx.rollback() {
            tracing::warn!(error = %e, "Rollback after failed flush also failed");
        }
        return Err(ReproError::Flush {
            stage: FlushStage::Call,
            source,
        });
    }

    tx.commit().map_err(|source| ReproError::Flush {
        stage: FlushStage::Commit,
        source,
    })
}
