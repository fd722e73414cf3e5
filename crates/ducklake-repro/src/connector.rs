//! DuckDB session setup: extension, S3 secret and DuckLake catalog.

use duckdb::Connection;

use crate::config::{CatalogConfig, SecretConfig};
use crate::error::{FlushStage, ReproError, SetupStep};

/// Installs and loads the DuckLake extension.
pub const LOAD_EXTENSION_SQL: &str = "INSTALL ducklake; LOAD ducklake;";

/// Name of the table the scenario writes to.
pub const TABLE_NAME: &str = "test_data";

/// Quote a string as a SQL literal.
fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Render the `CREATE OR REPLACE SECRET` statement.
pub fn secret_sql(secret: &SecretConfig) -> String {
    format!(
        "CREATE OR REPLACE SECRET {name} (
            TYPE s3, PROVIDER config,
            KEY_ID {key_id}, SECRET {secret}, ENDPOINT {endpoint},
            USE_SSL {use_ssl}, URL_STYLE {url_style}
        );",
        name = secret.name,
        key_id = quote_literal(&secret.key_id),
        secret = quote_literal(&secret.secret),
        endpoint = quote_literal(&secret.endpoint),
        use_ssl = secret.use_ssl,
        url_style = quote_literal(&secret.url_style),
    )
}

/// Render the `ATTACH` statement for the DuckLake catalog.
pub fn attach_sql(catalog: &CatalogConfig) -> String {
    format!(
        "ATTACH {uri} AS {alias} (
            DATA_PATH {data_path},
            DATA_INLINING_ROW_LIMIT {limit}
        );",
        uri = quote_literal(&catalog.uri()),
        alias = catalog.alias,
        data_path = quote_literal(&catalog.data_path),
        limit = catalog.inlining_row_limit,
    )
}

/// A DuckDB connection with the lakehouse catalog attached under `alias`.
pub struct LakeSession {
    conn: Connection,
    alias: String,
}

impl LakeSession {
    /// Open an in-memory DuckDB database. Nothing is attached yet.
    pub fn open(alias: &str) -> Result<Self, ReproError> {
        let conn = Connection::open_in_memory().map_err(ReproError::Connect)?;
        Ok(Self::from_connection(conn, alias))
    }

    /// Wrap an existing connection whose catalog is already attached as `alias`.
    pub fn from_connection(conn: Connection, alias: &str) -> Self {
        Self {
            conn,
            alias: alias.to_string(),
        }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Fully qualified scenario table, e.g. `lake.test_data`.
    pub fn table(&self) -> String {
        format!("{}.{}", self.alias, TABLE_NAME)
    }

    /// A second connection to the same database instance.
    ///
    /// Extensions, secrets and attached catalogs are instance-wide, so the
    /// returned connection sees the same lake.
    pub fn dedicated_connection(&self) -> Result<Connection, ReproError> {
        self.conn.try_clone().map_err(|source| ReproError::Flush {
            stage: FlushStage::Connection,
            source,
        })
    }

    pub fn load_extension(&self) -> Result<(), ReproError> {
        self.setup(SetupStep::LoadExtension, LOAD_EXTENSION_SQL)
    }

    pub fn create_secret(&self, secret: &SecretConfig) -> Result<(), ReproError> {
        self.setup(SetupStep::CreateSecret, &secret_sql(secret))
    }

    /// Attach the catalog. Its alias must match the session alias.
    pub fn attach(&self, catalog: &CatalogConfig) -> Result<(), ReproError> {
        debug_assert_eq!(catalog.alias, self.alias);
        self.setup(SetupStep::AttachCatalog, &attach_sql(catalog))
    }

    fn setup(&self, step: SetupStep, sql: &str) -> Result<(), ReproError> {
        tracing::debug!(%step, sql = %sql, "Running setup statement");
        self.conn
            .execute_batch(sql)
            .map_err(|source| ReproError::Setup {
                step,
                sql: sql.to_string(),
                source,
            })
    }
}

/// Session over a plain in-memory catalog attached as `lake`.
///
/// Stands in for the DuckLake catalog where the extension is unavailable.
#[cfg(test)]
pub(crate) fn memory_lake() -> LakeSession {
    let session = LakeSession::open("lake").unwrap();
    session
        .connection()
        .execute_batch(
            "SET autoinstall_known_extensions = false;
             SET autoload_known_extensions = false;
             ATTACH ':memory:' AS lake;",
        )
        .unwrap();
    session
}
