//! Scenario configuration.
//!
//! The defaults reproduce the docker compose environment the harness was
//! written for: a PostgreSQL metadata store at `postgres:5432` and an
//! S3-compatible object store at `s3:9000`.

use serde::Serialize;

/// PostgreSQL DSN of the DuckLake metadata store.
pub const PG_DSN: &str = "host=postgres port=5432 dbname=ducklake user=ducklake password=ducklake";

/// Object store access key.
pub const S3_KEY: &str = "rustfsadmin";

/// Object store secret key.
pub const S3_SECRET: &str = "rustfsadmin";

/// Object store endpoint (host:port, no scheme).
pub const S3_ENDPOINT: &str = "s3:9000";

/// Where flushed Parquet files are written.
pub const DATA_PATH: &str = "s3://ducklake/data";

/// Inserts below this row count stay inlined in the metadata store.
pub const INLINING_ROW_LIMIT: u64 = 100;

/// Alias the DuckLake catalog is attached under.
pub const CATALOG_ALIAS: &str = "lake";

/// Name of the registered S3 secret.
pub const SECRET_NAME: &str = "s3_secret";

/// Number of A/B row pairs inserted.
pub const PAIR_COUNT: usize = 3;

/// Output format of the binary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One line per step and per returned row.
    #[default]
    Text,
    /// A single JSON report after the run.
    Json,
}

/// S3 credential registered with `CREATE OR REPLACE SECRET`.
#[derive(Debug, Clone)]
pub struct SecretConfig {
    pub name: String,
    pub key_id: String,
    pub secret: String,
    pub endpoint: String,
    pub use_ssl: bool,
    pub url_style: String,
}

impl Default for SecretConfig {
    fn default() -> Self {
        Self {
            name: SECRET_NAME.to_string(),
            key_id: S3_KEY.to_string(),
            secret: S3_SECRET.to_string(),
            endpoint: S3_ENDPOINT.to_string(),
            use_ssl: false,
            url_style: "path".to_string(),
        }
    }
}

/// DuckLake catalog attachment.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Alias used to qualify tables (`lake.test_data`).
    pub alias: String,

    /// PostgreSQL DSN of the metadata store.
    pub metadata_dsn: String,

    /// Object storage path for data files.
    pub data_path: String,

    /// `DATA_INLINING_ROW_LIMIT` passed to `ATTACH`.
    pub inlining_row_limit: u64,
}

impl CatalogConfig {
    /// The `ducklake:postgres:<dsn>` URI passed to `ATTACH`.
    pub fn uri(&self) -> String {
        format!("ducklake:postgres:{}", self.metadata_dsn)
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            alias: CATALOG_ALIAS.to_string(),
            metadata_dsn: PG_DSN.to_string(),
            data_path: DATA_PATH.to_string(),
            inlining_row_limit: INLINING_ROW_LIMIT,
        }
    }
}

/// Full reproduction configuration.
#[derive(Debug, Clone, Default)]
pub struct ReproConfig {
    pub secret: SecretConfig,
    pub catalog: CatalogConfig,

    /// Flush a second time and query again after the post-flush run.
    pub repeat_flush: bool,

    pub format: OutputFormat,
}
