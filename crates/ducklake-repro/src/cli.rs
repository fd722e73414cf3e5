//! Command line interface.

use clap::Parser;

use crate::config::{
    CatalogConfig, OutputFormat, ReproConfig, SecretConfig, DATA_PATH, INLINING_ROW_LIMIT,
    PG_DSN, S3_ENDPOINT, S3_KEY, S3_SECRET,
};

#[derive(Debug, Parser)]
#[command(name = "ducklake-repro")]
#[command(
    version,
    about = "Reproduce DuckLake WHERE + ORDER BY + LIMIT results on inlined data",
    long_about = None
)]
pub struct Cli {
    /// PostgreSQL DSN of the DuckLake metadata store
    #[arg(long, env = "DUCKLAKE_PG_DSN", default_value = PG_DSN)]
    pub pg_dsn: String,

    /// S3 access key
    #[arg(long, env = "DUCKLAKE_S3_KEY", default_value = S3_KEY)]
    pub s3_key: String,

    /// S3 secret key
    #[arg(long, env = "DUCKLAKE_S3_SECRET", default_value = S3_SECRET, hide_env_values = true)]
    pub s3_secret: String,

    /// S3 endpoint (host:port)
    #[arg(long, env = "DUCKLAKE_S3_ENDPOINT", default_value = S3_ENDPOINT)]
    pub s3_endpoint: String,

    /// Object storage path for flushed data files
    #[arg(long, env = "DUCKLAKE_DATA_PATH", default_value = DATA_PATH)]
    pub data_path: String,

    /// Row count below which inserts stay inlined in the metadata store
    #[arg(long, env = "DUCKLAKE_INLINING_ROW_LIMIT", default_value_t = INLINING_ROW_LIMIT)]
    pub inlining_row_limit: u64,

    /// Flush again and re-run the query after the post-flush run
    #[arg(long)]
    pub repeat_flush: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl Cli {
    /// Build the scenario configuration from parsed arguments.
    pub fn into_config(self) -> ReproConfig {
        ReproConfig {
            secret: SecretConfig {
                key_id: self.s3_key,
                secret: self.s3_secret,
                endpoint: self.s3_endpoint,
                ..SecretConfig::default()
            },
            catalog: CatalogConfig {
                metadata_dsn: self.pg_dsn,
                data_path: self.data_path,
                inlining_row_limit: self.inlining_row_limit,
                ..CatalogConfig::default()
            },
            repeat_flush: self.repeat_flush,
            format: self.format,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults_match_constants() {
        let config = Cli::try_parse_from(["ducklake-repro"]).unwrap().into_config();
        assert_eq!(config.catalog.metadata_dsn, PG_DSN);
        assert_eq!(config.catalog.data_path, DATA_PATH);
        assert_eq!(config.catalog.inlining_row_limit, INLINING_ROW_LIMIT);
        assert_eq!(config.secret.key_id, S3_KEY);
        assert_eq!(config.secret.endpoint, S3_ENDPOINT);
        assert!(!config.repeat_flush);
        assert_eq!(config.format, OutputFormat::Text);
    }

    #[test]
    fn test_cli_overrides() {
        let config = Cli::try_parse_from([
            "ducklake-repro",
            "--s3-endpoint",
            "localhost:9000",
            "--inlining-row-limit",
            "10",
            "--repeat-flush",
            "--format",
            "json",
        ])
        .unwrap()
        .into_config();

        assert_eq!(config.secret.endpoint, "localhost:9000");
        assert_eq!(config.catalog.inlining_row_limit, 10);
        assert!(config.repeat_flush);
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.catalog.alias, "lake");
    }

    #[test]
    fn test_cli_rejects_bad_limit() {
        assert!(Cli::try_parse_from(["ducklake-repro", "--inlining-row-limit", "many"]).is_err());
    }
}
