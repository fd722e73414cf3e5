//! The reproduction scenario.
//!
//! connect → create table → insert → probe → flush → probe (→ flush → probe).
//! Progress lines and probe rows are written to the scenario's output; the
//! caller decides whether a `BUG` row matters. Nothing here fails on one.

use std::io::Write;

use serde::Serialize;

use crate::config::{ReproConfig, PAIR_COUNT};
use crate::connector::LakeSession;
use crate::error::ReproError;
use crate::flush::flush_inlined_data;
use crate::loader::{create_table, fixture_rows, insert_rows};
use crate::query::{run_probe, QueryRun};

/// Printed before each probe run.
pub const QUERY_BANNER: &str = "query: WHERE category='A' ORDER BY created_at DESC LIMIT 3";

/// Outcome of a complete scenario.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub rows_inserted: usize,
    pub before_flush: QueryRun,
    pub after_flush: QueryRun,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after_repeat_flush: Option<QueryRun>,
    /// Every run returned the same ids in the same order.
    pub consistent: bool,
    /// Some run returned a row outside the filter.
    pub bug_observed: bool,
}

impl ScenarioReport {
    pub fn new(
        rows_inserted: usize,
        before_flush: QueryRun,
        after_flush: QueryRun,
        after_repeat_flush: Option<QueryRun>,
    ) -> Self {
        let runs: Vec<&QueryRun> = [
            Some(&before_flush),
            Some(&after_flush),
            after_repeat_flush.as_ref(),
        ]
        .into_iter()
        .flatten()
        .collect();
        let consistent = runs.windows(2).all(|w| w[0].rows == w[1].rows);
        let bug_observed = runs.iter().any(|run| run.has_bug());

        Self {
            rows_inserted,
            before_flush,
            after_flush,
            after_repeat_flush,
            consistent,
            bug_observed,
        }
    }

    /// One-line comparison of the runs. Informational only.
    pub fn summary(&self) -> String {
        if self.consistent {
            "comparison: identical results before and after flush".to_string()
        } else {
            let mut line = format!(
                "comparison: results differ: before [{}] after [{}]",
                self.before_flush.ids().join(", "),
                self.after_flush.ids().join(", ")
            );
            if let Some(repeat) = &self.after_repeat_flush {
                line.push_str(&format!(" after repeat [{}]", repeat.ids().join(", ")));
            }
            line
        }
    }
}

/// Drives the reproduction and writes progress to `out`.
pub struct Scenario<W: Write> {
    config: ReproConfig,
    out: W,
}

impl<W: Write> Scenario<W> {
    pub fn new(config: ReproConfig, out: W) -> Self {
        Self { config, out }
    }

    /// Connect and run the whole scenario.
    pub fn run(&mut self) -> Result<ScenarioReport, ReproError> {
        let session = self.connect()?;
        self.run_with_session(&session)
    }

    /// Open the database, load the extension, register the secret and attach
    /// the catalog.
    pub fn connect(&mut self) -> Result<LakeSession, ReproError> {
        writeln!(self.out, "connecting")?;
        let session = LakeSession::open(&self.config.catalog.alias)?;

        writeln!(self.out, "loading ducklake extension")?;
        session.load_extension()?;

        writeln!(self.out, "configuring s3 secret")?;
        session.create_secret(&self.config.secret)?;

        writeln!(self.out, "attaching ducklake")?;
        session.attach(&self.config.catalog)?;

        tracing::info!(
            alias = %self.config.catalog.alias,
            data_path = %self.config.catalog.data_path,
            inlining_row_limit = self.config.catalog.inlining_row_limit,
            "Catalog attached"
        );
        Ok(session)
    }

    /// Run everything after connector setup against an attached session.
    pub fn run_with_session(
        &mut self,
        session: &LakeSession,
    ) -> Result<ScenarioReport, ReproError> {
        writeln!(self.out, "creating table")?;
        create_table(session)?;

        let rows = fixture_rows(chrono::Utc::now().naive_utc(), PAIR_COUNT);
        writeln!(self.out, "inserting {} rows", rows.len())?;
        let inserted = insert_rows(session, &rows)?;

        let before = self.probe(session, "before flush")?;

        writeln!(self.out, "flushing to s3")?;
        flush_inlined_data(session)?;

        let after = self.probe(session, "after flush")?;

        let repeat = if self.config.repeat_flush {
            writeln!(self.out, "flushing to s3 again")?;
            flush_inlined_data(session)?;
            Some(self.probe(session, "after repeat flush")?)
        } else {
            None
        };

        let report = ScenarioReport::new(inserted, before, after, repeat);
        writeln!(self.out, "{}", report.summary())?;
        Ok(report)
    }

    fn probe(&mut self, session: &LakeSession, label: &str) -> Result<QueryRun, ReproError> {
        writeln!(self.out, "{}", QUERY_BANNER)?;
        writeln!(self.out, "{}:", label)?;
        let run = run_probe(session, label)?;
        for row in &run.rows {
            writeln!(self.out, "{}", row)?;
        }
        Ok(run)
    }
}
