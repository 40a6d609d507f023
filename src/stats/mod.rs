//! Statistics over the cleaned table.
//!
//! The session calls through two capabilities so the views can be driven by
//! any backend (or a fake in tests):
//!
//! - [`SummaryStatsComputer`]: the descriptive statistics table
//! - [`ProfileReportGenerator`]: the automated profiling report
//!
//! The built-in implementations use `statrs` for the moments.

pub mod correlation;
pub mod describe;
pub mod histogram;
pub mod profile;

use crate::config::ProfileSettings;
use crate::data::model::{ColumnClassification, DataTable};

use describe::DescribeTable;
use profile::ProfileReport;

/// Computes count / mean / std / min / quartiles / max per numeric column.
pub trait SummaryStatsComputer {
    fn describe(&self, table: &DataTable, classes: &ColumnClassification) -> DescribeTable;
}

/// Produces a multi-section profiling report for a table.
pub trait ProfileReportGenerator {
    fn generate(&self, table: &DataTable, title: &str) -> anyhow::Result<ProfileReport>;
}

/// Default [`SummaryStatsComputer`] backed by `statrs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatrsSummary;

impl SummaryStatsComputer for StatrsSummary {
    fn describe(&self, table: &DataTable, classes: &ColumnClassification) -> DescribeTable {
        describe::describe(table, classes)
    }
}

/// Default [`ProfileReportGenerator`].
#[derive(Debug, Clone, Default)]
pub struct BuiltinProfiler {
    pub settings: ProfileSettings,
}

impl BuiltinProfiler {
    pub fn new(settings: ProfileSettings) -> Self {
        Self { settings }
    }
}

impl ProfileReportGenerator for BuiltinProfiler {
    fn generate(&self, table: &DataTable, title: &str) -> anyhow::Result<ProfileReport> {
        profile::build_report(table, title, &self.settings)
    }
}
