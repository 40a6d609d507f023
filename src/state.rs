use std::path::Path;

use crate::chart::{build_chart, Chart, PlotSelection};
use crate::config::Settings;
use crate::data::cleaning::CleaningPolicy;
use crate::data::loader;
use crate::data::model::{ColumnClassification, DataTable};
use crate::data::schema::SchemaSummary;
use crate::error::ParseError;
use crate::stats::describe::DescribeTable;
use crate::stats::profile::ProfileReport;
use crate::stats::{BuiltinProfiler, ProfileReportGenerator, StatrsSummary, SummaryStatsComputer};

// ---------------------------------------------------------------------------
// Status line
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Info(String),
    Success(String),
    Error(String),
}

// ---------------------------------------------------------------------------
// Loaded dataset and everything derived from it
// ---------------------------------------------------------------------------

/// The uploaded table plus the values derived from it. Replaced wholesale
/// on every upload.
pub struct Dataset {
    pub source_name: String,
    /// The table as parsed; never modified.
    pub raw: DataTable,
    pub schema: SchemaSummary,
    pub cleaned: CleanedView,
}

/// The cleaned table and the views computed from it.
pub struct CleanedView {
    pub policy: CleaningPolicy,
    pub table: DataTable,
    pub classes: ColumnClassification,
    pub skipped_columns: Vec<String>,
    pub stats: DescribeTable,
    /// Error text when the profile generator failed.
    pub profile: Result<ProfileReport, String>,
}

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering. One per window.
pub struct Session {
    /// Loaded dataset (None until the user uploads a file).
    pub dataset: Option<Dataset>,

    /// Selected missing-value policy.
    pub cleaning: CleaningPolicy,

    /// Plot kind and column picks.
    pub plot: PlotSelection,

    /// Status / error message shown in the UI.
    pub status: Option<Status>,

    pub settings: Settings,

    /// Chart built for `chart_selection`; rebuilt when the selection or the
    /// cleaned table changes.
    chart: Option<Chart>,
    chart_selection: Option<PlotSelection>,
    chart_builds: usize,

    stats: Box<dyn SummaryStatsComputer>,
    profiler: Box<dyn ProfileReportGenerator>,
}

impl Default for Session {
    fn default() -> Self {
        let settings = Settings::default();
        let profiler = BuiltinProfiler::new(settings.profile.clone());
        Self::with_capabilities(settings, Box::new(StatrsSummary), Box::new(profiler))
    }
}

impl Session {
    pub fn with_capabilities(
        settings: Settings,
        stats: Box<dyn SummaryStatsComputer>,
        profiler: Box<dyn ProfileReportGenerator>,
    ) -> Self {
        Self {
            dataset: None,
            cleaning: CleaningPolicy::default(),
            plot: PlotSelection::default(),
            status: None,
            settings,
            chart: None,
            chart_selection: None,
            chart_builds: 0,
            stats,
            profiler,
        }
    }

    /// Load a `.csv` file from disk, replacing any current dataset. Failures
    /// clear the dataset and set an error status.
    pub fn open_path(&mut self, path: &Path) {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let result = loader::load_file(path);
        self.finish_load(name, result);
    }

    /// Load an upload held in memory (e.g. a dropped file on the web).
    pub fn open_bytes(&mut self, name: &str, bytes: &[u8]) {
        let result = loader::read_csv(bytes);
        self.finish_load(name.to_string(), result);
    }

    fn finish_load(&mut self, name: String, result: Result<DataTable, ParseError>) {
        match result {
            Ok(table) => self.set_table(name, table),
            Err(e) => {
                log::error!("Failed to load {name}: {e}");
                self.dataset = None;
                self.invalidate_chart();
                self.status = Some(Status::Error(format!("Could not load {name}: {e}")));
            }
        }
    }

    /// Ingest a newly loaded table: inspect it and run the current policy.
    pub fn set_table(&mut self, source_name: String, raw: DataTable) {
        log::info!(
            "Dataset {source_name}: {} rows x {} columns",
            raw.n_rows(),
            raw.n_cols()
        );
        let schema = SchemaSummary::inspect(&raw);
        let cleaned = self.clean(&raw);
        self.plot.reconcile(&cleaned.classes);
        self.invalidate_chart();
        self.status = self.cleaning.acknowledgment().map(|m| Status::Success(m.to_string()));
        self.dataset = Some(Dataset {
            source_name,
            raw,
            schema,
            cleaned,
        });
    }

    /// Switch cleaning policy and recompute everything downstream of it.
    pub fn set_cleaning(&mut self, policy: CleaningPolicy) {
        if policy == self.cleaning {
            return;
        }
        self.cleaning = policy;
        let Some(dataset) = self.dataset.take() else {
            return;
        };
        let cleaned = self.clean(&dataset.raw);
        self.plot.reconcile(&cleaned.classes);
        self.invalidate_chart();
        self.status = policy.acknowledgment().map(|m| Status::Success(m.to_string()));
        self.dataset = Some(Dataset { cleaned, ..dataset });
    }

    fn clean(&self, raw: &DataTable) -> CleanedView {
        let outcome = self.cleaning.apply(raw);
        let classes = ColumnClassification::from_table(&outcome.table);
        let stats = self.stats.describe(&outcome.table, &classes);
        let profile = self
            .profiler
            .generate(&outcome.table, &self.settings.report_title)
            .map_err(|e| {
                log::error!("Profile report failed: {e:#}");
                format!("{e:#}")
            });

        CleanedView {
            policy: self.cleaning,
            table: outcome.table,
            classes,
            skipped_columns: outcome.skipped_columns,
            stats,
            profile,
        }
    }

    /// The cleaned table's classification, if a dataset is loaded.
    pub fn classes(&self) -> Option<&ColumnClassification> {
        self.dataset.as_ref().map(|d| &d.cleaned.classes)
    }

    /// Chart for the current plot selection, built on first use after a
    /// change and reused until the next one.
    pub fn chart(&mut self) -> Option<&Chart> {
        if self.chart_selection.as_ref() != Some(&self.plot) {
            self.chart = self.build_current_chart();
            self.chart_selection = Some(self.plot.clone());
        }
        self.chart.as_ref()
    }

    fn build_current_chart(&mut self) -> Option<Chart> {
        let dataset = self.dataset.as_ref()?;
        let request = self.plot.request()?;
        self.chart_builds += 1;
        log::debug!("Building {} chart (build #{})", request.kind(), self.chart_builds);
        build_chart(&dataset.cleaned.table, &request, &self.settings)
    }

    fn invalidate_chart(&mut self) {
        self.chart = None;
        self.chart_selection = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::PlotKind;
    use crate::stats::profile::Overview;

    use std::cell::Cell;
    use std::rc::Rc;

    const SCENARIO: &[u8] = b"a,b,c\n1,2,x\n,4,y\n5,,x\n";

    #[test]
    fn test_upload_then_clean() {
        let mut session = Session::default();
        session.open_bytes("scenario.csv", SCENARIO);

        let ds = session.dataset.as_ref().unwrap();
        assert_eq!(ds.schema.shape, (3, 3));
        assert_eq!(ds.cleaned.table.n_rows(), 3);
        assert_eq!(session.status, None);

        session.set_cleaning(CleaningPolicy::DropRows);
        let ds = session.dataset.as_ref().unwrap();
        assert_eq!(ds.cleaned.table.n_rows(), 1);
        // raw table and schema are unaffected by cleaning
        assert_eq!(ds.raw.n_rows(), 3);
        assert_eq!(ds.schema.missing_counts.len(), 2);
        assert_eq!(
            session.status,
            Some(Status::Success("Dropped rows with missing values.".into()))
        );
        assert_eq!(ds.cleaned.stats.get("a").map(|s| s.count), Some(1));
    }

    #[test]
    fn test_parse_error_keeps_session_usable() {
        let mut session = Session::default();
        session.open_bytes("good.csv", SCENARIO);
        session.open_bytes("bad.csv", b"a,b\n1,2,3\n");

        assert!(session.dataset.is_none());
        assert!(matches!(session.status, Some(Status::Error(_))));

        session.open_bytes("good.csv", SCENARIO);
        assert!(session.dataset.is_some());
    }

    #[test]
    fn test_chart_for_default_selection() {
        let mut session = Session::default();
        session.open_bytes("scenario.csv", SCENARIO);
        assert_eq!(session.plot.kind, Some(PlotKind::Histogram));
        let chart = session.chart().unwrap();
        assert_eq!(chart.title(), "Histogram of a");
    }

    #[test]
    fn test_chart_is_reused_until_something_changes() {
        let mut session = Session::default();
        session.open_bytes("scenario.csv", SCENARIO);

        for _ in 0..5 {
            assert!(session.chart().is_some());
        }
        assert_eq!(session.chart_builds, 1);

        session.plot.kind = Some(PlotKind::Boxplot);
        let title = session.chart().map(|c| c.title().to_string());
        assert_eq!(title.as_deref(), Some("Boxplot of a by c"));
        session.chart();
        assert_eq!(session.chart_builds, 2);

        session.set_cleaning(CleaningPolicy::DropRows);
        session.chart();
        session.chart();
        assert_eq!(session.chart_builds, 3);

        session.open_bytes("scenario.csv", SCENARIO);
        session.chart();
        assert_eq!(session.chart_builds, 4);
    }

    #[test]
    fn test_no_numeric_columns_offers_no_plot() {
        let mut session = Session::default();
        session.open_bytes("names.csv", b"name,city\nann,oslo\nbo,rome\n");
        assert_eq!(session.plot.kind, None);
        assert!(session.chart().is_none());
        let ds = session.dataset.as_ref().unwrap();
        assert!(ds.cleaned.stats.is_empty());
    }

    struct CountingProfiler(Rc<Cell<usize>>);

    impl ProfileReportGenerator for CountingProfiler {
        fn generate(&self, table: &DataTable, title: &str) -> anyhow::Result<ProfileReport> {
            self.0.set(self.0.get() + 1);
            if table.n_rows() == 0 {
                anyhow::bail!("nothing to profile");
            }
            Ok(ProfileReport {
                title: title.to_string(),
                overview: Overview {
                    n_variables: table.n_cols(),
                    n_observations: table.n_rows(),
                    missing_cells: 0,
                    missing_cells_pct: 0.0,
                    duplicate_rows: 0,
                    duplicate_rows_pct: 0.0,
                    n_numeric: 0,
                    n_categorical: 0,
                },
                variables: Vec::new(),
                correlations: crate::stats::correlation::pearson(table, &[]),
                alerts: Vec::new(),
            })
        }
    }

    #[test]
    fn test_profile_generator_runs_per_cleaning_change() {
        let calls = Rc::new(Cell::new(0));
        let mut session = Session::with_capabilities(
            Settings::default(),
            Box::new(StatrsSummary),
            Box::new(CountingProfiler(calls.clone())),
        );
        session.open_bytes("x.csv", b"a,b\n1,\n,2\n");
        assert_eq!(calls.get(), 1);
        assert!(session.dataset.as_ref().unwrap().cleaned.profile.is_ok());

        session.set_cleaning(CleaningPolicy::DropRows);
        assert_eq!(calls.get(), 2);
        let profile = &session.dataset.as_ref().unwrap().cleaned.profile;
        assert_eq!(profile.as_ref().err().map(String::as_str), Some("nothing to profile"));

        // same policy again is a no-op
        session.set_cleaning(CleaningPolicy::DropRows);
        assert_eq!(calls.get(), 2);
    }
}
