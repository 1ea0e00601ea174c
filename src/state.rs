use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use chrono::NaiveDate;

use crate::config::DashboardConfig;
use crate::data::filter::{DateRange, Selection};
use crate::data::loader::{load_snapshot, Loader, Session, SourceLabel};
use crate::data::model::{Dataset, Dimension};
use crate::data::pipeline::{build_view, DashboardView};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,
    pub loader: Loader,
    pub session: Session,

    /// Loaded dataset (None until a load succeeds).
    pub dataset: Option<Dataset>,

    /// Where `dataset` came from.
    pub source: Option<SourceLabel>,

    /// Distinct months in the dataset, ascending. Backs the range sliders.
    pub months: Vec<NaiveDate>,

    /// Selected inclusive month range.
    pub date_range: Option<DateRange>,

    /// Per-dimension selections.
    pub selection: Selection,

    /// Choices offered per dimension.
    pub options: BTreeMap<Dimension, BTreeSet<String>>,

    /// Output of the last pipeline pass.
    pub view: DashboardView,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig, loader: Loader) -> Self {
        Self {
            config,
            loader,
            session: Session::default(),
            dataset: None,
            source: None,
            months: Vec::new(),
            date_range: None,
            selection: Selection::new(),
            options: BTreeMap::new(),
            view: DashboardView::default(),
            status_message: None,
        }
    }

    /// Startup load, honouring the session's refresh flag.
    pub fn load(&mut self) {
        let result = self.loader.load(self.session.refreshed());
        self.apply_load(result);
    }

    /// One-shot "fetch updated data".
    pub fn refresh(&mut self) {
        let result = self.loader.refresh(&mut self.session);
        self.apply_load(result);
    }

    pub fn can_refresh(&self) -> bool {
        !self.session.refreshed()
    }

    /// Replace the dataset with a user-chosen CSV file.
    pub fn open_snapshot(&mut self, path: &Path) {
        match load_snapshot(path) {
            Ok(dataset) => self.set_dataset(
                dataset,
                SourceLabel::LocalSnapshot {
                    path: path.to_path_buf(),
                },
            ),
            Err(e) => {
                log::error!("Failed to open {}: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    fn apply_load<E: std::fmt::Display>(&mut self, result: Result<(Dataset, SourceLabel), E>) {
        match result {
            Ok((dataset, label)) => self.set_dataset(dataset, label),
            Err(e) => {
                log::error!("Failed to load data: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Ingest a newly loaded dataset: rebuild options and month bounds,
    /// clamp the existing range, keep selections, recompute the view.
    pub fn set_dataset(&mut self, dataset: Dataset, source: SourceLabel) {
        log::info!("Using {} rows from {source}", dataset.len());

        self.options = Dimension::ALL
            .iter()
            .map(|&d| (d, dataset.unique_values(d)))
            .collect();

        let months: BTreeSet<NaiveDate> = dataset.records.iter().map(|r| r.date).collect();
        self.months = months.into_iter().collect();

        let bounds = DateRange::covering(&dataset);
        self.date_range = match (self.date_range, bounds) {
            (Some(current), Some(bounds)) => Some(current.clamp_to(&bounds)),
            (_, bounds) => bounds,
        };

        self.dataset = Some(dataset);
        self.source = Some(source);
        self.status_message = None;
        self.recompute();
    }

    /// Re-run the pipeline after any input changed.
    pub fn recompute(&mut self) {
        self.view = match (&self.dataset, &self.date_range) {
            (Some(ds), Some(range)) => {
                build_view(ds, range, &self.selection, &self.config.default_states)
            }
            _ => DashboardView::default(),
        };
    }

    /// Toggle one value of a dimension's selection.
    pub fn toggle_value(&mut self, dimension: Dimension, value: &str) {
        let selected = self.selection.entry(dimension).or_default();
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
        self.recompute();
    }

    pub fn set_date_range(&mut self, range: DateRange) {
        self.date_range = Some(range);
        self.recompute();
    }

    /// Empty all four dimension selections.
    pub fn clear_filters(&mut self) {
        for selected in self.selection.values_mut() {
            selected.clear();
        }
        self.recompute();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::{Fetch, FetchError};
    use crate::data::pipeline::SeriesSource;
    use std::io::Write;
    use std::time::Duration;

    struct Offline;

    impl Fetch for Offline {
        fn fetch(&self, _url: &str) -> Result<Vec<u8>, FetchError> {
            Err(FetchError::Status(500))
        }
    }

    const CSV: &str = "\
State,_YearMonth,AgeCategory_Legend,Sex_Label,Race_Label,Type,MonthlyRate
California,202201,All,All,All,Crude Rate,8
California,202202,All,All,All,Crude Rate,9
Texas,202202,All,All,All,Crude Rate,7
";

    fn state_with_snapshot() -> (AppState, tempfile::NamedTempFile) {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CSV.as_bytes()).unwrap();
        let loader = Loader::new(
            "http://example.invalid",
            file.path(),
            Duration::from_secs(60),
            Box::new(Offline),
        );
        let mut state = AppState::new(DashboardConfig::default(), loader);
        state.load();
        (state, file)
    }

    #[test]
    fn initial_load_reads_snapshot() {
        let (state, _file) = state_with_snapshot();
        assert_eq!(state.months.len(), 2);
        assert!(matches!(state.source, Some(SourceLabel::LocalSnapshot { .. })));
        assert_eq!(state.view.series_source, SeriesSource::Canonical);
        assert_eq!(state.options[&Dimension::State].len(), 2);
    }

    #[test]
    fn refresh_falls_back_and_disables_itself() {
        let (mut state, _file) = state_with_snapshot();
        assert!(state.can_refresh());
        state.refresh();
        assert!(!state.can_refresh());
        assert!(matches!(state.source, Some(SourceLabel::LocalFallback { .. })));
        assert!(state.dataset.is_some());
    }

    #[test]
    fn clear_filters_empties_every_selection() {
        let (mut state, _file) = state_with_snapshot();
        state.toggle_value(Dimension::State, "Texas");
        assert_eq!(state.view.table.len(), 1);

        state.clear_filters();
        assert!(state.selection.values().all(|s| s.is_empty()));
        assert_eq!(state.view.table.len(), 3);
    }

    #[test]
    fn toggle_twice_deselects() {
        let (mut state, _file) = state_with_snapshot();
        state.toggle_value(Dimension::Sex, "All");
        state.toggle_value(Dimension::Sex, "All");
        assert!(state.selection[&Dimension::Sex].is_empty());
    }
}
