use chrono::NaiveDate;

use super::aggregate::{map_latest, time_series, SeriesPoint};
use super::canonical::canonical_slice;
use super::defaults::restrict_defaults;
use super::filter::{apply_filters, DateRange, Selection};
use super::model::{Dataset, Record};
use super::presentation::{table_rows, to_map_rows, MapRow};

/// Which rows the trend chart and map were built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeriesSource {
    /// All ages / all sexes / all races, crude rate.
    #[default]
    Canonical,
    /// No headline rows survived the filters; the chart averages whatever
    /// demographic breakdowns the filters kept.
    Filtered,
}

impl SeriesSource {
    /// Caption shown next to the chart.
    pub fn caption(self) -> &'static str {
        match self {
            SeriesSource::Canonical => "Crude rate, all ages, all sexes, all races.",
            SeriesSource::Filtered => {
                "No all-ages/all-sexes/all-races crude rows match the filters; \
                 showing the average across the selected demographic groups."
            }
        }
    }
}

/// Everything the UI renders for one selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardView {
    pub series: Vec<SeriesPoint>,
    pub series_source: SeriesSource,
    pub map: Vec<MapRow>,
    /// Month the map values come from.
    pub map_month: Option<NaiveDate>,
    /// Filtered rows, newest first.
    pub table: Vec<Record>,
}

/// Run one full pass from a preprocessed dataset to render-ready data.
pub fn build_view(
    dataset: &Dataset,
    range: &DateRange,
    selection: &Selection,
    default_states: &[String],
) -> DashboardView {
    let filtered = apply_filters(dataset, range, selection);

    let canonical = canonical_slice(&filtered);
    let (chart_input, series_source) = if canonical.is_empty() {
        (filtered.clone(), SeriesSource::Filtered)
    } else {
        (canonical, SeriesSource::Canonical)
    };

    let trend_input = restrict_defaults(&chart_input, selection, default_states);

    DashboardView {
        series: time_series(&trend_input),
        series_source,
        map: to_map_rows(&map_latest(&chart_input)),
        map_month: chart_input.date_bounds().map(|(_, latest)| latest),
        table: table_rows(&filtered),
    }
}
