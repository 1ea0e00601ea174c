use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::model::Dataset;

/// Mean rate for one state in one month.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    pub state: String,
    pub date: NaiveDate,
    pub rate: f64,
}

/// Mean rate for one state at the latest month.
#[derive(Debug, Clone, PartialEq)]
pub struct StateValue {
    pub state: String,
    pub rate: f64,
}

#[derive(Default)]
struct Mean {
    sum: f64,
    count: usize,
}

impl Mean {
    fn push(&mut self, v: f64) {
        self.sum += v;
        self.count += 1;
    }

    fn value(&self) -> f64 {
        self.sum / self.count as f64
    }
}

/// Group by (state, date) and average, ascending by date then state.
pub fn time_series(dataset: &Dataset) -> Vec<SeriesPoint> {
    let mut groups: BTreeMap<(NaiveDate, &str), Mean> = BTreeMap::new();
    for r in &dataset.records {
        groups
            .entry((r.date, r.state.as_str()))
            .or_default()
            .push(r.hospitalization_rate);
    }

    groups
        .into_iter()
        .map(|((date, state), mean)| SeriesPoint {
            state: state.to_string(),
            date,
            rate: mean.value(),
        })
        .collect()
}

/// Per-state mean restricted to the newest month in the input.
pub fn map_latest(dataset: &Dataset) -> Vec<StateValue> {
    let Some(latest) = dataset.records.iter().map(|r| r.date).max() else {
        return Vec::new();
    };

    let mut groups: BTreeMap<&str, Mean> = BTreeMap::new();
    for r in dataset.records.iter().filter(|r| r.date == latest) {
        groups
            .entry(r.state.as_str())
            .or_default()
            .push(r.hospitalization_rate);
    }

    groups
        .into_iter()
        .map(|(state, mean)| StateValue {
            state: state.to_string(),
            rate: mean.value(),
        })
        .collect()
}
