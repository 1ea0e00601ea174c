use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use super::model::{Dataset, Dimension, Record};

// ---------------------------------------------------------------------------
// Filter inputs: inclusive month range + per-dimension accepted values
// ---------------------------------------------------------------------------

/// Inclusive date bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateRange { start, end }
    }

    /// The full span of a dataset, or `None` when it has no rows.
    pub fn covering(dataset: &Dataset) -> Option<Self> {
        dataset
            .date_bounds()
            .map(|(start, end)| DateRange::new(start, end))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Pull both ends inside `bounds`, keeping `start <= end`.
    pub fn clamp_to(&self, bounds: &DateRange) -> Self {
        let start = self.start.clamp(bounds.start, bounds.end);
        let end = self.end.clamp(start, bounds.end);
        DateRange { start, end }
    }
}

/// Per-dimension selection: dimension → accepted values.
/// A dimension that is absent or maps to an empty set is unconstrained.
pub type Selection = BTreeMap<Dimension, BTreeSet<String>>;

/// Whether `dimension` has a non-empty selection.
pub fn is_constrained(selection: &Selection, dimension: Dimension) -> bool {
    selection.get(&dimension).is_some_and(|v| !v.is_empty())
}

fn passes(record: &Record, selection: &Selection) -> bool {
    selection
        .iter()
        .filter(|(_, accepted)| !accepted.is_empty())
        .all(|(dimension, accepted)| accepted.contains(dimension.value(record)))
}

/// Apply the date range, then every constrained dimension (AND of ORs).
pub fn apply_filters(dataset: &Dataset, range: &DateRange, selection: &Selection) -> Dataset {
    dataset.retain_where(|r| range.contains(r.date) && passes(r, selection))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::RawTable;
    use crate::data::preprocess::preprocess;

    fn date(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    fn sample() -> Dataset {
        let csv = "\
state,_yearmonth,monthlyrate,agecategory_legend,sex_label,race_label,type
Texas,202201,1,All,All,All,Crude Rate
Texas,202202,2,All,Female,All,Crude Rate
California,202201,3,18-49 Years,Male,All,Crude Rate
California,202203,4,All,All,Black,Crude Rate
New York,202202,5,65+ Years,Female,White,Crude Rate
";
        preprocess(&RawTable::from_reader(csv.as_bytes()).unwrap())
    }

    fn pick(entries: Vec<(Dimension, Vec<&str>)>) -> Selection {
        entries
            .into_iter()
            .map(|(d, vals)| (d, vals.into_iter().map(String::from).collect()))
            .collect()
    }

    #[test]
    fn empty_selection_over_full_range_is_identity() {
        let ds = sample();
        let range = DateRange::covering(&ds).unwrap();
        let mut selection = Selection::new();
        assert_eq!(apply_filters(&ds, &range, &selection), ds);

        for d in Dimension::ALL {
            selection.insert(d, BTreeSet::new());
        }
        assert_eq!(apply_filters(&ds, &range, &selection), ds);
    }

    #[test]
    fn date_range_is_inclusive() {
        let ds = sample();
        let range = DateRange::new(date(2022, 2), date(2022, 3));
        let out = apply_filters(&ds, &range, &Selection::new());
        assert_eq!(out.len(), 3);
        assert!(out.records.iter().all(|r| r.date >= date(2022, 2)));
    }

    #[test]
    fn and_of_ors_across_dimensions() {
        let ds = sample();
        let range = DateRange::covering(&ds).unwrap();
        let selection = pick(vec![
            (Dimension::State, vec!["Texas", "New York"]),
            (Dimension::Sex, vec!["Female"]),
        ]);
        let out = apply_filters(&ds, &range, &selection);
        let rates: Vec<f64> = out.records.iter().map(|r| r.hospitalization_rate).collect();
        assert_eq!(rates, vec![2.0, 5.0]);
    }

    #[test]
    fn dimension_order_does_not_matter() {
        let ds = sample();
        let range = DateRange::covering(&ds).unwrap();
        let state = pick(vec![(Dimension::State, vec!["California", "New York"])]);
        let age = pick(vec![(Dimension::AgeCategory, vec!["All", "65+ Years"])]);
        let both = pick(vec![
            (Dimension::AgeCategory, vec!["All", "65+ Years"]),
            (Dimension::State, vec!["California", "New York"]),
        ]);

        let state_then_age = apply_filters(&apply_filters(&ds, &range, &state), &range, &age);
        let age_then_state = apply_filters(&apply_filters(&ds, &range, &age), &range, &state);
        assert_eq!(state_then_age, age_then_state);
        assert_eq!(state_then_age, apply_filters(&ds, &range, &both));
        assert_eq!(state_then_age.len(), 2);
    }

    #[test]
    fn clamp_keeps_range_inside_bounds() {
        let bounds = DateRange::new(date(2021, 1), date(2021, 12));
        let wide = DateRange::new(date(2020, 6), date(2023, 1));
        assert_eq!(wide.clamp_to(&bounds), bounds);

        let after = DateRange::new(date(2024, 1), date(2024, 5));
        let clamped = after.clamp_to(&bounds);
        assert_eq!(clamped, DateRange::new(date(2021, 12), date(2021, 12)));
    }
}
