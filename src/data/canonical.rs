use super::model::{Dataset, COL_AGE, COL_RACE, COL_SEX, COL_TYPE};

/// Label the CDC uses for "no breakdown" in a demographic column.
pub const ALL_LABEL: &str = "All";
/// Substring identifying an unadjusted rate type ("Crude Rate", "Crude", ...).
pub const CRUDE_MARKER: &str = "Crude";

const REQUIRED: [&str; 4] = [COL_AGE, COL_SEX, COL_RACE, COL_TYPE];

/// The headline subset: all ages, all sexes, all races, crude rate.
///
/// Returns an empty dataset (same schema) when any of the four columns is
/// missing instead of failing.
pub fn canonical_slice(dataset: &Dataset) -> Dataset {
    if let Some(missing) = REQUIRED.iter().find(|c| !dataset.has_column(c)) {
        log::debug!("Canonical slice unavailable: column '{missing}' missing");
        return dataset.empty_like();
    }

    dataset.retain_where(|r| {
        r.age_category == ALL_LABEL
            && r.sex == ALL_LABEL
            && r.race == ALL_LABEL
            && r.rate_type.contains(CRUDE_MARKER)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::RawTable;
    use crate::data::preprocess::preprocess;

    fn dataset(csv: &str) -> Dataset {
        preprocess(&RawTable::from_reader(csv.as_bytes()).unwrap())
    }

    #[test]
    fn keeps_only_headline_rows() {
        let ds = dataset(
            "state,_yearmonth,monthlyrate,agecategory_legend,sex_label,race_label,type\n\
             Texas,202201,1,All,All,All,Crude Rate\n\
             Texas,202201,2,18-49 Years,All,All,Crude Rate\n\
             Texas,202201,3,All,All,All,Age adjusted rate\n\
             Texas,202201,4,All,Female,All,Crude\n\
             Texas,202201,5,All,All,All,crude rate\n",
        );
        let slice = canonical_slice(&ds);
        let rates: Vec<f64> = slice.records.iter().map(|r| r.hospitalization_rate).collect();
        assert_eq!(rates, vec![1.0]);
    }

    #[test]
    fn missing_type_column_yields_empty() {
        let ds = dataset(
            "state,_yearmonth,monthlyrate,agecategory_legend,sex_label,race_label\n\
             Texas,202201,1,All,All,All\n",
        );
        assert_eq!(ds.len(), 1);
        let slice = canonical_slice(&ds);
        assert!(slice.is_empty());
        assert_eq!(slice.columns, ds.columns);
    }
}
