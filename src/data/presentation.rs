use super::aggregate::StateValue;
use super::model::{Dataset, Record};

/// Y-axis label for every rate chart.
pub const RATE_LABEL: &str = "Rate per 100,000";

/// Full state name → USPS abbreviation. Aggregate labels and territories
/// have no entry.
pub const STATE_CODES: [(&str, &str); 51] = [
    ("Alabama", "AL"),
    ("Alaska", "AK"),
    ("Arizona", "AZ"),
    ("Arkansas", "AR"),
    ("California", "CA"),
    ("Colorado", "CO"),
    ("Connecticut", "CT"),
    ("Delaware", "DE"),
    ("District of Columbia", "DC"),
    ("Florida", "FL"),
    ("Georgia", "GA"),
    ("Hawaii", "HI"),
    ("Idaho", "ID"),
    ("Illinois", "IL"),
    ("Indiana", "IN"),
    ("Iowa", "IA"),
    ("Kansas", "KS"),
    ("Kentucky", "KY"),
    ("Louisiana", "LA"),
    ("Maine", "ME"),
    ("Maryland", "MD"),
    ("Massachusetts", "MA"),
    ("Michigan", "MI"),
    ("Minnesota", "MN"),
    ("Mississippi", "MS"),
    ("Missouri", "MO"),
    ("Montana", "MT"),
    ("Nebraska", "NE"),
    ("Nevada", "NV"),
    ("New Hampshire", "NH"),
    ("New Jersey", "NJ"),
    ("New Mexico", "NM"),
    ("New York", "NY"),
    ("North Carolina", "NC"),
    ("North Dakota", "ND"),
    ("Ohio", "OH"),
    ("Oklahoma", "OK"),
    ("Oregon", "OR"),
    ("Pennsylvania", "PA"),
    ("Rhode Island", "RI"),
    ("South Carolina", "SC"),
    ("South Dakota", "SD"),
    ("Tennessee", "TN"),
    ("Texas", "TX"),
    ("Utah", "UT"),
    ("Vermont", "VT"),
    ("Virginia", "VA"),
    ("Washington", "WA"),
    ("West Virginia", "WV"),
    ("Wisconsin", "WI"),
    ("Wyoming", "WY"),
];

pub fn state_code(name: &str) -> Option<&'static str> {
    STATE_CODES
        .iter()
        .find(|(state, _)| *state == name)
        .map(|(_, code)| *code)
}

/// One choropleth cell.
#[derive(Debug, Clone, PartialEq)]
pub struct MapRow {
    pub state: String,
    pub state_code: &'static str,
    pub rate: f64,
}

/// Attach postal codes, silently dropping names without one.
pub fn to_map_rows(values: &[StateValue]) -> Vec<MapRow> {
    values
        .iter()
        .filter_map(|v| {
            state_code(&v.state).map(|code| MapRow {
                state: v.state.clone(),
                state_code: code,
                rate: v.rate,
            })
        })
        .collect()
}

/// Raw-data table rows, newest month first.
pub fn table_rows(dataset: &Dataset) -> Vec<Record> {
    let mut rows = dataset.records.clone();
    rows.sort_by(|a, b| b.date.cmp(&a.date));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(state: &str, rate: f64) -> StateValue {
        StateValue {
            state: state.to_string(),
            rate,
        }
    }

    #[test]
    fn drops_names_without_a_code() {
        let rows = to_map_rows(&[
            value("COVID-NET", 9.0),
            value("California", 7.0),
            value("Puerto Rico", 2.0),
            value("New York", 3.0),
        ]);
        let codes: Vec<&str> = rows.iter().map(|r| r.state_code).collect();
        assert_eq!(codes, vec!["CA", "NY"]);
    }

    #[test]
    fn only_aggregates_gives_empty() {
        assert!(to_map_rows(&[value("COVID-NET", 1.0)]).is_empty());
    }

    #[test]
    fn lookup_table_is_unique() {
        let mut codes: Vec<&str> = STATE_CODES.iter().map(|(_, c)| *c).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), STATE_CODES.len());
    }
}
