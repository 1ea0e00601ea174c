use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;

// ---------------------------------------------------------------------------
// Column names after normalisation
// ---------------------------------------------------------------------------

pub const COL_STATE: &str = "state";
pub const COL_YEAR_MONTH: &str = "_yearmonth";
pub const COL_RATE: &str = "hospitalization_rate";
pub const COL_AGE: &str = "age_category";
pub const COL_SEX: &str = "sex";
pub const COL_RACE: &str = "race";
pub const COL_TYPE: &str = "type";
/// Derived month column. A source column of the same name is renamed to
/// [`COL_SOURCE_DATE`] on ingest.
pub const COL_DATE: &str = "date";
pub const COL_SOURCE_DATE: &str = "source_date";

/// Columns that map onto typed `Record` fields rather than `extra`.
pub const TYPED_COLUMNS: [&str; 7] = [
    COL_STATE,
    COL_YEAR_MONTH,
    COL_RATE,
    COL_AGE,
    COL_SEX,
    COL_RACE,
    COL_TYPE,
];

// ---------------------------------------------------------------------------
// Dimension – the four user-filterable categorical columns
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dimension {
    State,
    AgeCategory,
    Sex,
    Race,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::State,
        Dimension::AgeCategory,
        Dimension::Sex,
        Dimension::Race,
    ];

    /// Normalised column backing this dimension.
    pub fn column(self) -> &'static str {
        match self {
            Dimension::State => COL_STATE,
            Dimension::AgeCategory => COL_AGE,
            Dimension::Sex => COL_SEX,
            Dimension::Race => COL_RACE,
        }
    }

    /// Sidebar label.
    pub fn label(self) -> &'static str {
        match self {
            Dimension::State => "Filter by state:",
            Dimension::AgeCategory => "Filter by age group:",
            Dimension::Sex => "Filter by sex:",
            Dimension::Race => "Filter by race:",
        }
    }

    pub fn value(self, record: &Record) -> &str {
        match self {
            Dimension::State => &record.state,
            Dimension::AgeCategory => &record.age_category,
            Dimension::Sex => &record.sex,
            Dimension::Race => &record.race,
        }
    }
}

// ---------------------------------------------------------------------------
// RawTable – untyped CSV as it arrived
// ---------------------------------------------------------------------------

/// Header row plus string cells, exactly as read from the source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Decode CSV text. Short rows are padded with empty cells.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, csv::Error> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let mut row: Vec<String> = record.iter().map(|c| c.to_string()).collect();
            row.resize(headers.len(), String::new());
            rows.push(row);
        }

        Ok(RawTable { headers, rows })
    }

    pub fn from_path(path: &Path) -> Result<Self, csv::Error> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }
}

// ---------------------------------------------------------------------------
// Record – one surveillance row after preprocessing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub state: String,
    /// Always the first day of a month.
    pub date: NaiveDate,
    /// Six-digit `YYYYMM` code the date was derived from.
    pub year_month: String,
    /// Rate per 100,000, finite.
    pub hospitalization_rate: f64,
    pub age_category: String,
    pub sex: String,
    pub race: String,
    /// Crude vs. age-adjusted label.
    pub rate_type: String,
    /// Every other source column, keyed by normalised name.
    pub extra: BTreeMap<String, String>,
}

impl Record {
    /// Cell text for a normalised column name, used by the raw-data table.
    pub fn cell(&self, column: &str) -> String {
        match column {
            COL_STATE => self.state.clone(),
            COL_YEAR_MONTH => self.year_month.clone(),
            COL_RATE => self.hospitalization_rate.to_string(),
            COL_AGE => self.age_category.clone(),
            COL_SEX => self.sex.clone(),
            COL_RACE => self.race.clone(),
            COL_TYPE => self.rate_type.clone(),
            COL_DATE => self.date.format("%Y-%m-%d").to_string(),
            other => self.extra.get(other).cloned().unwrap_or_default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete preprocessed collection
// ---------------------------------------------------------------------------

/// Preprocessed rows plus the normalised column names that were present in
/// the source. Duplicate rows are legal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    /// Normalised source columns, in source order.
    pub columns: Vec<String>,
    pub records: Vec<Record>,
}

impl Dataset {
    pub fn new(columns: Vec<String>, records: Vec<Record>) -> Self {
        Dataset { columns, records }
    }

    /// Same schema, no rows.
    pub fn empty_like(&self) -> Self {
        Dataset {
            columns: self.columns.clone(),
            records: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Keep the rows matching `keep`, preserving the schema.
    pub fn retain_where<F>(&self, mut keep: F) -> Self
    where
        F: FnMut(&Record) -> bool,
    {
        Dataset {
            columns: self.columns.clone(),
            records: self.records.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }

    /// Earliest and latest month present.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.records.iter().map(|r| r.date).min()?;
        let max = self.records.iter().map(|r| r.date).max()?;
        Some((min, max))
    }

    /// Sorted distinct values of a dimension; empty if its column is absent.
    pub fn unique_values(&self, dimension: Dimension) -> BTreeSet<String> {
        if !self.has_column(dimension.column()) {
            return BTreeSet::new();
        }
        self.records
            .iter()
            .map(|r| dimension.value(r).to_string())
            .collect()
    }

    /// Render back into string cells with the normalised headers.
    pub fn to_raw(&self) -> RawTable {
        let rows = self
            .records
            .iter()
            .map(|r| self.columns.iter().map(|c| r.cell(c)).collect())
            .collect();
        RawTable {
            headers: self.columns.clone(),
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_table_pads_short_rows() {
        let csv = "a,b,c\n1,2,3\n4,5\n";
        let table = RawTable::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.headers, vec!["a", "b", "c"]);
        assert_eq!(table.rows[1], vec!["4", "5", ""]);
    }

    #[test]
    fn unique_values_empty_when_column_missing() {
        let ds = Dataset::new(vec![COL_STATE.to_string()], Vec::new());
        assert!(ds.unique_values(Dimension::Race).is_empty());
    }
}
