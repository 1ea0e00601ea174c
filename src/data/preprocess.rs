use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::model::{
    Dataset, RawTable, Record, COL_AGE, COL_DATE, COL_RACE, COL_RATE, COL_SEX, COL_SOURCE_DATE,
    COL_STATE, COL_TYPE, COL_YEAR_MONTH, TYPED_COLUMNS,
};

/// Source header (after normalisation) → canonical column name.
pub const COLUMN_RENAMES: [(&str, &str); 5] = [
    ("monthlyrate", COL_RATE),
    (COL_DATE, COL_SOURCE_DATE),
    ("agecategory_legend", COL_AGE),
    ("sex_label", COL_SEX),
    ("race_label", COL_RACE),
];

/// Rows discarded while preprocessing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DropReport {
    pub bad_dates: usize,
    pub bad_rates: usize,
}

impl DropReport {
    pub fn total(&self) -> usize {
        self.bad_dates + self.bad_rates
    }
}

/// Trim, lowercase, spaces to underscores, then apply the rename table.
pub fn normalize_column(name: &str) -> String {
    let normalized = name.trim().to_lowercase().replace(' ', "_");
    COLUMN_RENAMES
        .iter()
        .find(|(from, _)| *from == normalized)
        .map(|(_, to)| to.to_string())
        .unwrap_or(normalized)
}

/// Canonicalise a year-month code to six digits.
///
/// `"202202.0"` → `"202202"`, `"2202"` → `"002202"`. Anything that is not
/// all digits after stripping a trailing `.0`, or is longer than six digits,
/// is rejected.
pub fn normalize_year_month(code: &str) -> Option<String> {
    let code = code.trim();
    let code = code.strip_suffix(".0").unwrap_or(code);
    if code.is_empty() || code.len() > 6 || !code.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(format!("{code:0>6}"))
}

/// First day of the month named by a year-month code.
pub fn parse_year_month(code: &str) -> Option<NaiveDate> {
    let code = normalize_year_month(code)?;
    NaiveDate::parse_from_str(&format!("{code}01"), "%Y%m%d").ok()
}

fn parse_rate(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Normalise columns, derive dates, coerce rates. Unparseable rows vanish.
pub fn preprocess(raw: &RawTable) -> Dataset {
    preprocess_with_report(raw).0
}

/// Like [`preprocess`], also counting what was dropped.
pub fn preprocess_with_report(raw: &RawTable) -> (Dataset, DropReport) {
    let columns: Vec<String> = raw.headers.iter().map(|h| normalize_column(h)).collect();

    // First occurrence wins when two headers normalise to the same name.
    let mut index: BTreeMap<&str, usize> = BTreeMap::new();
    for (i, name) in columns.iter().enumerate() {
        index.entry(name.as_str()).or_insert(i);
    }
    let cell = |row: &[String], column: &str| -> Option<String> {
        index.get(column).and_then(|&i| row.get(i)).cloned()
    };

    let mut report = DropReport::default();
    let mut records = Vec::with_capacity(raw.rows.len());

    for row in &raw.rows {
        let row = row.as_slice();
        let year_month = cell(row, COL_YEAR_MONTH).and_then(|c| normalize_year_month(&c));
        let Some((year_month, date)) =
            year_month.and_then(|ym| parse_year_month(&ym).map(|d| (ym, d)))
        else {
            report.bad_dates += 1;
            continue;
        };

        let Some(rate) = cell(row, COL_RATE).and_then(|c| parse_rate(&c)) else {
            report.bad_rates += 1;
            continue;
        };

        let extra = index
            .iter()
            .filter(|(name, _)| !TYPED_COLUMNS.contains(*name))
            .map(|(name, &i)| (name.to_string(), row.get(i).cloned().unwrap_or_default()))
            .collect();

        records.push(Record {
            state: cell(row, COL_STATE).unwrap_or_default(),
            date,
            year_month,
            hospitalization_rate: rate,
            age_category: cell(row, COL_AGE).unwrap_or_default(),
            sex: cell(row, COL_SEX).unwrap_or_default(),
            race: cell(row, COL_RACE).unwrap_or_default(),
            rate_type: cell(row, COL_TYPE).unwrap_or_default(),
            extra,
        });
    }

    let mut seen = Vec::with_capacity(columns.len());
    for name in columns {
        if !seen.contains(&name) {
            seen.push(name);
        }
    }

    if report.total() > 0 {
        log::debug!(
            "Preprocessing dropped {} rows ({} bad dates, {} bad rates)",
            report.total(),
            report.bad_dates,
            report.bad_rates
        );
    }

    (Dataset::new(seen, records), report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(csv: &str) -> RawTable {
        RawTable::from_reader(csv.as_bytes()).unwrap()
    }

    const CDC_SAMPLE: &str = "\
State,Season,_YearMonth,AgeCategory_Legend,Sex_Label,Race_Label,Type,MonthlyRate
COVID-NET,2021-22,202202.0,All,All,All,Crude Rate,12.5
California,2021-22,202201,All,All,All,Crude Rate,8
New York,2021-22,oops,All,All,All,Crude Rate,3
Texas,2021-22,202202,All,All,All,Crude Rate,N/A
";

    #[test]
    fn normalizes_and_renames_headers() {
        assert_eq!(normalize_column("  Monthly Rate "), "monthly_rate");
        assert_eq!(normalize_column("MonthlyRate"), COL_RATE);
        assert_eq!(normalize_column("AgeCategory_Legend"), COL_AGE);
        assert_eq!(normalize_column("hospitalization_rate"), COL_RATE);
    }

    #[test]
    fn year_month_with_float_artifact() {
        assert_eq!(
            parse_year_month("202202.0"),
            NaiveDate::from_ymd_opt(2022, 2, 1)
        );
    }

    #[test]
    fn year_month_rejects_garbage() {
        assert_eq!(parse_year_month("oops"), None);
        assert_eq!(parse_year_month("202213"), None);
        assert_eq!(parse_year_month("2022021"), None);
        assert_eq!(parse_year_month(""), None);
        assert_eq!(normalize_year_month("2202"), Some("002202".to_string()));
    }

    #[test]
    fn drops_unparseable_rows_and_keeps_the_rest() {
        let (ds, report) = preprocess_with_report(&table(CDC_SAMPLE));
        let states: Vec<&str> = ds.records.iter().map(|r| r.state.as_str()).collect();
        assert_eq!(states, vec!["COVID-NET", "California"]);
        assert_eq!(report, DropReport { bad_dates: 1, bad_rates: 1 });
    }

    #[test]
    fn output_is_complete() {
        let ds = preprocess(&table(CDC_SAMPLE));
        for r in &ds.records {
            assert_eq!(chrono::Datelike::day(&r.date), 1);
            assert!(r.hospitalization_rate.is_finite());
        }
        assert_eq!(ds.records[0].rate_type, "Crude Rate");
        assert_eq!(ds.records[0].extra.get("season").map(String::as_str), Some("2021-22"));
    }

    #[test]
    fn preprocess_is_idempotent() {
        let once = preprocess(&table(CDC_SAMPLE));
        let twice = preprocess(&once.to_raw());
        assert_eq!(once, twice);
    }

    #[test]
    fn source_date_column_survives_reprocessing() {
        let csv = "Date,_YearMonth,MonthlyRate\n2022-02-14,202202,5\n";
        let once = preprocess(&table(csv));
        assert!(once.has_column(COL_SOURCE_DATE));
        assert!(!once.has_column(COL_DATE));
        assert_eq!(once.records[0].cell(COL_SOURCE_DATE), "2022-02-14");
        assert_eq!(once.records[0].cell(COL_DATE), "2022-02-01");

        let twice = preprocess(&once.to_raw());
        assert_eq!(once, twice);
    }

    #[test]
    fn output_is_complete_for_messy_inputs() {
        let inputs = [
            "state,_yearmonth,monthlyrate\nTexas,,4\nTexas,202201,\nTexas,202202,5\n",
            "state,_yearmonth,monthlyrate\nOhio,  202203 , 2.5 \nOhio, ,1\nOhio,202204,   \n",
            "state,_yearmonth,monthlyrate\nUtah,202201,inf\nUtah,202202,-inf\nUtah,202203,1e400\nUtah,202204,3\n",
            "state,_yearmonth,monthlyrate\nIowa,202201\nIowa\nIowa,202202,6\n",
            "state,monthlyrate\nIowa,6\nOhio,7\n",
            "state,_yearmonth,monthlyrate\n",
        ];
        let expected_rows = [1, 1, 1, 1, 0, 0];

        for (csv, expected) in inputs.iter().zip(expected_rows) {
            let raw = table(csv);
            let (ds, report) = preprocess_with_report(&raw);
            assert_eq!(ds.len(), expected, "input: {csv:?}");
            assert_eq!(ds.len() + report.total(), raw.rows.len(), "input: {csv:?}");
            for r in &ds.records {
                assert_eq!(chrono::Datelike::day(&r.date), 1);
                assert_eq!(r.year_month.len(), 6);
                assert!(r.hospitalization_rate.is_finite());
            }
        }
    }

    #[test]
    fn missing_rate_column_drops_everything() {
        let ds = preprocess(&table("state,_yearmonth\nTexas,202201\n"));
        assert!(ds.is_empty());
        assert!(ds.has_column(COL_STATE));
    }

    #[test]
    fn nan_rate_is_dropped() {
        let ds = preprocess(&table("state,_yearmonth,monthlyrate\nTexas,202201,NaN\n"));
        assert!(ds.is_empty());
    }
}
