use chrono::NaiveDate;
use demand_forecast::data::{DataLoader, SalesRecord};
use demand_forecast::error::ForecastError;
use std::io::Write;
use tempfile::NamedTempFile;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn record(y: i32, m: u32, d: u32, store: u32, item: u32, sales: f64) -> SalesRecord {
    SalesRecord {
        date: date(y, m, d),
        store,
        item,
        sales,
    }
}

#[test]
fn test_data_loader_from_csv() {
    // Create a temporary CSV file
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "date,store,item,sales").unwrap();
    writeln!(file, "2023-01-01,1,1,12").unwrap();
    writeln!(file, "2023-01-02,1,1,15").unwrap();
    writeln!(file, "2023-01-01,2,1,7").unwrap();

    let path = file.path().to_str().unwrap();
    let history = DataLoader::from_csv(path).unwrap();

    assert_eq!(history.len(), 3);
    assert!(!history.is_empty());
    assert_eq!(history.records()[0].date, date(2023, 1, 1));
    assert_eq!(history.records()[1].sales, 15.0);
    assert_eq!(history.records()[2].store, 2);
}

#[test]
fn test_data_loader_error_handling() {
    // Test with non-existent file
    let result = DataLoader::from_csv("nonexistent_file.csv");
    assert!(result.is_err());

    // Test with a file missing the sales column
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "date,store,item").unwrap();
    writeln!(file, "2023-01-01,1,1").unwrap();

    let path = file.path().to_str().unwrap();
    let result = DataLoader::from_csv(path);
    assert!(matches!(result, Err(ForecastError::DataError(_))));
}

#[test]
fn test_native_date_column_before_epoch() {
    use polars::prelude::*;

    // Native Date columns store i32 days since 1970-01-01; negative values
    // are valid dates and must not wrap
    let dates = Series::new("date", &[-1i32, 0i32])
        .cast(&DataType::Date)
        .unwrap();
    let df = DataFrame::new(vec![
        dates,
        Series::new("store", &[1i64, 1i64]),
        Series::new("item", &[1i64, 1i64]),
        Series::new("sales", &[5.0f64, 6.0f64]),
    ])
    .unwrap();

    let history = DataLoader::from_dataframe(df).unwrap();
    assert_eq!(history.records()[0].date, date(1969, 12, 31));
    assert_eq!(history.records()[1].date, date(1970, 1, 1));
}

#[test]
fn test_native_date_column_out_of_range() {
    use polars::prelude::*;

    // A day count far outside chrono's range is an error, not a panic
    let dates = Series::new("date", &[i32::MIN])
        .cast(&DataType::Date)
        .unwrap();
    let df = DataFrame::new(vec![
        dates,
        Series::new("store", &[1i64]),
        Series::new("item", &[1i64]),
        Series::new("sales", &[5.0f64]),
    ])
    .unwrap();

    let result = DataLoader::from_dataframe(df);
    match result {
        Err(ForecastError::DataError(message)) => assert!(message.contains("out of range")),
        other => panic!("Expected DataError, got {:?}", other),
    }
}

#[test]
fn test_negative_identifier_is_reported() {
    // A negative store id must surface as an error naming the column, not
    // be silently dropped
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "date,store,item,sales").unwrap();
    writeln!(file, "2023-01-01,-5,1,3").unwrap();

    let path = file.path().to_str().unwrap();
    let result = DataLoader::from_csv(path);
    match result {
        Err(ForecastError::DataError(message)) => {
            assert!(message.contains("store"));
            assert!(message.contains("-5"));
        }
        other => panic!("Expected DataError, got {:?}", other),
    }
}

#[test]
fn test_filter_pair_selects_and_sorts() {
    // Out-of-order dates and a second pair mixed in
    let history = DataLoader::from_records(vec![
        record(2023, 1, 3, 1, 1, 3.0),
        record(2023, 1, 1, 1, 1, 1.0),
        record(2023, 1, 2, 2, 1, 99.0),
        record(2023, 1, 2, 1, 1, 2.0),
    ]);

    let pair = history.filter_pair(1, 1);
    assert_eq!(pair.len(), 3);
    assert_eq!(
        pair.dates(),
        vec![date(2023, 1, 1), date(2023, 1, 2), date(2023, 1, 3)]
    );
    assert_eq!(pair.sales(), vec![1.0, 2.0, 3.0]);
    assert_eq!(pair.last_date(), Some(date(2023, 1, 3)));

    let missing = history.filter_pair(9, 9);
    assert!(missing.is_empty());
    assert_eq!(missing.last_date(), None);
}

#[test]
fn test_group_indices_partition_rows() {
    let history = DataLoader::from_records(vec![
        record(2023, 1, 1, 1, 1, 1.0),
        record(2023, 1, 1, 2, 1, 2.0),
        record(2023, 1, 2, 1, 1, 3.0),
        record(2023, 1, 2, 2, 1, 4.0),
        record(2023, 1, 1, 1, 2, 5.0),
    ]);

    let groups = history.group_indices();
    assert_eq!(groups.len(), 3);

    // First-seen order, row indices in input order
    assert_eq!(groups[0], ((1, 1), vec![0, 2]));
    assert_eq!(groups[1], ((2, 1), vec![1, 3]));
    assert_eq!(groups[2], ((1, 2), vec![4]));
}

#[test]
fn test_to_log_scale() {
    use assert_approx_eq::assert_approx_eq;

    let history = DataLoader::from_records(vec![
        record(2023, 1, 1, 1, 1, 0.0),
        record(2023, 1, 2, 1, 1, 9.0),
    ]);

    let log_history = history.to_log_scale();
    assert_approx_eq!(log_history.sales()[0], 0.0);
    assert_approx_eq!(log_history.sales()[1], 10.0_f64.ln());

    // Dates and identifiers are untouched
    assert_eq!(log_history.dates(), history.dates());
    assert_eq!(log_history.records()[1].store, 1);
}

#[test]
fn test_push_extends_history() {
    let mut history = DataLoader::from_records(vec![record(2023, 1, 1, 1, 1, 5.0)]);
    history.push(record(2023, 1, 2, 1, 1, 6.0));

    assert_eq!(history.len(), 2);
    assert_eq!(history.last_date(), Some(date(2023, 1, 2)));
}
