//! Sales history handling for demand forecasting

use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

/// A single daily sales observation for one (store, item) pair.
///
/// `sales` is in the original (raw) scale at the crate boundary; the
/// forecaster converts to log1p scale internally before feature work.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    /// Calendar day of the observation
    pub date: NaiveDate,
    /// Store identifier
    pub store: u32,
    /// Item identifier
    pub item: u32,
    /// Units sold (non-negative)
    pub sales: f64,
}

/// An ordered collection of sales observations, possibly spanning many
/// (store, item) pairs.
#[derive(Debug, Clone, Default)]
pub struct SalesHistory {
    records: Vec<SalesRecord>,
}

/// Data loader for sales history
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load sales history from a CSV file with columns `date,store,item,sales`
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<SalesHistory> {
        let file = File::open(path)?;
        // Use polars DataFrame reader directly
        let df = CsvReader::new(file)
            .infer_schema(None)
            .has_header(true)
            .finish()?;

        Self::from_dataframe(df)
    }

    /// Create sales history from an existing DataFrame
    pub fn from_dataframe(df: DataFrame) -> Result<SalesHistory> {
        let dates = Self::date_column(&df, "date")?;
        let stores = Self::column_as_u32(&df, "store")?;
        let items = Self::column_as_u32(&df, "item")?;
        let sales = Self::column_as_f64(&df, "sales")?;

        let n = df.height();
        if dates.len() != n || stores.len() != n || items.len() != n || sales.len() != n {
            return Err(ForecastError::DataError(
                "History columns contain missing values".to_string(),
            ));
        }

        let records = (0..n)
            .map(|i| SalesRecord {
                date: dates[i],
                store: stores[i],
                item: items[i],
                sales: sales[i],
            })
            .collect();

        Ok(SalesHistory { records })
    }

    /// Create sales history from records already in memory
    pub fn from_records(records: Vec<SalesRecord>) -> SalesHistory {
        SalesHistory { records }
    }

    /// Extract a date column, accepting either string dates or a native date dtype
    fn date_column(df: &DataFrame, name: &str) -> Result<Vec<NaiveDate>> {
        let col = df
            .column(name)
            .map_err(|e| ForecastError::DataError(format!("Column '{}' not found: {}", name, e)))?;

        match col.dtype() {
            DataType::Utf8 => col
                .utf8()
                .unwrap()
                .into_iter()
                .flatten()
                .map(|s| {
                    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| {
                        ForecastError::DataError(format!("Unparseable date '{}': {}", s, e))
                    })
                })
                .collect(),
            DataType::Date => {
                // Stored as i32 days since the epoch, which may be negative
                let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
                col.date()
                    .unwrap()
                    .into_iter()
                    .flatten()
                    .map(|days| {
                        epoch
                            .checked_add_signed(chrono::Duration::days(days as i64))
                            .ok_or_else(|| {
                                ForecastError::DataError(format!(
                                    "Column '{}' date {} days from epoch is out of range",
                                    name, days
                                ))
                            })
                    })
                    .collect()
            }
            other => Err(ForecastError::DataError(format!(
                "Column '{}' has unsupported date dtype {:?}",
                name, other
            ))),
        }
    }

    /// Helper method to get a column as u32 identifiers
    fn column_as_u32(df: &DataFrame, name: &str) -> Result<Vec<u32>> {
        let col = df
            .column(name)
            .map_err(|e| ForecastError::DataError(format!("Column '{}' not found: {}", name, e)))?;

        fn identifier<T: TryInto<u32> + std::fmt::Display + Copy>(
            name: &str,
            value: T,
        ) -> Result<u32> {
            value.try_into().map_err(|_| {
                ForecastError::DataError(format!(
                    "Column '{}' has out-of-range identifier {}",
                    name, value
                ))
            })
        }

        match col.dtype() {
            DataType::Int64 => col
                .i64()
                .unwrap()
                .into_iter()
                .flatten()
                .map(|v| identifier(name, v))
                .collect(),
            DataType::Int32 => col
                .i32()
                .unwrap()
                .into_iter()
                .flatten()
                .map(|v| identifier(name, v))
                .collect(),
            DataType::UInt32 => Ok(col.u32().unwrap().into_iter().flatten().collect()),
            DataType::UInt64 => col
                .u64()
                .unwrap()
                .into_iter()
                .flatten()
                .map(|v| identifier(name, v))
                .collect(),
            _ => Err(ForecastError::DataError(format!(
                "Column '{}' cannot be converted to u32",
                name
            ))),
        }
    }

    /// Helper method to get a column as f64 values
    fn column_as_f64(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
        let col = df
            .column(name)
            .map_err(|e| ForecastError::DataError(format!("Column '{}' not found: {}", name, e)))?;

        match col.dtype() {
            DataType::Float64 => Ok(col.f64().unwrap().into_iter().flatten().collect()),
            DataType::Float32 => Ok(col
                .f32()
                .unwrap()
                .into_iter()
                .flatten()
                .map(|v| v as f64)
                .collect()),
            DataType::Int64 => Ok(col
                .i64()
                .unwrap()
                .into_iter()
                .flatten()
                .map(|v| v as f64)
                .collect()),
            DataType::Int32 => Ok(col
                .i32()
                .unwrap()
                .into_iter()
                .flatten()
                .map(|v| v as f64)
                .collect()),
            _ => Err(ForecastError::DataError(format!(
                "Column '{}' cannot be converted to f64",
                name
            ))),
        }
    }
}

impl SalesHistory {
    /// Get the underlying records
    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    /// Check if the history is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Get the number of observations
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Keep only the rows for one (store, item) pair, sorted ascending by date.
    ///
    /// The sort is stable, so rows sharing a date keep their input order.
    pub fn filter_pair(&self, store: u32, item: u32) -> SalesHistory {
        let mut records: Vec<SalesRecord> = self
            .records
            .iter()
            .filter(|r| r.store == store && r.item == item)
            .copied()
            .collect();
        records.sort_by_key(|r| r.date);

        SalesHistory { records }
    }

    /// Date of the most recent observation, if any
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.records.last().map(|r| r.date)
    }

    /// Sales values in row order
    pub fn sales(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.sales).collect()
    }

    /// Dates in row order
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.records.iter().map(|r| r.date).collect()
    }

    /// Append one observation to the end of the history
    pub fn push(&mut self, record: SalesRecord) {
        self.records.push(record);
    }

    /// Row indices partitioned by (store, item), in first-seen group order.
    ///
    /// Lag, rolling and exponentially weighted features are computed within
    /// these partitions; values never cross groups.
    pub fn group_indices(&self) -> Vec<((u32, u32), Vec<usize>)> {
        let mut groups: Vec<((u32, u32), Vec<usize>)> = Vec::new();
        let mut lookup: std::collections::HashMap<(u32, u32), usize> =
            std::collections::HashMap::new();

        for (row, record) in self.records.iter().enumerate() {
            let key = (record.store, record.item);
            match lookup.get(&key) {
                Some(&pos) => groups[pos].1.push(row),
                None => {
                    lookup.insert(key, groups.len());
                    groups.push((key, vec![row]));
                }
            }
        }

        groups
    }

    /// Copy of the history with sales mapped through `log1p`
    pub fn to_log_scale(&self) -> SalesHistory {
        let records = self
            .records
            .iter()
            .map(|r| SalesRecord {
                sales: crate::transform::log1p(r.sales),
                ..*r
            })
            .collect();

        SalesHistory { records }
    }
}
