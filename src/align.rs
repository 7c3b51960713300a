//! Alignment of generated features against the training-time schema

use crate::error::{ForecastError, Result};
use crate::features::FeatureFrame;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// The fixed feature schema the model was trained on: an ordered column
/// list plus a global fallback mean per column.
///
/// Both artifacts are produced by the external training process and loaded
/// read-only; forecasting never mutates them.
#[derive(Debug, Clone)]
pub struct TrainingSchema {
    columns: Vec<String>,
    global_means: HashMap<String, f64>,
}

impl TrainingSchema {
    /// Create a schema from an ordered column list and global means.
    ///
    /// Columns without a global mean are permitted; missing values in those
    /// columns fall back to 0 during alignment.
    pub fn new(columns: Vec<String>, global_means: HashMap<String, f64>) -> Result<Self> {
        if columns.is_empty() {
            return Err(ForecastError::InvalidParameter(
                "Training schema must name at least one column".to_string(),
            ));
        }

        Ok(Self {
            columns,
            global_means,
        })
    }

    /// Load the schema from the two training artifacts: a JSON array of
    /// column names and a JSON object of per-column means
    pub fn from_json_files<P: AsRef<Path>>(columns_path: P, means_path: P) -> Result<Self> {
        let columns: Vec<String> =
            serde_json::from_reader(BufReader::new(File::open(columns_path)?))?;
        let global_means: HashMap<String, f64> =
            serde_json::from_reader(BufReader::new(File::open(means_path)?))?;

        Self::new(columns, global_means)
    }

    /// Column names in training order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Global fallback mean for a column, if the training run recorded one
    pub fn global_mean(&self, name: &str) -> Option<f64> {
        self.global_means.get(name).copied()
    }

    /// Reconcile a generated feature frame against this schema.
    ///
    /// Schema columns absent from the frame are treated as entirely
    /// missing, extra generated columns are dropped, and the output keeps
    /// exactly the schema's columns in the schema's order. Missing entries
    /// are filled from the global means, then 0 as a last resort, so the
    /// result contains no missing values.
    pub fn align(&self, frame: &FeatureFrame) -> FeatureMatrix {
        let height = frame.height();
        let mut rows = vec![Vec::with_capacity(self.columns.len()); height];

        for name in &self.columns {
            let fallback = self.global_mean(name).unwrap_or(0.0);
            match frame.column(name) {
                Some(column) => {
                    for (row, value) in rows.iter_mut().zip(column.iter().copied()) {
                        row.push(value.unwrap_or(fallback));
                    }
                }
                None => {
                    for row in rows.iter_mut() {
                        row.push(fallback);
                    }
                }
            }
        }

        FeatureMatrix {
            columns: self.columns.clone(),
            rows,
        }
    }
}

/// Dense, fully-imputed feature matrix in training column order
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    columns: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl FeatureMatrix {
    /// Column names in training order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All rows, one feature vector per input observation
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// One row by index
    pub fn row(&self, index: usize) -> Option<&[f64]> {
        self.rows.get(index).map(|r| r.as_slice())
    }

    /// The last row, the feature vector the forecaster feeds to the model
    pub fn last_row(&self) -> Option<&[f64]> {
        self.rows.last().map(|r| r.as_slice())
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// A matrix holding only the given rows, in the given order
    pub fn select_rows(&self, indices: &[usize]) -> Result<FeatureMatrix> {
        let rows = indices
            .iter()
            .map(|&i| {
                self.rows.get(i).cloned().ok_or_else(|| {
                    ForecastError::ValidationError(format!(
                        "Row index {} out of bounds for matrix of height {}",
                        i,
                        self.rows.len()
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(FeatureMatrix {
            columns: self.columns.clone(),
            rows,
        })
    }
}
