//! The trained demand model consumed as a black box

use crate::align::FeatureMatrix;
use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// A trained regression model predicting log1p(sales) from an aligned
/// feature matrix.
///
/// The model is produced by an external training process; this crate only
/// invokes it. One prediction is returned per matrix row, in row order.
pub trait DemandModel: Debug {
    /// Predict log-scale sales for every row of the matrix
    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<f64>>;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Linear model backed by exported training artifacts.
///
/// Stands in for the gradient-boosted model behind the same interface: a
/// weight per schema column plus an intercept, applied to the aligned
/// feature vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    weights: Vec<f64>,
    intercept: f64,
}

impl LinearModel {
    /// Create a model from explicit coefficients
    pub fn new(weights: Vec<f64>, intercept: f64) -> Result<Self> {
        if weights.is_empty() {
            return Err(ForecastError::InvalidParameter(
                "Model must have at least one weight".to_string(),
            ));
        }
        if weights.iter().any(|w| !w.is_finite()) || !intercept.is_finite() {
            return Err(ForecastError::InvalidParameter(
                "Model coefficients must be finite".to_string(),
            ));
        }

        Ok(Self { weights, intercept })
    }

    /// Load the model from a JSON artifact with `weights` and `intercept`
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let model: LinearModel = serde_json::from_reader(BufReader::new(File::open(path)?))?;
        Self::new(model.weights, model.intercept)
    }

    /// Number of features the model expects
    pub fn width(&self) -> usize {
        self.weights.len()
    }
}

impl DemandModel for LinearModel {
    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<f64>> {
        if features.width() != self.weights.len() {
            return Err(ForecastError::ModelError(format!(
                "Feature matrix has {} columns, model expects {}",
                features.width(),
                self.weights.len()
            )));
        }

        Ok(features
            .rows()
            .iter()
            .map(|row| {
                self.intercept
                    + row
                        .iter()
                        .zip(&self.weights)
                        .map(|(x, w)| x * w)
                        .sum::<f64>()
            })
            .collect())
    }

    fn name(&self) -> &str {
        "Linear demand model"
    }
}
