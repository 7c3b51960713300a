//! Time-series feature generation for demand forecasting
//!
//! Rebuilds, at inference time, exactly the feature set the model was
//! trained on: calendar features, row-offset lag features, triangular
//! rolling means and exponentially weighted means, all computed within
//! each (store, item) group. Lag and rolling features carry the Gaussian
//! noise the training pipeline injected as regularization; the noise source
//! is seedable so forecasts can be made reproducible.

use crate::data::SalesHistory;
use crate::error::{ForecastError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::Normal;
use std::collections::HashMap;

pub mod calendar;
mod window;

pub use calendar::CalendarFeatures;

/// Ordered, named feature columns with one row per input observation.
///
/// `None` marks a value that could not be computed (insufficient history);
/// the aligner resolves those against the training-time global means.
#[derive(Debug, Clone)]
pub struct FeatureFrame {
    names: Vec<String>,
    values: Vec<Vec<Option<f64>>>,
    index: HashMap<String, usize>,
    height: usize,
}

impl FeatureFrame {
    /// Create an empty frame for `height` rows
    pub fn new(height: usize) -> Self {
        Self {
            names: Vec::new(),
            values: Vec::new(),
            index: HashMap::new(),
            height,
        }
    }

    /// Append a named column; the length must match the frame height
    pub fn push_column(&mut self, name: impl Into<String>, column: Vec<Option<f64>>) -> Result<()> {
        let name = name.into();
        if column.len() != self.height {
            return Err(ForecastError::FeatureError(format!(
                "Column '{}' has {} rows, frame has {}",
                name,
                column.len(),
                self.height
            )));
        }
        if self.index.contains_key(&name) {
            return Err(ForecastError::FeatureError(format!(
                "Duplicate feature column '{}'",
                name
            )));
        }

        self.index.insert(name.clone(), self.values.len());
        self.names.push(name);
        self.values.push(column);
        Ok(())
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.index.get(name).map(|&i| self.values[i].as_slice())
    }

    /// Column names in insertion order
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.names.len()
    }
}

/// Configuration of the training-time feature pipeline.
///
/// The defaults are the exact values the model was trained with; changing
/// them produces features the trained model has never seen.
#[derive(Debug, Clone)]
pub struct FeatureConfig {
    /// Row-offset lags for `sales_lag_*` columns
    pub lags: Vec<usize>,
    /// Window sizes for `sales_roll_mean_*` columns
    pub roll_windows: Vec<usize>,
    /// Minimum values required inside a rolling window
    pub roll_min_periods: usize,
    /// Smoothing factors for exponentially weighted means
    pub ewm_alphas: Vec<f64>,
    /// Row-offset lags combined with each smoothing factor
    pub ewm_lags: Vec<usize>,
    /// Standard deviation of the Gaussian noise added to lag/rolling columns
    pub noise_std: f64,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            lags: vec![91, 98, 105, 112, 119, 126, 182, 364, 546, 728],
            roll_windows: vec![365, 546, 730],
            roll_min_periods: 10,
            ewm_alphas: vec![0.99, 0.95, 0.9, 0.8, 0.7, 0.5],
            ewm_lags: vec![91, 98, 105, 112, 180, 270, 365, 546, 728],
            noise_std: 1.6,
        }
    }
}

impl FeatureConfig {
    fn validate(&self) -> Result<()> {
        if self.lags.iter().chain(&self.ewm_lags).any(|&l| l == 0) {
            return Err(ForecastError::InvalidParameter(
                "Lag offsets must be positive".to_string(),
            ));
        }
        if self.roll_windows.iter().any(|&w| w == 0) {
            return Err(ForecastError::InvalidParameter(
                "Rolling windows must be positive".to_string(),
            ));
        }
        if self.roll_min_periods == 0 {
            return Err(ForecastError::InvalidParameter(
                "Rolling min_periods must be positive".to_string(),
            ));
        }
        if self.ewm_alphas.iter().any(|&a| a <= 0.0 || a > 1.0) {
            return Err(ForecastError::InvalidParameter(
                "EWM alpha must be in (0, 1]".to_string(),
            ));
        }
        if !self.noise_std.is_finite() || self.noise_std < 0.0 {
            return Err(ForecastError::InvalidParameter(
                "Noise standard deviation must be finite and non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Produces the per-row feature frame for a sales history.
///
/// This is the seam the forecaster drives: an implementation that caches
/// incremental state can be swapped in without touching the forecasting
/// loop, as long as it yields the same frame for the same history.
pub trait FeatureGenerator {
    /// Generate all feature columns for every row of `history`
    fn generate(&mut self, history: &SalesHistory) -> Result<FeatureFrame>;
}

/// From-scratch feature generator matching the training pipeline.
///
/// Recomputes every column over the full history on each call; the
/// forecaster relies on that to keep training/inference parity while it
/// grows the series one predicted row at a time.
#[derive(Debug)]
pub struct RecursiveFeatureGenerator {
    config: FeatureConfig,
    noise: Normal<f64>,
    rng: StdRng,
}

impl RecursiveFeatureGenerator {
    /// Create a generator with the training-time configuration and an
    /// entropy-seeded noise source
    pub fn new() -> Self {
        // Default config is statically valid
        Self::with_config(FeatureConfig::default()).unwrap()
    }

    /// Create a generator with the training-time configuration and a fixed
    /// noise seed, for reproducible forecasts
    pub fn with_seed(seed: u64) -> Self {
        Self::with_config_and_seed(FeatureConfig::default(), seed).unwrap()
    }

    /// Create a generator with a custom configuration
    pub fn with_config(config: FeatureConfig) -> Result<Self> {
        config.validate()?;
        let noise = Normal::new(0.0, config.noise_std)
            .map_err(|e| ForecastError::InvalidParameter(e.to_string()))?;

        Ok(Self {
            config,
            noise,
            rng: StdRng::from_entropy(),
        })
    }

    /// Create a generator with a custom configuration and a fixed noise seed
    pub fn with_config_and_seed(config: FeatureConfig, seed: u64) -> Result<Self> {
        let mut generator = Self::with_config(config)?;
        generator.rng = StdRng::seed_from_u64(seed);
        Ok(generator)
    }

    /// The active configuration
    pub fn config(&self) -> &FeatureConfig {
        &self.config
    }

    /// One fresh noise draw per row, matching the training pipeline's
    /// per-column noise vector
    fn noise_column(&mut self, height: usize) -> Vec<f64> {
        (0..height).map(|_| self.rng.sample(self.noise)).collect()
    }
}

impl Default for RecursiveFeatureGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureGenerator for RecursiveFeatureGenerator {
    fn generate(&mut self, history: &SalesHistory) -> Result<FeatureFrame> {
        let height = history.len();
        let sales = history.sales();
        let groups = history.group_indices();
        let calendar: Vec<CalendarFeatures> = history
            .dates()
            .into_iter()
            .map(CalendarFeatures::from_date)
            .collect();

        let mut frame = FeatureFrame::new(height);

        // Scalar calendar columns; month and day_of_week are emitted as
        // one-hot indicators at the end instead
        frame.push_column(
            "day_of_month",
            calendar.iter().map(|c| Some(c.day_of_month as f64)).collect(),
        )?;
        frame.push_column(
            "day_of_year",
            calendar.iter().map(|c| Some(c.day_of_year as f64)).collect(),
        )?;
        frame.push_column(
            "week_of_year",
            calendar.iter().map(|c| Some(c.week_of_year as f64)).collect(),
        )?;
        frame.push_column(
            "year",
            calendar.iter().map(|c| Some(c.year as f64)).collect(),
        )?;
        frame.push_column(
            "is_wknd",
            calendar.iter().map(|c| Some(c.is_wknd as f64)).collect(),
        )?;
        frame.push_column(
            "is_month_start",
            calendar
                .iter()
                .map(|c| Some(c.is_month_start as u8 as f64))
                .collect(),
        )?;
        frame.push_column(
            "is_month_end",
            calendar
                .iter()
                .map(|c| Some(c.is_month_end as u8 as f64))
                .collect(),
        )?;

        // Lag features: per-group row-offset shift plus per-row noise
        for &lag in &self.config.lags.clone() {
            let noise = self.noise_column(height);
            let mut column = vec![None; height];
            for (_, rows) in &groups {
                let group_sales: Vec<f64> = rows.iter().map(|&r| sales[r]).collect();
                for (pos, value) in window::lagged(&group_sales, lag).into_iter().enumerate() {
                    let row = rows[pos];
                    column[row] = value.map(|v| v + noise[row]);
                }
            }
            frame.push_column(format!("sales_lag_{}", lag), column)?;
        }

        // Rolling means: shift by one, triangular weights, plus per-row noise
        let min_periods = self.config.roll_min_periods;
        for &window_size in &self.config.roll_windows.clone() {
            let noise = self.noise_column(height);
            let mut column = vec![None; height];
            for (_, rows) in &groups {
                let group_sales: Vec<f64> = rows.iter().map(|&r| sales[r]).collect();
                let means = window::shifted_triangular_mean(&group_sales, window_size, min_periods);
                for (pos, value) in means.into_iter().enumerate() {
                    let row = rows[pos];
                    column[row] = value.map(|v| v + noise[row]);
                }
            }
            frame.push_column(format!("sales_roll_mean_{}", window_size), column)?;
        }

        // Exponentially weighted means over the shifted series, no noise
        for &alpha in &self.config.ewm_alphas {
            // 0.99 -> "099", 0.9 -> "09", matching the training column names
            let alpha_label = format!("{}", alpha).replace('.', "");
            for &lag in &self.config.ewm_lags {
                let mut column = vec![None; height];
                for (_, rows) in &groups {
                    let group_sales: Vec<f64> = rows.iter().map(|&r| sales[r]).collect();
                    for (pos, value) in
                        window::shifted_ewm(&group_sales, alpha, lag).into_iter().enumerate()
                    {
                        column[rows[pos]] = value;
                    }
                }
                frame.push_column(
                    format!("sales_ewm_alpha_{}_lag_{}", alpha_label, lag),
                    column,
                )?;
            }
        }

        // One-hot indicators over the full category universe, so the column
        // set does not depend on which categories this history happens to
        // contain
        for dow in 0..7u32 {
            frame.push_column(
                format!("day_of_week_{}", dow),
                calendar
                    .iter()
                    .map(|c| Some((c.day_of_week == dow) as u8 as f64))
                    .collect(),
            )?;
        }
        for month in 1..=12u32 {
            frame.push_column(
                format!("month_{}", month),
                calendar
                    .iter()
                    .map(|c| Some((c.month == month) as u8 as f64))
                    .collect(),
            )?;
        }

        Ok(frame)
    }
}
