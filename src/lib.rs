//! # Demand Forecast
//!
//! A Rust library for autoregressive daily demand forecasting per
//! (store, item) pair, driven by a trained regression model and its
//! exported feature schema.
//!
//! ## Features
//!
//! - Sales history handling (CSV loading, per-pair filtering)
//! - Training-parity feature generation (calendar, lag, rolling-mean and
//!   exponentially weighted features, with seedable noise injection)
//! - Schema alignment with global-mean imputation
//! - Multi-step autoregressive forecasting that feeds each prediction back
//!   into the working series
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use demand_forecast::align::TrainingSchema;
//! use demand_forecast::data::DataLoader;
//! use demand_forecast::features::RecursiveFeatureGenerator;
//! use demand_forecast::forecaster::DemandForecaster;
//! use demand_forecast::model::LinearModel;
//!
//! # fn main() -> demand_forecast::error::Result<()> {
//! // Load the training artifacts
//! let schema = TrainingSchema::from_json_files(
//!     "artifacts/model_cols.json",
//!     "artifacts/global_means.json",
//! )?;
//! let model = LinearModel::from_json_file("artifacts/demand_model.json")?;
//!
//! // Load user history (raw sales scale)
//! let history = DataLoader::from_csv("user_history.csv")?;
//!
//! // Forecast 30 days ahead for store 1, item 1
//! let mut forecaster =
//!     DemandForecaster::new(model, schema, RecursiveFeatureGenerator::new());
//! let points = forecaster.forecast(&history, 1, 1, 30)?;
//!
//! for point in points {
//!     println!("{}: {:.2}", point.date, point.pred);
//! }
//! # Ok(())
//! # }
//! ```

pub mod align;
pub mod data;
pub mod error;
pub mod features;
pub mod forecaster;
pub mod model;
pub mod transform;

// Re-export commonly used types
pub use crate::align::{FeatureMatrix, TrainingSchema};
pub use crate::data::{DataLoader, SalesHistory, SalesRecord};
pub use crate::error::ForecastError;
pub use crate::features::{FeatureFrame, FeatureGenerator, RecursiveFeatureGenerator};
pub use crate::forecaster::{DemandForecaster, ForecastPoint};
pub use crate::model::{DemandModel, LinearModel};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
