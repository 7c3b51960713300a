//! Autoregressive multi-step demand forecasting
//!
//! Each step regenerates features over the entire working series, predicts
//! one day ahead, and appends the prediction as synthetic history for the
//! next step. Cost therefore grows with the series every step; that is the
//! price of exact parity with a model trained on from-scratch features.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::align::TrainingSchema;
use crate::data::{SalesHistory, SalesRecord};
use crate::error::{ForecastError, Result};
use crate::features::FeatureGenerator;
use crate::model::DemandModel;
use crate::transform::expm1;

/// One forecasted day, immutable once emitted
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastPoint {
    /// Forecasted calendar day
    pub date: NaiveDate,
    /// Prediction in log1p scale, as returned by the model
    pub pred_log: f64,
    /// Prediction in original sales scale (`expm1` of `pred_log`)
    pub pred: f64,
}

/// Drives the step-by-step forecasting loop for one (store, item) pair.
///
/// Holds the trained model, the training schema and a feature generator;
/// all three are loaded once and reused across forecast calls. The working
/// series is rebuilt per call, so calls are independent of each other.
#[derive(Debug)]
pub struct DemandForecaster<M, G> {
    model: M,
    schema: TrainingSchema,
    generator: G,
}

impl<M: DemandModel, G: FeatureGenerator> DemandForecaster<M, G> {
    /// Create a forecaster from the trained artifacts and a generator
    pub fn new(model: M, schema: TrainingSchema, generator: G) -> Self {
        Self {
            model,
            schema,
            generator,
        }
    }

    /// Produce `steps` sequential daily predictions for one (store, item)
    /// pair.
    ///
    /// `history` carries sales in the original scale and may span other
    /// pairs; only rows matching `store`/`item` are used. Returned
    /// predictions are ordered by date, starting the day after the last
    /// historical observation. `steps == 0` returns an empty list without
    /// invoking the model. An empty filtered history is a data error; a
    /// model failure aborts the loop with no partial results.
    pub fn forecast(
        &mut self,
        history: &SalesHistory,
        store: u32,
        item: u32,
        steps: usize,
    ) -> Result<Vec<ForecastPoint>> {
        let pair_history = history.filter_pair(store, item);
        if pair_history.is_empty() {
            return Err(ForecastError::DataError(format!(
                "No history for store {} item {}; add at least one row (date, store, item, sales)",
                store, item
            )));
        }

        // The model was trained on log1p(sales); the working series stays in
        // log scale for the whole loop
        let mut working = pair_history.to_log_scale();
        let mut last_date = match working.last_date() {
            Some(date) => date,
            None => {
                return Err(ForecastError::DataError(
                    "History has rows but no last date".to_string(),
                ))
            }
        };
        let mut points = Vec::with_capacity(steps);

        for _ in 0..steps {
            let frame = self.generator.generate(&working)?;
            let matrix = self.schema.align(&frame);

            let last_index = matrix.height().checked_sub(1).ok_or_else(|| {
                ForecastError::FeatureError("Feature matrix has no rows".to_string())
            })?;
            let last_row = matrix.select_rows(&[last_index])?;

            let pred_log = self
                .model
                .predict(&last_row)?
                .first()
                .copied()
                .ok_or_else(|| {
                    ForecastError::ModelError("Model returned no predictions".to_string())
                })?;

            let next_date = last_date + Duration::days(1);

            points.push(ForecastPoint {
                date: next_date,
                pred_log,
                pred: expm1(pred_log),
            });

            // The prediction becomes synthetic history, in log scale, so the
            // next step's lag/rolling/EWM features can see it
            working.push(SalesRecord {
                date: next_date,
                store,
                item,
                sales: pred_log,
            });
            last_date = next_date;
        }

        Ok(points)
    }

    /// The model driven by this forecaster
    pub fn model(&self) -> &M {
        &self.model
    }

    /// The training schema predictions are aligned against
    pub fn schema(&self) -> &TrainingSchema {
        &self.schema
    }
}
