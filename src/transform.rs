//! Scale transforms applied at the forecasting boundary
//!
//! The model is trained on `log1p(sales)`, so raw sales are transformed on
//! the way in and predictions are mapped back with `expm1` on the way out.
//! Everything between those two points operates in log scale.

/// log(1 + x), stable for small non-negative x
pub fn log1p(x: f64) -> f64 {
    x.ln_1p()
}

/// exp(x) - 1, the inverse of [`log1p`]
pub fn expm1(x: f64) -> f64 {
    x.exp_m1()
}
