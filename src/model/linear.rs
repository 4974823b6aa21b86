//! Ordinary least squares via linfa, flattened into plain coefficients.
//!
//! The fitted coefficients are extracted into this struct so the artifact
//! serializes as simple numbers and prediction is a dot product.

use anyhow::Result;
use linfa::prelude::*;
use linfa_linear::LinearRegression;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearRegressor {
    intercept: f64,
    weights: Vec<f64>,
}

impl LinearRegressor {
    pub fn fit(x: &Array2<f64>, y: &Array1<f64>) -> Result<Self> {
        let dataset = Dataset::new(x.to_owned(), y.to_owned());
        let fitted = LinearRegression::new().fit(&dataset)?;
        Ok(Self {
            intercept: fitted.intercept(),
            weights: fitted.params().to_vec(),
        })
    }

    pub fn n_features(&self) -> usize {
        self.weights.len()
    }

    pub fn predict_one(&self, features: &[f64]) -> f64 {
        self.intercept
            + self
                .weights
                .iter()
                .zip(features)
                .map(|(w, x)| w * x)
                .sum::<f64>()
    }
}
