//! Gradient-boosted regression trees backed by the `gbdt` crate.

use gbdt::config::Config;
use gbdt::decision_tree::{Data, DataVec};
use gbdt::gradient_boost::GBDT;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy)]
pub struct BoostParams {
    pub iterations: usize,
    pub max_depth: u32,
    pub shrinkage: f32,
}

impl Default for BoostParams {
    fn default() -> Self {
        Self {
            iterations: 100,
            max_depth: 3,
            shrinkage: 0.1,
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct BoostedRegressor {
    model: GBDT,
    n_features: usize,
}

impl BoostedRegressor {
    pub fn fit(x: &Array2<f64>, y: &Array1<f64>, params: &BoostParams) -> Self {
        assert!(x.nrows() > 0, "cannot fit boosted trees on an empty matrix");
        assert_eq!(x.nrows(), y.len(), "feature rows and targets must have equal lengths");

        let mut config = Config::new();
        config.set_feature_size(x.ncols());
        config.set_max_depth(params.max_depth);
        config.set_iterations(params.iterations);
        config.set_shrinkage(params.shrinkage);
        config.set_loss("SquaredError");
        config.set_debug(false);

        let mut model = GBDT::new(&config);
        let mut train: DataVec = (0..x.nrows())
            .map(|r| {
                let features: Vec<f32> = x.row(r).iter().map(|&v| v as f32).collect();
                Data::new_training_data(features, 1.0, y[r] as f32, None)
            })
            .collect();
        model.fit(&mut train);

        Self {
            model,
            n_features: x.ncols(),
        }
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn predict_one(&self, features: &[f64]) -> f64 {
        let row: Vec<f32> = features.iter().map(|&v| v as f32).collect();
        let test: DataVec = vec![Data::new_test_data(row, None)];
        self.model.predict(&test)[0] as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, Array2};

    fn tiny_params() -> BoostParams {
        BoostParams {
            iterations: 20,
            max_depth: 3,
            shrinkage: 0.3,
        }
    }

    #[test]
    fn approximates_a_monotone_target() {
        let n = 60;
        let flat: Vec<f64> = (0..n).map(|i| i as f64 / 4.0).collect();
        let y: Vec<f64> = flat.iter().map(|v| 3.0 * v + 1.0).collect();
        let x = Array2::from_shape_vec((n, 1), flat).unwrap();
        let y = Array1::from_vec(y);

        let model = BoostedRegressor::fit(&x, &y, &tiny_params());
        assert_eq!(model.n_features(), 1);

        let low = model.predict_one(&[1.0]);
        let high = model.predict_one(&[13.0]);
        assert!(low.is_finite() && high.is_finite());
        assert!(high > low, "boosted model should follow the trend: {low} vs {high}");
    }

    #[test]
    fn fit_is_deterministic() {
        let x = Array2::from_shape_vec((30, 1), (0..30).map(|i| i as f64).collect()).unwrap();
        let y = Array1::from_vec((0..30).map(|i| (i * i) as f64).collect());
        let a = BoostedRegressor::fit(&x, &y, &tiny_params());
        let b = BoostedRegressor::fit(&x, &y, &tiny_params());
        assert_eq!(a.predict_one(&[12.0]), b.predict_one(&[12.0]));
    }
}
