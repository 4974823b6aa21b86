//! Per-column mean/std standardization of feature matrices.

use anyhow::{bail, Result};
use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};

/// Minimum stddev to avoid division by zero on constant columns.
const MIN_STD: f64 = 1e-6;

/// Standard scaler fit on a training matrix and applied to every feature
/// vector before model input. Serialized alongside the model it was fit for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Vec<f64>,
    std: Vec<f64>,
}

impl StandardScaler {
    /// Fit per-column mean and stddev from rows of `x`.
    pub fn fit(x: &Array2<f64>) -> Result<Self> {
        if x.nrows() == 0 || x.ncols() == 0 {
            bail!("cannot fit scaler on an empty matrix");
        }
        let mean = x.mean_axis(Axis(0)).expect("non-empty matrix has a mean");
        let std = x.std_axis(Axis(0), 0.0).mapv(|s| s.max(MIN_STD));
        Ok(Self {
            mean: mean.to_vec(),
            std: std.to_vec(),
        })
    }

    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    /// Standardize a single feature vector.
    pub fn transform_row(&self, row: &[f64]) -> Result<Vec<f64>> {
        if row.len() != self.mean.len() {
            bail!(
                "feature length mismatch: got {}, scaler expects {}",
                row.len(),
                self.mean.len()
            );
        }
        Ok(row
            .iter()
            .zip(self.mean.iter().zip(self.std.iter()))
            .map(|(v, (m, s))| (v - m) / s)
            .collect())
    }

    /// Standardize every row of a matrix.
    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        if x.ncols() != self.mean.len() {
            bail!(
                "feature length mismatch: got {}, scaler expects {}",
                x.ncols(),
                self.mean.len()
            );
        }
        let mut out = x.clone();
        for (c, mut col) in out.axis_iter_mut(Axis(1)).enumerate() {
            let (m, s) = (self.mean[c], self.std[c]);
            col.mapv_inplace(|v| (v - m) / s);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn standardizes_to_zero_mean_unit_variance() {
        let x = array![[1.0, 10.0], [2.0, 20.0], [3.0, 30.0]];
        let scaler = StandardScaler::fit(&x).unwrap();
        let scaled = scaler.transform(&x).unwrap();

        for c in 0..2 {
            let col = scaled.column(c);
            let mean: f64 = col.iter().sum::<f64>() / col.len() as f64;
            let var: f64 = col.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / col.len() as f64;
            assert!(mean.abs() < 1e-9);
            assert!((var - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn constant_column_does_not_divide_by_zero() {
        let x = array![[5.0, 1.0], [5.0, 2.0], [5.0, 3.0]];
        let scaler = StandardScaler::fit(&x).unwrap();
        let row = scaler.transform_row(&[5.0, 2.0]).unwrap();
        assert!(row[0].is_finite());
        assert_eq!(row[1], 0.0);
    }

    #[test]
    fn length_mismatch_is_an_error() {
        let x = array![[1.0, 2.0], [3.0, 4.0]];
        let scaler = StandardScaler::fit(&x).unwrap();
        assert!(scaler.transform_row(&[1.0]).is_err());
        assert!(scaler.transform_row(&[1.0, 2.0, 3.0]).is_err());
    }

    #[test]
    fn empty_matrix_is_an_error() {
        let x = Array2::<f64>::zeros((0, 3));
        assert!(StandardScaler::fit(&x).is_err());
    }
}
