//! Trained regressors and their on-disk artifact format.
//!
//! An artifact is a bincode blob holding one [`Regressor`] (or one scaler),
//! paired with its sibling files only by co-located names inside the models
//! directory. Nothing ties an artifact to a feature-vector shape; a mismatch
//! fails at prediction time.

pub mod boosted;
pub mod forest;
pub mod linear;

pub use boosted::{BoostParams, BoostedRegressor};
pub use forest::{ForestParams, RandomForestRegressor};
pub use linear::LinearRegressor;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use ndarray::Array2;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A trained regression model of any supported kind.
#[derive(Serialize, Deserialize)]
pub enum Regressor {
    Linear(LinearRegressor),
    RandomForest(RandomForestRegressor),
    GradientBoosting(BoostedRegressor),
}

impl Regressor {
    pub fn kind(&self) -> &'static str {
        match self {
            Regressor::Linear(_) => "linear_regression",
            Regressor::RandomForest(_) => "random_forest",
            Regressor::GradientBoosting(_) => "gradient_boosting",
        }
    }

    pub fn n_features(&self) -> usize {
        match self {
            Regressor::Linear(m) => m.n_features(),
            Regressor::RandomForest(m) => m.n_features(),
            Regressor::GradientBoosting(m) => m.n_features(),
        }
    }

    /// Predict a single target value from an already-scaled feature vector.
    pub fn predict_one(&self, features: &[f64]) -> Result<f64> {
        if features.len() != self.n_features() {
            bail!(
                "feature length mismatch: got {}, model expects {}",
                features.len(),
                self.n_features()
            );
        }
        Ok(match self {
            Regressor::Linear(m) => m.predict_one(features),
            Regressor::RandomForest(m) => m.predict_one(features),
            Regressor::GradientBoosting(m) => m.predict_one(features),
        })
    }

    /// Row-wise prediction over a matrix.
    pub fn predict(&self, x: &Array2<f64>) -> Result<Vec<f64>> {
        (0..x.nrows())
            .map(|r| self.predict_one(&x.row(r).to_vec()))
            .collect()
    }
}

/// Write a model or scaler as a bincode blob.
pub fn save_artifact<T: Serialize>(path: &Path, artifact: &T) -> Result<()> {
    let bytes = bincode::serialize(artifact).context("failed to serialize artifact")?;
    fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Read a model or scaler back from a bincode blob.
pub fn load_artifact<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes =
        fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    bincode::deserialize(&bytes)
        .with_context(|| format!("failed to decode artifact {}", path.display()))
}

/// JSON sidecar written next to each model/scaler pair. Informational only;
/// the service never reads it back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_type: String,
    pub regressor: String,
    pub features: Vec<String>,
    pub r2_score: f64,
    pub mae: f64,
    pub training_date: DateTime<Utc>,
    pub model_path: String,
    pub scaler_path: String,
}

impl ModelMetadata {
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to encode metadata")?;
        fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }
}

/// Artifact file names for one prediction type inside a models directory.
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub scaler: PathBuf,
    pub metadata: PathBuf,
}

impl ArtifactPaths {
    pub fn eta(dir: &Path) -> Self {
        Self {
            model: dir.join("eta_model.bin"),
            scaler: dir.join("eta_scaler.bin"),
            metadata: dir.join("eta_model_metadata.json"),
        }
    }

    pub fn occupancy(dir: &Path) -> Self {
        Self {
            model: dir.join("occupancy_model.bin"),
            scaler: dir.join("occupancy_scaler.bin"),
            metadata: dir.join("occupancy_model_metadata.json"),
        }
    }
}
