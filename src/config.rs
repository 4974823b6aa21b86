//! Environment-driven runtime settings for the two binaries.

use std::path::PathBuf;

/// Settings for the prediction service.
#[derive(Debug, Clone)]
pub struct ServeConfig {
    pub models_dir: PathBuf,
    pub port: u16,
}

impl ServeConfig {
    /// Read `MODELS_DIR` and `PORT` from the environment, with defaults.
    pub fn from_env() -> Self {
        Self {
            models_dir: models_dir_from_env(),
            port: std::env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8000),
        }
    }
}

/// Settings for a training run.
#[derive(Debug, Clone)]
pub struct TrainConfig {
    pub models_dir: PathBuf,
    pub num_samples: usize,
    pub seed: u64,
}

impl TrainConfig {
    /// Read `MODELS_DIR`, `NUM_SAMPLES` and `SEED` from the environment,
    /// with defaults.
    pub fn from_env() -> Self {
        Self {
            models_dir: models_dir_from_env(),
            num_samples: std::env::var("NUM_SAMPLES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10_000),
            seed: std::env::var("SEED")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(42),
        }
    }
}

fn models_dir_from_env() -> PathBuf {
    std::env::var("MODELS_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("models"))
}
