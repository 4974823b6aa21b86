//! Shared model state and the prediction paths that run against it.
//!
//! All four artifact slots live behind one read-write lock: predictions take
//! the read side, an explicit reload swaps in a freshly loaded set under the
//! write side. Requests never mutate the loaded models.

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Utc;
use parking_lot::RwLock;
use tracing::{error, info, warn};

use crate::encoding;
use crate::error::PredictorError;
use crate::model::{self, ArtifactPaths, Regressor};
use crate::scaler::StandardScaler;
use crate::types::{
    EtaRequest, EtaResponse, Factor, FactorKind, HealthResponse, HealthStatus, ModelStatus,
    OccupancyRequest, OccupancyResponse,
};

/// Fixed confidence attached to every ETA response. The models expose no
/// uncertainty estimate; this is a placeholder constant, not a computation.
pub const ETA_CONFIDENCE: f64 = 0.85;
/// Fixed confidence attached to every occupancy response.
pub const OCCUPANCY_CONFIDENCE: f64 = 0.80;
/// ETAs are floored here; the service never reports an arrival under a minute.
pub const MIN_ETA_MINUTES: f64 = 1.0;

#[derive(Default)]
struct Models {
    eta_model: Option<Regressor>,
    eta_scaler: Option<StandardScaler>,
    occupancy_model: Option<Regressor>,
    occupancy_scaler: Option<StandardScaler>,
}

impl Models {
    /// Load whatever artifacts exist under `dir`. A missing pair leaves its
    /// slots empty; a present-but-unreadable file is an error.
    fn load_from(dir: &Path) -> Result<Self> {
        let eta = ArtifactPaths::eta(dir);
        let occupancy = ArtifactPaths::occupancy(dir);
        let (eta_model, eta_scaler) = load_pair(&eta, "ETA")?;
        let (occupancy_model, occupancy_scaler) = load_pair(&occupancy, "occupancy")?;
        Ok(Self {
            eta_model,
            eta_scaler,
            occupancy_model,
            occupancy_scaler,
        })
    }
}

fn load_pair(
    paths: &ArtifactPaths,
    label: &str,
) -> Result<(Option<Regressor>, Option<StandardScaler>)> {
    if paths.model.exists() && paths.scaler.exists() {
        let regressor: Regressor = model::load_artifact(&paths.model)?;
        let scaler: StandardScaler = model::load_artifact(&paths.scaler)?;
        info!(
            model = label,
            kind = regressor.kind(),
            n_features = regressor.n_features(),
            "model loaded"
        );
        Ok((Some(regressor), Some(scaler)))
    } else {
        warn!(model = label, dir = %paths.model.parent().unwrap_or(Path::new(".")).display(), "model files not found");
        Ok((None, None))
    }
}

/// Loaded models plus the directory they came from.
pub struct ModelStore {
    models_dir: PathBuf,
    inner: RwLock<Models>,
}

impl ModelStore {
    /// Create an empty store pointed at a models directory. Call
    /// [`ModelStore::reload`] to actually read artifacts.
    pub fn new(models_dir: impl Into<PathBuf>) -> Self {
        Self {
            models_dir: models_dir.into(),
            inner: RwLock::new(Models::default()),
        }
    }

    pub fn models_dir(&self) -> &Path {
        &self.models_dir
    }

    /// Re-read all artifacts from disk and swap them in wholesale. Slots for
    /// missing files come back empty, so deleted artifacts really disappear.
    pub fn reload(&self) -> Result<()> {
        let fresh = Models::load_from(&self.models_dir)?;
        *self.inner.write() = fresh;
        Ok(())
    }

    pub fn status(&self) -> ModelStatus {
        let inner = self.inner.read();
        ModelStatus {
            eta_model: inner.eta_model.is_some(),
            eta_scaler: inner.eta_scaler.is_some(),
            occupancy_model: inner.occupancy_model.is_some(),
            occupancy_scaler: inner.occupancy_scaler.is_some(),
        }
    }

    /// Both prediction models are present.
    pub fn models_loaded(&self) -> bool {
        let inner = self.inner.read();
        inner.eta_model.is_some() && inner.occupancy_model.is_some()
    }

    pub fn health(&self) -> HealthResponse {
        let models_loaded = self.models_loaded();
        HealthResponse {
            status: if models_loaded {
                HealthStatus::Healthy
            } else {
                HealthStatus::Degraded
            },
            models_loaded,
            timestamp: Utc::now(),
        }
    }

    pub fn predict_eta(&self, req: &EtaRequest) -> Result<EtaResponse, PredictorError> {
        let inner = self.inner.read();
        let regressor = inner
            .eta_model
            .as_ref()
            .ok_or(PredictorError::Unavailable("ETA"))?;
        let scaler = inner
            .eta_scaler
            .as_ref()
            .ok_or(PredictorError::Unavailable("ETA"))?;

        let features = encoding::eta_features(req);
        let scaled = scaler.transform_row(&features).map_err(|e| {
            error!(error = %e, "ETA feature scaling failed");
            PredictorError::Prediction("ETA")
        })?;
        let raw = regressor.predict_one(&scaled).map_err(|e| {
            error!(error = %e, "ETA prediction failed");
            PredictorError::Prediction("ETA")
        })?;

        Ok(EtaResponse {
            eta_minutes: raw.max(MIN_ETA_MINUTES),
            confidence: ETA_CONFIDENCE,
            factors: eta_factors(req),
            timestamp: Utc::now(),
        })
    }

    pub fn predict_occupancy(
        &self,
        req: &OccupancyRequest,
    ) -> Result<OccupancyResponse, PredictorError> {
        let inner = self.inner.read();
        let regressor = inner
            .occupancy_model
            .as_ref()
            .ok_or(PredictorError::Unavailable("Occupancy"))?;
        let scaler = inner
            .occupancy_scaler
            .as_ref()
            .ok_or(PredictorError::Unavailable("Occupancy"))?;

        let features = encoding::occupancy_features(req);
        let scaled = scaler.transform_row(&features).map_err(|e| {
            error!(error = %e, "occupancy feature scaling failed");
            PredictorError::Prediction("occupancy")
        })?;
        let raw = regressor.predict_one(&scaled).map_err(|e| {
            error!(error = %e, "occupancy prediction failed");
            PredictorError::Prediction("occupancy")
        })?;

        Ok(OccupancyResponse {
            occupancy_percentage: raw.clamp(0.0, 100.0),
            confidence: OCCUPANCY_CONFIDENCE,
            timestamp: Utc::now(),
        })
    }
}

/// Human-readable conditions affecting the ETA, from threshold rules on the
/// request. Ordered: traffic, then weather, then time of day.
pub fn eta_factors(req: &EtaRequest) -> Vec<Factor> {
    let mut factors = Vec::new();
    if req.traffic_level == "HIGH" {
        factors.push(Factor {
            kind: FactorKind::Traffic,
            impact: -0.3,
            description: "High traffic conditions".to_string(),
        });
    }
    if matches!(req.weather_condition.as_str(), "RAINY" | "SNOWY") {
        factors.push(Factor {
            kind: FactorKind::Weather,
            impact: -0.2,
            description: format!("{} weather", req.weather_condition.to_lowercase()),
        });
    }
    if encoding::is_rush_hour(req.hour) {
        factors.push(Factor {
            kind: FactorKind::Time,
            impact: -0.1,
            description: "Rush hour".to_string(),
        });
    }
    factors
}
