//! Offline training: synthetic data in, serialized artifacts out.
//!
//! ETA gets three candidate regressors scored on a held-out split (highest
//! R² wins); occupancy gets a single random forest. Each prediction type is
//! persisted as model + scaler blobs plus a JSON metadata sidecar, replacing
//! whatever a previous run left behind.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::info;

use crate::encoding::{ETA_FEATURE_NAMES, OCCUPANCY_FEATURE_NAMES};
use crate::metrics::{mean_absolute_error, mean_squared_error, r2_score};
use crate::model::{
    self, ArtifactPaths, BoostParams, BoostedRegressor, ForestParams, LinearRegressor,
    ModelMetadata, RandomForestRegressor, Regressor,
};
use crate::scaler::StandardScaler;
use crate::store::ModelStore;
use crate::synthetic::{self, RideSample};
use crate::types::{EtaRequest, OccupancyRequest};

pub const DEFAULT_SEED: u64 = 42;
const TEST_FRACTION: f64 = 0.2;
const CV_FOLDS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CandidateKind {
    RandomForest,
    GradientBoosting,
    LinearRegression,
}

impl CandidateKind {
    fn label(self) -> &'static str {
        match self {
            CandidateKind::RandomForest => "random_forest",
            CandidateKind::GradientBoosting => "gradient_boosting",
            CandidateKind::LinearRegression => "linear_regression",
        }
    }
}

const ETA_CANDIDATES: [CandidateKind; 3] = [
    CandidateKind::RandomForest,
    CandidateKind::GradientBoosting,
    CandidateKind::LinearRegression,
];

#[derive(Debug, Clone)]
pub struct TrainOptions {
    pub num_samples: usize,
    pub seed: u64,
    pub forest: ForestParams,
    pub boost: BoostParams,
}

impl Default for TrainOptions {
    fn default() -> Self {
        Self {
            num_samples: 10_000,
            seed: DEFAULT_SEED,
            forest: ForestParams::default(),
            boost: BoostParams::default(),
        }
    }
}

/// Held-out scores of the model persisted for one prediction type.
#[derive(Debug, Clone)]
pub struct ModelReport {
    pub regressor: String,
    pub r2: f64,
    pub mae: f64,
    pub mse: f64,
}

#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub eta: ModelReport,
    pub occupancy: ModelReport,
}

/// Full training run: generate data, fit, evaluate, persist, smoke-check.
pub fn run(models_dir: &Path, options: &TrainOptions) -> Result<TrainingReport> {
    fs::create_dir_all(models_dir)
        .with_context(|| format!("failed to create {}", models_dir.display()))?;

    info!(
        num_samples = options.num_samples,
        seed = options.seed,
        "generating synthetic training data"
    );
    let samples = synthetic::generate(options.num_samples, options.seed);

    let eta = train_eta(models_dir, &samples, options)?;
    let occupancy = train_occupancy(models_dir, &samples, options)?;
    smoke_check(models_dir)?;

    Ok(TrainingReport { eta, occupancy })
}

fn train_eta(dir: &Path, samples: &[RideSample], options: &TrainOptions) -> Result<ModelReport> {
    let (x, y) = synthetic::eta_matrix(samples);
    let split = SplitData::new(&x, &y, options)?;

    let mut best: Option<(Regressor, ModelReport)> = None;
    for kind in ETA_CANDIDATES {
        info!(candidate = kind.label(), "training ETA candidate");
        let regressor = fit_candidate(kind, &split.x_train, &split.y_train, options)?;
        let report = evaluate(&regressor, &split)?;
        info!(
            candidate = kind.label(),
            mae = report.mae,
            mse = report.mse,
            r2 = report.r2,
            "held-out scores"
        );

        let (cv_mean, cv_std) =
            cross_val_r2(kind, &split.x_train, &split.y_train, CV_FOLDS, options)?;
        info!(
            candidate = kind.label(),
            cv_r2 = cv_mean,
            spread = 2.0 * cv_std,
            "cross-validation scores"
        );

        if best.as_ref().map_or(true, |(_, b)| report.r2 > b.r2) {
            best = Some((regressor, report));
        }
    }

    let (regressor, report) = best.context("no ETA candidate was trained")?;
    info!(
        chosen = %report.regressor,
        r2 = report.r2,
        "selected ETA model"
    );
    persist(
        &ArtifactPaths::eta(dir),
        &regressor,
        &split.scaler,
        "ETA_PREDICTION",
        &ETA_FEATURE_NAMES,
        &report,
    )?;
    Ok(report)
}

fn train_occupancy(
    dir: &Path,
    samples: &[RideSample],
    options: &TrainOptions,
) -> Result<ModelReport> {
    let (x, y) = synthetic::occupancy_matrix(samples);
    let split = SplitData::new(&x, &y, options)?;

    info!("training occupancy model");
    let regressor = fit_candidate(
        CandidateKind::RandomForest,
        &split.x_train,
        &split.y_train,
        options,
    )?;
    let report = evaluate(&regressor, &split)?;
    info!(mae = report.mae, r2 = report.r2, "occupancy held-out scores");

    persist(
        &ArtifactPaths::occupancy(dir),
        &regressor,
        &split.scaler,
        "OCCUPANCY_ESTIMATION",
        &OCCUPANCY_FEATURE_NAMES,
        &report,
    )?;
    Ok(report)
}

/// Scaled train/test split plus the scaler fit on the training rows only.
struct SplitData {
    x_train: Array2<f64>,
    y_train: Array1<f64>,
    x_test: Array2<f64>,
    y_test: Array1<f64>,
    scaler: StandardScaler,
}

impl SplitData {
    fn new(x: &Array2<f64>, y: &Array1<f64>, options: &TrainOptions) -> Result<Self> {
        let (train_idx, test_idx) =
            synthetic::train_test_split(x.nrows(), TEST_FRACTION, options.seed);
        let x_train_raw = x.select(Axis(0), &train_idx);
        let x_test_raw = x.select(Axis(0), &test_idx);

        let scaler = StandardScaler::fit(&x_train_raw)?;
        Ok(Self {
            x_train: scaler.transform(&x_train_raw)?,
            y_train: y.select(Axis(0), &train_idx),
            x_test: scaler.transform(&x_test_raw)?,
            y_test: y.select(Axis(0), &test_idx),
            scaler,
        })
    }
}

fn fit_candidate(
    kind: CandidateKind,
    x: &Array2<f64>,
    y: &Array1<f64>,
    options: &TrainOptions,
) -> Result<Regressor> {
    Ok(match kind {
        CandidateKind::RandomForest => {
            let mut params = options.forest;
            params.seed = options.seed;
            Regressor::RandomForest(RandomForestRegressor::fit(x, y, &params))
        }
        CandidateKind::GradientBoosting => {
            Regressor::GradientBoosting(BoostedRegressor::fit(x, y, &options.boost))
        }
        CandidateKind::LinearRegression => Regressor::Linear(LinearRegressor::fit(x, y)?),
    })
}

fn evaluate(regressor: &Regressor, split: &SplitData) -> Result<ModelReport> {
    let preds = regressor.predict(&split.x_test)?;
    let truth = split.y_test.to_vec();
    Ok(ModelReport {
        regressor: regressor.kind().to_string(),
        r2: r2_score(&truth, &preds),
        mae: mean_absolute_error(&truth, &preds),
        mse: mean_squared_error(&truth, &preds),
    })
}

/// K-fold cross-validated R² on the training split. Informational only;
/// selection uses the held-out score.
fn cross_val_r2(
    kind: CandidateKind,
    x: &Array2<f64>,
    y: &Array1<f64>,
    folds: usize,
    options: &TrainOptions,
) -> Result<(f64, f64)> {
    let n = x.nrows();
    anyhow::ensure!(folds >= 2 && n >= folds, "not enough samples for {folds}-fold CV");

    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(&mut StdRng::seed_from_u64(options.seed));

    let fold_size = n / folds;
    let mut scores = Vec::with_capacity(folds);
    for fold in 0..folds {
        let start = fold * fold_size;
        let end = if fold == folds - 1 { n } else { start + fold_size };
        let holdout = &indices[start..end];
        let train: Vec<usize> = indices[..start]
            .iter()
            .chain(&indices[end..])
            .copied()
            .collect();

        let model = fit_candidate(
            kind,
            &x.select(Axis(0), &train),
            &y.select(Axis(0), &train),
            options,
        )?;
        let preds = model.predict(&x.select(Axis(0), holdout))?;
        let truth = y.select(Axis(0), holdout).to_vec();
        scores.push(r2_score(&truth, &preds));
    }

    let mean = scores.iter().sum::<f64>() / scores.len() as f64;
    let var = scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / scores.len() as f64;
    Ok((mean, var.sqrt()))
}

fn persist(
    paths: &ArtifactPaths,
    regressor: &Regressor,
    scaler: &StandardScaler,
    model_type: &str,
    features: &[&str],
    report: &ModelReport,
) -> Result<()> {
    model::save_artifact(&paths.model, regressor)?;
    model::save_artifact(&paths.scaler, scaler)?;
    ModelMetadata {
        model_type: model_type.to_string(),
        regressor: report.regressor.clone(),
        features: features.iter().map(|s| s.to_string()).collect(),
        r2_score: report.r2,
        mae: report.mae,
        training_date: Utc::now(),
        model_path: paths.model.display().to_string(),
        scaler_path: paths.scaler.display().to_string(),
    }
    .save(&paths.metadata)?;
    info!(model_type, path = %paths.model.display(), "artifacts saved");
    Ok(())
}

/// Load the freshly written artifacts and run one prediction of each kind.
fn smoke_check(models_dir: &Path) -> Result<()> {
    let store = ModelStore::new(models_dir);
    store.reload()?;

    let eta = store
        .predict_eta(&sample_eta_request())
        .map_err(anyhow::Error::from)?;
    info!(eta_minutes = eta.eta_minutes, "sample ETA prediction");

    let occupancy = store
        .predict_occupancy(&sample_occupancy_request())
        .map_err(anyhow::Error::from)?;
    info!(
        occupancy_percentage = occupancy.occupancy_percentage,
        "sample occupancy prediction"
    );
    Ok(())
}

fn sample_eta_request() -> EtaRequest {
    EtaRequest {
        latitude: 40.7128,
        longitude: -74.0060,
        hour: 8,
        day_of_week: 1,
        is_weekend: false,
        weather_condition: "SUNNY".to_string(),
        traffic_level: "MEDIUM".to_string(),
        route_id: "ROUTE_3".to_string(),
        distance_km: 5.0,
        avg_speed: 25.0,
        occupancy_percentage: 60.0,
    }
}

fn sample_occupancy_request() -> OccupancyRequest {
    OccupancyRequest {
        hour: 8,
        day_of_week: 1,
        is_weekend: false,
        weather_condition: "SUNNY".to_string(),
        traffic_level: "MEDIUM".to_string(),
        route_id: "ROUTE_3".to_string(),
    }
}
