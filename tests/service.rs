//! Service behavior over real trained artifacts: load, predict, reload.

use bus_predictor::model::{ArtifactPaths, BoostParams, ForestParams};
use bus_predictor::trainer::{self, TrainOptions};
use bus_predictor::types::{EtaRequest, FactorKind, HealthStatus, OccupancyRequest};
use bus_predictor::{ModelStore, PredictorError};

fn quick_options() -> TrainOptions {
    TrainOptions {
        num_samples: 240,
        seed: 42,
        forest: ForestParams {
            n_trees: 8,
            max_depth: 6,
            min_samples_split: 4,
            seed: 42,
        },
        boost: BoostParams {
            iterations: 15,
            max_depth: 3,
            shrinkage: 0.3,
        },
    }
}

fn trained_store(dir: &std::path::Path) -> ModelStore {
    trainer::run(dir, &quick_options()).unwrap();
    let store = ModelStore::new(dir);
    store.reload().unwrap();
    store
}

fn eta_request(weather: &str, traffic: &str, route: &str, hour: u32) -> EtaRequest {
    EtaRequest {
        latitude: 40.7128,
        longitude: -74.0060,
        hour,
        day_of_week: 3,
        is_weekend: false,
        weather_condition: weather.to_string(),
        traffic_level: traffic.to_string(),
        route_id: route.to_string(),
        distance_km: 4.2,
        avg_speed: 24.0,
        occupancy_percentage: 55.0,
    }
}

fn occupancy_request(hour: u32, route: &str) -> OccupancyRequest {
    OccupancyRequest {
        hour,
        day_of_week: 3,
        is_weekend: false,
        weather_condition: "CLOUDY".to_string(),
        traffic_level: "MEDIUM".to_string(),
        route_id: route.to_string(),
    }
}

#[test]
fn loaded_store_is_healthy() {
    let dir = tempfile::tempdir().unwrap();
    let store = trained_store(dir.path());

    assert!(store.models_loaded());
    assert_eq!(store.health().status, HealthStatus::Healthy);

    let status = store.status();
    assert!(status.eta_model && status.eta_scaler);
    assert!(status.occupancy_model && status.occupancy_scaler);
}

#[test]
fn eta_is_never_below_one_minute() {
    let dir = tempfile::tempdir().unwrap();
    let store = trained_store(dir.path());

    for hour in [0, 8, 13, 18, 23] {
        for (weather, traffic) in [("SUNNY", "LOW"), ("RAINY", "HIGH"), ("SNOWY", "MEDIUM")] {
            let mut req = eta_request(weather, traffic, "ROUTE_1", hour);
            req.distance_km = 0.5;
            req.avg_speed = 60.0;
            let resp = store.predict_eta(&req).unwrap();
            assert!(resp.eta_minutes >= 1.0, "eta {} below floor", resp.eta_minutes);
            assert_eq!(resp.confidence, 0.85);
        }
    }
}

#[test]
fn occupancy_stays_within_bounds() {
    let dir = tempfile::tempdir().unwrap();
    let store = trained_store(dir.path());

    for hour in 0..24 {
        let resp = store.predict_occupancy(&occupancy_request(hour, "ROUTE_2")).unwrap();
        assert!(
            (0.0..=100.0).contains(&resp.occupancy_percentage),
            "occupancy {} out of range",
            resp.occupancy_percentage
        );
        assert_eq!(resp.confidence, 0.80);
    }
}

#[test]
fn rainy_high_traffic_rush_hour_factors_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let store = trained_store(dir.path());

    let resp = store
        .predict_eta(&eta_request("RAINY", "HIGH", "ROUTE_1", 8))
        .unwrap();
    let kinds: Vec<FactorKind> = resp.factors.iter().map(|f| f.kind).collect();
    assert_eq!(
        kinds,
        vec![FactorKind::Traffic, FactorKind::Weather, FactorKind::Time]
    );
}

#[test]
fn unknown_categoricals_do_not_fail() {
    let dir = tempfile::tempdir().unwrap();
    let store = trained_store(dir.path());

    let resp = store
        .predict_eta(&eta_request("SUNNY", "GRIDLOCK", "ROUTE_42", 11))
        .unwrap();
    assert!(resp.eta_minutes >= 1.0);

    let resp = store
        .predict_occupancy(&occupancy_request(11, "ROUTE_42"))
        .unwrap();
    assert!((0.0..=100.0).contains(&resp.occupancy_percentage));
}

#[test]
fn reload_after_deleting_artifacts_degrades_health() {
    let dir = tempfile::tempdir().unwrap();
    let store = trained_store(dir.path());
    assert_eq!(store.health().status, HealthStatus::Healthy);

    let eta = ArtifactPaths::eta(dir.path());
    let occupancy = ArtifactPaths::occupancy(dir.path());
    for path in [&eta.model, &eta.scaler, &occupancy.model, &occupancy.scaler] {
        std::fs::remove_file(path).unwrap();
    }

    store.reload().unwrap();
    assert_eq!(store.health().status, HealthStatus::Degraded);
    assert!(!store.models_loaded());

    let err = store
        .predict_eta(&eta_request("SUNNY", "LOW", "ROUTE_1", 10))
        .unwrap_err();
    assert_eq!(err, PredictorError::Unavailable("ETA"));
}

#[test]
fn reload_with_corrupt_artifact_errors_but_keeps_serving_state() {
    let dir = tempfile::tempdir().unwrap();
    let store = trained_store(dir.path());

    let eta = ArtifactPaths::eta(dir.path());
    std::fs::write(&eta.model, b"garbage").unwrap();

    assert!(store.reload().is_err());
    // The failed swap never happened; the previously loaded set still serves.
    assert!(store.models_loaded());
    assert!(store
        .predict_eta(&eta_request("SUNNY", "LOW", "ROUTE_1", 10))
        .is_ok());
}

#[test]
fn predictions_on_trained_artifacts_are_reproducible() {
    let dir = tempfile::tempdir().unwrap();
    let store = trained_store(dir.path());

    let req = eta_request("CLOUDY", "MEDIUM", "ROUTE_3", 9);
    let a = store.predict_eta(&req).unwrap();
    let b = store.predict_eta(&req).unwrap();
    assert_eq!(a.eta_minutes, b.eta_minutes);
}
