//! Synthetic ride data for model training.
//!
//! Labels come from a hand-specified generative formula: distance/speed base
//! time scaled by traffic, weather and rush-hour multipliers plus gaussian
//! noise. All sampling runs on a seeded RNG so a fixed seed reproduces the
//! dataset bit for bit.

use ndarray::{Array1, Array2};
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use statrs::distribution::Normal;

use crate::encoding::{
    self, ETA_FEATURE_NAMES, OCCUPANCY_FEATURE_NAMES,
};

pub const WEATHER_CONDITIONS: [&str; 4] = ["SUNNY", "CLOUDY", "RAINY", "SNOWY"];
pub const TRAFFIC_LEVELS: [&str; 3] = ["LOW", "MEDIUM", "HIGH"];

const WEATHER_WEIGHTS: [f64; 4] = [0.4, 0.3, 0.2, 0.1];
const TRAFFIC_WEIGHTS: [f64; 3] = [0.3, 0.5, 0.2];

/// One generated ride observation with both prediction targets.
#[derive(Debug, Clone)]
pub struct RideSample {
    pub route_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub hour: u32,
    pub minute: u32,
    pub day_of_week: u32,
    pub is_weekend: bool,
    pub weather_condition: String,
    pub traffic_level: String,
    pub distance_km: f64,
    pub avg_speed: f64,
    pub occupancy_percentage: f64,
    pub eta_minutes: f64,
}

fn traffic_multiplier(level: &str) -> f64 {
    match level {
        "LOW" => 1.0,
        "MEDIUM" => 1.3,
        _ => 1.8,
    }
}

fn weather_multiplier(condition: &str) -> f64 {
    match condition {
        "SUNNY" => 1.0,
        "CLOUDY" => 1.1,
        "RAINY" => 1.4,
        _ => 1.8,
    }
}

/// Generate `num_samples` rides from the given seed.
pub fn generate(num_samples: usize, seed: u64) -> Vec<RideSample> {
    let mut rng = StdRng::seed_from_u64(seed);

    let coord_jitter = Normal::new(0.0, 0.1).expect("valid distribution parameters");
    let speed_dist = Normal::new(25.0, 5.0).expect("valid distribution parameters");
    let noise_dist = Normal::new(0.0, 2.0).expect("valid distribution parameters");
    let weather_pick = WeightedIndex::new(WEATHER_WEIGHTS).expect("valid weights");
    let traffic_pick = WeightedIndex::new(TRAFFIC_WEIGHTS).expect("valid weights");

    let mut samples = Vec::with_capacity(num_samples);
    for _ in 0..num_samples {
        let route_id = format!("ROUTE_{}", rng.gen_range(1..=3));
        let latitude = 40.7 + coord_jitter.sample(&mut rng);
        let longitude = -74.0 + coord_jitter.sample(&mut rng);

        let hour = rng.gen_range(0..24u32);
        let minute = rng.gen_range(0..60u32);
        let day_of_week = rng.gen_range(0..7u32);
        let is_weekend = day_of_week >= 5;

        let weather_condition = WEATHER_CONDITIONS[weather_pick.sample(&mut rng)].to_string();
        let traffic_level = TRAFFIC_LEVELS[traffic_pick.sample(&mut rng)].to_string();

        let distance_km = rng.gen_range(0.5..15.0);
        let avg_speed = speed_dist.sample(&mut rng);
        let occupancy_percentage = rng.gen_range(0.0..100.0);

        let base_time = distance_km / avg_speed * 60.0;
        let rush_multiplier = if encoding::is_rush_hour(hour) { 1.5 } else { 1.0 };
        let eta_minutes = (base_time
            * traffic_multiplier(&traffic_level)
            * weather_multiplier(&weather_condition)
            * rush_multiplier
            + noise_dist.sample(&mut rng))
        .max(1.0);

        samples.push(RideSample {
            route_id,
            latitude,
            longitude,
            hour,
            minute,
            day_of_week,
            is_weekend,
            weather_condition,
            traffic_level,
            distance_km,
            avg_speed,
            occupancy_percentage,
            eta_minutes,
        });
    }
    samples
}

/// Feature matrix and target vector for ETA training.
///
/// At training time the minute of the hour is known, so time_of_day carries
/// the fractional hour; request-time vectors degenerate to the whole hour.
pub fn eta_matrix(samples: &[RideSample]) -> (Array2<f64>, Array1<f64>) {
    let mut flat = Vec::with_capacity(samples.len() * ETA_FEATURE_NAMES.len());
    let mut targets = Vec::with_capacity(samples.len());
    for s in samples {
        flat.extend_from_slice(&[
            s.latitude,
            s.longitude,
            s.hour as f64,
            s.day_of_week as f64,
            s.is_weekend as u8 as f64,
            encoding::encode_weather(&s.weather_condition),
            encoding::encode_traffic(&s.traffic_level),
            encoding::encode_route(&s.route_id),
            s.distance_km,
            s.avg_speed,
            s.occupancy_percentage,
            s.hour as f64 + s.minute as f64 / 60.0,
            encoding::is_rush_hour(s.hour) as u8 as f64,
        ]);
        targets.push(s.eta_minutes);
    }
    let x = Array2::from_shape_vec((samples.len(), ETA_FEATURE_NAMES.len()), flat)
        .expect("eta_matrix: shape mismatch");
    (x, Array1::from_vec(targets))
}

/// Feature matrix and target vector for occupancy training.
pub fn occupancy_matrix(samples: &[RideSample]) -> (Array2<f64>, Array1<f64>) {
    let mut flat = Vec::with_capacity(samples.len() * OCCUPANCY_FEATURE_NAMES.len());
    let mut targets = Vec::with_capacity(samples.len());
    for s in samples {
        flat.extend_from_slice(&[
            s.hour as f64,
            s.day_of_week as f64,
            s.is_weekend as u8 as f64,
            encoding::encode_weather(&s.weather_condition),
            encoding::encode_traffic(&s.traffic_level),
            encoding::encode_route(&s.route_id),
            s.hour as f64 + s.minute as f64 / 60.0,
            encoding::is_rush_hour(s.hour) as u8 as f64,
        ]);
        targets.push(s.occupancy_percentage);
    }
    let x = Array2::from_shape_vec((samples.len(), OCCUPANCY_FEATURE_NAMES.len()), flat)
        .expect("occupancy_matrix: shape mismatch");
    (x, Array1::from_vec(targets))
}

/// Shuffled train/test index split.
pub fn train_test_split(n_samples: usize, test_fraction: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut indices: Vec<usize> = (0..n_samples).collect();
    indices.shuffle(&mut StdRng::seed_from_u64(seed));
    let n_test = (n_samples as f64 * test_fraction).round() as usize;
    let test = indices[..n_test].to_vec();
    let train = indices[n_test..].to_vec();
    (train, test)
}
