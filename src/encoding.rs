//! Categorical encodings and feature vector assembly.
//!
//! Encodings are fixed dictionary lookups shared by the trainer and the
//! service; the feature order here is the order the models are trained on.

use crate::types::{EtaRequest, OccupancyRequest};

/// Hours counted as rush hour (morning and evening peaks).
pub const RUSH_HOURS: [u32; 6] = [7, 8, 9, 17, 18, 19];

/// Column names of the ETA feature vector, in model input order.
pub const ETA_FEATURE_NAMES: [&str; 13] = [
    "latitude",
    "longitude",
    "hour",
    "day_of_week",
    "is_weekend",
    "weather_encoded",
    "traffic_encoded",
    "route_encoded",
    "distance_km",
    "avg_speed",
    "occupancy_percentage",
    "time_of_day",
    "is_rush_hour",
];

/// Column names of the occupancy feature vector, in model input order.
pub const OCCUPANCY_FEATURE_NAMES: [&str; 8] = [
    "hour",
    "day_of_week",
    "is_weekend",
    "weather_encoded",
    "traffic_encoded",
    "route_encoded",
    "time_of_day",
    "is_rush_hour",
];

/// Weather encoding. Unknown conditions map to 0 (sunny).
pub fn encode_weather(condition: &str) -> f64 {
    match condition {
        "SUNNY" => 0.0,
        "CLOUDY" => 1.0,
        "RAINY" => 2.0,
        "SNOWY" => 3.0,
        _ => 0.0,
    }
}

/// Traffic encoding. Unknown levels map to 1 (medium).
pub fn encode_traffic(level: &str) -> f64 {
    match level {
        "LOW" => 0.0,
        "MEDIUM" => 1.0,
        "HIGH" => 2.0,
        _ => 1.0,
    }
}

/// Route encoding. Unknown routes map to 0.
pub fn encode_route(route_id: &str) -> f64 {
    match route_id {
        "ROUTE_1" => 0.0,
        "ROUTE_2" => 1.0,
        "ROUTE_3" => 2.0,
        _ => 0.0,
    }
}

pub fn is_rush_hour(hour: u32) -> bool {
    RUSH_HOURS.contains(&hour)
}

/// Assemble the 13-element ETA feature vector from a request.
///
/// Requests carry no minute-of-hour, so time_of_day degenerates to the hour.
pub fn eta_features(req: &EtaRequest) -> Vec<f64> {
    vec![
        req.latitude,
        req.longitude,
        req.hour as f64,
        req.day_of_week as f64,
        req.is_weekend as u8 as f64,
        encode_weather(&req.weather_condition),
        encode_traffic(&req.traffic_level),
        encode_route(&req.route_id),
        req.distance_km,
        req.avg_speed,
        req.occupancy_percentage,
        req.hour as f64,
        is_rush_hour(req.hour) as u8 as f64,
    ]
}

/// Assemble the 8-element occupancy feature vector from a request.
pub fn occupancy_features(req: &OccupancyRequest) -> Vec<f64> {
    vec![
        req.hour as f64,
        req.day_of_week as f64,
        req.is_weekend as u8 as f64,
        encode_weather(&req.weather_condition),
        encode_traffic(&req.traffic_level),
        encode_route(&req.route_id),
        req.hour as f64,
        is_rush_hour(req.hour) as u8 as f64,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eta_request() -> EtaRequest {
        EtaRequest {
            latitude: 40.71,
            longitude: -74.0,
            hour: 8,
            day_of_week: 1,
            is_weekend: false,
            weather_condition: "RAINY".to_string(),
            traffic_level: "HIGH".to_string(),
            route_id: "ROUTE_2".to_string(),
            distance_km: 5.0,
            avg_speed: 25.0,
            occupancy_percentage: 60.0,
        }
    }

    #[test]
    fn known_encodings() {
        assert_eq!(encode_weather("SNOWY"), 3.0);
        assert_eq!(encode_traffic("HIGH"), 2.0);
        assert_eq!(encode_route("ROUTE_3"), 2.0);
    }

    #[test]
    fn unknown_route_defaults_to_zero() {
        assert_eq!(encode_route("ROUTE_99"), 0.0);
        assert_eq!(encode_route(""), 0.0);
    }

    #[test]
    fn unknown_traffic_defaults_to_medium() {
        assert_eq!(encode_traffic("GRIDLOCK"), 1.0);
        assert_eq!(encode_traffic(""), 1.0);
    }

    #[test]
    fn rush_hour_windows() {
        assert!(is_rush_hour(7));
        assert!(is_rush_hour(9));
        assert!(is_rush_hour(17));
        assert!(is_rush_hour(19));
        assert!(!is_rush_hour(10));
        assert!(!is_rush_hour(16));
        assert!(!is_rush_hour(20));
        assert!(!is_rush_hour(0));
    }

    #[test]
    fn eta_vector_order_and_length() {
        let req = eta_request();
        let features = eta_features(&req);
        assert_eq!(features.len(), ETA_FEATURE_NAMES.len());
        assert_eq!(features[0], 40.71);
        assert_eq!(features[2], 8.0);
        assert_eq!(features[5], 2.0); // rainy
        assert_eq!(features[6], 2.0); // high traffic
        assert_eq!(features[7], 1.0); // ROUTE_2
        assert_eq!(features[12], 1.0); // 8am is rush hour
    }

    #[test]
    fn occupancy_vector_order_and_length() {
        let req = OccupancyRequest {
            hour: 14,
            day_of_week: 6,
            is_weekend: true,
            weather_condition: "SUNNY".to_string(),
            traffic_level: "LOW".to_string(),
            route_id: "ROUTE_1".to_string(),
        };
        let features = occupancy_features(&req);
        assert_eq!(features.len(), OCCUPANCY_FEATURE_NAMES.len());
        assert_eq!(features[0], 14.0);
        assert_eq!(features[2], 1.0); // weekend
        assert_eq!(features[7], 0.0); // not rush hour
    }
}
