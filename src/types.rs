//! Request and response types for the HTTP surface.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct EtaRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub hour: u32,
    pub day_of_week: u32,
    pub is_weekend: bool,
    pub weather_condition: String,
    pub traffic_level: String,
    pub route_id: String,
    pub distance_km: f64,
    pub avg_speed: f64,
    pub occupancy_percentage: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct EtaResponse {
    pub eta_minutes: f64,
    pub confidence: f64,
    pub factors: Vec<Factor>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OccupancyRequest {
    pub hour: u32,
    pub day_of_week: u32,
    pub is_weekend: bool,
    pub weather_condition: String,
    pub traffic_level: String,
    pub route_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OccupancyResponse {
    pub occupancy_percentage: f64,
    pub confidence: f64,
    pub timestamp: DateTime<Utc>,
}

/// A human-readable condition contributing to a prediction, derived from
/// threshold rules on the request, not from the model internals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Factor {
    #[serde(rename = "type")]
    pub kind: FactorKind,
    pub impact: f64,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FactorKind {
    Traffic,
    Weather,
    Time,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub models_loaded: bool,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
}

/// Per-artifact load state, as reported by `GET /models/status`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ModelStatus {
    pub eta_model: bool,
    pub eta_scaler: bool,
    pub occupancy_model: bool,
    pub occupancy_scaler: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factor_serializes_with_type_field() {
        let factor = Factor {
            kind: FactorKind::Traffic,
            impact: -0.3,
            description: "High traffic conditions".to_string(),
        };
        let json = serde_json::to_value(&factor).unwrap();
        assert_eq!(json["type"], "TRAFFIC");
        assert_eq!(json["impact"], -0.3);
    }

    #[test]
    fn health_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(HealthStatus::Degraded).unwrap(),
            "degraded"
        );
        assert_eq!(
            serde_json::to_value(HealthStatus::Healthy).unwrap(),
            "healthy"
        );
    }

    #[test]
    fn eta_request_deserializes() {
        let body = r#"{
            "latitude": 40.7, "longitude": -74.0,
            "hour": 8, "day_of_week": 1, "is_weekend": false,
            "weather_condition": "SUNNY", "traffic_level": "LOW",
            "route_id": "ROUTE_1",
            "distance_km": 3.2, "avg_speed": 22.5, "occupancy_percentage": 40.0
        }"#;
        let req: EtaRequest = serde_json::from_str(body).unwrap();
        assert_eq!(req.hour, 8);
        assert_eq!(req.route_id, "ROUTE_1");
    }
}
