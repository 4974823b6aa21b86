//! Service error kinds and their HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Failures surfaced by the prediction endpoints.
///
/// Prediction failures are deliberately opaque: the cause is logged where it
/// happens and never echoed to the client.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PredictorError {
    /// Model or scaler missing at request time.
    #[error("{0} model not available")]
    Unavailable(&'static str),
    /// Any failure while encoding, scaling or predicting.
    #[error("Error making {0} prediction")]
    Prediction(&'static str),
    /// Re-reading artifacts from disk failed.
    #[error("Error reloading models: {0}")]
    Reload(String),
}

impl PredictorError {
    fn status(&self) -> StatusCode {
        match self {
            PredictorError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            PredictorError::Prediction(_) | PredictorError::Reload(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for PredictorError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}
