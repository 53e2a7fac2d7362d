//! DetectClient - handles communication with the detection server.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// The environment variable name for the detection server URL.
pub const DETECT_SERVER_ENV: &str = "DETECT_SERVER_URL";

/// Default base URL for the detection server.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

/// Default timeout for HTTP requests (30 seconds).
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default connection timeout (10 seconds).
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Request body for one prediction cycle.
#[derive(Debug, Serialize)]
struct PredictRequest {
    /// Data-URL encoded JPEG of the captured frame.
    image: String,
}

/// One detected object in a frame.
///
/// Coordinates are center-based: `x`/`y` is the box center in frame pixels,
/// `width`/`height` are the full box dimensions.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Detection {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Class label for the detection.
    #[serde(rename = "class")]
    pub class_name: String,
    /// Confidence score in 0.0-1.0.
    pub confidence: f64,
}

/// Per-class aggregate statistics for one prediction cycle.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ClassStats {
    /// Average confidence over the class's detections, in 0-100.
    pub avg_confidence: f64,
}

/// Response from the prediction endpoint.
///
/// Both fields default to empty so a sparse server response still
/// deserializes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PredictResponse {
    #[serde(default)]
    pub predictions: Vec<Detection>,
    #[serde(default)]
    pub stats: HashMap<String, ClassStats>,
}

/// Client for the remote detection server.
#[derive(Debug, Clone)]
pub struct DetectClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl DetectClient {
    /// Create a new DetectClient from the environment.
    ///
    /// Uses `DETECT_SERVER_URL` when set, otherwise the default local
    /// server URL.
    ///
    /// # Errors
    ///
    /// Returns `DetectError::HttpError` if the underlying HTTP client
    /// cannot be built.
    pub fn new() -> Result<Self, DetectError> {
        let base_url = std::env::var(DETECT_SERVER_ENV)
            .unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string());
        Self::with_base_url(base_url)
    }

    /// Create a new DetectClient with an explicit base URL.
    ///
    /// Useful for testing against a mock server.
    pub fn with_base_url(base_url: String) -> Result<Self, DetectError> {
        if base_url.trim().is_empty() {
            return Err(DetectError::MissingServerUrl);
        }

        let http_client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the class catalog from `GET {base}/classes`.
    ///
    /// The returned order is load-bearing: it defines results panel row
    /// order for the whole session. An empty catalog is an error because
    /// the prediction loop must not start without one.
    ///
    /// # Errors
    ///
    /// Returns `DetectError::EmptyCatalog` if the server knows no classes,
    /// `DetectError::ApiError` on a non-success status, or
    /// `DetectError::HttpError` if the request fails.
    pub async fn fetch_classes(&self) -> Result<Vec<String>, DetectError> {
        let url = format!("{}/classes", self.base_url);

        let response = self.http_client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(DetectError::ApiError(format!(
                "Class list request failed with status {}: {}",
                status, error_text
            )));
        }

        let classes: Vec<String> = response.json().await?;
        if classes.is_empty() {
            return Err(DetectError::EmptyCatalog);
        }

        Ok(classes)
    }

    /// Send one encoded frame to `POST {base}/predict`.
    ///
    /// The body is `{"image": "<data-url>"}`. A non-success status becomes
    /// `DetectError::ApiError` with the response body attached; the caller
    /// treats any error as a cycle-level failure.
    pub async fn predict(&self, image_data_url: String) -> Result<PredictResponse, DetectError> {
        let url = format!("{}/predict", self.base_url);

        let request_body = PredictRequest {
            image: image_data_url,
        };

        let response = self
            .http_client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(DetectError::ApiError(format!(
                "Prediction request failed with status {}: {}",
                status, error_text
            )));
        }

        let predict_response: PredictResponse = response.json().await?;
        Ok(predict_response)
    }
}

/// Errors that can occur while talking to the detection server.
#[derive(Debug, thiserror::Error)]
pub enum DetectError {
    #[error("Detection server URL not configured")]
    MissingServerUrl,

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Detection server returned an empty class list")]
    EmptyCatalog,
}
