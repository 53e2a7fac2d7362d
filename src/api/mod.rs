//! HTTP client for the remote detection server.
//!
//! The server exposes two endpoints: `GET /classes` (the fixed class
//! catalog) and `POST /predict` (one JPEG data URL in, detections and
//! per-class stats out). Both are consumed as-is; the model behind them is
//! not this crate's concern.

mod client;
mod encode;

pub use client::{
    ClassStats, DetectClient, DetectError, Detection, PredictResponse, DEFAULT_SERVER_URL,
    DETECT_SERVER_ENV,
};
pub use encode::{frame_to_data_url, EncodeError, JPEG_QUALITY};
