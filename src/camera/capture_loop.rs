//! Background capture thread implementation.

use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{
    CameraFormat, CameraIndex, FrameFormat as NokhwaFrameFormat, RequestedFormat,
    RequestedFormatType,
};
use nokhwa::Camera;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use super::frame_utils::{convert_to_rgb, mirror_horizontal};
use super::types::{CameraError, CameraSettings, Frame, Resolution};

/// Run the capture loop on a background thread.
///
/// Opens the device, reports the negotiated resolution (or the open error)
/// over `info_tx` exactly once, then keeps the shared buffer topped up with
/// the newest decoded frame until `stop` is raised.
pub(super) fn run_capture_loop(
    settings: CameraSettings,
    buffer: Arc<Mutex<Option<Frame>>>,
    stop: Arc<AtomicBool>,
    info_tx: Sender<Result<Resolution, CameraError>>,
) {
    let index = CameraIndex::Index(settings.device_index);

    let mut camera = match open_with_fallback(&index, &settings) {
        Ok(cam) => cam,
        Err(e) => {
            let _ = info_tx.send(Err(e));
            return;
        }
    };

    if let Err(e) = camera.open_stream() {
        let _ = info_tx.send(Err(CameraError::StreamFailed(e.to_string())));
        return;
    }

    let res = camera.resolution();
    let _ = info_tx.send(Ok(Resolution {
        width: res.width(),
        height: res.height(),
    }));

    while !stop.load(Ordering::Relaxed) {
        if let Ok(raw_frame) = camera.frame() {
            // Undecodable frames are skipped; the next one usually succeeds.
            if let Some(mut frame) = convert_to_rgb(&raw_frame) {
                if settings.mirror {
                    mirror_horizontal(&mut frame);
                }
                if let Ok(mut slot) = buffer.lock() {
                    *slot = Some(frame);
                }
            }
        }

        // Brief yield so the stop flag is observed promptly.
        thread::sleep(Duration::from_millis(5));
    }

    let _ = camera.stop_stream();
}

/// Open the camera, preferring the requested resolution and degrading
/// gracefully.
///
/// Attempts, in order: closest MJPEG match, closest YUYV match, then whatever
/// highest-resolution format the device offers.
fn open_with_fallback(
    index: &CameraIndex,
    settings: &CameraSettings,
) -> Result<Camera, CameraError> {
    let requested_res =
        nokhwa::utils::Resolution::new(settings.resolution.width, settings.resolution.height);

    let attempts: Vec<RequestedFormat> = vec![
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(CameraFormat::new(
            requested_res,
            NokhwaFrameFormat::MJPEG,
            settings.fps,
        ))),
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(CameraFormat::new(
            requested_res,
            NokhwaFrameFormat::YUYV,
            settings.fps,
        ))),
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestResolution),
    ];

    let mut last_error = None;
    for requested in attempts {
        match Camera::new(index.clone(), requested) {
            Ok(cam) => return Ok(cam),
            Err(e) => last_error = Some(e),
        }
    }

    match last_error {
        Some(e) => Err(classify_open_error(&e.to_string())),
        None => Err(CameraError::OpenFailed("no formats attempted".to_string())),
    }
}

/// Distinguish permission failures from other open failures.
///
/// Backends report denial in free-form text, so this is a keyword match.
fn classify_open_error(message: &str) -> CameraError {
    let lower = message.to_lowercase();
    let denied = ["permission", "denied", "authorization", "access"]
        .iter()
        .any(|kw| lower.contains(kw));

    if denied {
        CameraError::PermissionDenied
    } else {
        CameraError::OpenFailed(message.to_string())
    }
}
