//! Webcam capture: device enumeration and background frame sampling.
//!
//! The feed runs on its own OS thread and keeps only the newest frame; the
//! session loop and renderer sample it at their own cadence.

mod capture;
mod capture_loop;
mod device;
mod frame_utils;
mod types;

pub use capture::CameraFeed;
pub use device::list_devices;
pub use frame_utils::{convert_to_rgb, mirror_horizontal};
pub use types::{CameraError, CameraInfo, CameraSettings, Frame, FrameFormat, Resolution};
