//! Camera feed handle and public capture API.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use super::capture_loop::run_capture_loop;
use super::device::list_devices;
use super::types::{CameraError, CameraSettings, Frame, Resolution};

/// Live camera feed.
///
/// A background thread continuously decodes frames into a shared
/// latest-frame slot. The prediction loop samples that slot once per cycle
/// via [`CameraFeed::latest_frame`]; the renderer samples it on every draw.
/// Dropping the feed stops the thread.
pub struct CameraFeed {
    /// Latest captured frame (shared with the capture thread)
    frame_buffer: Arc<Mutex<Option<Frame>>>,
    /// Capture thread handle
    capture_thread: Option<JoinHandle<()>>,
    /// Signal to stop the capture thread
    stop_signal: Arc<AtomicBool>,
    /// Settings used to open the device
    settings: CameraSettings,
    /// Resolution the driver actually negotiated (set after `start`)
    actual_resolution: Option<Resolution>,
}

impl std::fmt::Debug for CameraFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraFeed")
            .field("settings", &self.settings)
            .field("actual_resolution", &self.actual_resolution)
            .field("is_running", &self.is_running())
            .finish_non_exhaustive()
    }
}

impl CameraFeed {
    /// Open a camera feed with the given settings.
    ///
    /// Validates that the device index exists; the device itself is opened
    /// inside the background thread when [`CameraFeed::start`] is called.
    ///
    /// # Errors
    /// * `CameraError::DeviceNotFound` - if the device index doesn't exist
    pub fn open(settings: CameraSettings) -> Result<Self, CameraError> {
        let devices = list_devices()?;
        if !devices.iter().any(|d| d.index == settings.device_index) {
            return Err(CameraError::DeviceNotFound(settings.device_index));
        }

        Ok(Self {
            frame_buffer: Arc::new(Mutex::new(None)),
            capture_thread: None,
            stop_signal: Arc::new(AtomicBool::new(false)),
            settings,
            actual_resolution: None,
        })
    }

    /// Get the settings the feed was opened with.
    pub fn settings(&self) -> &CameraSettings {
        &self.settings
    }

    /// The resolution the driver actually delivers.
    ///
    /// `None` until the feed has been started. May be lower than the
    /// requested resolution; overlay coordinates are expressed against this
    /// size.
    pub fn actual_resolution(&self) -> Option<Resolution> {
        self.actual_resolution
    }

    /// Start capturing frames on a background thread.
    ///
    /// Blocks until the device reports its negotiated resolution or fails
    /// to open.
    ///
    /// # Errors
    /// * `CameraError::AlreadyRunning` - if capture is already running
    /// * `CameraError::PermissionDenied` - if camera access is denied
    /// * `CameraError::StreamFailed` / `CameraError::OpenFailed` - otherwise
    pub fn start(&mut self) -> Result<(), CameraError> {
        if self.is_running() {
            return Err(CameraError::AlreadyRunning);
        }

        self.stop_signal.store(false, Ordering::SeqCst);

        let buffer = Arc::clone(&self.frame_buffer);
        let stop = Arc::clone(&self.stop_signal);
        let settings = self.settings.clone();

        let (info_tx, info_rx) = mpsc::channel::<Result<Resolution, CameraError>>();

        let handle = std::thread::spawn(move || {
            run_capture_loop(settings, buffer, stop, info_tx);
        });
        self.capture_thread = Some(handle);

        match info_rx.recv() {
            Ok(Ok(resolution)) => {
                self.actual_resolution = Some(resolution);
                Ok(())
            }
            Ok(Err(e)) => {
                self.join_thread();
                Err(e)
            }
            Err(_) => {
                self.join_thread();
                Err(CameraError::StreamFailed(
                    "Capture thread terminated unexpectedly".to_string(),
                ))
            }
        }
    }

    /// Stop the capture thread and wait for it to finish.
    pub fn stop(&mut self) {
        self.join_thread();
    }

    /// Clone the newest captured frame, if any.
    ///
    /// `None` before the first frame arrives or when capture is not running.
    pub fn latest_frame(&self) -> Option<Frame> {
        let slot = self.frame_buffer.lock().ok()?;
        slot.clone()
    }

    /// Check whether the capture thread is currently running.
    pub fn is_running(&self) -> bool {
        self.capture_thread
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }

    fn join_thread(&mut self) {
        self.stop_signal.store(true, Ordering::SeqCst);
        if let Some(handle) = self.capture_thread.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for CameraFeed {
    fn drop(&mut self) {
        self.join_thread();
    }
}
