//! Async session loop for the detection viewer.
//!
//! One `tokio::select!` loop multiplexes four concerns: keyboard input via
//! the crossterm event stream, the fixed prediction interval, completed
//! prediction cycles arriving on an mpsc channel, and a render tick that
//! keeps the video view live between cycles.
//!
//! Prediction ticks never overlap: if a cycle is still in flight when the
//! interval fires, the tick is skipped. Responses therefore apply in send
//! order even on a slow network. In-flight requests are never aborted; a
//! quit simply leaves the last task to finish detached.

use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use crate::api::{self, DetectClient, DetectError, EncodeError, PredictResponse};
use crate::camera::{CameraFeed, Frame};
use crate::catalog::ClassCatalog;
use crate::overlay::{self, BoxShape};
use crate::panel::ResultsPanel;
use crate::status::SessionStatus;
use crate::terminal::{SessionView, Tui};

/// How often the video view redraws between prediction cycles.
const RENDER_INTERVAL: Duration = Duration::from_millis(100);

/// Options for one detection session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Interval between prediction cycles.
    pub interval: Duration,
    /// Whether the bottom status bar is drawn.
    pub show_status_bar: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            show_status_bar: true,
        }
    }
}

/// Errors that can occur in one prediction cycle.
///
/// Cycle errors are terminal for the cycle only: the loop logs them,
/// degrades the status indicator, and keeps ticking.
#[derive(Debug, thiserror::Error)]
pub enum CycleError {
    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Predict(#[from] DetectError),
}

/// Errors that end the session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Run the session loop until the user quits or the event stream closes.
///
/// Without a catalog the prediction interval never arms; the loop still
/// shows the live camera view with the results area in its empty state.
pub async fn run(
    tui: &mut Tui,
    camera: &CameraFeed,
    client: DetectClient,
    catalog: Option<ClassCatalog>,
    options: SessionOptions,
) -> Result<(), SessionError> {
    let mut event_stream = EventStream::new();

    let mut predict_tick = tokio::time::interval(options.interval);
    predict_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut render_tick = tokio::time::interval(RENDER_INTERVAL);
    render_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let detect_enabled = catalog.is_some();
    let mut panel = catalog.as_ref().map(ResultsPanel::new);
    let mut shapes: Vec<BoxShape> = Vec::new();
    let mut status = if detect_enabled {
        SessionStatus::Detecting
    } else {
        SessionStatus::CatalogFailed
    };

    // Completed cycles come back over this channel; `in_flight` is the
    // skip-if-busy guard.
    let (result_tx, mut result_rx) = mpsc::channel::<Result<PredictResponse, CycleError>>(1);
    let mut in_flight = false;

    let server = client.base_url().to_string();

    loop {
        let frame = camera.latest_frame();
        let frame_dims = camera
            .actual_resolution()
            .map(|r| (r.width, r.height))
            .or_else(|| frame.as_ref().map(|f| (f.width, f.height)))
            .unwrap_or((0, 0));

        let view = SessionView {
            frame: frame.as_ref(),
            frame_dims,
            shapes: &shapes,
            panel: panel.as_ref(),
            status,
            server: &server,
            show_status_bar: options.show_status_bar,
        };
        tui.draw_session(&view)?;

        tokio::select! {
            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) => {
                        if key.kind == KeyEventKind::Press && is_quit_key(&key) {
                            break;
                        }
                    }
                    Some(Ok(_)) => {
                        // Resize and the rest are absorbed by the next draw.
                    }
                    Some(Err(e)) => return Err(SessionError::Io(e)),
                    None => break,
                }
            }

            _ = predict_tick.tick(), if detect_enabled => {
                if in_flight {
                    log::debug!("prediction still in flight, skipping tick");
                } else if let Some(frame) = camera.latest_frame() {
                    in_flight = true;
                    let client = client.clone();
                    let tx = result_tx.clone();
                    tokio::spawn(async move {
                        let _ = tx.send(run_cycle(client, frame).await).await;
                    });
                } else {
                    log::debug!("no camera frame captured yet, skipping tick");
                }
            }

            maybe_outcome = result_rx.recv() => {
                if let Some(outcome) = maybe_outcome {
                    in_flight = false;
                    apply_cycle(outcome, &mut shapes, panel.as_mut(), &mut status);
                }
            }

            _ = render_tick.tick() => {
                // Redraw happens at the top of the loop.
            }
        }
    }

    Ok(())
}

/// One prediction cycle: encode the frame and send it to the server.
async fn run_cycle(client: DetectClient, frame: Frame) -> Result<PredictResponse, CycleError> {
    let image = api::frame_to_data_url(&frame)?;
    Ok(client.predict(image).await?)
}

/// Apply one cycle's outcome to the session state.
///
/// A failed cycle keeps the previous overlay shapes and panel rows on
/// screen; only the status indicator degrades. The next successful cycle
/// overwrites everything and clears the indicator.
pub fn apply_cycle(
    outcome: Result<PredictResponse, CycleError>,
    shapes: &mut Vec<BoxShape>,
    panel: Option<&mut ResultsPanel>,
    status: &mut SessionStatus,
) {
    match outcome {
        Ok(response) => {
            *shapes = overlay::layout_detections(&response.predictions);
            if let Some(panel) = panel {
                panel.apply_stats(&response.stats);
            }
            *status = SessionStatus::Detecting;
        }
        Err(e) => {
            log::warn!("prediction cycle failed: {}", e);
            *status = SessionStatus::CycleFailed;
        }
    }
}

fn is_quit_key(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}
