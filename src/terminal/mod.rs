//! Terminal UI: lifecycle, half-block cell composition, and rendering.

mod cells;
mod raw_mode;
mod rendering;
mod tui;

pub use cells::{CellColor, VideoCell, VideoGrid, OVERLAY_COLOR};
pub use rendering::{render_results, render_session, render_status_bar, render_video, SessionView};
pub use tui::Tui;
