//! Overlay geometry: turning detections into drawable box shapes.
//!
//! All coordinates here are frame pixels. Mapping into terminal cells is the
//! renderer's job; keeping the geometry pure keeps it testable.

use crate::api::Detection;

/// Minimum label baseline, in frame pixels, when a box touches the top edge.
const LABEL_TOP_CLAMP: f64 = 20.0;

/// Gap between a box's top edge and its label baseline.
const LABEL_GAP: f64 = 8.0;

/// One drawable rectangle with its label, top-left based, in frame pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxShape {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Label text: class name plus rounded confidence percentage.
    pub label: String,
    /// Label anchor, aligned with the box's left edge.
    pub label_x: f64,
    /// Label baseline, clamped so it stays visible near the top edge.
    pub label_y: f64,
}

/// Format a detection label: `"{class} {confidence}%"` with the confidence
/// rounded to a whole percentage.
pub fn format_label(class_name: &str, confidence: f64) -> String {
    format!("{} {}%", class_name, (confidence * 100.0).round() as i64)
}

/// Convert one center-based detection into a top-left based box shape.
pub fn to_box_shape(detection: &Detection) -> BoxShape {
    let x = detection.x - detection.width / 2.0;
    let y = detection.y - detection.height / 2.0;

    let label_y = if y > LABEL_TOP_CLAMP {
        y - LABEL_GAP
    } else {
        LABEL_TOP_CLAMP
    };

    BoxShape {
        x,
        y,
        width: detection.width,
        height: detection.height,
        label: format_label(&detection.class_name, detection.confidence),
        label_x: x,
        label_y,
    }
}

/// Lay out all detections for one cycle.
///
/// Input order is preserved: the renderer draws first-in-sequence first, so
/// later shapes end up on top of earlier ones.
pub fn layout_detections(predictions: &[Detection]) -> Vec<BoxShape> {
    predictions.iter().map(to_box_shape).collect()
}
