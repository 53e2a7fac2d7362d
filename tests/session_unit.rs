//! Pure-logic tests for the session state: catalog, panel, overlay
//! geometry, and per-cycle outcome handling.

use std::collections::HashMap;

use live_detect::api::{ClassStats, Detection, DetectError, PredictResponse};
use live_detect::catalog::ClassCatalog;
use live_detect::event_loop::{apply_cycle, CycleError};
use live_detect::overlay::{layout_detections, BoxShape};
use live_detect::panel::ResultsPanel;
use live_detect::status::SessionStatus;

fn catalog(names: &[&str]) -> ClassCatalog {
    ClassCatalog::new(names.iter().map(|s| s.to_string()).collect())
}

fn stats(entries: &[(&str, f64)]) -> HashMap<String, ClassStats> {
    entries
        .iter()
        .map(|(name, avg)| {
            (
                name.to_string(),
                ClassStats {
                    avg_confidence: *avg,
                },
            )
        })
        .collect()
}

fn detection(x: f64, y: f64, w: f64, h: f64, class: &str, conf: f64) -> Detection {
    Detection {
        x,
        y,
        width: w,
        height: h,
        class_name: class.to_string(),
        confidence: conf,
    }
}

// === Panel / catalog invariants ===

#[test]
fn test_panel_row_count_matches_any_catalog_length() {
    for n in [1usize, 3, 7, 20] {
        let names: Vec<String> = (0..n).map(|i| format!("class-{}", i)).collect();
        let catalog = ClassCatalog::new(names.clone());
        let panel = ResultsPanel::new(&catalog);

        assert_eq!(panel.rows().len(), n);
        for (i, row) in panel.rows().iter().enumerate() {
            assert_eq!(row.name, names[i]);
        }
    }
}

#[test]
fn test_row_order_survives_partial_stats() {
    let mut panel = ResultsPanel::new(&catalog(&["a", "b", "c"]));
    // Only the middle class is detected; order must not change.
    panel.apply_stats(&stats(&[("b", 60.0)]));

    let names: Vec<&str> = panel.rows().iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b", "c"]);
    assert!(!panel.rows()[0].detected);
    assert!(panel.rows()[1].detected);
    assert!(!panel.rows()[2].detected);
}

#[test]
fn test_missing_class_resets_to_zero_and_flagged() {
    let mut panel = ResultsPanel::new(&catalog(&["cat", "dog"]));
    panel.apply_stats(&stats(&[("cat", 80.0), ("dog", 70.0)]));
    panel.apply_stats(&stats(&[("cat", 75.0)]));

    assert_eq!(panel.rows()[1].percent, 0);
    assert!(!panel.rows()[1].detected);
}

#[test]
fn test_fractional_average_rounds_for_text_and_bar() {
    let mut panel = ResultsPanel::new(&catalog(&["cat"]));
    panel.apply_stats(&stats(&[("cat", 73.4)]));

    // One value drives both the "73%" text and the 73% bar width.
    assert_eq!(panel.rows()[0].percent, 73);
}

// === Overlay geometry ===

#[test]
fn test_example_detection_geometry() {
    let shapes = layout_detections(&[detection(100.0, 100.0, 40.0, 20.0, "cat", 0.9)]);
    assert_eq!(shapes.len(), 1);

    let shape = &shapes[0];
    assert_eq!((shape.x, shape.y), (80.0, 90.0));
    assert_eq!((shape.width, shape.height), (40.0, 20.0));
    assert_eq!(shape.label, "cat 90%");
}

#[test]
fn test_empty_predictions_produce_no_shapes() {
    assert!(layout_detections(&[]).is_empty());
}

#[test]
fn test_overlapping_detections_keep_sequence_order() {
    let shapes = layout_detections(&[
        detection(50.0, 50.0, 40.0, 40.0, "under", 0.3),
        detection(55.0, 55.0, 40.0, 40.0, "over", 0.4),
    ]);
    assert!(shapes[0].label.starts_with("under"));
    assert!(shapes[1].label.starts_with("over"));
}

// === Cycle outcome handling ===

fn response(predictions: Vec<Detection>, class_stats: HashMap<String, ClassStats>) -> PredictResponse {
    PredictResponse {
        predictions,
        stats: class_stats,
    }
}

#[test]
fn test_successful_cycle_overwrites_state() {
    let mut shapes: Vec<BoxShape> = Vec::new();
    let mut panel = ResultsPanel::new(&catalog(&["cat"]));
    let mut status = SessionStatus::Detecting;

    apply_cycle(
        Ok(response(
            vec![detection(100.0, 100.0, 40.0, 20.0, "cat", 0.9)],
            stats(&[("cat", 90.0)]),
        )),
        &mut shapes,
        Some(&mut panel),
        &mut status,
    );

    assert_eq!(shapes.len(), 1);
    assert_eq!(panel.rows()[0].percent, 90);
    assert_eq!(status, SessionStatus::Detecting);
}

#[test]
fn test_failed_cycle_leaves_previous_state_untouched() {
    let mut shapes: Vec<BoxShape> = Vec::new();
    let mut panel = ResultsPanel::new(&catalog(&["cat"]));
    let mut status = SessionStatus::Detecting;

    // A good cycle first...
    apply_cycle(
        Ok(response(
            vec![detection(100.0, 100.0, 40.0, 20.0, "cat", 0.9)],
            stats(&[("cat", 90.0)]),
        )),
        &mut shapes,
        Some(&mut panel),
        &mut status,
    );
    let shapes_before = shapes.clone();
    let rows_before = panel.rows().to_vec();

    // ...then a simulated 500.
    apply_cycle(
        Err(CycleError::Predict(DetectError::ApiError(
            "Prediction request failed with status 500: inference failed".to_string(),
        ))),
        &mut shapes,
        Some(&mut panel),
        &mut status,
    );

    // Overlay and panel are untouched; only the status degrades.
    assert_eq!(shapes, shapes_before);
    assert_eq!(panel.rows(), rows_before.as_slice());
    assert_eq!(status, SessionStatus::CycleFailed);
    assert!(status.is_degraded());
}

#[test]
fn test_next_success_clears_degraded_status() {
    let mut shapes: Vec<BoxShape> = Vec::new();
    let mut panel = ResultsPanel::new(&catalog(&["cat"]));
    let mut status = SessionStatus::CycleFailed;

    apply_cycle(
        Ok(response(Vec::new(), HashMap::new())),
        &mut shapes,
        Some(&mut panel),
        &mut status,
    );

    assert_eq!(status, SessionStatus::Detecting);
    assert!(shapes.is_empty());
    assert!(!panel.rows()[0].detected);
}

#[test]
fn test_empty_cycle_clears_previous_shapes() {
    let mut shapes: Vec<BoxShape> = Vec::new();
    let mut panel = ResultsPanel::new(&catalog(&["cat"]));
    let mut status = SessionStatus::Detecting;

    apply_cycle(
        Ok(response(
            vec![detection(100.0, 100.0, 40.0, 20.0, "cat", 0.9)],
            stats(&[("cat", 90.0)]),
        )),
        &mut shapes,
        Some(&mut panel),
        &mut status,
    );
    assert_eq!(shapes.len(), 1);

    // Nothing detected this cycle: full redraw means no shapes remain and
    // the panel resets.
    apply_cycle(
        Ok(response(Vec::new(), HashMap::new())),
        &mut shapes,
        Some(&mut panel),
        &mut status,
    );
    assert!(shapes.is_empty());
    assert_eq!(panel.rows()[0].percent, 0);
    assert!(!panel.rows()[0].detected);
}

#[test]
fn test_cycle_without_panel_still_updates_shapes_and_status() {
    // Catalog failed at startup: no panel exists, but apply_cycle must not
    // panic if a stray response arrives.
    let mut shapes: Vec<BoxShape> = Vec::new();
    let mut status = SessionStatus::CatalogFailed;

    apply_cycle(
        Ok(response(
            vec![detection(10.0, 10.0, 4.0, 4.0, "cat", 0.5)],
            HashMap::new(),
        )),
        &mut shapes,
        None,
        &mut status,
    );

    assert_eq!(shapes.len(), 1);
    assert_eq!(status, SessionStatus::Detecting);
}
