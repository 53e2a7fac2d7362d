//! Session status shown in the status bar.

/// Health state of the detection session.
///
/// Camera and catalog setup finish before the TUI opens, so the session
/// starts in either `Detecting` or `CatalogFailed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// Prediction loop running normally.
    Detecting,
    /// Class catalog failed to load; the prediction loop never started.
    /// Sticky for the rest of the session.
    CatalogFailed,
    /// The most recent prediction cycle failed. Cleared by the next
    /// successful cycle.
    CycleFailed,
}

impl SessionStatus {
    /// Status bar text.
    pub fn text(&self) -> &'static str {
        match self {
            SessionStatus::Detecting => "detecting",
            SessionStatus::CatalogFailed => "model unavailable",
            SessionStatus::CycleFailed => "prediction failed",
        }
    }

    /// Whether the indicator dot shows the error color.
    pub fn is_degraded(&self) -> bool {
        matches!(
            self,
            SessionStatus::CatalogFailed | SessionStatus::CycleFailed
        )
    }
}
