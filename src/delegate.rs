//! Application-facing sinks: session delegate, view overlay, log collaborator.
//!
//! All three are one-way. Nothing here returns a value to the adapter, and no
//! call is retried or buffered.

use crate::error::SessionError;
use crate::room::{Appliance, Color, SceneState, SessionPhase, ShapeKind};

/// Receiver for session lifecycle events.
pub trait SessionDelegate: Send + Sync {
    fn phase_changed(&self, phase: SessionPhase);
    fn session_error(&self, error: &SessionError);
    fn kicked(&self, reason: &str);
}

/// Sink for UI-state pushes to the view overlay.
pub trait BoardOverlay: Send + Sync {
    /// Initial tool selection right after join. `None` when the room state
    /// carries no member state yet.
    fn update_init_appliance(&self, appliance: Option<Appliance>, shape: Option<ShapeKind>);
    fn update_scene_state(&self, state: &SceneState);
    fn update_stroke_width(&self, width: f32);
    fn update_stroke_color(&self, color: Color);
    fn update_undo_enable(&self, enabled: bool);
    fn update_redo_enable(&self, enabled: bool);
}

/// Single-method log sink. Severity rides inside the text by prefix
/// convention: `[I]` info, `[E]` error, `[D]` debug.
pub trait BoardLog: Send + Sync {
    fn log(&self, text: &str);
}

/// [`BoardLog`] adapter onto `tracing`, routing on the prefix convention.
pub struct TracingLog;

impl BoardLog for TracingLog {
    fn log(&self, text: &str) {
        if let Some(rest) = text.strip_prefix("[E]") {
            tracing::error!("{}", rest.trim_start_matches([':', ' ']));
        } else if let Some(rest) = text.strip_prefix("[D]") {
            tracing::debug!("{}", rest.trim_start_matches([':', ' ']));
        } else {
            tracing::info!("{}", text.strip_prefix("[I]").unwrap_or(text).trim_start_matches([':', ' ']));
        }
    }
}
