//! Room session proxy — join sequence, phase tracking, event fan-out.
//!
//! DESIGN
//! ======
//! [`RoomSessionProxy`] wraps the remote session backend. `join` runs the
//! connect sequence and stores the room handle; everything afterwards is
//! one-way relay: SDK events arrive through [`RoomEvent`] and are mapped onto
//! the application delegate or the view overlay. A dropped event is lost —
//! there is no retry and no buffering beyond the relay channel itself.
//!
//! ERROR HANDLING
//! ==============
//! Join failures are wrapped as [`SessionError`] with the `JoinRoom` origin
//! tag and reported to both the delegate and the caller. Disconnects and SDK
//! setup failures arrive as events and are reported to the delegate only.

use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::delegate::{BoardOverlay, SessionDelegate};
use crate::error::{SessionError, SessionErrorKind};
use crate::room::{RoomCommand, RoomConfig, RoomEvent, RoomHandle, SessionBackend, SessionPhase};

/// Wraps a remote session and exposes a single room handle once connected.
pub struct RoomSessionProxy {
    backend: Arc<dyn SessionBackend>,
    config: RoomConfig,
    delegate: Arc<dyn SessionDelegate>,
    overlay: Arc<dyn BoardOverlay>,
    room: RwLock<Option<Arc<dyn RoomHandle>>>,
    phase: RwLock<SessionPhase>,
}

impl RoomSessionProxy {
    #[must_use]
    pub fn new(
        backend: Arc<dyn SessionBackend>,
        config: RoomConfig,
        delegate: Arc<dyn SessionDelegate>,
        overlay: Arc<dyn BoardOverlay>,
    ) -> Arc<Self> {
        Arc::new(Self {
            backend,
            config,
            delegate,
            overlay,
            room: RwLock::new(None),
            phase: RwLock::new(SessionPhase::Idle),
        })
    }

    /// The connected room handle, if any.
    #[must_use]
    pub fn room(&self) -> Option<Arc<dyn RoomHandle>> {
        self.room.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        *self.phase.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_phase(&self, phase: SessionPhase) {
        *self.phase.write().unwrap_or_else(PoisonError::into_inner) = phase;
    }

    // =========================================================================
    // JOIN
    // =========================================================================

    /// Run the connect/join sequence against the backend.
    ///
    /// Reports `Connecting` to the delegate first; a new call starts a fresh
    /// connecting phase irrespective of prior state. On success the room
    /// handle is stored, serialization is disabled on it, and the full
    /// initial UI state is pushed to the overlay.
    ///
    /// # Errors
    ///
    /// Returns a [`SessionError`] with the `JoinRoom` tag when the backend
    /// join fails or reports success without a room handle. The same error is
    /// reported to the delegate before returning.
    pub async fn join(&self) -> Result<Arc<dyn RoomHandle>, SessionError> {
        self.set_phase(SessionPhase::Connecting);
        self.delegate.phase_changed(SessionPhase::Connecting);
        info!(room = %self.config.uuid, "joining room");

        match self.backend.join(&self.config).await {
            Err(remote) => {
                self.set_phase(SessionPhase::Failed);
                let err = SessionError::remote(SessionErrorKind::JoinRoom, remote);
                error!(code = err.kind.code(), %err, "room join failed");
                self.delegate.session_error(&err);
                Err(err)
            }
            Ok(None) => {
                self.set_phase(SessionPhase::Failed);
                let err = SessionError::with_info(
                    SessionErrorKind::JoinRoom,
                    "info",
                    "join succeeded without a room handle",
                );
                error!(code = err.kind.code(), %err, "room join failed");
                self.delegate.session_error(&err);
                Err(err)
            }
            Ok(Some(room)) => {
                *self.room.write().unwrap_or_else(PoisonError::into_inner) = Some(room.clone());
                room.execute(RoomCommand::DisableSerialization { disabled: false }).await;
                self.push_initial_state(room.as_ref());
                info!(room = %self.config.uuid, "room joined");
                Ok(room)
            }
        }
    }

    /// Re-derive the full initial UI state from the room and push it to the
    /// overlay.
    fn push_initial_state(&self, room: &dyn RoomHandle) {
        let state = room.state();

        match &state.member_state {
            Some(member) => self.overlay.update_init_appliance(member.current_appliance, member.shape),
            None => self.overlay.update_init_appliance(None, None),
        }

        if let Some(scene) = &state.scene_state {
            self.overlay.update_scene_state(scene);
        }

        if let Some(member) = &state.member_state {
            if let Some(width) = member.stroke_width {
                self.overlay.update_stroke_width(width);
            }
            if let Some(color) = member.stroke_color {
                self.overlay.update_stroke_color(color);
            }
        }
    }

    // =========================================================================
    // EVENT RELAY
    // =========================================================================

    /// Map one SDK event onto the delegate or the overlay.
    pub fn handle_event(&self, event: RoomEvent) {
        match event {
            RoomEvent::PhaseChanged(phase) => {
                self.set_phase(phase);
                self.delegate.phase_changed(phase);
            }
            RoomEvent::StateChanged(delta) => {
                if let Some(scene) = delta.scene_state {
                    self.overlay.update_scene_state(&scene);
                }
            }
            RoomEvent::Disconnected { reason } => {
                self.set_phase(SessionPhase::Disconnected);
                let err = SessionError::with_info(SessionErrorKind::Disconnected, "info", reason);
                self.delegate.session_error(&err);
            }
            RoomEvent::SdkSetupFailed { reason } => {
                let err = SessionError::with_info(SessionErrorKind::SetupSdk, "info", reason);
                self.delegate.session_error(&err);
            }
            RoomEvent::Kicked { reason } => {
                self.set_phase(SessionPhase::Kicked);
                self.delegate.kicked(&reason);
            }
            RoomEvent::UndoStepsUpdated(steps) => {
                self.overlay.update_undo_enable(steps > 0);
            }
            RoomEvent::RedoStepsUpdated(steps) => {
                self.overlay.update_redo_enable(steps > 0);
            }
        }
    }

    /// Drain a backend event channel onto [`Self::handle_event`] until the
    /// sender side closes.
    pub fn spawn_relay(self: &Arc<Self>, mut events: mpsc::Receiver<RoomEvent>) -> JoinHandle<()> {
        let proxy = Arc::clone(self);
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                proxy.handle_event(event);
            }
        })
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
