//! Room SDK seams — the call contract consumed from the external SDK.
//!
//! DESIGN
//! ======
//! Nothing in this module is implemented here: [`SessionBackend`] and
//! [`RoomHandle`] describe the remote session backend and the connected room
//! it hands back. Mutations all flow through one generic fire-and-forget
//! command channel ([`RoomHandle::execute`]); the only remote read is
//! [`RoomHandle::entire_scenes`]. Events fire back through [`RoomEvent`],
//! delivered on an unspecified context and relayed by the session proxy.
//! No retry, no buffering: a dropped event is lost.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::scene::{Scene, SceneDirectory};

// =============================================================================
// CONFIG
// =============================================================================

/// Parameters for joining a room, supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomConfig {
    /// Room identifier issued by the SDK vendor.
    pub uuid: String,
    /// Room access token.
    pub token: String,
    /// Local user identifier.
    pub uid: String,
    /// Optional service region hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl RoomConfig {
    #[must_use]
    pub fn new(uuid: impl Into<String>, token: impl Into<String>, uid: impl Into<String>) -> Self {
        Self { uuid: uuid.into(), token: token.into(), uid: uid.into(), region: None }
    }
}

// =============================================================================
// COMMANDS
// =============================================================================

/// Remote mutation issued through the generic command channel.
///
/// Commands are fire-and-forget: no confirmation is returned and none is
/// awaited by callers.
#[derive(Debug, Clone, PartialEq)]
pub enum RoomCommand {
    /// Insert scenes into a directory. `index == usize::MAX` appends at the
    /// end of the directory.
    PutScenes { dir: String, scenes: Vec<Scene>, index: usize },
    /// Remove a single scene by its full path (`"<dir><name>"`).
    RemoveScenes { path: String },
    /// Make the scene at the given directory position the displayed one.
    SetMainSceneIndex { index: usize },
    /// Toggle state serialization on the room. Undo/redo step events only
    /// fire while serialization is enabled, so the join sequence issues
    /// `disabled: false`.
    DisableSerialization { disabled: bool },
}

// =============================================================================
// ERRORS
// =============================================================================

/// Opaque failure from a remote SDK call. The SDK reports free-form
/// diagnostics; this layer carries them through unparsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("remote call failed: {0}")]
pub struct RemoteError(pub String);

impl RemoteError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

// =============================================================================
// ROOM STATE
// =============================================================================

/// Drawing tool currently selected in the room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Appliance {
    Clicker,
    Selector,
    Pencil,
    Text,
    Eraser,
    Rectangle,
    Ellipse,
    Straight,
    Arrow,
    Hand,
    LaserPointer,
    Shape,
}

/// Shape variant when the appliance is [`Appliance::Shape`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShapeKind {
    Triangle,
    Rhombus,
    Pentagram,
    SpeechBalloon,
}

/// RGB stroke color as the SDK reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Per-member tool state readable from a connected room.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemberState {
    pub current_appliance: Option<Appliance>,
    pub shape: Option<ShapeKind>,
    pub stroke_width: Option<f32>,
    pub stroke_color: Option<Color>,
}

/// Which scene the room currently displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneState {
    /// Full path of the displayed scene.
    pub scene_path: String,
    /// Position of the displayed scene in its directory.
    pub index: usize,
}

/// Full room state snapshot, readable once after join.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoomState {
    pub member_state: Option<MemberState>,
    pub scene_state: Option<SceneState>,
}

/// Partial room-state update fired by the SDK. Only the scene state is
/// relayed onward; other fields of the SDK delta are ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoomStateDelta {
    pub scene_state: Option<SceneState>,
}

// =============================================================================
// LIFECYCLE
// =============================================================================

/// Session lifecycle phase.
///
/// `Idle -> Connecting -> {Connected, Failed}`; a connected session ends at
/// `Disconnected` or `Kicked`, both terminal. There is no reconnection: a new
/// join starts a fresh `Connecting` regardless of prior phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    Idle,
    Connecting,
    Connected,
    Failed,
    Disconnected,
    Kicked,
}

/// Asynchronous event fired by the SDK for a joined room.
#[derive(Debug, Clone, PartialEq)]
pub enum RoomEvent {
    PhaseChanged(SessionPhase),
    StateChanged(RoomStateDelta),
    Disconnected { reason: String },
    Kicked { reason: String },
    SdkSetupFailed { reason: String },
    /// Number of steps currently undoable.
    UndoStepsUpdated(usize),
    /// Number of steps currently redoable.
    RedoStepsUpdated(usize),
}

// =============================================================================
// TRAIT SEAMS
// =============================================================================

/// A connected room. Obtained from [`SessionBackend::join`]; all scene
/// commands the registry issues go through this handle.
#[async_trait::async_trait]
pub trait RoomHandle: Send + Sync {
    /// Issue a fire-and-forget remote mutation.
    async fn execute(&self, command: RoomCommand);

    /// Fetch the entire scene directory listing.
    ///
    /// # Errors
    ///
    /// Returns a [`RemoteError`] when the fetch fails remotely.
    async fn entire_scenes(&self) -> Result<SceneDirectory, RemoteError>;

    /// Current room state snapshot.
    fn state(&self) -> RoomState;
}

/// The remote session backend. Enables mocking in tests.
#[async_trait::async_trait]
pub trait SessionBackend: Send + Sync {
    /// Join a room.
    ///
    /// `Ok(None)` mirrors the SDK's "success without a room handle" case; the
    /// session proxy turns it into a typed join failure.
    ///
    /// # Errors
    ///
    /// Returns a [`RemoteError`] when the join fails remotely.
    async fn join(&self, config: &RoomConfig) -> Result<Option<Arc<dyn RoomHandle>>, RemoteError>;
}

// =============================================================================
// TEST HELPERS
// =============================================================================
