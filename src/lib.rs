//! `boardsync` — adapter between an application UI and a whiteboard room SDK.
//!
//! ARCHITECTURE
//! ============
//! The external SDK owns rendering, scene synchronization, and the realtime
//! collaboration protocol. This crate owns none of that: it keeps a local
//! list of board items in sync with a remote scene store addressed by
//! delimited string names (`"<boardId>|<pageIndex>"`), and relays room
//! lifecycle events to application delegates.
//!
//! Two components:
//! - [`BoardRegistry`] — an ordered list of board items plus the
//!   add/switch/destroy operations that keep it consistent with the remote
//!   scene store.
//! - [`RoomSessionProxy`] — wraps the remote session backend, runs the
//!   join/connect sequence, and fans out phase/state/kick/undo/redo events.
//!
//! DESIGN
//! ======
//! The SDK surface is modeled as trait seams ([`RoomHandle`],
//! [`SessionBackend`], [`SessionDelegate`], [`BoardOverlay`], [`BoardLog`]) so
//! the adapter can be exercised against mocks. Remote mutations flow through
//! a single fire-and-forget command channel ([`RoomCommand`]); the only
//! remote read is the full scene directory fetch. Reconciliation between the
//! local list and the remote store is done by name-prefix matching on demand,
//! never by a transactional link.

pub mod delegate;
pub mod error;
pub mod registry;
pub mod room;
pub mod scene;
pub mod session;

pub use delegate::{BoardLog, BoardOverlay, SessionDelegate, TracingLog};
pub use error::{SessionError, SessionErrorKind};
pub use registry::{BoardItem, BoardItemStatus, BoardItemType, BoardRegistry, classify_path};
pub use room::{
    Appliance, Color, MemberState, RemoteError, RoomCommand, RoomConfig, RoomEvent, RoomHandle,
    RoomState, RoomStateDelta, SceneState, SessionBackend, SessionPhase, ShapeKind,
};
pub use scene::{DEFAULT_DIR, PptPage, Scene, SceneDirectory, SceneKey};
pub use session::RoomSessionProxy;
