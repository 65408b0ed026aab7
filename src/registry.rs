//! Board registry — a local mirror of the remote scene list.
//!
//! DESIGN
//! ======
//! The registry owns an ordered list of board items and keeps it consistent
//! with the remote scene store by convention, never by a transactional link:
//! every page of a board lives in the default directory under the name
//! `"<boardId>|<pageIndex>"`, and reconciliation is done by name-prefix
//! matching on demand. The registry holds only a non-owning reference back to
//! the hosting session; every operation re-checks that the session and its
//! room handle are still alive before touching anything.
//!
//! CONCURRENCY
//! ===========
//! `switch_board` and `destroy_board` each perform a remote read followed by
//! a conditional write. Those read-then-write sections are serialized through
//! a per-registry op gate so two in-flight calls cannot interleave
//! reconciliation. The item list itself sits behind a synchronous lock that
//! is never held across an await.

use std::sync::{Arc, PoisonError, RwLock, Weak};

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::delegate::BoardLog;
use crate::room::{RoomCommand, RoomHandle};
use crate::scene::{DEFAULT_DIR, Scene, SceneKey};
use crate::session::RoomSessionProxy;

// =============================================================================
// BOARD ITEMS
// =============================================================================

/// Whether a board item is the one currently displayed.
///
/// At most one item should be `Active` at a time; this is kept best-effort by
/// the switch pass, not enforced atomically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoardItemStatus {
    Active,
    Inactive,
}

/// Content type of a board item, derived once from the file-extension suffix
/// of its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoardItemType {
    Whiteboard,
    Ppt,
    Pptx,
    Doc,
    Pdf,
    Png,
    Jpg,
    Gif,
}

impl BoardItemType {
    /// Case-sensitive match against the closed set of known extensions.
    #[must_use]
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "whiteboard" => Some(Self::Whiteboard),
            "ppt" => Some(Self::Ppt),
            "pptx" => Some(Self::Pptx),
            "doc" => Some(Self::Doc),
            "pdf" => Some(Self::Pdf),
            "png" => Some(Self::Png),
            "jpg" => Some(Self::Jpg),
            "gif" => Some(Self::Gif),
            _ => None,
        }
    }
}

/// Derive a board item type from a path.
///
/// Empty path or no recognizable extension suffix falls back to
/// [`BoardItemType::Whiteboard`]. Empty dot-segments are dropped, so `".pdf"`
/// has a single segment and is a whiteboard.
#[must_use]
pub fn classify_path(path: &str) -> BoardItemType {
    if path.is_empty() {
        return BoardItemType::Whiteboard;
    }
    let segments: Vec<&str> = path.split('.').filter(|s| !s.is_empty()).collect();
    if segments.len() < 2 {
        return BoardItemType::Whiteboard;
    }
    segments
        .last()
        .and_then(|last| BoardItemType::from_extension(last))
        .unwrap_or(BoardItemType::Whiteboard)
}

/// Local record representing one addressable board mapped onto the remote
/// scene store. `id` and `name` both carry the caller-supplied path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardItem {
    pub id: String,
    pub name: String,
    pub status: BoardItemStatus,
    pub scale: f64,
    pub total_pages: usize,
    pub active_page: usize,
    pub kind: BoardItemType,
}

// =============================================================================
// REGISTRY
// =============================================================================

/// Ordered list of board items plus the operations keeping it consistent
/// with the remote scene store.
pub struct BoardRegistry {
    session: Weak<RoomSessionProxy>,
    list: RwLock<Vec<BoardItem>>,
    log: Arc<dyn BoardLog>,
    /// Serializes the read-then-write sections of switch/destroy.
    op_gate: Mutex<()>,
}

impl BoardRegistry {
    #[must_use]
    pub fn new(session: &Arc<RoomSessionProxy>, log: Arc<dyn BoardLog>) -> Self {
        Self {
            session: Arc::downgrade(session),
            list: RwLock::new(Vec::new()),
            log,
            op_gate: Mutex::new(()),
        }
    }

    /// Snapshot of the current item list.
    #[must_use]
    pub fn list(&self) -> Vec<BoardItem> {
        self.list.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Replace the item list wholesale. No validation.
    pub fn set_list(&self, items: Vec<BoardItem>) {
        *self.list.write().unwrap_or_else(PoisonError::into_inner) = items;
    }

    fn log(&self, text: &str) {
        self.log.log(text);
    }

    /// Connected room handle, if the session proxy is still alive and has
    /// one. Both "session torn down" and "not yet joined" count as gone.
    fn room(&self) -> Option<Arc<dyn RoomHandle>> {
        self.session.upgrade()?.room()
    }

    // =========================================================================
    // ADD
    // =========================================================================

    /// Register a new board and push its pages to the remote store.
    ///
    /// `path` is the unique identifier (a file name for documents); `scenes`
    /// is the page content. Returns `true` once the put command is issued —
    /// no confirmation is awaited. Returns `false` when the session is gone.
    ///
    /// The empty-input guard rejects only when `path` and `scenes` are *both*
    /// empty, reproducing the shipped behavior of the original helper.
    pub async fn add_board(&self, path: &str, scenes: &[Scene]) -> bool {
        let Some(room) = self.room() else {
            self.log("[I]: session is gone");
            return false;
        };
        if path.is_empty() && scenes.is_empty() {
            self.log("[E]: path or scenes of param is empty");
            return false;
        }

        let prefix = SceneKey::prefix(path);
        let prefixed: Vec<Scene> = scenes.iter().map(|s| s.prefixed(&prefix)).collect();

        let item = BoardItem {
            id: path.to_string(),
            name: path.to_string(),
            status: BoardItemStatus::Inactive,
            scale: 1.0,
            total_pages: prefixed.len(),
            active_page: 0,
            kind: classify_path(path),
        };
        self.list.write().unwrap_or_else(PoisonError::into_inner).push(item);

        room.execute(RoomCommand::PutScenes {
            dir: DEFAULT_DIR.to_string(),
            scenes: prefixed,
            index: usize::MAX,
        })
        .await;
        self.log(&format!("[I]: did put scenes at path:{path}"));
        true
    }

    // =========================================================================
    // SWITCH
    // =========================================================================

    /// Make page `page` of board `path` the displayed scene.
    ///
    /// Resolves `false` when the item is unknown locally, the session is
    /// gone, the directory fetch fails, or the remote store holds no scene
    /// named `"<path>|<page>"`. Resolves `true` only after every local item's
    /// status and active page have been reconciled.
    pub async fn switch_board(&self, path: &str, page: usize) -> bool {
        let _gate = self.op_gate.lock().await;
        self.switch_board_locked(path, page).await
    }

    /// Switch pass without the op gate; callers must already hold it.
    async fn switch_board_locked(&self, path: &str, page: usize) -> bool {
        let Some(room) = self.room() else {
            self.log("[I]: session is gone");
            return false;
        };
        let known = self
            .list
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|item| item.id == path);
        if !known {
            self.log(&format!("[E]: can not find item of path:{path}"));
            return false;
        }

        let directory = match room.entire_scenes().await {
            Ok(directory) => directory,
            Err(e) => {
                self.log(&format!("[E]: {e}"));
                return false;
            }
        };
        let Some(scenes) = directory.get(DEFAULT_DIR) else {
            return false;
        };

        let target = SceneKey::new(path, page).encode();
        let Some(index) = scenes.iter().position(|scene| scene.name == target) else {
            self.log(&format!("[E]: can not find target scene {target}"));
            let names: Vec<&str> = scenes.iter().map(|s| s.name.as_str()).collect();
            self.log(&format!("[E]: {names:?}"));
            return false;
        };

        room.execute(RoomCommand::SetMainSceneIndex { index }).await;
        self.log(&format!("[D]: did set main scene index {index}"));

        let mut list = self.list.write().unwrap_or_else(PoisonError::into_inner);
        for item in list.iter_mut() {
            if item.id == path {
                item.status = BoardItemStatus::Active;
                item.active_page = page;
            } else {
                item.status = BoardItemStatus::Inactive;
                item.active_page = 0;
            }
        }
        true
    }

    // =========================================================================
    // DESTROY
    // =========================================================================

    /// Remove board `path` locally and remotely; the inverse of
    /// [`Self::add_board`].
    ///
    /// When the board being destroyed is the active one and other items
    /// remain, the next item in list order (wrapping) is switched to first; a
    /// failed pre-switch is logged and destruction proceeds regardless.
    /// Resolves `true` once the removal pass finishes, even when nothing
    /// matched. Resolves `false` without running the pass when the session is
    /// gone or the directory fetch fails.
    pub async fn destroy_board(&self, path: &str) -> bool {
        let _gate = self.op_gate.lock().await;

        let Some(room) = self.room() else {
            self.log("[I]: session is gone");
            return false;
        };
        let directory = match room.entire_scenes().await {
            Ok(directory) => directory,
            Err(e) => {
                self.log(&format!("[E]: {e}"));
                return false;
            }
        };
        let Some(scenes) = directory.get(DEFAULT_DIR) else {
            return false;
        };

        let prefix = SceneKey::prefix(path);
        let removals: Vec<String> = scenes
            .iter()
            .filter(|scene| scene.name.starts_with(&prefix))
            .map(|scene| scene.name.clone())
            .collect();

        if let Some(next_path) = self.next_board_after_active(path) {
            if !self.switch_board_locked(&next_path, 0).await {
                self.log("[E]: switch to next board failed");
            }
        }

        for name in removals {
            room.execute(RoomCommand::RemoveScenes { path: format!("{DEFAULT_DIR}{name}") }).await;
            if let Some(key) = SceneKey::decode(&name) {
                self.list
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .retain(|item| item.id != key.board_id);
            }
        }
        true
    }

    /// When `path` is the active item and at least one other item exists,
    /// the id of the next item in list order (wrapping to the front).
    fn next_board_after_active(&self, path: &str) -> Option<String> {
        let list = self.list.read().unwrap_or_else(PoisonError::into_inner);
        let (position, active) = list
            .iter()
            .enumerate()
            .find(|(_, item)| item.status == BoardItemStatus::Active)?;
        if active.name != path || list.len() < 2 {
            return None;
        }
        let next = if position == list.len() - 1 { 0 } else { position + 1 };
        Some(list[next].name.clone())
    }
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;
