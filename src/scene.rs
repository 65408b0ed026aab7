//! Scene naming — the `"<boardId>|<pageIndex>"` convention.
//!
//! DESIGN
//! ======
//! The remote store only knows opaque scene names. This layer imposes a
//! delimited naming convention on top so that every page of a board can be
//! located by string prefix. Internally the convention is handled through
//! [`SceneKey`], a structured key; the wire-level string form is preserved
//! exactly. Decoding splits on the *last* delimiter, so a board id that
//! itself contains `|` still round-trips.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Root path under which all scenes live in the remote store.
pub const DEFAULT_DIR: &str = "/";

/// Delimiter between board id and page index in a scene name.
pub const SCENE_DIVIDER: char = '|';

/// Full remote directory listing: directory path -> ordered scenes.
pub type SceneDirectory = HashMap<String, Vec<Scene>>;

// =============================================================================
// SCENE
// =============================================================================

/// One page of a document shown on the whiteboard, when the scene carries
/// converted file content rather than free drawing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PptPage {
    pub src: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
    pub width: f64,
    pub height: f64,
}

/// One page of a board item, as represented in the remote store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ppt: Option<PptPage>,
}

impl Scene {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ppt: None }
    }

    #[must_use]
    pub fn with_ppt(name: impl Into<String>, ppt: PptPage) -> Self {
        Self { name: name.into(), ppt: Some(ppt) }
    }

    /// Copy of this scene with the given prefix prepended to its name.
    /// Used to place a board's pages under its id in the remote store.
    #[must_use]
    pub fn prefixed(&self, prefix: &str) -> Scene {
        Scene { name: format!("{prefix}{}", self.name), ppt: self.ppt.clone() }
    }
}

// =============================================================================
// SCENE KEY
// =============================================================================

/// Structured form of a remote scene name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SceneKey {
    pub board_id: String,
    pub page: usize,
}

impl SceneKey {
    #[must_use]
    pub fn new(board_id: impl Into<String>, page: usize) -> Self {
        Self { board_id: board_id.into(), page }
    }

    /// Wire-level scene name, `"<boardId>|<page>"`.
    #[must_use]
    pub fn encode(&self) -> String {
        format!("{}{}{}", self.board_id, SCENE_DIVIDER, self.page)
    }

    /// Parse a wire-level scene name. Returns `None` when the name carries
    /// no delimiter or the trailing segment is not a page index.
    #[must_use]
    pub fn decode(name: &str) -> Option<SceneKey> {
        let (board_id, page) = name.rsplit_once(SCENE_DIVIDER)?;
        let page = page.parse().ok()?;
        Some(SceneKey { board_id: board_id.to_string(), page })
    }

    /// Name prefix shared by every page of the given board, `"<boardId>|"`.
    #[must_use]
    pub fn prefix(board_id: &str) -> String {
        format!("{board_id}{SCENE_DIVIDER}")
    }
}

impl fmt::Display for SceneKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.board_id, SCENE_DIVIDER, self.page)
    }
}

#[cfg(test)]
#[path = "scene_test.rs"]
mod tests;
