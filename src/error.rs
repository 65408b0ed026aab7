//! Typed session errors.
//!
//! Failures are communicated by return value and delegate callback, never by
//! panic. Each error carries an origin tag plus free-form diagnostic fields,
//! mirroring what the SDK reports.

use std::collections::HashMap;
use std::fmt;

use crate::room::RemoteError;

/// Where a session error originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionErrorKind {
    JoinRoom,
    SetupSdk,
    Disconnected,
}

impl SessionErrorKind {
    /// Grepable error code for logs and delegates.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::JoinRoom => "E_JOIN_ROOM",
            Self::SetupSdk => "E_SETUP_SDK",
            Self::Disconnected => "E_DISCONNECTED",
        }
    }
}

impl fmt::Display for SessionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A session-level failure reported to the delegate and/or returned from
/// [`crate::session::RoomSessionProxy::join`].
#[derive(Debug, Clone)]
pub struct SessionError {
    pub kind: SessionErrorKind,
    /// Free-form diagnostic payload.
    pub info: HashMap<String, String>,
    pub source: Option<RemoteError>,
}

impl SessionError {
    /// Wrap a remote failure under the given origin tag.
    #[must_use]
    pub fn remote(kind: SessionErrorKind, source: RemoteError) -> Self {
        Self { kind, info: HashMap::new(), source: Some(source) }
    }

    /// Synthesize an error with a single diagnostic field and no remote
    /// source.
    #[must_use]
    pub fn with_info(kind: SessionErrorKind, key: &str, value: impl Into<String>) -> Self {
        let mut info = HashMap::new();
        info.insert(key.to_string(), value.into());
        Self { kind, info, source: None }
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }
        for (key, value) in &self.info {
            write!(f, " {key}={value}")?;
        }
        Ok(())
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|source| source as _)
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
