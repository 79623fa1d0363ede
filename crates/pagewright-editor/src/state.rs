use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle of an editing session
///
/// `Loading -> Ready <-> Dirty -> Saving -> Ready`, with `Saving -> Error`
/// recoverable back to `Dirty`. `LoadFailed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionState {
    Loading,
    Ready,
    Dirty,
    Saving,
    Error,
    LoadFailed,
}

impl SessionState {
    /// Whether in-memory mutations are accepted
    pub fn accepts_edits(self) -> bool {
        matches!(
            self,
            SessionState::Ready | SessionState::Dirty | SessionState::Error
        )
    }

    /// Whether the buffer holds edits not yet durable
    pub fn has_unsaved_edits(self) -> bool {
        matches!(
            self,
            SessionState::Dirty | SessionState::Saving | SessionState::Error
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SessionState::Loading => "loading",
            SessionState::Ready => "ready",
            SessionState::Dirty => "dirty",
            SessionState::Saving => "saving",
            SessionState::Error => "error",
            SessionState::LoadFailed => "loadFailed",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
