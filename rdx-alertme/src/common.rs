//! Contains common, primitive types shared across the scheduler.
//!
//! Sessions are identified by a small, monotonically increasing number so that
//! display effects, lifecycle events and statistics can all refer to the same
//! rest period without sharing any state.

use serde::Serialize;
use std::fmt;

/// Uniquely identifies one rest session within the lifetime of a scheduler.
///
/// Ids start at 1 and are never reused, so a stale id can always be told
/// apart from the session that is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SessionId(pub u64);

impl SessionId {
    /// The id that follows this one.
    pub(crate) fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What caused a rest session to begin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionTrigger {
    /// The cycle timer elapsed.
    Timer,
    /// The user asked for a rest before the timer elapsed.
    Manual,
}
