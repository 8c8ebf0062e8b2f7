//! Dual-Lock Invocation States
//!
//! ```text
//! IDLE → ACQUIRING_FIRST → ACQUIRING_SECOND → EXECUTING → RELEASED
//!              ↓                  ↓
//!           FAILED ─────────────────────────────────────→ RELEASED
//! ```
//!
//! `FAILED` always moves on to `RELEASED` after dropping whatever subset of
//! locks the invocation held.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockState {
    /// Arguments validated, no lock requested yet
    Idle,

    /// Waiting (bounded) for the lock of the ordinally smaller identifier
    AcquiringFirst,

    /// First lock held, waiting (bounded) for the second
    AcquiringSecond,

    /// Both locks held, action running
    Executing,

    /// Acquisition timed out
    Failed,

    /// Terminal: every lock taken by this invocation has been dropped
    Released,
}

impl LockState {
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, LockState::Released)
    }

    /// Check if at least one lock may be held in this state
    #[inline]
    pub fn holds_locks(&self) -> bool {
        matches!(self, LockState::AcquiringSecond | LockState::Executing)
    }

    /// Legal edges of the invocation graph
    pub fn can_transition_to(&self, next: LockState) -> bool {
        use LockState::*;
        matches!(
            (*self, next),
            (Idle, AcquiringFirst)
                | (AcquiringFirst, AcquiringSecond)
                | (AcquiringFirst, Executing)
                | (AcquiringFirst, Failed)
                | (AcquiringSecond, Executing)
                | (AcquiringSecond, Failed)
                | (Executing, Released)
                | (Failed, Released)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LockState::Idle => "IDLE",
            LockState::AcquiringFirst => "ACQUIRING_FIRST",
            LockState::AcquiringSecond => "ACQUIRING_SECOND",
            LockState::Executing => "EXECUTING",
            LockState::Failed => "FAILED",
            LockState::Released => "RELEASED",
        }
    }
}

impl fmt::Display for LockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
