//! The WOPI lock protocol state machine.
//!
//! [`LockEngine::evaluate`] is a pure function from an override instruction,
//! the current lock state, and the caller's token to a [`Transition`]: the
//! lock-state change to commit, the HTTP outcome to report, and whether a
//! content write is authorized. The engine performs no I/O; the caller owns
//! making the read-decide-write sequence atomic per file id.
//!
//! Token comparison is exact byte equality with no normalization. A 409
//! conflict is a normal outcome carried in the transition, never an error.

use crate::error::LockError;
use chrono::{DateTime, Utc};
use http::StatusCode;
use proxenos_core::{LockRecord, LockToken};
use std::fmt;

/// The instruction carried in the `X-WOPI-Override` request header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WopiOverride {
    /// Acquire or refresh a lock.
    Lock,
    /// Release a lock.
    Unlock,
    /// Extend a held lock's lifetime.
    RefreshLock,
    /// Read the current lock without mutating it.
    GetLock,
    /// Replace file content under the lock discipline.
    Put,
}

impl WopiOverride {
    /// Parses the header value into an instruction.
    ///
    /// # Errors
    ///
    /// Returns [`LockError::UnsupportedOverride`] for any value outside the
    /// supported set; the HTTP layer maps this to 501.
    pub fn parse(value: &str) -> Result<Self, LockError> {
        match value {
            "LOCK" => Ok(Self::Lock),
            "UNLOCK" => Ok(Self::Unlock),
            "REFRESH_LOCK" => Ok(Self::RefreshLock),
            "GET_LOCK" => Ok(Self::GetLock),
            "PUT" => Ok(Self::Put),
            other => Err(LockError::unsupported_override(other)),
        }
    }

    /// The wire spelling of the instruction.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Lock => "LOCK",
            Self::Unlock => "UNLOCK",
            Self::RefreshLock => "REFRESH_LOCK",
            Self::GetLock => "GET_LOCK",
            Self::Put => "PUT",
        }
    }
}

impl fmt::Display for WopiOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The lock-state change a transition commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockChange {
    /// Leave the state as observed.
    Keep,
    /// Create a new lock record.
    Acquire(LockRecord),
    /// Replace the record with a refreshed timestamp.
    Refresh(LockRecord),
    /// Delete the record.
    Release,
}

/// The HTTP-level outcome of a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockOutcome {
    /// Response status code.
    pub status: StatusCode,
    /// Value for the `X-WOPI-Lock` response header, when the protocol
    /// requires one. The empty token means "unlocked".
    pub lock_header: Option<LockToken>,
}

impl LockOutcome {
    /// Whether the outcome is a lock conflict.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        self.status == StatusCode::CONFLICT
    }

    fn ok() -> Self {
        Self {
            status: StatusCode::OK,
            lock_header: None,
        }
    }

    fn ok_with_lock(token: LockToken) -> Self {
        Self {
            status: StatusCode::OK,
            lock_header: Some(token),
        }
    }

    fn conflict(current: LockToken) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            lock_header: Some(current),
        }
    }
}

/// A decided lock transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// The state change to commit.
    pub change: LockChange,
    /// The HTTP outcome to report.
    pub outcome: LockOutcome,
    /// Whether the instruction authorizes writing the request body.
    pub write_content: bool,
}

impl Transition {
    fn keep(outcome: LockOutcome) -> Self {
        Self {
            change: LockChange::Keep,
            outcome,
            write_content: false,
        }
    }
}

/// The WOPI lock protocol decision table.
#[derive(Debug, Clone, Copy, Default)]
pub struct LockEngine;

impl LockEngine {
    /// Creates the engine.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Decides the transition for `instruction` given the observed lock
    /// state. `current` must already have expiry applied (an expired lock
    /// reads as `None`).
    #[must_use]
    pub fn evaluate(
        &self,
        instruction: WopiOverride,
        file_id: &str,
        current: Option<&LockRecord>,
        caller: &LockToken,
        now: DateTime<Utc>,
    ) -> Transition {
        match instruction {
            WopiOverride::Lock => Self::evaluate_lock(file_id, current, caller, now),
            WopiOverride::Unlock => Self::evaluate_unlock(current, caller),
            WopiOverride::RefreshLock => Self::evaluate_refresh(current, caller, now),
            WopiOverride::GetLock => Self::evaluate_get_lock(current),
            WopiOverride::Put => Self::evaluate_put(current, caller),
        }
    }

    fn evaluate_lock(
        file_id: &str,
        current: Option<&LockRecord>,
        caller: &LockToken,
        now: DateTime<Utc>,
    ) -> Transition {
        match current {
            None => Transition {
                change: LockChange::Acquire(LockRecord::new(file_id, caller.clone(), now)),
                outcome: LockOutcome::ok(),
                write_content: false,
            },
            Some(held) if held.token == *caller => Transition {
                change: LockChange::Refresh(held.refreshed(now)),
                outcome: LockOutcome::ok(),
                write_content: false,
            },
            Some(held) => Transition::keep(LockOutcome::conflict(held.token.clone())),
        }
    }

    fn evaluate_unlock(current: Option<&LockRecord>, caller: &LockToken) -> Transition {
        match current {
            // Unlocking an unlocked file conflicts; the header reports the
            // empty lock id.
            None => Transition::keep(LockOutcome {
                status: StatusCode::CONFLICT,
                lock_header: Some(LockToken::empty()),
            }),
            Some(held) if held.token == *caller => Transition {
                change: LockChange::Release,
                outcome: LockOutcome::ok(),
                write_content: false,
            },
            Some(held) => Transition::keep(LockOutcome::conflict(held.token.clone())),
        }
    }

    fn evaluate_refresh(
        current: Option<&LockRecord>,
        caller: &LockToken,
        now: DateTime<Utc>,
    ) -> Transition {
        match current {
            None => Transition::keep(LockOutcome::ok_with_lock(LockToken::empty())),
            Some(held) if held.token == *caller => Transition {
                change: LockChange::Refresh(held.refreshed(now)),
                outcome: LockOutcome::ok(),
                write_content: false,
            },
            Some(held) => Transition::keep(LockOutcome::conflict(held.token.clone())),
        }
    }

    fn evaluate_get_lock(current: Option<&LockRecord>) -> Transition {
        let token = current.map_or_else(LockToken::empty, |held| held.token.clone());
        Transition::keep(LockOutcome::ok_with_lock(token))
    }

    fn evaluate_put(current: Option<&LockRecord>, caller: &LockToken) -> Transition {
        match current {
            // Unlocked PUT proceeds; the caller's token is ignored.
            None => Transition {
                change: LockChange::Keep,
                outcome: LockOutcome::ok(),
                write_content: true,
            },
            Some(held) if held.token == *caller => Transition {
                change: LockChange::Keep,
                outcome: LockOutcome::ok(),
                write_content: true,
            },
            Some(held) => Transition::keep(LockOutcome::conflict(held.token.clone())),
        }
    }
}
