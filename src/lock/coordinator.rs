//! Dual-Lock Coordinator
//!
//! Runs a caller-supplied action while holding the locks of two accounts.
//!
//! # Deadlock freedom
//!
//! Both identifiers are sorted by byte-wise (ordinal) comparison and the
//! smaller one is always locked first. Any two invocations that share an
//! identifier therefore request their locks in the same relative order,
//! whichever order the caller named the accounts in, so a circular wait
//! cannot form. Cycles such as A→B, B→C, C→A hold for the same reason.
//!
//! # Release guarantee
//!
//! Locks are RAII guards. Every exit path (timeout on either acquisition,
//! normal return, action panic) drops whatever has been acquired, second
//! lock first.

use std::sync::Arc;
use std::time::Duration;
use tracing::{trace, trace_span, warn};

use super::error::LockError;
use super::registry::{LockHandle, LockRegistry};
use super::state::LockState;

/// Grants atomic one- or two-account critical sections.
#[derive(Debug, Clone)]
pub struct LockCoordinator {
    registry: Arc<LockRegistry>,
}

impl LockCoordinator {
    pub fn new(registry: Arc<LockRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<LockRegistry> {
        &self.registry
    }

    /// Canonical handle for `account_id` (see [`LockRegistry::get_lock`]).
    pub fn get_lock(&self, account_id: &str) -> Result<LockHandle, LockError> {
        self.registry.get_lock(account_id)
    }

    /// Execute `action` while holding the locks of both accounts.
    ///
    /// The action runs exactly once, on the calling thread, with no timeout
    /// of its own. Its return value is handed back untouched, so an action
    /// returning `Result<T, E>` yields `Ok(Result<T, E>)`.
    ///
    /// Equal identifiers are locked once.
    ///
    /// # Errors
    /// - `InvalidArgument` if either identifier is empty/whitespace
    /// - `OutOfRange` if `timeout` is zero
    /// - `Timeout` if either lock is not acquired within `timeout`; no lock
    ///   is retained when this is returned
    pub fn execute_with_locks<F, R>(
        &self,
        first_account_id: &str,
        second_account_id: &str,
        action: F,
        timeout: Duration,
    ) -> Result<R, LockError>
    where
        F: FnOnce() -> R,
    {
        if first_account_id.trim().is_empty() {
            return Err(LockError::InvalidArgument {
                param: "first_account_id",
            });
        }
        if second_account_id.trim().is_empty() {
            return Err(LockError::InvalidArgument {
                param: "second_account_id",
            });
        }
        validate_timeout(timeout)?;

        let (low, high) = if first_account_id <= second_account_id {
            (first_account_id, second_account_id)
        } else {
            (second_account_id, first_account_id)
        };
        let high = (high != low).then_some(high);

        self.run_locked(low, high, action, timeout)
    }

    /// Single-account variant: a lock set of size one through the same
    /// acquisition path.
    pub fn execute_with_lock<F, R>(
        &self,
        account_id: &str,
        action: F,
        timeout: Duration,
    ) -> Result<R, LockError>
    where
        F: FnOnce() -> R,
    {
        if account_id.trim().is_empty() {
            return Err(LockError::InvalidArgument {
                param: "account_id",
            });
        }
        validate_timeout(timeout)?;

        self.run_locked(account_id, None, action, timeout)
    }

    /// `first_id` must already be the ordinally smaller identifier.
    fn run_locked<F, R>(
        &self,
        first_id: &str,
        second_id: Option<&str>,
        action: F,
        timeout: Duration,
    ) -> Result<R, LockError>
    where
        F: FnOnce() -> R,
    {
        let first_lock = self.registry.get_lock(first_id)?;
        let second_lock = second_id
            .map(|id| self.registry.get_lock(id))
            .transpose()?;

        let _span = trace_span!("locks", first = first_id, second = second_id).entered();
        let mut state = LockState::Idle;

        advance(&mut state, LockState::AcquiringFirst);
        let Some(first_guard) = first_lock.try_lock_for(timeout) else {
            return Err(fail(&mut state, first_id, timeout));
        };

        let second_guard = match (&second_lock, second_id) {
            (Some(lock), Some(id)) => {
                advance(&mut state, LockState::AcquiringSecond);
                match lock.try_lock_for(timeout) {
                    Some(guard) => Some(guard),
                    None => {
                        drop(first_guard);
                        return Err(fail(&mut state, id, timeout));
                    }
                }
            }
            _ => None,
        };

        advance(&mut state, LockState::Executing);
        debug_assert!(state.holds_locks());
        let result = action();

        drop(second_guard);
        drop(first_guard);
        advance(&mut state, LockState::Released);
        debug_assert!(state.is_terminal());

        Ok(result)
    }
}

fn validate_timeout(timeout: Duration) -> Result<(), LockError> {
    if timeout.is_zero() {
        return Err(LockError::OutOfRange { param: "timeout" });
    }
    Ok(())
}

/// Milliseconds for log fields, clamped to `u64::MAX`
fn saturating_millis(timeout: Duration) -> u64 {
    u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX)
}

#[inline]
fn advance(state: &mut LockState, next: LockState) {
    debug_assert!(
        state.can_transition_to(next),
        "illegal lock transition {state} -> {next}"
    );
    trace!(from = %state, to = %next, "lock state");
    *state = next;
}

/// Called with every previously acquired guard already dropped.
fn fail(state: &mut LockState, account_id: &str, timeout: Duration) -> LockError {
    advance(state, LockState::Failed);
    warn!(
        account_id,
        timeout_ms = saturating_millis(timeout),
        "Lock acquisition timed out"
    );
    advance(state, LockState::Released);
    debug_assert!(state.is_terminal());
    LockError::Timeout {
        account_id: account_id.to_string(),
        timeout,
    }
}
