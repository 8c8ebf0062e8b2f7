//! Lock Error Types

use std::time::Duration;
use thiserror::Error;

/// Errors raised by the lock registry and the coordinator.
///
/// Argument errors are returned before any lock is touched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LockError {
    #[error("{param} cannot be null or empty")]
    InvalidArgument { param: &'static str },

    #[error("{param} must be greater than zero")]
    OutOfRange { param: &'static str },

    #[error(
        "Failed to acquire lock for account '{account_id}' within {timeout:?}. \
         The system may be experiencing high load or a deadlock condition."
    )]
    Timeout {
        account_id: String,
        timeout: Duration,
    },
}

impl LockError {
    /// Error code for API-style responses
    pub fn code(&self) -> &'static str {
        match self {
            LockError::InvalidArgument { .. } => "INVALID_ARGUMENT",
            LockError::OutOfRange { .. } => "OUT_OF_RANGE",
            LockError::Timeout { .. } => "LOCK_TIMEOUT",
        }
    }

    #[inline]
    pub fn is_timeout(&self) -> bool {
        matches!(self, LockError::Timeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            LockError::InvalidArgument { param: "account_id" }.code(),
            "INVALID_ARGUMENT"
        );
        assert_eq!(LockError::OutOfRange { param: "timeout" }.code(), "OUT_OF_RANGE");
        let timeout = LockError::Timeout {
            account_id: "ACC001".into(),
            timeout: Duration::from_millis(100),
        };
        assert_eq!(timeout.code(), "LOCK_TIMEOUT");
        assert!(timeout.is_timeout());
    }

    #[test]
    fn test_display_names_account_and_bound() {
        let err = LockError::Timeout {
            account_id: "ACC001".into(),
            timeout: Duration::from_millis(100),
        };
        let msg = err.to_string();
        assert!(msg.contains("'ACC001'"));
        assert!(msg.contains("100ms"));

        let err = LockError::InvalidArgument {
            param: "first_account_id",
        };
        assert_eq!(err.to_string(), "first_account_id cannot be null or empty");
    }
}
