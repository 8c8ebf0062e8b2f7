//! Lockstep Ledger - in-memory accounts with deadlock-free transfers
//!
//! Accounts hold Decimal balances. Single-account operations and two-account
//! transfers share one lock per account identifier; transfers take both
//! locks in ordinal identifier order with a bounded wait, so concurrent
//! transfers in opposite directions (or around a cycle) never deadlock.
//!
//! # Modules
//!
//! - [`lock`] - Lock registry, dual-lock coordinator, invocation states
//! - [`account`] - Account with an enforced, lock-protected balance
//! - [`store`] - Account directory
//! - [`ledger`] - Create / deposit / withdraw / balance / transfer services
//! - [`money`] - Decimal parsing and currency display
//! - [`error`] - Ledger error taxonomy
//! - [`config`] - YAML application config
//! - [`logging`] - tracing subscriber setup
//!
//! # Example
//!
//! ```rust
//! use lockstep_ledger::{Ledger, LedgerConfig, TransferOutcome};
//! use rust_decimal::Decimal;
//!
//! let ledger = Ledger::new(&LedgerConfig::default());
//! ledger.create_account("A", Some("Alice"), Decimal::from(100)).unwrap();
//! ledger.create_account("B", Some("Bob"), Decimal::ZERO).unwrap();
//!
//! let outcome = ledger.transfer("A", "B", Decimal::from(30)).unwrap();
//! assert!(matches!(outcome, TransferOutcome::Completed(_)));
//! assert_eq!(ledger.balance("B").unwrap().balance, Decimal::from(30));
//! ```

pub mod account;
pub mod config;
pub mod error;
pub mod ledger;
pub mod lock;
pub mod logging;
pub mod money;
pub mod store;

// Convenient re-exports at crate root
pub use account::Account;
pub use config::{AppConfig, LedgerConfig};
pub use error::{ErrorKind, LedgerError};
pub use ledger::{BalanceSnapshot, Ledger, TransferOutcome, TransferReceipt, WithdrawOutcome};
pub use lock::{LockCoordinator, LockError, LockHandle, LockRegistry, LockState};
pub use store::AccountStore;
