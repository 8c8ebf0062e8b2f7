//! Account with an enforced, lock-protected balance.
//!
//! # Enforcement Strategy:
//! 1. The balance field is PRIVATE - only `deposit`/`withdraw` mutate it
//! 2. Every read and write happens while holding the account's lock handle
//! 3. The handle comes from the [`LockRegistry`], so it is the very lock the
//!    [`crate::LockCoordinator`] takes for this identifier. Single-account
//!    operations and coordinator-mediated transfers on the same account
//!    therefore never interleave.
//! 4. Arithmetic is checked Decimal arithmetic - overflow is an error, never
//!    a silent wrap or rounding

use parking_lot::Mutex;
use rust_decimal::Decimal;

use crate::error::LedgerError;
use crate::lock::{LockError, LockHandle, LockRegistry};

/// A single account.
///
/// # Invariants (ENFORCED by private fields):
/// - `id` and `name` are immutable after creation
/// - `balance` is only touched while `lock` is held; the inner mutex is
///   therefore never contended and exists to give safe interior mutability
/// - No non-negativity invariant: an account may be opened below zero
#[derive(Debug)]
pub struct Account {
    id: String,
    name: Option<String>,
    lock: LockHandle,
    balance: Mutex<Decimal>,
}

impl Account {
    /// Create an account whose lock is the registry's handle for `id`.
    ///
    /// # Errors
    /// `InvalidArgument` if `id` is empty or whitespace-only.
    pub fn new(
        id: impl Into<String>,
        name: Option<String>,
        initial_balance: Decimal,
        registry: &LockRegistry,
    ) -> Result<Self, LockError> {
        let id = id.into();
        let lock = registry.get_lock(&id)?;
        Ok(Self {
            id,
            name,
            lock,
            balance: Mutex::new(initial_balance),
        })
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The shared lock for this account's identifier
    #[inline]
    pub fn lock_handle(&self) -> &LockHandle {
        &self.lock
    }

    /// Point-in-time balance, read under the account lock.
    pub fn balance(&self) -> Decimal {
        let _held = self.lock.lock();
        *self.balance.lock()
    }

    /// Add `amount` to the balance.
    ///
    /// # Errors
    /// - `InvalidAmount` if `amount <= 0`
    /// - `Overflow` if the result leaves the Decimal range (balance unchanged)
    pub fn deposit(&self, amount: Decimal) -> Result<(), LedgerError> {
        ensure_positive(amount)?;

        let _held = self.lock.lock();
        let mut balance = self.balance.lock();
        *balance = balance
            .checked_add(amount)
            .ok_or_else(|| LedgerError::Overflow(self.id.clone()))?;
        Ok(())
    }

    /// Subtract `amount` if the balance covers it.
    ///
    /// Returns `Ok(false)` with no mutation when funds are insufficient.
    ///
    /// # Errors
    /// - `InvalidAmount` if `amount <= 0`
    pub fn withdraw(&self, amount: Decimal) -> Result<bool, LedgerError> {
        ensure_positive(amount)?;

        let _held = self.lock.lock();
        let mut balance = self.balance.lock();
        if *balance < amount {
            return Ok(false);
        }
        *balance = balance
            .checked_sub(amount)
            .ok_or_else(|| LedgerError::Overflow(self.id.clone()))?;
        Ok(true)
    }

    /// Whether a deposit of `amount` would stay within the Decimal range.
    pub fn can_accept(&self, amount: Decimal) -> bool {
        let _held = self.lock.lock();
        self.balance.lock().checked_add(amount).is_some()
    }
}

fn ensure_positive(amount: Decimal) -> Result<(), LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::InvalidAmount {
            param: "amount",
            amount,
        });
    }
    Ok(())
}
