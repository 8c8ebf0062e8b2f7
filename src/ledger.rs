//! Ledger services
//!
//! Front door for account creation, deposit, withdrawal, balance enquiry and
//! transfer. Every balance read and mutation goes through the
//! [`LockCoordinator`]: single-account operations as a lock set of one,
//! transfers as a lock set of two. All acquisitions are bounded by the
//! configured lock timeout.
//!
//! Insufficient funds is reported through [`WithdrawOutcome`] /
//! [`TransferOutcome`], never as an error.

use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::account::Account;
use crate::config::LedgerConfig;
use crate::error::LedgerError;
use crate::lock::{LockCoordinator, LockRegistry};
use crate::store::AccountStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceSnapshot {
    pub account_id: String,
    pub name: Option<String>,
    pub balance: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WithdrawOutcome {
    Completed { balance: Decimal },
    /// Nothing was withdrawn
    InsufficientFunds { balance: Decimal },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReceipt {
    pub from: String,
    pub to: String,
    pub amount: Decimal,
    pub sender_balance: Decimal,
    pub recipient_balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferOutcome {
    Completed(TransferReceipt),
    /// Neither account was touched
    InsufficientFunds { available: Decimal },
}

pub struct Ledger {
    store: Arc<AccountStore>,
    coordinator: LockCoordinator,
    lock_timeout: Duration,
}

impl Ledger {
    /// Fresh ledger with its own store and lock registry.
    pub fn new(config: &LedgerConfig) -> Self {
        Self::with_parts(
            Arc::new(AccountStore::new()),
            LockCoordinator::new(Arc::new(LockRegistry::new())),
            config.lock_timeout(),
        )
    }

    pub fn with_parts(
        store: Arc<AccountStore>,
        coordinator: LockCoordinator,
        lock_timeout: Duration,
    ) -> Self {
        Self {
            store,
            coordinator,
            lock_timeout,
        }
    }

    pub fn store(&self) -> &Arc<AccountStore> {
        &self.store
    }

    pub fn coordinator(&self) -> &LockCoordinator {
        &self.coordinator
    }

    pub fn lock_timeout(&self) -> Duration {
        self.lock_timeout
    }

    /// Open a new account.
    ///
    /// # Errors
    /// - `EmptyAccountId` for a blank identifier
    /// - `NegativeInitialBalance` if `initial_balance < 0`
    /// - `DuplicateAccount` if the identifier is taken
    pub fn create_account(
        &self,
        account_id: &str,
        name: Option<&str>,
        initial_balance: Decimal,
    ) -> Result<Arc<Account>, LedgerError> {
        if account_id.trim().is_empty() {
            return Err(LedgerError::EmptyAccountId);
        }
        if initial_balance < Decimal::ZERO {
            return Err(LedgerError::NegativeInitialBalance(initial_balance));
        }
        if self.store.contains_key(account_id) {
            return Err(LedgerError::DuplicateAccount(account_id.to_string()));
        }

        let account = Arc::new(Account::new(
            account_id,
            name.map(str::to_string),
            initial_balance,
            self.coordinator.registry(),
        )?);

        // a concurrent creator may have won since the check above
        if !self.store.try_add(Arc::clone(&account)) {
            return Err(LedgerError::DuplicateAccount(account_id.to_string()));
        }

        info!(account_id, %initial_balance, "Account created");
        Ok(account)
    }

    /// Deposit and return the resulting balance.
    pub fn deposit(&self, account_id: &str, amount: Decimal) -> Result<Decimal, LedgerError> {
        let account = self.resolve(account_id, amount)?;

        let balance = self.coordinator.execute_with_lock(
            account.id(),
            || -> Result<Decimal, LedgerError> {
                account.deposit(amount)?;
                Ok(account.balance())
            },
            self.lock_timeout,
        )??;

        info!(account_id, %amount, %balance, "Deposit successful");
        Ok(balance)
    }

    pub fn withdraw(
        &self,
        account_id: &str,
        amount: Decimal,
    ) -> Result<WithdrawOutcome, LedgerError> {
        let account = self.resolve(account_id, amount)?;

        let outcome = self.coordinator.execute_with_lock(
            account.id(),
            || -> Result<WithdrawOutcome, LedgerError> {
                let withdrawn = account.withdraw(amount)?;
                let balance = account.balance();
                Ok(if withdrawn {
                    WithdrawOutcome::Completed { balance }
                } else {
                    WithdrawOutcome::InsufficientFunds { balance }
                })
            },
            self.lock_timeout,
        )??;

        match outcome {
            WithdrawOutcome::Completed { balance } => {
                info!(account_id, %amount, %balance, "Withdrawal successful")
            }
            WithdrawOutcome::InsufficientFunds { balance } => {
                info!(account_id, %amount, %balance, "Withdrawal rejected: insufficient balance")
            }
        }
        Ok(outcome)
    }

    pub fn balance(&self, account_id: &str) -> Result<BalanceSnapshot, LedgerError> {
        if account_id.trim().is_empty() {
            return Err(LedgerError::EmptyAccountId);
        }
        let account = self.find(account_id)?;

        let balance = self.coordinator.execute_with_lock(
            account.id(),
            || account.balance(),
            self.lock_timeout,
        )?;

        Ok(BalanceSnapshot {
            account_id: account.id().to_string(),
            name: account.name().map(str::to_string),
            balance,
        })
    }

    /// Move `amount` from `from` to `to` atomically.
    ///
    /// Both accounts stay locked from the withdrawal through the deposit, so
    /// no other operation on either account can observe the money in flight.
    ///
    /// # Errors
    /// - `AccountNotFound` for an unknown (or blank) sender or recipient
    /// - `SameAccount` for a self-transfer
    /// - `InvalidAmount` if `amount <= 0`
    /// - `Overflow` if the recipient cannot hold the amount (nothing moves)
    /// - `Lock(Timeout)` if either account stays busy past the lock timeout
    pub fn transfer(
        &self,
        from: &str,
        to: &str,
        amount: Decimal,
    ) -> Result<TransferOutcome, LedgerError> {
        let sender = self.find(from)?;
        if to.trim().is_empty() {
            return Err(LedgerError::AccountNotFound(to.to_string()));
        }
        if from == to {
            return Err(LedgerError::SameAccount);
        }
        let recipient = self.find(to)?;
        ensure_positive(amount)?;

        let outcome = self.coordinator.execute_with_locks(
            from,
            to,
            || -> Result<TransferOutcome, LedgerError> {
                if !recipient.can_accept(amount) {
                    return Err(LedgerError::Overflow(recipient.id().to_string()));
                }
                if !sender.withdraw(amount)? {
                    return Ok(TransferOutcome::InsufficientFunds {
                        available: sender.balance(),
                    });
                }
                recipient.deposit(amount)?;

                Ok(TransferOutcome::Completed(TransferReceipt {
                    from: from.to_string(),
                    to: to.to_string(),
                    amount,
                    sender_balance: sender.balance(),
                    recipient_balance: recipient.balance(),
                }))
            },
            self.lock_timeout,
        )??;

        match &outcome {
            TransferOutcome::Completed(receipt) => info!(
                from,
                to,
                %amount,
                sender_balance = %receipt.sender_balance,
                recipient_balance = %receipt.recipient_balance,
                "Transfer successful"
            ),
            TransferOutcome::InsufficientFunds { available } => info!(
                from,
                to,
                %amount,
                %available,
                "Transfer rejected: insufficient balance"
            ),
        }
        Ok(outcome)
    }

    /// Validation shared by deposit and withdraw, in the order the user
    /// supplies the inputs.
    fn resolve(&self, account_id: &str, amount: Decimal) -> Result<Arc<Account>, LedgerError> {
        if account_id.trim().is_empty() {
            return Err(LedgerError::EmptyAccountId);
        }
        ensure_positive(amount)?;
        self.find(account_id)
    }

    fn find(&self, account_id: &str) -> Result<Arc<Account>, LedgerError> {
        self.store.get(account_id).ok_or_else(|| {
            debug!(account_id, "Account lookup missed");
            LedgerError::AccountNotFound(account_id.to_string())
        })
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
