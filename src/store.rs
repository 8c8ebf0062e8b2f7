//! Account directory.
//!
//! Thread-safe map from account identifier to account, stored in a DashMap.
//! Insertion is first-writer-wins; there is no removal.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::account::Account;

pub struct AccountStore {
    /// Map from account identifier to the shared account
    accounts: DashMap<String, Arc<Account>>,
}

impl AccountStore {
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
        }
    }

    /// Insert `account` under its own identifier.
    ///
    /// Returns `false` if the identifier is taken; the stored account is left
    /// in place. The check and the insert are a single atomic step.
    pub fn try_add(&self, account: Arc<Account>) -> bool {
        match self.accounts.entry(account.id().to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(account);
                true
            }
        }
    }

    pub fn contains_key(&self, account_id: &str) -> bool {
        self.accounts.contains_key(account_id)
    }

    pub fn get(&self, account_id: &str) -> Option<Arc<Account>> {
        self.accounts
            .get(account_id)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Snapshot of every account, in no particular order.
    pub fn all_accounts(&self) -> Vec<Arc<Account>> {
        self.accounts
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect()
    }

    /// Sum of every account's balance, `None` if the sum leaves the Decimal
    /// range.
    ///
    /// Each balance is read under its own lock, so the sum is only a
    /// consistent total while no transfer is in flight.
    pub fn total_balance(&self) -> Option<Decimal> {
        self.all_accounts()
            .iter()
            .try_fold(Decimal::ZERO, |total, acc| total.checked_add(acc.balance()))
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl Default for AccountStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lock::LockRegistry;
    use rust_decimal_macros::dec;
    use std::sync::Barrier;
    use std::thread;

    fn new_account(registry: &LockRegistry, id: &str, balance: Decimal) -> Arc<Account> {
        Arc::new(Account::new(id, None, balance, registry).unwrap())
    }

    #[test]
    fn test_add_and_get() {
        let registry = LockRegistry::new();
        let store = AccountStore::new();
        assert!(store.is_empty());

        assert!(store.try_add(new_account(&registry, "ACC001", dec!(100))));
        assert!(store.contains_key("ACC001"));
        assert_eq!(store.get("ACC001").unwrap().balance(), dec!(100));
        assert!(store.get("ACC999").is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_duplicate_keeps_first() {
        let registry = LockRegistry::new();
        let store = AccountStore::new();

        assert!(store.try_add(new_account(&registry, "ACC001", dec!(100))));
        assert!(!store.try_add(new_account(&registry, "ACC001", dec!(999))));
        assert_eq!(store.get("ACC001").unwrap().balance(), dec!(100));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_concurrent_add_single_winner() {
        let registry = Arc::new(LockRegistry::new());
        let store = Arc::new(AccountStore::new());
        let barrier = Arc::new(Barrier::new(20));

        let handles: Vec<_> = (0..20)
            .map(|i| {
                let registry = Arc::clone(&registry);
                let store = Arc::clone(&store);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    let acc = new_account(&registry, "ACC001", Decimal::from(i));
                    barrier.wait();
                    store.try_add(acc)
                })
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|added| *added)
            .count();
        assert_eq!(winners, 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_total_balance() {
        let registry = LockRegistry::new();
        let store = AccountStore::new();
        store.try_add(new_account(&registry, "A", dec!(100.50)));
        store.try_add(new_account(&registry, "B", dec!(-20)));
        store.try_add(new_account(&registry, "C", dec!(0.001)));

        assert_eq!(store.total_balance(), Some(dec!(80.501)));
        assert_eq!(store.all_accounts().len(), 3);
    }

    #[test]
    fn test_total_balance_out_of_range() {
        let registry = LockRegistry::new();
        let store = AccountStore::new();
        store.try_add(new_account(&registry, "A", Decimal::MAX));
        assert_eq!(store.total_balance(), Some(Decimal::MAX));

        store.try_add(new_account(&registry, "B", dec!(1)));
        assert_eq!(store.total_balance(), None);
    }
}
