//! # Ledger Adapter
//!
//! In-memory native-currency ledger for tests and single-node runs.

use crate::domain::value_objects::{Address, U256};
use crate::errors::LedgerError;
use crate::ports::outbound::NativeLedger;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory balances.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    balances: RwLock<HashMap<Address, U256>>,
}

impl InMemoryLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ledger with initial balances.
    #[must_use]
    pub fn with_balances<I>(balances: I) -> Self
    where
        I: IntoIterator<Item = (Address, U256)>,
    {
        Self {
            balances: RwLock::new(balances.into_iter().collect()),
        }
    }

    /// Credits `amount` to `account` out of thin air.
    pub fn mint(&self, account: Address, amount: U256) -> Result<(), LedgerError> {
        let mut balances = self.write()?;
        let balance = balances.entry(account).or_insert_with(U256::zero);
        *balance = balance
            .checked_add(amount)
            .ok_or(LedgerError::Overflow(account))?;
        Ok(())
    }

    /// Sum of all balances.
    pub fn total_supply(&self) -> Result<U256, LedgerError> {
        let balances = self
            .balances
            .read()
            .map_err(|e| LedgerError::Unavailable(e.to_string()))?;
        balances
            .iter()
            .try_fold(U256::zero(), |total, (account, balance)| {
                total
                    .checked_add(*balance)
                    .ok_or(LedgerError::Overflow(*account))
            })
    }

    fn write(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<Address, U256>>, LedgerError> {
        self.balances
            .write()
            .map_err(|e| LedgerError::Unavailable(e.to_string()))
    }
}

#[async_trait]
impl NativeLedger for InMemoryLedger {
    async fn balance_of(&self, account: Address) -> Result<U256, LedgerError> {
        let balances = self
            .balances
            .read()
            .map_err(|e| LedgerError::Unavailable(e.to_string()))?;
        Ok(balances.get(&account).copied().unwrap_or_default())
    }

    async fn transfer(&self, from: Address, to: Address, amount: U256) -> Result<(), LedgerError> {
        let mut balances = self.write()?;

        let available = balances.get(&from).copied().unwrap_or_default();
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                account: from,
                required: amount,
                available,
            });
        }
        if from == to {
            return Ok(());
        }
        let credited = balances
            .get(&to)
            .copied()
            .unwrap_or_default()
            .checked_add(amount)
            .ok_or(LedgerError::Overflow(to))?;

        balances.insert(from, available - amount);
        balances.insert(to, credited);
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
