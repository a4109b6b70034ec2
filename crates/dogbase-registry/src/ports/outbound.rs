//! # Driven Ports (SPI - Outbound)
//!
//! Interfaces the registry depends on:
//! - Native-currency balances (`NativeLedger`)
//! - The event log indexers consume (`EventSink`)

use crate::domain::value_objects::{Address, U256};
use crate::errors::LedgerError;
use crate::events::{EventRecord, RegistryEvent};
use async_trait::async_trait;

// =============================================================================
// NATIVE LEDGER
// =============================================================================

/// Native-currency balances.
///
/// The registry moves attached value into its custody account before an
/// operation runs and pays out of custody once state has been committed.
/// Implementations must apply a transfer entirely or not at all.
///
/// Transfers run while the registry holds its state lock. A nested registry
/// call awaited on the same task is rejected with `Reentrancy`, but one
/// awaited on another task waits for that lock and never completes.
/// Implementations must not await registry calls from `transfer`; work that
/// needs the registry has to be spawned and left to run after the
/// operation commits.
#[async_trait]
pub trait NativeLedger: Send + Sync {
    /// Balance of `account` in wei.
    async fn balance_of(&self, account: Address) -> Result<U256, LedgerError>;

    /// Moves `amount` wei from `from` to `to`.
    ///
    /// # Errors
    ///
    /// - `InsufficientBalance` if `from` cannot cover the amount
    /// - `Overflow` if `to` would exceed 256 bits
    async fn transfer(&self, from: Address, to: Address, amount: U256) -> Result<(), LedgerError>;
}

// =============================================================================
// EVENT SINK
// =============================================================================

/// Append-only event log.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Appends `events` in order, assigning consecutive log indices within
    /// `(chain_id, block_number)`, and returns the stored records.
    async fn emit(
        &self,
        chain_id: u64,
        block_number: u64,
        events: Vec<RegistryEvent>,
    ) -> Vec<EventRecord>;
}
