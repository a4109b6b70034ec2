//! # Lost & Found
//!
//! Claim histories are append-only. The recovery status moves
//! `Registered -> Lost -> FoundPendingConfirmation -> Registered`; loss
//! never blocks any other operation on the token.

use crate::domain::access::is_owner;
use crate::domain::entities::{FoundClaim, FoundReport, LostClaim, LostReport, OwnerContact, RecoveryStatus};
use crate::domain::state::{Effects, RegistryState};
use crate::domain::value_objects::{Address, TokenId, U256};
use crate::errors::{RegistryError, Role};
use crate::events::RegistryEvent;

impl RegistryState {
    /// Files a lost claim and marks the token `Lost`.
    ///
    /// # Errors
    ///
    /// - `NotFound` for an unregistered token
    /// - `Unauthorized` unless the caller owns the token
    pub fn report_lost(
        &mut self,
        caller: Address,
        token_id: TokenId,
        report: LostReport,
    ) -> Result<Effects, RegistryError> {
        self.require_owner(token_id)?;
        if !is_owner(self, caller, token_id) {
            return Err(RegistryError::unauthorized(caller, Role::Owner(token_id)));
        }

        let date = report.missing_date;
        self.lost_claims
            .entry(token_id)
            .or_default()
            .push(LostClaim {
                report,
                reporter: caller,
            });
        self.recovery.insert(token_id, RecoveryStatus::Lost);

        Ok(Effects::events(vec![RegistryEvent::Lost {
            token_id,
            reporter: caller,
            date,
        }]))
    }

    /// Files a found claim with the caller as finder.
    ///
    /// A token that was `Lost` becomes `FoundPendingConfirmation`; any other
    /// status is left as is. Every report is kept.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unregistered token.
    pub fn report_found(
        &mut self,
        caller: Address,
        token_id: TokenId,
        report: FoundReport,
        finder_contact: OwnerContact,
    ) -> Result<Effects, RegistryError> {
        self.require_owner(token_id)?;

        self.found_claims
            .entry(token_id)
            .or_default()
            .push(FoundClaim {
                found_date: report.found_date,
                finder: caller,
                finder_contact,
            });
        if self.recovery_status(token_id) == Some(RecoveryStatus::Lost) {
            self.recovery
                .insert(token_id, RecoveryStatus::FoundPendingConfirmation);
        }

        Ok(Effects::events(vec![RegistryEvent::Found {
            token_id,
            finder: caller,
            date: report.found_date,
        }]))
    }

    /// Closes a recovery episode.
    ///
    /// # Errors
    ///
    /// - `NotFound` for an unregistered token
    /// - `Unauthorized` unless the caller owns the token
    /// - `InvalidState` unless a found report is pending confirmation
    pub fn confirm_found(
        &mut self,
        caller: Address,
        token_id: TokenId,
    ) -> Result<Effects, RegistryError> {
        self.require_owner(token_id)?;
        if !is_owner(self, caller, token_id) {
            return Err(RegistryError::unauthorized(caller, Role::Owner(token_id)));
        }
        if self.recovery_status(token_id) != Some(RecoveryStatus::FoundPendingConfirmation) {
            return Err(RegistryError::invalid("no found report pending confirmation"));
        }

        self.recovery.insert(token_id, RecoveryStatus::Registered);

        Ok(Effects::events(vec![RegistryEvent::FoundConfirmed { token_id }]))
    }

    /// Validates a reward payment of `amount` to `finder`.
    ///
    /// Touches no state: the reward is pure value movement, carried out by the
    /// caller of this check once it passes.
    ///
    /// # Errors
    ///
    /// - `NotFound` for an unregistered token
    /// - `Unauthorized` unless the caller owns the token
    /// - `InvalidState` when the finder is zero
    /// - `InsufficientFunds` when `amount` is zero
    pub fn check_reward(
        &self,
        caller: Address,
        token_id: TokenId,
        finder: Address,
        amount: U256,
    ) -> Result<Effects, RegistryError> {
        self.require_owner(token_id)?;
        if !is_owner(self, caller, token_id) {
            return Err(RegistryError::unauthorized(caller, Role::Owner(token_id)));
        }
        if finder.is_zero() {
            return Err(RegistryError::invalid("finder is the zero address"));
        }
        if amount.is_zero() {
            return Err(RegistryError::InsufficientFunds {
                required: U256::one(),
                attached: amount,
            });
        }

        Ok(Effects::events(vec![RegistryEvent::RewardPaid {
            token_id,
            finder,
            amount,
        }]))
    }
}
