//! # Pet Identity
//!
//! Minting, transfer, approvals and administration.

use crate::domain::access::{is_admin, is_approved_or_owner, is_owner_or_operator};
use crate::domain::entities::{OwnerContact, PetRecord, RecoveryStatus};
use crate::domain::state::{Effects, RegistryState};
use crate::domain::value_objects::{Address, TokenId};
use crate::errors::{EntityRef, RegistryError, Role};
use crate::events::RegistryEvent;

impl RegistryState {
    /// Mints `token_id` to `caller`.
    ///
    /// # Errors
    ///
    /// - `DuplicateEntity` if the token id is already registered
    /// - `InvalidState` if the caller is the zero address
    pub fn register(
        &mut self,
        caller: Address,
        token_id: TokenId,
        pet: PetRecord,
        contact: OwnerContact,
    ) -> Result<Effects, RegistryError> {
        if self.exists(token_id) {
            return Err(RegistryError::DuplicateEntity(EntityRef::Token(token_id)));
        }
        if caller.is_zero() {
            return Err(RegistryError::invalid("cannot register to the zero address"));
        }

        let registered = RegistryEvent::Registered {
            token_id,
            name: pet.name.clone(),
            birthday: pet.birthday,
            breed: pet.breed.clone(),
            sex: pet.sex.clone(),
            owner: caller,
        };

        self.pets.insert(token_id, pet);
        self.contacts.insert(token_id, contact);
        self.owners.insert(token_id, caller);
        *self.balances.entry(caller).or_insert(0) += 1;
        self.recovery.insert(token_id, RecoveryStatus::Registered);

        Ok(Effects::events(vec![
            registered,
            RegistryEvent::Transfer {
                from: Address::ZERO,
                to: caller,
                token_id,
            },
        ]))
    }

    /// Moves `token_id` to `to`.
    ///
    /// # Errors
    ///
    /// - `NotFound` for an unregistered token
    /// - `Unauthorized` unless the caller is owner, approved or operator
    /// - `InvalidState` when `to` is zero
    pub fn transfer(
        &mut self,
        caller: Address,
        token_id: TokenId,
        to: Address,
    ) -> Result<Effects, RegistryError> {
        let owner = self.require_owner(token_id)?;
        if !is_approved_or_owner(self, caller, token_id) {
            return Err(RegistryError::unauthorized(
                caller,
                Role::OwnerOrDelegate(token_id),
            ));
        }
        if to.is_zero() {
            return Err(RegistryError::invalid("cannot transfer to the zero address"));
        }

        self.move_token(token_id, owner, to);

        Ok(Effects::events(vec![RegistryEvent::Transfer {
            from: owner,
            to,
            token_id,
        }]))
    }

    /// Sets (or clears, with the zero address) the single-token approval.
    ///
    /// # Errors
    ///
    /// - `NotFound` for an unregistered token
    /// - `Unauthorized` unless the caller is owner or operator
    /// - `InvalidState` when the delegate is the owner
    pub fn approve(
        &mut self,
        caller: Address,
        token_id: TokenId,
        delegate: Address,
    ) -> Result<Effects, RegistryError> {
        let owner = self.require_owner(token_id)?;
        if !is_owner_or_operator(self, caller, token_id) {
            return Err(RegistryError::unauthorized(
                caller,
                Role::OwnerOrDelegate(token_id),
            ));
        }
        if delegate == owner {
            return Err(RegistryError::invalid("approval to current owner"));
        }

        if delegate.is_zero() {
            self.token_approvals.remove(&token_id);
        } else {
            self.token_approvals.insert(token_id, delegate);
        }

        Ok(Effects::events(vec![RegistryEvent::Approval {
            owner,
            approved: delegate,
            token_id,
        }]))
    }

    /// Grants or revokes `operator` over all of the caller's tokens.
    ///
    /// # Errors
    ///
    /// `InvalidState` when the operator is the caller or the zero address.
    pub fn set_approval_for_all(
        &mut self,
        caller: Address,
        operator: Address,
        approved: bool,
    ) -> Result<Effects, RegistryError> {
        if operator == caller {
            return Err(RegistryError::invalid("cannot approve self as operator"));
        }
        if operator.is_zero() {
            return Err(RegistryError::invalid("operator is the zero address"));
        }

        if approved {
            self.operator_approvals
                .entry(caller)
                .or_default()
                .insert(operator);
        } else if let Some(operators) = self.operator_approvals.get_mut(&caller) {
            operators.remove(&operator);
            if operators.is_empty() {
                self.operator_approvals.remove(&caller);
            }
        }

        Ok(Effects::events(vec![RegistryEvent::ApprovalForAll {
            owner: caller,
            operator,
            approved,
        }]))
    }

    /// Hands the admin role to `new_admin`.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` unless the caller is the admin
    /// - `InvalidState` when `new_admin` is zero
    pub fn transfer_administration(
        &mut self,
        caller: Address,
        new_admin: Address,
    ) -> Result<Effects, RegistryError> {
        if !is_admin(self, caller) {
            return Err(RegistryError::unauthorized(caller, Role::Admin));
        }
        if new_admin.is_zero() {
            return Err(RegistryError::invalid("new admin is the zero address"));
        }

        let previous_admin = self.admin;
        self.admin = new_admin;

        Ok(Effects::events(vec![RegistryEvent::AdministrationTransferred {
            previous_admin,
            new_admin,
        }]))
    }

    /// Replaces the owner contact of `token_id`.
    ///
    /// # Errors
    ///
    /// - `NotFound` for an unregistered token
    /// - `Unauthorized` unless the caller is owner, approved or operator
    pub fn update_contact(
        &mut self,
        caller: Address,
        token_id: TokenId,
        contact: OwnerContact,
    ) -> Result<Effects, RegistryError> {
        self.require_owner(token_id)?;
        if !is_approved_or_owner(self, caller, token_id) {
            return Err(RegistryError::unauthorized(
                caller,
                Role::OwnerOrDelegate(token_id),
            ));
        }

        self.contacts.insert(token_id, contact);

        Ok(Effects::events(vec![RegistryEvent::ContactUpdated { token_id }]))
    }
}
