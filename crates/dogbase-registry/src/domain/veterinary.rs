//! # Veterinary Authority
//!
//! Vet centers, their official rosters, and vaccination histories.

use crate::domain::access::{is_center_authority, is_vet_official};
use crate::domain::entities::{CallOutput, RegisteredVetCenter, Vaccine, VaccineRecord, VetCenter};
use crate::domain::state::{Effects, RegistryState};
use crate::domain::value_objects::{Address, OfficialSlot, TokenId, VetCenterId};
use crate::errors::{EntityRef, RegistryError, Role};
use crate::events::RegistryEvent;

impl RegistryState {
    /// Registers a center under the next id. The caller becomes its registrar.
    #[allow(clippy::unnecessary_wraps)]
    pub fn register_vet_center(
        &mut self,
        caller: Address,
        center: VetCenter,
    ) -> Result<Effects, RegistryError> {
        let vet_center_id = VetCenterId(self.vet_center_count());
        let name = center.name.clone();

        self.vet_centers.push(RegisteredVetCenter {
            center,
            registrar: caller,
        });

        Ok(Effects::with_output(
            vec![RegistryEvent::VetCenterRegistered {
                vet_center_id,
                name,
            }],
            CallOutput::VetCenter(vet_center_id),
        ))
    }

    /// Puts `official` in `slot` of the center's roster, replacing any occupant.
    ///
    /// # Errors
    ///
    /// - `NotFound` for an unknown center
    /// - `Unauthorized` unless the caller is the registrar or the admin
    /// - `InvalidState` when the official is zero
    pub fn register_vet_official(
        &mut self,
        caller: Address,
        vet_center_id: VetCenterId,
        slot: OfficialSlot,
        official: Address,
    ) -> Result<Effects, RegistryError> {
        self.require_vet_center(vet_center_id)?;
        if !is_center_authority(self, caller, vet_center_id) {
            return Err(RegistryError::unauthorized(
                caller,
                Role::CenterAuthority(vet_center_id),
            ));
        }
        if official.is_zero() {
            return Err(RegistryError::invalid("official is the zero address"));
        }

        self.vet_officials
            .entry(vet_center_id)
            .or_default()
            .insert(slot, official);

        Ok(Effects::events(vec![RegistryEvent::VetOfficialRegistered {
            vet_center_id,
            slot,
            official,
        }]))
    }

    /// Appends a vaccination record made at `vet_center_id`.
    ///
    /// # Errors
    ///
    /// - `NotFound` for an unknown center or an unregistered token
    /// - `Unauthorized` unless the caller is an official of that center
    pub fn add_vaccine_record(
        &mut self,
        caller: Address,
        token_id: TokenId,
        vaccine: Vaccine,
        vet_center_id: VetCenterId,
    ) -> Result<Effects, RegistryError> {
        self.require_vet_center(vet_center_id)?;
        if !is_vet_official(self, caller, vet_center_id) {
            return Err(RegistryError::unauthorized(
                caller,
                Role::VetOfficial(vet_center_id),
            ));
        }
        if !self.exists(token_id) {
            return Err(RegistryError::NotFound(EntityRef::Token(token_id)));
        }

        let history = self.vaccines.entry(token_id).or_default();
        let event = RegistryEvent::VaccineAdded {
            token_id,
            index: history.len() as u64,
            vaccine_name: vaccine.name.clone(),
            vet_center_id,
            date: vaccine.date,
        };
        history.push(VaccineRecord {
            vaccine,
            vet_center_id,
            administered_by: caller,
        });

        Ok(Effects::events(vec![event]))
    }
}
