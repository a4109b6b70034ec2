//! # Role Predicates
//!
//! Pure authorization checks over [`RegistryState`]. Every write operation
//! decides who may call it using only these functions.

use crate::domain::state::RegistryState;
use crate::domain::value_objects::{Address, TokenId, VetCenterId};

/// `who` currently owns `token_id`.
#[must_use]
pub fn is_owner(state: &RegistryState, who: Address, token_id: TokenId) -> bool {
    state.owner_of(token_id) == Some(who)
}

/// `who` holds the single-token approval for `token_id`.
#[must_use]
pub fn is_approved(state: &RegistryState, who: Address, token_id: TokenId) -> bool {
    !who.is_zero() && state.get_approved(token_id) == Some(who)
}

/// `operator` may manage every token of `owner`.
#[must_use]
pub fn is_operator(state: &RegistryState, owner: Address, operator: Address) -> bool {
    state.is_approved_for_all(owner, operator)
}

/// Owner, single-token approval, or operator of the owner.
#[must_use]
pub fn is_approved_or_owner(state: &RegistryState, who: Address, token_id: TokenId) -> bool {
    match state.owner_of(token_id) {
        Some(owner) => {
            owner == who || is_approved(state, who, token_id) || is_operator(state, owner, who)
        }
        None => false,
    }
}

/// Owner, or operator of the owner. Single-token approvals do not count.
#[must_use]
pub fn is_owner_or_operator(state: &RegistryState, who: Address, token_id: TokenId) -> bool {
    match state.owner_of(token_id) {
        Some(owner) => owner == who || is_operator(state, owner, who),
        None => false,
    }
}

#[must_use]
pub fn is_admin(state: &RegistryState, who: Address) -> bool {
    state.admin() == who
}

/// The center's registrar, or the admin.
#[must_use]
pub fn is_center_authority(state: &RegistryState, who: Address, center: VetCenterId) -> bool {
    is_admin(state, who)
        || state
            .vet_center(center)
            .is_some_and(|registered| registered.registrar == who)
}

/// `who` occupies a slot on the center's official roster.
#[must_use]
pub fn is_vet_official(state: &RegistryState, who: Address, center: VetCenterId) -> bool {
    !who.is_zero()
        && state
            .vet_officials
            .get(&center)
            .is_some_and(|roster| roster.values().any(|official| *official == who))
}
