//! Shared fixtures for domain unit tests.

#![allow(dead_code)]

use crate::domain::entities::{LostReport, OwnerContact, PetRecord, Vaccine, VetCenter};
use crate::domain::state::RegistryState;
use crate::domain::value_objects::{Address, TokenId, VetCenterId};

pub fn admin() -> Address {
    Address::new([0xAD; 20])
}

pub fn alice() -> Address {
    Address::new([0xA1; 20])
}

pub fn bob() -> Address {
    Address::new([0xB0; 20])
}

pub fn carol() -> Address {
    Address::new([0xC0; 20])
}

pub fn dave() -> Address {
    Address::new([0xD0; 20])
}

pub fn chip() -> TokenId {
    TokenId::from(123_456_789_012_345u64)
}

pub fn other_chip() -> TokenId {
    TokenId::from(987_654_321_098_765u64)
}

pub fn sample_pet() -> PetRecord {
    PetRecord {
        name: "Max".into(),
        species: "Dog".into(),
        breed: "Labrador Retriever".into(),
        sex: "Male".into(),
        country: "Chile".into(),
        region: "Metropolitana".into(),
        city: "Santiago".into(),
        address: "Av. Providencia 1234".into(),
        tattoo: "none".into(),
        color: "Black".into(),
        photo: "ipfs://max".into(),
        postal_code: "7500000".into(),
        birthday: 1_577_836_800,
    }
}

pub fn sample_contact() -> OwnerContact {
    OwnerContact {
        email: "owner@dogbase.io".into(),
        cell_phone: "+56911111111".into(),
        other_phone: String::new(),
    }
}

pub fn finder_contact() -> OwnerContact {
    OwnerContact {
        email: "finder@dogbase.io".into(),
        cell_phone: "+56922222222".into(),
        other_phone: String::new(),
    }
}

pub fn sample_lost_report() -> LostReport {
    LostReport {
        missing_date: 1_700_000_000,
        postal_code: "7500000".into(),
        country: "Chile".into(),
        region: "Metropolitana".into(),
        city: "Santiago".into(),
        address: "Parque Bustamante".into(),
    }
}

pub fn sample_center() -> VetCenter {
    VetCenter {
        name: "Clinica Veterinaria Central".into(),
        country: "Chile".into(),
        region: "Metropolitana".into(),
        city: "Santiago".into(),
        address: "Los Leones 500".into(),
        email: "central@vet.cl".into(),
        phone: "+5622222222".into(),
        postal_code: "7510000".into(),
    }
}

pub fn sample_vaccine() -> Vaccine {
    Vaccine {
        name: "Rabies".into(),
        supplier: "Zoetis".into(),
        code: "RB-2023-001".into(),
        date: 1_700_000_000,
        due_date: 1_731_536_000,
    }
}

pub fn empty_state() -> RegistryState {
    RegistryState::new("DogBase", "DBT", admin())
}

/// A registry holding `chip()` owned by `owner`.
pub fn state_with_pet(owner: Address) -> RegistryState {
    let mut state = empty_state();
    state
        .register(owner, chip(), sample_pet(), sample_contact())
        .unwrap();
    state
}

/// Registers a center and returns its id.
pub fn center_of(state: &mut RegistryState, registrar: Address) -> VetCenterId {
    state
        .register_vet_center(registrar, sample_center())
        .unwrap()
        .output
        .vet_center_id()
        .unwrap()
}
