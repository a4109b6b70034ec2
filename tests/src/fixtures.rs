//! # Test Fixtures
//!
//! Named actors, sample records and service builders shared by every suite.

use dogbase_registry::prelude::*;

/// Service wired to the in-memory adapters.
pub type TestService = PetRegistryService<InMemoryLedger, InMemoryEventLog>;

// =============================================================================
// ACTORS
// =============================================================================

pub fn admin() -> Address {
    Address::new([0xAD; 20])
}

/// Owner of "Max" in most scenarios.
pub fn alice() -> Address {
    Address::new([0xA1; 20])
}

pub fn bob() -> Address {
    Address::new([0xB0; 20])
}

pub fn carol() -> Address {
    Address::new([0xC0; 20])
}

pub fn mallory() -> Address {
    Address::new([0x3A; 20])
}

/// Microchip number of "Max".
pub fn max_chip() -> TokenId {
    TokenId::from(123_456_789_012_345u64)
}

pub fn luna_chip() -> TokenId {
    TokenId::from(900_000_000_000_001u64)
}

// =============================================================================
// RECORDS
// =============================================================================

pub fn pet(name: &str) -> PetRecord {
    PetRecord {
        name: name.into(),
        species: "Dog".into(),
        breed: "Labrador Retriever".into(),
        sex: "Male".into(),
        country: "Chile".into(),
        region: "Valparaiso".into(),
        city: "Vina del Mar".into(),
        address: "Calle Valparaiso 100".into(),
        tattoo: String::new(),
        color: "Yellow".into(),
        photo: format!("ipfs://{}", name.to_lowercase()),
        postal_code: "2520000".into(),
        birthday: 1_600_000_000,
    }
}

pub fn contact(email: &str) -> OwnerContact {
    OwnerContact {
        email: email.into(),
        cell_phone: "+56900000000".into(),
        other_phone: String::new(),
    }
}

pub fn lost_report() -> LostReport {
    LostReport {
        missing_date: 1_710_000_000,
        postal_code: "2520000".into(),
        country: "Chile".into(),
        region: "Valparaiso".into(),
        city: "Vina del Mar".into(),
        address: "Playa Acapulco".into(),
    }
}

pub fn found_report() -> FoundReport {
    FoundReport {
        found_date: 1_710_086_400,
    }
}

pub fn vet_center(name: &str) -> VetCenter {
    VetCenter {
        name: name.into(),
        country: "Chile".into(),
        region: "Valparaiso".into(),
        city: "Vina del Mar".into(),
        address: "1 Norte 800".into(),
        email: "clinic@vet.cl".into(),
        phone: "+5632000000".into(),
        postal_code: "2520000".into(),
    }
}

pub fn vaccine(name: &str) -> Vaccine {
    Vaccine {
        name: name.into(),
        supplier: "MSD Animal Health".into(),
        code: format!("{}-LOT-7", name.to_uppercase()),
        date: 1_710_000_000,
        due_date: 1_741_536_000,
    }
}

// =============================================================================
// SERVICES
// =============================================================================

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn ctx(caller: Address) -> CallContext {
    CallContext::new(caller)
}

/// Empty registry administered by [`admin`].
pub fn service() -> TestService {
    init_tracing();
    create_test_service(admin()).expect("valid test configuration")
}

/// Registry where every listed account starts with `amount` wei.
pub fn funded_service(accounts: &[Address], amount: U256) -> TestService {
    let service = service();
    for account in accounts {
        service
            .ledger()
            .mint(*account, amount)
            .expect("mint into fresh ledger");
    }
    service
}

/// Registers "Max" to [`alice`].
pub async fn register_max(service: &TestService) -> CallReceipt {
    service
        .register(ctx(alice()), max_chip(), pet("Max"), contact("alice@dogbase.io"))
        .await
        .expect("register Max")
}

/// Sum of the balances of `accounts` plus the custody account.
pub async fn total_value(service: &TestService, accounts: &[Address]) -> U256 {
    let mut total = service
        .ledger()
        .balance_of(service.custody())
        .await
        .expect("custody balance");
    for account in accounts {
        total += service
            .ledger()
            .balance_of(*account)
            .await
            .expect("account balance");
    }
    total
}
