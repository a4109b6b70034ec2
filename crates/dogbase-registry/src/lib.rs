//! # DogBase Registry - Pet Identity & Marketplace State Machine
//!
//! Each animal is a uniquely chipped, ownable record with a lifecycle of
//! registration, loss, recovery, veterinary treatment and resale. Every
//! mutation is an atomic operation; value attached to a call moves inside the
//! same operation as the state change it pays for.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | Token ids are unique | `domain/identity.rs` - `register()` |
//! | Ownership is single-valued and total | `domain/invariants.rs` - `check_ownership_invariant()` |
//! | Only owner or delegate transfers, lists, updates contact | `domain/access.rs` - `is_approved_or_owner()` |
//! | Only a center's official records vaccines for it | `domain/access.rs` - `is_vet_official()` |
//! | At most one open order per token | `domain/invariants.rs` - `check_open_order_invariant()` |
//! | Custody balance is unchanged by every call | `service.rs` - `execute_locked()` |
//!
//! ## Operations
//!
//! | Area | Operations |
//! |------|-----------|
//! | Identity | `register`, `transfer`, `approve`, `set_approval_for_all`, `transfer_administration`, `update_contact` |
//! | Lost & found | `report_lost`, `report_found`, `confirm_found`, `pay_reward` (payable) |
//! | Veterinary | `register_vet_center`, `register_vet_official`, `add_vaccine_record` |
//! | Marketplace | `list_for_sale`, `confirm_sale` (payable), `cancel_order` |
//!
//! ## Outbound Dependencies
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | `NativeLedger` | Native-currency balances |
//! | `EventSink` | Event log consumed by indexers |
//!
//! ## Usage Example
//!
//! ```ignore
//! use dogbase_registry::prelude::*;
//!
//! let service = create_test_service(admin)?;
//! let receipt = service
//!     .register(CallContext::new(owner), "123456789012345".parse()?, pet, contact)
//!     .await?;
//! assert_eq!(service.owner_of(token_id).await?, Some(owner));
//! ```

// Crate-level lints
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::missing_errors_doc)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod config;
pub mod domain;
pub mod errors;
pub mod events;
pub mod ports;
pub mod service;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Domain entities
    pub use crate::domain::entities::{
        BlockContext, CallContext, CallOutput, FoundClaim, FoundReport, LostClaim, LostReport,
        MarketOrder, OrderState, OwnerContact, PetRecord, RecoveryStatus, RegisteredVetCenter,
        Vaccine, VaccineRecord, VetCenter,
    };

    // Value objects
    pub use crate::domain::value_objects::{
        units, Address, Hash, OfficialSlot, OrderId, Timestamp, TokenId, VetCenterId, U256,
    };

    // Domain state and services
    pub use crate::domain::services::keccak256;
    pub use crate::domain::state::{Effects, RegistryState};
    pub use crate::domain::SaleSettlement;

    // Invariants
    pub use crate::domain::invariants::{
        check_all_invariants, InvariantCheckResult, InvariantViolation,
    };

    // Ports
    pub use crate::ports::inbound::{CallReceipt, PetRegistryApi, RegistryCall};
    pub use crate::ports::outbound::{EventSink, NativeLedger};

    // Events
    pub use crate::events::{EventRecord, RegistryEvent};

    // Errors
    pub use crate::errors::{ConfigError, EntityRef, ErrorKind, LedgerError, RegistryError, Role};

    // Configuration
    pub use crate::config::RegistryConfig;

    // Adapters
    pub use crate::adapters::{InMemoryEventLog, InMemoryLedger};

    // Service
    pub use crate::service::{create_test_service, PetRegistryService, ServiceStats};
}

// =============================================================================
// CRATE INFO
// =============================================================================

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
