//! # Core Domain Entities
//!
//! Records held by the registry and the context every call executes in.

use crate::domain::value_objects::{Address, OrderId, Timestamp, TokenId, VetCenterId, U256};
use serde::{Deserialize, Serialize};

// =============================================================================
// PET IDENTITY
// =============================================================================

/// Descriptive record of a registered pet.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetRecord {
    pub name: String,
    pub species: String,
    pub breed: String,
    pub sex: String,
    pub country: String,
    pub region: String,
    pub city: String,
    pub address: String,
    pub tattoo: String,
    pub color: String,
    /// Photo reference (URL or content hash).
    pub photo: String,
    pub postal_code: String,
    pub birthday: Timestamp,
}

/// Contact details of an owner (or of a finder, on found claims).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerContact {
    pub email: String,
    pub cell_phone: String,
    pub other_phone: String,
}

// =============================================================================
// LOST & FOUND
// =============================================================================

/// Where and when a pet went missing, as reported by its owner.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LostReport {
    pub missing_date: Timestamp,
    pub postal_code: String,
    pub country: String,
    pub region: String,
    pub city: String,
    pub address: String,
}

/// Stored lost claim. `reporter` is always the caller of `report_lost`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LostClaim {
    pub report: LostReport,
    pub reporter: Address,
}

/// A finder's report.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoundReport {
    pub found_date: Timestamp,
}

/// Stored found claim. `finder` is always the caller of `report_found`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoundClaim {
    pub found_date: Timestamp,
    pub finder: Address,
    pub finder_contact: OwnerContact,
}

/// Per-token lost & found state.
///
/// ```text
/// Registered ──report_lost──→ Lost ──report_found──→ FoundPendingConfirmation
///     ↑                                                        │
///     └──────────────────────confirm_found─────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecoveryStatus {
    /// No open lost/found episode.
    #[default]
    Registered,
    /// Owner reported the pet missing.
    Lost,
    /// Someone reported finding the pet; owner has not confirmed yet.
    FoundPendingConfirmation,
}

// =============================================================================
// VETERINARY
// =============================================================================

/// Veterinary center details.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VetCenter {
    pub name: String,
    pub country: String,
    pub region: String,
    pub city: String,
    pub address: String,
    pub email: String,
    pub phone: String,
    pub postal_code: String,
}

/// A vet center together with the address that registered it.
///
/// The registrar is the center's registering authority: it (or the admin)
/// assigns the center's officials.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredVetCenter {
    pub center: VetCenter,
    pub registrar: Address,
}

/// Vaccine administration details supplied by an official.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vaccine {
    pub name: String,
    pub supplier: String,
    /// Batch code.
    pub code: String,
    pub date: Timestamp,
    pub due_date: Timestamp,
}

/// Stored vaccination record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaccineRecord {
    pub vaccine: Vaccine,
    pub vet_center_id: VetCenterId,
    pub administered_by: Address,
}

// =============================================================================
// MARKETPLACE
// =============================================================================

/// Lifecycle of a market order. `Confirmed` and `Cancelled` are terminal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderState {
    #[default]
    Open,
    Confirmed,
    Cancelled,
}

/// Standing offer to sell a token at a fixed price.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketOrder {
    pub order_id: OrderId,
    pub token_id: TokenId,
    /// Price in wei.
    pub price: U256,
    /// Owner of the token at listing time.
    pub seller: Address,
    pub state: OrderState,
    /// Set once the order is confirmed.
    pub buyer: Option<Address>,
}

impl MarketOrder {
    /// Returns true while the order can still be confirmed or cancelled.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state == OrderState::Open
    }
}

// =============================================================================
// CALL CONTEXT
// =============================================================================

/// Block-level information for a call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockContext {
    /// Block number.
    pub number: u64,
    /// Block timestamp (unix seconds).
    pub timestamp: Timestamp,
    /// Chain the block belongs to.
    pub chain_id: u64,
}

impl Default for BlockContext {
    fn default() -> Self {
        Self {
            number: 0,
            timestamp: 0,
            chain_id: 31_337,
        }
    }
}

/// Who is calling, with how much value, in which block.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallContext {
    /// Authenticated caller. Authorization is decided against this address.
    pub caller: Address,
    /// Native currency attached to the call, in wei.
    pub value: U256,
    /// Block the call executes in.
    pub block: BlockContext,
}

impl CallContext {
    /// Creates a context with no attached value in the default block.
    #[must_use]
    pub fn new(caller: Address) -> Self {
        Self {
            caller,
            value: U256::zero(),
            block: BlockContext::default(),
        }
    }

    /// Attaches native currency to the call.
    #[must_use]
    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }

    /// Executes the call in the given block.
    #[must_use]
    pub fn in_block(mut self, block: BlockContext) -> Self {
        self.block = block;
        self
    }
}

/// Identifier assigned by an operation, if any.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallOutput {
    #[default]
    None,
    VetCenter(VetCenterId),
    Order(OrderId),
}

impl CallOutput {
    /// Vet center id assigned by `register_vet_center`.
    #[must_use]
    pub fn vet_center_id(&self) -> Option<VetCenterId> {
        match self {
            Self::VetCenter(id) => Some(*id),
            _ => None,
        }
    }

    /// Order id assigned by `list_for_sale`.
    #[must_use]
    pub fn order_id(&self) -> Option<OrderId> {
        match self {
            Self::Order(id) => Some(*id),
            _ => None,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
