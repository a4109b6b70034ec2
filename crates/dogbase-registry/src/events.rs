//! # Event Schema
//!
//! Structured events emitted by every committed operation. This is the wire
//! contract consumed by off-chain indexers.
//!
//! ## Record Identity
//!
//! Each [`EventRecord`] is identified by `(chain_id, block_number, log_index)`.
//! Indexers key their rows by [`EventRecord::id`], formatted
//! `"{chain_id}_{block_number}_{log_index}"`.
//!
//! ## Topics
//!
//! | Event | Signature |
//! |-------|-----------|
//! | `Registered` | `Registered(uint256,string,uint256,string,string,address)` |
//! | `Transfer` | `Transfer(address,address,uint256)` |
//! | `Approval` | `Approval(address,address,uint256)` |
//! | `ApprovalForAll` | `ApprovalForAll(address,address,bool)` |
//! | `Lost` | `Lost(uint256,address,uint256)` |
//! | `Found` | `Found(uint256,address,uint256)` |
//! | `SaleConfirmed` | `SaleConfirmed(uint256,uint256,address,uint256)` |
//!
//! The topic is the Keccak-256 hash of the signature.

use crate::domain::services::keccak256;
use crate::domain::value_objects::{
    Address, Hash, OfficialSlot, OrderId, Timestamp, TokenId, VetCenterId, U256,
};
use serde::{Deserialize, Serialize};

// =============================================================================
// REGISTRY EVENTS
// =============================================================================

/// Event emitted by a committed registry operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistryEvent {
    /// A pet was registered.
    Registered {
        token_id: TokenId,
        name: String,
        birthday: Timestamp,
        breed: String,
        sex: String,
        owner: Address,
    },
    /// Ownership changed. `from` is zero on mint.
    Transfer {
        from: Address,
        to: Address,
        token_id: TokenId,
    },
    /// Single-token approval set or cleared (`approved` zero).
    Approval {
        owner: Address,
        approved: Address,
        token_id: TokenId,
    },
    /// Operator approval granted or revoked.
    ApprovalForAll {
        owner: Address,
        operator: Address,
        approved: bool,
    },
    AdministrationTransferred {
        previous_admin: Address,
        new_admin: Address,
    },
    /// Owner contact replaced.
    ContactUpdated { token_id: TokenId },
    Lost {
        token_id: TokenId,
        reporter: Address,
        date: Timestamp,
    },
    Found {
        token_id: TokenId,
        finder: Address,
        date: Timestamp,
    },
    FoundConfirmed { token_id: TokenId },
    RewardPaid {
        token_id: TokenId,
        finder: Address,
        amount: U256,
    },
    VetCenterRegistered {
        vet_center_id: VetCenterId,
        name: String,
    },
    VetOfficialRegistered {
        vet_center_id: VetCenterId,
        slot: OfficialSlot,
        official: Address,
    },
    VaccineAdded {
        token_id: TokenId,
        /// Position of the record in the token's vaccination history.
        index: u64,
        vaccine_name: String,
        vet_center_id: VetCenterId,
        date: Timestamp,
    },
    Listed {
        order_id: OrderId,
        token_id: TokenId,
        price: U256,
    },
    SaleConfirmed {
        order_id: OrderId,
        token_id: TokenId,
        buyer: Address,
        price: U256,
    },
    OrderCancelled {
        order_id: OrderId,
        token_id: TokenId,
    },
}

impl RegistryEvent {
    /// Event name as it appears on the wire.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Registered { .. } => "Registered",
            Self::Transfer { .. } => "Transfer",
            Self::Approval { .. } => "Approval",
            Self::ApprovalForAll { .. } => "ApprovalForAll",
            Self::AdministrationTransferred { .. } => "AdministrationTransferred",
            Self::ContactUpdated { .. } => "ContactUpdated",
            Self::Lost { .. } => "Lost",
            Self::Found { .. } => "Found",
            Self::FoundConfirmed { .. } => "FoundConfirmed",
            Self::RewardPaid { .. } => "RewardPaid",
            Self::VetCenterRegistered { .. } => "VetCenterRegistered",
            Self::VetOfficialRegistered { .. } => "VetOfficialRegistered",
            Self::VaccineAdded { .. } => "VaccineAdded",
            Self::Listed { .. } => "Listed",
            Self::SaleConfirmed { .. } => "SaleConfirmed",
            Self::OrderCancelled { .. } => "OrderCancelled",
        }
    }

    /// Canonical ABI-style signature.
    #[must_use]
    pub fn signature(&self) -> &'static str {
        match self {
            Self::Registered { .. } => "Registered(uint256,string,uint256,string,string,address)",
            Self::Transfer { .. } => "Transfer(address,address,uint256)",
            Self::Approval { .. } => "Approval(address,address,uint256)",
            Self::ApprovalForAll { .. } => "ApprovalForAll(address,address,bool)",
            Self::AdministrationTransferred { .. } => "AdministrationTransferred(address,address)",
            Self::ContactUpdated { .. } => "ContactUpdated(uint256)",
            Self::Lost { .. } => "Lost(uint256,address,uint256)",
            Self::Found { .. } => "Found(uint256,address,uint256)",
            Self::FoundConfirmed { .. } => "FoundConfirmed(uint256)",
            Self::RewardPaid { .. } => "RewardPaid(uint256,address,uint256)",
            Self::VetCenterRegistered { .. } => "VetCenterRegistered(uint256,string)",
            Self::VetOfficialRegistered { .. } => "VetOfficialRegistered(uint256,uint256,address)",
            Self::VaccineAdded { .. } => "VaccineAdded(uint256,uint256,string,uint256,uint256)",
            Self::Listed { .. } => "Listed(uint256,uint256,uint256)",
            Self::SaleConfirmed { .. } => "SaleConfirmed(uint256,uint256,address,uint256)",
            Self::OrderCancelled { .. } => "OrderCancelled(uint256,uint256)",
        }
    }

    /// Keccak-256 of the signature.
    #[must_use]
    pub fn topic(&self) -> Hash {
        keccak256(self.signature().as_bytes())
    }

    /// Token the event concerns, if any.
    #[must_use]
    pub fn token_id(&self) -> Option<TokenId> {
        match self {
            Self::Registered { token_id, .. }
            | Self::Transfer { token_id, .. }
            | Self::Approval { token_id, .. }
            | Self::ContactUpdated { token_id }
            | Self::Lost { token_id, .. }
            | Self::Found { token_id, .. }
            | Self::FoundConfirmed { token_id }
            | Self::RewardPaid { token_id, .. }
            | Self::VaccineAdded { token_id, .. }
            | Self::Listed { token_id, .. }
            | Self::SaleConfirmed { token_id, .. }
            | Self::OrderCancelled { token_id, .. } => Some(*token_id),
            Self::ApprovalForAll { .. }
            | Self::AdministrationTransferred { .. }
            | Self::VetCenterRegistered { .. }
            | Self::VetOfficialRegistered { .. } => None,
        }
    }
}

// =============================================================================
// EVENT RECORDS
// =============================================================================

/// An event placed in the log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub chain_id: u64,
    pub block_number: u64,
    /// Position of the record within its block.
    pub log_index: u64,
    pub topic: Hash,
    pub event: RegistryEvent,
}

impl EventRecord {
    /// Creates a record, deriving the topic from the event.
    #[must_use]
    pub fn new(chain_id: u64, block_number: u64, log_index: u64, event: RegistryEvent) -> Self {
        Self {
            chain_id,
            block_number,
            log_index,
            topic: event.topic(),
            event,
        }
    }

    /// Indexing identity, `"{chain_id}_{block_number}_{log_index}"`.
    #[must_use]
    pub fn id(&self) -> String {
        format!("{}_{}_{}", self.chain_id, self.block_number, self.log_index)
    }

    /// Serializes the record to its JSON wire form.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

// =============================================================================
// TESTS
// =============================================================================
