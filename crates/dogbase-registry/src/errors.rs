//! # Error Types
//!
//! All error types for the registry, its driven ports and its configuration.

use crate::domain::value_objects::{
    Address, AddressParseError, OrderId, TokenId, VetCenterId, U256,
};
use std::fmt;
use thiserror::Error;

// =============================================================================
// ERROR TAXONOMY
// =============================================================================

/// The five rejection kinds every failed operation maps onto.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Id already in use.
    DuplicateEntity,
    /// Reference to a nonexistent token, center or order.
    NotFound,
    /// Caller lacks the required role.
    Unauthorized,
    /// Operation not valid for the current entity state.
    InvalidState,
    /// Attached value below the required amount.
    InsufficientFunds,
}

/// Entity referenced by a `DuplicateEntity` or `NotFound` error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityRef {
    Token(TokenId),
    VetCenter(VetCenterId),
    Order(OrderId),
    /// An open order that already exists for this token.
    OpenOrder(TokenId),
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token(id) => write!(f, "token {id}"),
            Self::VetCenter(id) => write!(f, "vet center {id}"),
            Self::Order(id) => write!(f, "order {id}"),
            Self::OpenOrder(id) => write!(f, "open order for token {id}"),
        }
    }
}

/// Role a caller failed to hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Owner(TokenId),
    OwnerOrDelegate(TokenId),
    Admin,
    CenterAuthority(VetCenterId),
    VetOfficial(VetCenterId),
    SellerOrOwner(OrderId),
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Owner(id) => write!(f, "owner of token {id}"),
            Self::OwnerOrDelegate(id) => write!(f, "owner or approved delegate of token {id}"),
            Self::Admin => write!(f, "registry admin"),
            Self::CenterAuthority(id) => write!(f, "registrar of vet center {id} or admin"),
            Self::VetOfficial(id) => write!(f, "official of vet center {id}"),
            Self::SellerOrOwner(id) => write!(f, "seller or token owner of order {id}"),
        }
    }
}

// =============================================================================
// REGISTRY ERRORS
// =============================================================================

/// Why an operation was rejected. A rejected operation leaves no trace.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The id is already in use.
    #[error("duplicate entity: {0}")]
    DuplicateEntity(EntityRef),

    /// The referenced entity does not exist.
    #[error("not found: {0}")]
    NotFound(EntityRef),

    /// The caller lacks the required role.
    #[error("unauthorized: {caller:?} is not {required}")]
    Unauthorized { caller: Address, required: Role },

    /// The operation is not valid in the current state.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Attached value is below the required amount.
    #[error("insufficient funds: required {required}, attached {attached}")]
    InsufficientFunds { required: U256, attached: U256 },

    /// A call arrived while the same task was already inside the registry.
    #[error("re-entrant call rejected")]
    Reentrancy,

    /// The native-currency ledger failed.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

impl RegistryError {
    /// Maps the error onto the five-kind taxonomy.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DuplicateEntity(_) => ErrorKind::DuplicateEntity,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Unauthorized { .. } => ErrorKind::Unauthorized,
            Self::InvalidState(_) | Self::Reentrancy => ErrorKind::InvalidState,
            Self::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            Self::Ledger(LedgerError::InsufficientBalance { .. }) => ErrorKind::InsufficientFunds,
            Self::Ledger(_) => ErrorKind::InvalidState,
        }
    }

    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidState(reason.into())
    }

    pub(crate) fn unauthorized(caller: Address, required: Role) -> Self {
        Self::Unauthorized { caller, required }
    }
}

// =============================================================================
// LEDGER ERRORS
// =============================================================================

/// Errors from the native-currency ledger port.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Sender cannot cover the transfer.
    #[error("insufficient balance for {account:?}: required {required}, available {available}")]
    InsufficientBalance {
        account: Address,
        required: U256,
        available: U256,
    },

    /// Recipient balance would overflow 256 bits.
    #[error("balance overflow for {0:?}")]
    Overflow(Address),

    /// Ledger backend is unreachable or corrupted.
    #[error("ledger unavailable: {0}")]
    Unavailable(String),
}

// =============================================================================
// CONFIG ERRORS
// =============================================================================

/// Configuration errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Admin is the zero address.
    #[error("admin address must not be zero")]
    ZeroAdmin,

    /// Custody account is the zero address.
    #[error("custody address must not be zero")]
    ZeroCustody,

    /// An address variable could not be parsed.
    #[error("invalid address in {var}: {source}")]
    InvalidAddress {
        var: &'static str,
        #[source]
        source: AddressParseError,
    },

    /// Chain id variable is not an unsigned integer.
    #[error("invalid chain id: {0:?}")]
    InvalidChainId(String),
}

// =============================================================================
// TESTS
// =============================================================================
