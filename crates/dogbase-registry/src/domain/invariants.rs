//! # Domain Invariants
//!
//! Structural invariants that must hold after every committed operation.
//! The service can check them after each commit and logs any violation.
//!
//! - Ownership is single-valued and total over registered tokens.
//! - Per-owner counts match the ownership table.
//! - A token has at most one open order, and the open-order index is exact.
//! - Single-token approvals only exist for registered tokens and never name
//!   the owner.

use crate::domain::state::RegistryState;
use crate::domain::value_objects::{Address, OrderId, TokenId};
use std::collections::HashMap;

// =============================================================================
// INVARIANT CHECKS
// =============================================================================

/// Every registered token has exactly one non-zero owner, and nothing else does.
#[must_use]
pub fn check_ownership_invariant(state: &RegistryState) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    for token_id in state.pets.keys() {
        match state.owners.get(token_id) {
            None => violations.push(InvariantViolation::MissingOwner { token_id: *token_id }),
            Some(owner) if owner.is_zero() => {
                violations.push(InvariantViolation::ZeroOwner { token_id: *token_id });
            }
            Some(_) => {}
        }
    }
    for token_id in state.owners.keys() {
        if !state.pets.contains_key(token_id) {
            violations.push(InvariantViolation::OrphanOwnership { token_id: *token_id });
        }
    }
    violations
}

/// Recorded per-owner counts equal the counts derived from ownership.
#[must_use]
pub fn check_balance_invariant(state: &RegistryState) -> Vec<InvariantViolation> {
    let mut derived: HashMap<Address, u64> = HashMap::new();
    for owner in state.owners.values() {
        *derived.entry(*owner).or_insert(0) += 1;
    }

    let mut violations = Vec::new();
    for (owner, actual) in &derived {
        let recorded = state.balance_of(*owner);
        if recorded != *actual {
            violations.push(InvariantViolation::BalanceMismatch {
                owner: *owner,
                recorded,
                actual: *actual,
            });
        }
    }
    for (owner, recorded) in &state.balances {
        if *recorded > 0 && !derived.contains_key(owner) {
            violations.push(InvariantViolation::BalanceMismatch {
                owner: *owner,
                recorded: *recorded,
                actual: 0,
            });
        }
    }
    violations
}

/// Open orders and the open-order index agree, one open order per token.
#[must_use]
pub fn check_open_order_invariant(state: &RegistryState) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let mut open_by_token: HashMap<TokenId, OrderId> = HashMap::new();

    for order in state.orders.iter().filter(|order| order.is_open()) {
        if let Some(first) = open_by_token.insert(order.token_id, order.order_id) {
            violations.push(InvariantViolation::MultipleOpenOrders {
                token_id: order.token_id,
                orders: (first, order.order_id),
            });
        }
        if state.open_orders.get(&order.token_id) != Some(&order.order_id) {
            violations.push(InvariantViolation::UnindexedOpenOrder {
                order_id: order.order_id,
            });
        }
    }
    for (token_id, order_id) in &state.open_orders {
        let indexed = state
            .order(*order_id)
            .is_some_and(|order| order.is_open() && order.token_id == *token_id);
        if !indexed {
            violations.push(InvariantViolation::DanglingOrderIndex {
                token_id: *token_id,
                order_id: *order_id,
            });
        }
    }
    violations
}

/// Approvals reference registered tokens and never the owner itself.
#[must_use]
pub fn check_approval_invariant(state: &RegistryState) -> Vec<InvariantViolation> {
    state
        .token_approvals
        .iter()
        .filter(|(token_id, approved)| {
            state.owner_of(**token_id).map_or(true, |owner| owner == **approved)
        })
        .map(|(token_id, _)| InvariantViolation::InvalidApproval { token_id: *token_id })
        .collect()
}

/// Check all invariants at once.
#[must_use]
pub fn check_all_invariants(state: &RegistryState) -> InvariantCheckResult {
    let mut violations = check_ownership_invariant(state);
    violations.extend(check_balance_invariant(state));
    violations.extend(check_open_order_invariant(state));
    violations.extend(check_approval_invariant(state));

    if violations.is_empty() {
        InvariantCheckResult::Valid
    } else {
        InvariantCheckResult::Invalid(violations)
    }
}

// =============================================================================
// INVARIANT TYPES
// =============================================================================

/// Result of checking all invariants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantCheckResult {
    /// All invariants hold.
    Valid,
    /// One or more invariants violated.
    Invalid(Vec<InvariantViolation>),
}

impl InvariantCheckResult {
    /// Returns true if all invariants hold.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Specific invariant violation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantViolation {
    MissingOwner { token_id: TokenId },
    ZeroOwner { token_id: TokenId },
    OrphanOwnership { token_id: TokenId },
    BalanceMismatch {
        owner: Address,
        recorded: u64,
        actual: u64,
    },
    MultipleOpenOrders {
        token_id: TokenId,
        orders: (OrderId, OrderId),
    },
    UnindexedOpenOrder { order_id: OrderId },
    DanglingOrderIndex { token_id: TokenId, order_id: OrderId },
    InvalidApproval { token_id: TokenId },
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingOwner { token_id } => write!(f, "token {token_id} has no owner"),
            Self::ZeroOwner { token_id } => write!(f, "token {token_id} is owned by zero"),
            Self::OrphanOwnership { token_id } => {
                write!(f, "ownership recorded for unregistered token {token_id}")
            }
            Self::BalanceMismatch {
                owner,
                recorded,
                actual,
            } => write!(f, "balance of {owner} is {recorded}, owns {actual}"),
            Self::MultipleOpenOrders { token_id, orders } => write!(
                f,
                "token {token_id} has open orders {} and {}",
                orders.0, orders.1
            ),
            Self::UnindexedOpenOrder { order_id } => {
                write!(f, "open order {order_id} missing from index")
            }
            Self::DanglingOrderIndex { token_id, order_id } => {
                write!(f, "index maps token {token_id} to non-open order {order_id}")
            }
            Self::InvalidApproval { token_id } => {
                write!(f, "approval for token {token_id} is invalid")
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
