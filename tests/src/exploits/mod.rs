//! # Exploit Simulations
//!
//! Attacks against the registry's access control and value settlement.
//!
//! | Attack | Target | Defense |
//! |--------|--------|---------|
//! | Re-entrant payout | `pay_reward`, `confirm_sale` | Task-local guard around every operation |
//! | Failing payout | `confirm_sale` | Sale rollback plus refund |
//! | Spawned callback | `pay_reward` | Waits for the lock, runs against committed state |
//! | Custody as counterparty | `pay_reward`, `confirm_sale` | Rejected; attached value refunded |
//! | Unauthorized write | every mutating operation | Role predicates checked before effects |
//! | Stale listing | `confirm_sale` | Seller must still own the token |

pub mod reentrancy;
