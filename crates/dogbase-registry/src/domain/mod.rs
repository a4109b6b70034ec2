//! # Domain Layer (Inner Hexagon)
//!
//! Pure business logic of the pet registry.
//! NO I/O, NO async, NO external dependencies.
//!
//! - `state` owns every entity table and the read-only queries.
//! - `identity`, `recovery`, `veterinary` and `market` implement the
//!   operations as `&mut RegistryState` methods that check before they write.
//! - `access` holds the role predicates every operation authorizes with.

pub mod access;
pub mod entities;
mod identity;
pub mod invariants;
mod market;
mod recovery;
pub mod services;
pub mod state;
pub mod value_objects;
mod veterinary;

#[cfg(test)]
pub(crate) mod test_support;

pub use access::*;
pub use entities::*;
pub use invariants::*;
pub use market::SaleSettlement;
pub use services::*;
pub use state::*;
pub use value_objects::*;
