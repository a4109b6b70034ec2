//! # Registry State
//!
//! Every entity table of the registry, plus its read-only queries.
//!
//! Operations live in sibling modules (`identity`, `recovery`, `veterinary`,
//! `market`) as `impl RegistryState` blocks. Each one validates all of its
//! preconditions before its first write, so a rejected operation leaves the
//! state untouched.

use crate::domain::entities::{
    CallOutput, FoundClaim, LostClaim, MarketOrder, OwnerContact, PetRecord, RecoveryStatus,
    RegisteredVetCenter, VaccineRecord,
};
use crate::domain::value_objects::{Address, OfficialSlot, OrderId, TokenId, VetCenterId};
use crate::errors::{EntityRef, RegistryError};
use crate::events::RegistryEvent;
use std::collections::{BTreeMap, HashMap, HashSet};

/// What a committed operation produced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Effects {
    /// Events in emission order.
    pub events: Vec<RegistryEvent>,
    /// Id assigned by the operation, if any.
    pub output: CallOutput,
}

impl Effects {
    pub(crate) fn events(events: Vec<RegistryEvent>) -> Self {
        Self {
            events,
            output: CallOutput::None,
        }
    }

    pub(crate) fn with_output(events: Vec<RegistryEvent>, output: CallOutput) -> Self {
        Self { events, output }
    }
}

/// The registry's complete state.
#[derive(Clone, Debug)]
pub struct RegistryState {
    pub(super) name: String,
    pub(super) symbol: String,
    pub(super) admin: Address,

    pub(super) pets: HashMap<TokenId, PetRecord>,
    pub(super) contacts: HashMap<TokenId, OwnerContact>,
    pub(super) owners: HashMap<TokenId, Address>,
    pub(super) balances: HashMap<Address, u64>,
    pub(super) token_approvals: HashMap<TokenId, Address>,
    pub(super) operator_approvals: HashMap<Address, HashSet<Address>>,

    pub(super) recovery: HashMap<TokenId, RecoveryStatus>,
    pub(super) lost_claims: HashMap<TokenId, Vec<LostClaim>>,
    pub(super) found_claims: HashMap<TokenId, Vec<FoundClaim>>,

    pub(super) vet_centers: Vec<RegisteredVetCenter>,
    pub(super) vet_officials: HashMap<VetCenterId, BTreeMap<OfficialSlot, Address>>,
    pub(super) vaccines: HashMap<TokenId, Vec<VaccineRecord>>,

    pub(super) orders: Vec<MarketOrder>,
    /// Token -> its single open order.
    pub(super) open_orders: HashMap<TokenId, OrderId>,
}

impl RegistryState {
    /// Creates an empty registry administered by `admin`.
    #[must_use]
    pub fn new(name: impl Into<String>, symbol: impl Into<String>, admin: Address) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            admin,
            pets: HashMap::new(),
            contacts: HashMap::new(),
            owners: HashMap::new(),
            balances: HashMap::new(),
            token_approvals: HashMap::new(),
            operator_approvals: HashMap::new(),
            recovery: HashMap::new(),
            lost_claims: HashMap::new(),
            found_claims: HashMap::new(),
            vet_centers: Vec::new(),
            vet_officials: HashMap::new(),
            vaccines: HashMap::new(),
            orders: Vec::new(),
            open_orders: HashMap::new(),
        }
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    #[must_use]
    pub fn collection_name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn collection_symbol(&self) -> &str {
        &self.symbol
    }

    #[must_use]
    pub fn admin(&self) -> Address {
        self.admin
    }

    /// Current owner, `None` for unregistered tokens.
    #[must_use]
    pub fn owner_of(&self, token_id: TokenId) -> Option<Address> {
        self.owners.get(&token_id).copied()
    }

    /// Number of tokens held by `owner`.
    #[must_use]
    pub fn balance_of(&self, owner: Address) -> u64 {
        self.balances.get(&owner).copied().unwrap_or(0)
    }

    /// Number of registered tokens.
    #[must_use]
    pub fn total_supply(&self) -> usize {
        self.pets.len()
    }

    #[must_use]
    pub fn exists(&self, token_id: TokenId) -> bool {
        self.pets.contains_key(&token_id)
    }

    #[must_use]
    pub fn pet(&self, token_id: TokenId) -> Option<&PetRecord> {
        self.pets.get(&token_id)
    }

    #[must_use]
    pub fn contact(&self, token_id: TokenId) -> Option<&OwnerContact> {
        self.contacts.get(&token_id)
    }

    /// Lost & found status, `None` for unregistered tokens.
    #[must_use]
    pub fn recovery_status(&self, token_id: TokenId) -> Option<RecoveryStatus> {
        self.recovery.get(&token_id).copied()
    }

    /// Lost claims in the order they were filed.
    #[must_use]
    pub fn lost_claims(&self, token_id: TokenId) -> &[LostClaim] {
        self.lost_claims.get(&token_id).map_or(&[], Vec::as_slice)
    }

    /// Found claims in the order they were filed.
    #[must_use]
    pub fn found_claims(&self, token_id: TokenId) -> &[FoundClaim] {
        self.found_claims.get(&token_id).map_or(&[], Vec::as_slice)
    }

    /// Address approved for a single token.
    #[must_use]
    pub fn get_approved(&self, token_id: TokenId) -> Option<Address> {
        self.token_approvals.get(&token_id).copied()
    }

    #[must_use]
    pub fn is_approved_for_all(&self, owner: Address, operator: Address) -> bool {
        self.operator_approvals
            .get(&owner)
            .is_some_and(|operators| operators.contains(&operator))
    }

    #[must_use]
    pub fn vet_center(&self, id: VetCenterId) -> Option<&RegisteredVetCenter> {
        usize::try_from(id.0)
            .ok()
            .and_then(|index| self.vet_centers.get(index))
    }

    #[must_use]
    pub fn vet_center_count(&self) -> u64 {
        self.vet_centers.len() as u64
    }

    #[must_use]
    pub fn vet_official(&self, id: VetCenterId, slot: OfficialSlot) -> Option<Address> {
        self.vet_officials
            .get(&id)
            .and_then(|roster| roster.get(&slot))
            .copied()
    }

    /// Vaccination history in the order it was recorded.
    #[must_use]
    pub fn vaccines(&self, token_id: TokenId) -> &[VaccineRecord] {
        self.vaccines.get(&token_id).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn order(&self, id: OrderId) -> Option<&MarketOrder> {
        usize::try_from(id.0)
            .ok()
            .and_then(|index| self.orders.get(index))
    }

    #[must_use]
    pub fn order_count(&self) -> u64 {
        self.orders.len() as u64
    }

    /// The open order for a token, if one exists.
    #[must_use]
    pub fn open_order_for(&self, token_id: TokenId) -> Option<&MarketOrder> {
        self.open_orders
            .get(&token_id)
            .and_then(|id| self.order(*id))
    }

    // =========================================================================
    // SHARED HELPERS
    // =========================================================================

    /// Owner of an existing token.
    pub(super) fn require_owner(&self, token_id: TokenId) -> Result<Address, RegistryError> {
        self.owner_of(token_id)
            .ok_or(RegistryError::NotFound(EntityRef::Token(token_id)))
    }

    pub(super) fn require_vet_center(
        &self,
        id: VetCenterId,
    ) -> Result<&RegisteredVetCenter, RegistryError> {
        self.vet_center(id)
            .ok_or(RegistryError::NotFound(EntityRef::VetCenter(id)))
    }

    pub(super) fn order_mut(&mut self, id: OrderId) -> Option<&mut MarketOrder> {
        usize::try_from(id.0)
            .ok()
            .and_then(|index| self.orders.get_mut(index))
    }

    /// Moves ownership and the per-owner counts, clearing the single-token
    /// approval. Returns the approval that was cleared.
    pub(super) fn move_token(
        &mut self,
        token_id: TokenId,
        from: Address,
        to: Address,
    ) -> Option<Address> {
        let cleared = self.token_approvals.remove(&token_id);
        if let Some(count) = self.balances.get_mut(&from) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.balances.remove(&from);
            }
        }
        *self.balances.entry(to).or_insert(0) += 1;
        self.owners.insert(token_id, to);
        cleared
    }
}
