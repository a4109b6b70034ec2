//! # Pet Registry Service
//!
//! Async application service that totally orders registry operations and
//! settles attached value around them.
//!
//! ## Execution Model
//!
//! 1. Reject re-entrant calls (same task already inside the registry).
//! 2. Reject calls that would route value into custody itself.
//! 3. Take the state write lock for the whole operation.
//! 4. Pull the attached value into the custody account.
//! 5. Run the domain operation (checks, then effects).
//! 6. Pay out of custody.
//! 7. On any failure after step 4, undo domain effects and refund.
//! 8. Publish the buffered events, still under the lock.
//!
//! Custody holds value only while an operation is in flight: its balance after
//! every call equals its balance before.

use crate::adapters::{InMemoryEventLog, InMemoryLedger};
use crate::config::RegistryConfig;
use crate::domain::entities::{
    CallContext, FoundClaim, LostClaim, MarketOrder, OwnerContact, PetRecord, RecoveryStatus,
    RegisteredVetCenter, VaccineRecord,
};
use crate::domain::invariants::{check_all_invariants, InvariantCheckResult};
use crate::domain::SaleSettlement;
use crate::domain::state::{Effects, RegistryState};
use crate::domain::value_objects::{Address, OfficialSlot, OrderId, TokenId, VetCenterId, U256};
use crate::domain::access;
use crate::errors::{ConfigError, LedgerError, RegistryError};
use crate::ports::inbound::{CallReceipt, PetRegistryApi, RegistryCall};
use crate::ports::outbound::{EventSink, NativeLedger};

use async_trait::async_trait;
use std::time::Instant;
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

tokio::task_local! {
    /// Set while the current task is executing a registry operation.
    static IN_REGISTRY: ();
}

fn inside_registry() -> bool {
    IN_REGISTRY.try_with(|_| ()).is_ok()
}

/// Statistics for the registry service.
#[derive(Debug, Default, Clone)]
pub struct ServiceStats {
    /// Calls that reached the lock.
    pub calls_executed: u64,
    /// Calls that committed.
    pub successful_calls: u64,
    /// Calls rejected by validation or a ledger failure.
    pub failed_calls: u64,
    /// Calls rejected by the re-entrancy guard.
    pub reentrancy_rejections: u64,
    /// Event records published.
    pub events_emitted: u64,
    /// Value paid out of custody by committed calls, in wei.
    pub value_settled: U256,
    /// Average execution time in microseconds.
    pub avg_execution_time_us: u64,
}

/// One payment out of custody.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Payout {
    to: Address,
    amount: U256,
}

/// Result of running a call against the domain.
struct Applied {
    effects: Effects,
    payouts: Vec<Payout>,
    settlement: Option<SaleSettlement>,
}

/// The pet registry service.
pub struct PetRegistryService<L: NativeLedger, E: EventSink> {
    config: RegistryConfig,
    state: RwLock<RegistryState>,
    ledger: L,
    events: E,
    stats: RwLock<ServiceStats>,
}

impl<L: NativeLedger, E: EventSink> PetRegistryService<L, E> {
    /// Create a service with an empty registry.
    ///
    /// # Errors
    ///
    /// The configuration fails [`RegistryConfig::validate`].
    pub fn new(config: RegistryConfig, ledger: L, events: E) -> Result<Self, ConfigError> {
        config.validate()?;
        let state = RegistryState::new(config.name.clone(), config.symbol.clone(), config.admin);
        info!(
            name = %config.name,
            chain_id = config.chain_id,
            admin = %config.admin,
            "Pet registry service created"
        );
        Ok(Self {
            config,
            state: RwLock::new(state),
            ledger,
            events,
            stats: RwLock::new(ServiceStats::default()),
        })
    }

    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// The registry's custody account.
    #[must_use]
    pub fn custody(&self) -> Address {
        self.config.custody
    }

    #[must_use]
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    #[must_use]
    pub fn events(&self) -> &E {
        &self.events
    }

    /// Get current service statistics.
    pub async fn stats(&self) -> ServiceStats {
        self.stats.read().await.clone()
    }

    /// Runs `f` against a consistent snapshot of the state.
    ///
    /// # Errors
    ///
    /// `Reentrancy` when called from inside an executing operation.
    pub async fn view<R>(
        &self,
        f: impl FnOnce(&RegistryState) -> R + Send,
    ) -> Result<R, RegistryError> {
        if inside_registry() {
            warn!("Re-entrant view rejected");
            return Err(RegistryError::Reentrancy);
        }
        let state = self.state.read().await;
        Ok(f(&state))
    }

    /// Checks the structural invariants of the current state.
    pub async fn verify_invariants(&self) -> Result<InvariantCheckResult, RegistryError> {
        self.view(check_all_invariants).await
    }

    #[instrument(
        skip(self, call, ctx),
        fields(
            correlation_id = %correlation_id,
            operation = call.name(),
            caller = %ctx.caller,
        )
    )]
    async fn execute_guarded(
        &self,
        correlation_id: Uuid,
        call: RegistryCall,
        ctx: CallContext,
    ) -> Result<CallReceipt, RegistryError> {
        let start = Instant::now();
        let result = self.execute_locked(correlation_id, &call, &ctx).await;
        let elapsed_us = u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX);

        {
            let mut stats = self.stats.write().await;
            stats.calls_executed += 1;
            match &result {
                Ok((receipt, settled)) => {
                    stats.successful_calls += 1;
                    stats.events_emitted += receipt.records.len() as u64;
                    stats.value_settled = stats.value_settled.saturating_add(*settled);
                }
                Err(_) => stats.failed_calls += 1,
            }
            let total = stats.calls_executed;
            stats.avg_execution_time_us =
                (stats.avg_execution_time_us * (total - 1) + elapsed_us) / total;
        }

        match result {
            Ok((receipt, _)) => {
                info!(
                    records = receipt.records.len(),
                    output = ?receipt.output,
                    "Operation committed"
                );
                Ok(receipt)
            }
            Err(e) => {
                warn!(error = %e, kind = ?e.kind(), "Operation rejected");
                Err(e)
            }
        }
    }

    /// Runs one call under the write lock. Returns the receipt and the value
    /// paid out of custody.
    async fn execute_locked(
        &self,
        correlation_id: Uuid,
        call: &RegistryCall,
        ctx: &CallContext,
    ) -> Result<(CallReceipt, U256), RegistryError> {
        if ctx.block.chain_id != self.config.chain_id {
            return Err(RegistryError::invalid(format!(
                "call targets chain {}, registry runs on chain {}",
                ctx.block.chain_id, self.config.chain_id
            )));
        }
        if !call.is_payable() && !ctx.value.is_zero() {
            return Err(RegistryError::invalid(format!(
                "{} does not accept value",
                call.name()
            )));
        }

        self.check_counterparties(call, ctx)?;

        let mut state = self.state.write().await;

        if !ctx.value.is_zero() {
            self.collect(ctx).await?;
        }

        let applied = match apply_call(&mut state, call, ctx) {
            Ok(applied) => applied,
            Err(e) => {
                self.refund(ctx).await;
                return Err(e);
            }
        };

        let custody = self.config.custody;
        if applied
            .payouts
            .iter()
            .any(|payout| payout.to == custody && !payout.amount.is_zero())
        {
            self.abort(&mut state, &applied, ctx).await;
            return Err(RegistryError::invalid("payout to the custody account"));
        }

        if let Err(e) = self.pay_out(&applied.payouts).await {
            self.abort(&mut state, &applied, ctx).await;
            return Err(e);
        }

        let settled = applied
            .payouts
            .iter()
            .fold(U256::zero(), |total, payout| total.saturating_add(payout.amount));
        let records = self
            .events
            .emit(self.config.chain_id, ctx.block.number, applied.effects.events)
            .await;
        debug!(records = records.len(), "Events published");

        if self.config.verify_invariants {
            if let InvariantCheckResult::Invalid(violations) = check_all_invariants(&state) {
                for violation in &violations {
                    error!(%violation, "Registry invariant violated");
                }
            }
        }
        drop(state);

        Ok((
            CallReceipt {
                correlation_id,
                caller: ctx.caller,
                block_number: ctx.block.number,
                output: applied.effects.output,
                records,
            },
            settled,
        ))
    }

    /// Rejects calls that would route value back into custody.
    fn check_counterparties(
        &self,
        call: &RegistryCall,
        ctx: &CallContext,
    ) -> Result<(), RegistryError> {
        let custody = self.config.custody;
        if call.is_payable() && ctx.caller == custody {
            return Err(RegistryError::invalid(format!(
                "{} cannot be called by the custody account",
                call.name()
            )));
        }
        if let RegistryCall::PayReward { finder, .. } = call {
            if *finder == custody {
                return Err(RegistryError::invalid("finder is the custody account"));
            }
        }
        Ok(())
    }

    /// Moves the attached value from the caller into custody.
    ///
    /// A shortfall surfaces as `Ledger(InsufficientBalance)`, which carries
    /// the caller's available balance next to the attached amount.
    async fn collect(&self, ctx: &CallContext) -> Result<(), RegistryError> {
        self.ledger
            .transfer(ctx.caller, self.config.custody, ctx.value)
            .await
            .map_err(|e| {
                if !matches!(e, LedgerError::InsufficientBalance { .. }) {
                    error!(error = %e, "Failed to collect attached value");
                }
                RegistryError::from(e)
            })
    }

    /// Undoes the domain effects of `applied` and refunds the attached value.
    async fn abort(&self, state: &mut RegistryState, applied: &Applied, ctx: &CallContext) {
        if let Some(settlement) = &applied.settlement {
            state.rollback_sale(settlement);
            debug!(order_id = %settlement.order_id, "Sale rolled back");
        }
        self.refund(ctx).await;
    }

    /// Pays every payout, or none: completed payouts are reversed on failure.
    async fn pay_out(&self, payouts: &[Payout]) -> Result<(), RegistryError> {
        let custody = self.config.custody;
        for (index, payout) in payouts.iter().enumerate() {
            if payout.amount.is_zero() {
                continue;
            }
            if let Err(e) = self.ledger.transfer(custody, payout.to, payout.amount).await {
                error!(error = %e, to = %payout.to, amount = %payout.amount, "Payout failed");
                for done in payouts[..index].iter().rev().filter(|p| !p.amount.is_zero()) {
                    if let Err(reverse) = self.ledger.transfer(done.to, custody, done.amount).await
                    {
                        error!(
                            error = %reverse,
                            to = %done.to,
                            amount = %done.amount,
                            "Failed to reverse payout"
                        );
                    }
                }
                return Err(e.into());
            }
        }
        Ok(())
    }

    /// Returns the attached value to the caller after a failed call.
    async fn refund(&self, ctx: &CallContext) {
        if ctx.value.is_zero() {
            return;
        }
        if let Err(e) = self
            .ledger
            .transfer(self.config.custody, ctx.caller, ctx.value)
            .await
        {
            error!(
                error = %e,
                caller = %ctx.caller,
                amount = %ctx.value,
                "Failed to refund attached value"
            );
        }
    }
}

/// Dispatches a call to its domain operation and computes the payouts.
fn apply_call(
    state: &mut RegistryState,
    call: &RegistryCall,
    ctx: &CallContext,
) -> Result<Applied, RegistryError> {
    let caller = ctx.caller;
    let effects = match call.clone() {
        RegistryCall::Register {
            token_id,
            pet,
            contact,
        } => state.register(caller, token_id, pet, contact)?,
        RegistryCall::Transfer { token_id, to } => state.transfer(caller, token_id, to)?,
        RegistryCall::Approve { token_id, delegate } => {
            state.approve(caller, token_id, delegate)?
        }
        RegistryCall::SetApprovalForAll { operator, approved } => {
            state.set_approval_for_all(caller, operator, approved)?
        }
        RegistryCall::TransferAdministration { new_admin } => {
            state.transfer_administration(caller, new_admin)?
        }
        RegistryCall::UpdateContact { token_id, contact } => {
            state.update_contact(caller, token_id, contact)?
        }
        RegistryCall::ReportLost { token_id, report } => {
            state.report_lost(caller, token_id, report)?
        }
        RegistryCall::ReportFound {
            token_id,
            report,
            finder_contact,
        } => state.report_found(caller, token_id, report, finder_contact)?,
        RegistryCall::ConfirmFound { token_id } => state.confirm_found(caller, token_id)?,
        RegistryCall::PayReward { token_id, finder } => {
            let effects = state.check_reward(caller, token_id, finder, ctx.value)?;
            return Ok(Applied {
                effects,
                payouts: vec![Payout {
                    to: finder,
                    amount: ctx.value,
                }],
                settlement: None,
            });
        }
        RegistryCall::RegisterVetCenter { center } => state.register_vet_center(caller, center)?,
        RegistryCall::RegisterVetOfficial {
            vet_center_id,
            slot,
            official,
        } => state.register_vet_official(caller, vet_center_id, slot, official)?,
        RegistryCall::AddVaccineRecord {
            token_id,
            vaccine,
            vet_center_id,
        } => state.add_vaccine_record(caller, token_id, vaccine, vet_center_id)?,
        RegistryCall::ListForSale { token_id, price } => {
            state.list_for_sale(caller, token_id, price)?
        }
        RegistryCall::ConfirmSale { order_id } => {
            let (effects, settlement) = state.confirm_sale(caller, order_id, ctx.value)?;
            return Ok(Applied {
                effects,
                payouts: vec![
                    Payout {
                        to: settlement.seller,
                        amount: settlement.price,
                    },
                    Payout {
                        to: settlement.buyer,
                        amount: settlement.refund,
                    },
                ],
                settlement: Some(settlement),
            });
        }
        RegistryCall::CancelOrder { order_id } => state.cancel_order(caller, order_id)?,
    };
    Ok(Applied {
        effects,
        payouts: Vec::new(),
        settlement: None,
    })
}

/// Create a service with in-memory adapters administered by `admin` (for testing).
pub fn create_test_service(
    admin: Address,
) -> Result<PetRegistryService<InMemoryLedger, InMemoryEventLog>, ConfigError> {
    let config = RegistryConfig::with_admin(admin);
    let events = InMemoryEventLog::with_capacity(config.event_log_capacity);
    PetRegistryService::new(config, InMemoryLedger::new(), events)
}

// =============================================================================
// PetRegistryApi Implementation
// =============================================================================

#[async_trait]
impl<L: NativeLedger, E: EventSink> PetRegistryApi for PetRegistryService<L, E> {
    async fn execute(
        &self,
        call: RegistryCall,
        ctx: CallContext,
    ) -> Result<CallReceipt, RegistryError> {
        if inside_registry() {
            warn!(operation = call.name(), caller = %ctx.caller, "Re-entrant call rejected");
            self.stats.write().await.reentrancy_rejections += 1;
            return Err(RegistryError::Reentrancy);
        }
        let correlation_id = Uuid::new_v4();
        IN_REGISTRY
            .scope((), self.execute_guarded(correlation_id, call, ctx))
            .await
    }

    async fn owner_of(&self, token_id: TokenId) -> Result<Option<Address>, RegistryError> {
        self.view(|s| s.owner_of(token_id)).await
    }

    async fn balance_of(&self, owner: Address) -> Result<u64, RegistryError> {
        self.view(|s| s.balance_of(owner)).await
    }

    async fn total_supply(&self) -> Result<usize, RegistryError> {
        self.view(RegistryState::total_supply).await
    }

    async fn pet(&self, token_id: TokenId) -> Result<Option<PetRecord>, RegistryError> {
        self.view(|s| s.pet(token_id).cloned()).await
    }

    async fn contact(&self, token_id: TokenId) -> Result<Option<OwnerContact>, RegistryError> {
        self.view(|s| s.contact(token_id).cloned()).await
    }

    async fn recovery_status(
        &self,
        token_id: TokenId,
    ) -> Result<Option<RecoveryStatus>, RegistryError> {
        self.view(|s| s.recovery_status(token_id)).await
    }

    async fn lost_claims(&self, token_id: TokenId) -> Result<Vec<LostClaim>, RegistryError> {
        self.view(|s| s.lost_claims(token_id).to_vec()).await
    }

    async fn found_claims(&self, token_id: TokenId) -> Result<Vec<FoundClaim>, RegistryError> {
        self.view(|s| s.found_claims(token_id).to_vec()).await
    }

    async fn get_approved(&self, token_id: TokenId) -> Result<Option<Address>, RegistryError> {
        self.view(|s| s.get_approved(token_id)).await
    }

    async fn is_approved_for_all(
        &self,
        owner: Address,
        operator: Address,
    ) -> Result<bool, RegistryError> {
        self.view(|s| s.is_approved_for_all(owner, operator)).await
    }

    async fn admin(&self) -> Result<Address, RegistryError> {
        self.view(RegistryState::admin).await
    }

    async fn vet_center(
        &self,
        id: VetCenterId,
    ) -> Result<Option<RegisteredVetCenter>, RegistryError> {
        self.view(|s| s.vet_center(id).cloned()).await
    }

    async fn vet_center_count(&self) -> Result<u64, RegistryError> {
        self.view(RegistryState::vet_center_count).await
    }

    async fn vet_official(
        &self,
        id: VetCenterId,
        slot: OfficialSlot,
    ) -> Result<Option<Address>, RegistryError> {
        self.view(|s| s.vet_official(id, slot)).await
    }

    async fn is_vet_official(&self, who: Address, id: VetCenterId) -> Result<bool, RegistryError> {
        self.view(|s| access::is_vet_official(s, who, id)).await
    }

    async fn vaccines(&self, token_id: TokenId) -> Result<Vec<VaccineRecord>, RegistryError> {
        self.view(|s| s.vaccines(token_id).to_vec()).await
    }

    async fn order(&self, id: OrderId) -> Result<Option<MarketOrder>, RegistryError> {
        self.view(|s| s.order(id).cloned()).await
    }

    async fn order_count(&self) -> Result<u64, RegistryError> {
        self.view(RegistryState::order_count).await
    }

    async fn open_order_for(&self, token_id: TokenId) -> Result<Option<MarketOrder>, RegistryError> {
        self.view(|s| s.open_order_for(token_id).cloned()).await
    }

    async fn collection_name(&self) -> Result<String, RegistryError> {
        self.view(|s| s.collection_name().to_string()).await
    }

    async fn collection_symbol(&self) -> Result<String, RegistryError> {
        self.view(|s| s.collection_symbol().to_string()).await
    }
}

// =============================================================================
// TESTS
// =============================================================================
