//! # Driving Ports (API - Inbound)
//!
//! The public API of the registry. Every state change goes through
//! [`PetRegistryApi::execute`]; the remaining methods are read-only views and
//! typed shorthands over `execute`.

use crate::domain::entities::{
    CallContext, CallOutput, FoundReport, LostClaim, FoundClaim, LostReport, MarketOrder,
    OwnerContact, PetRecord, RecoveryStatus, RegisteredVetCenter, Vaccine, VaccineRecord,
    VetCenter,
};
use crate::domain::value_objects::{
    Address, OfficialSlot, OrderId, TokenId, VetCenterId, U256,
};
use crate::errors::RegistryError;
use crate::events::EventRecord;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// CALLS
// =============================================================================

/// A state-changing registry operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistryCall {
    Register {
        token_id: TokenId,
        pet: PetRecord,
        contact: OwnerContact,
    },
    Transfer {
        token_id: TokenId,
        to: Address,
    },
    Approve {
        token_id: TokenId,
        delegate: Address,
    },
    SetApprovalForAll {
        operator: Address,
        approved: bool,
    },
    TransferAdministration {
        new_admin: Address,
    },
    UpdateContact {
        token_id: TokenId,
        contact: OwnerContact,
    },
    ReportLost {
        token_id: TokenId,
        report: LostReport,
    },
    ReportFound {
        token_id: TokenId,
        report: FoundReport,
        finder_contact: OwnerContact,
    },
    ConfirmFound {
        token_id: TokenId,
    },
    /// Forwards the attached value to `finder`.
    PayReward {
        token_id: TokenId,
        finder: Address,
    },
    RegisterVetCenter {
        center: VetCenter,
    },
    RegisterVetOfficial {
        vet_center_id: VetCenterId,
        slot: OfficialSlot,
        official: Address,
    },
    AddVaccineRecord {
        token_id: TokenId,
        vaccine: Vaccine,
        vet_center_id: VetCenterId,
    },
    ListForSale {
        token_id: TokenId,
        price: U256,
    },
    /// Buys the order with the attached value.
    ConfirmSale {
        order_id: OrderId,
    },
    CancelOrder {
        order_id: OrderId,
    },
}

impl RegistryCall {
    /// Operation name used in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Register { .. } => "register",
            Self::Transfer { .. } => "transfer",
            Self::Approve { .. } => "approve",
            Self::SetApprovalForAll { .. } => "set_approval_for_all",
            Self::TransferAdministration { .. } => "transfer_administration",
            Self::UpdateContact { .. } => "update_contact",
            Self::ReportLost { .. } => "report_lost",
            Self::ReportFound { .. } => "report_found",
            Self::ConfirmFound { .. } => "confirm_found",
            Self::PayReward { .. } => "pay_reward",
            Self::RegisterVetCenter { .. } => "register_vet_center",
            Self::RegisterVetOfficial { .. } => "register_vet_official",
            Self::AddVaccineRecord { .. } => "add_vaccine_record",
            Self::ListForSale { .. } => "list_for_sale",
            Self::ConfirmSale { .. } => "confirm_sale",
            Self::CancelOrder { .. } => "cancel_order",
        }
    }

    /// Whether the operation accepts attached value.
    #[must_use]
    pub fn is_payable(&self) -> bool {
        matches!(self, Self::PayReward { .. } | Self::ConfirmSale { .. })
    }
}

/// Outcome of a committed operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallReceipt {
    /// Correlates the receipt with the operation's log lines.
    pub correlation_id: Uuid,
    pub caller: Address,
    pub block_number: u64,
    /// Id assigned by the operation, if any.
    pub output: CallOutput,
    /// Events in the order they entered the log.
    pub records: Vec<EventRecord>,
}

// =============================================================================
// REGISTRY API
// =============================================================================

/// Primary API for the pet registry.
#[async_trait]
pub trait PetRegistryApi: Send + Sync {
    /// Executes one operation atomically.
    ///
    /// # Errors
    ///
    /// Any [`RegistryError`]. A failed call leaves state, balances and the
    /// event log as they were.
    async fn execute(&self, call: RegistryCall, ctx: CallContext)
        -> Result<CallReceipt, RegistryError>;

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    async fn owner_of(&self, token_id: TokenId) -> Result<Option<Address>, RegistryError>;

    async fn balance_of(&self, owner: Address) -> Result<u64, RegistryError>;

    async fn total_supply(&self) -> Result<usize, RegistryError>;

    async fn pet(&self, token_id: TokenId) -> Result<Option<PetRecord>, RegistryError>;

    async fn contact(&self, token_id: TokenId) -> Result<Option<OwnerContact>, RegistryError>;

    async fn recovery_status(
        &self,
        token_id: TokenId,
    ) -> Result<Option<RecoveryStatus>, RegistryError>;

    async fn lost_claims(&self, token_id: TokenId) -> Result<Vec<LostClaim>, RegistryError>;

    async fn found_claims(&self, token_id: TokenId) -> Result<Vec<FoundClaim>, RegistryError>;

    async fn get_approved(&self, token_id: TokenId) -> Result<Option<Address>, RegistryError>;

    async fn is_approved_for_all(
        &self,
        owner: Address,
        operator: Address,
    ) -> Result<bool, RegistryError>;

    async fn admin(&self) -> Result<Address, RegistryError>;

    async fn vet_center(
        &self,
        id: VetCenterId,
    ) -> Result<Option<RegisteredVetCenter>, RegistryError>;

    async fn vet_center_count(&self) -> Result<u64, RegistryError>;

    async fn vet_official(
        &self,
        id: VetCenterId,
        slot: OfficialSlot,
    ) -> Result<Option<Address>, RegistryError>;

    async fn is_vet_official(&self, who: Address, id: VetCenterId) -> Result<bool, RegistryError>;

    async fn vaccines(&self, token_id: TokenId) -> Result<Vec<VaccineRecord>, RegistryError>;

    async fn order(&self, id: OrderId) -> Result<Option<MarketOrder>, RegistryError>;

    async fn order_count(&self) -> Result<u64, RegistryError>;

    async fn open_order_for(&self, token_id: TokenId) -> Result<Option<MarketOrder>, RegistryError>;

    async fn collection_name(&self) -> Result<String, RegistryError>;

    async fn collection_symbol(&self) -> Result<String, RegistryError>;

    // -------------------------------------------------------------------------
    // Typed shorthands
    // -------------------------------------------------------------------------

    async fn register(
        &self,
        ctx: CallContext,
        token_id: TokenId,
        pet: PetRecord,
        contact: OwnerContact,
    ) -> Result<CallReceipt, RegistryError> {
        self.execute(RegistryCall::Register { token_id, pet, contact }, ctx)
            .await
    }

    async fn transfer(
        &self,
        ctx: CallContext,
        token_id: TokenId,
        to: Address,
    ) -> Result<CallReceipt, RegistryError> {
        self.execute(RegistryCall::Transfer { token_id, to }, ctx).await
    }

    async fn approve(
        &self,
        ctx: CallContext,
        token_id: TokenId,
        delegate: Address,
    ) -> Result<CallReceipt, RegistryError> {
        self.execute(RegistryCall::Approve { token_id, delegate }, ctx)
            .await
    }

    async fn set_approval_for_all(
        &self,
        ctx: CallContext,
        operator: Address,
        approved: bool,
    ) -> Result<CallReceipt, RegistryError> {
        self.execute(RegistryCall::SetApprovalForAll { operator, approved }, ctx)
            .await
    }

    async fn transfer_administration(
        &self,
        ctx: CallContext,
        new_admin: Address,
    ) -> Result<CallReceipt, RegistryError> {
        self.execute(RegistryCall::TransferAdministration { new_admin }, ctx)
            .await
    }

    async fn update_contact(
        &self,
        ctx: CallContext,
        token_id: TokenId,
        contact: OwnerContact,
    ) -> Result<CallReceipt, RegistryError> {
        self.execute(RegistryCall::UpdateContact { token_id, contact }, ctx)
            .await
    }

    async fn report_lost(
        &self,
        ctx: CallContext,
        token_id: TokenId,
        report: LostReport,
    ) -> Result<CallReceipt, RegistryError> {
        self.execute(RegistryCall::ReportLost { token_id, report }, ctx)
            .await
    }

    async fn report_found(
        &self,
        ctx: CallContext,
        token_id: TokenId,
        report: FoundReport,
        finder_contact: OwnerContact,
    ) -> Result<CallReceipt, RegistryError> {
        self.execute(
            RegistryCall::ReportFound {
                token_id,
                report,
                finder_contact,
            },
            ctx,
        )
        .await
    }

    async fn confirm_found(
        &self,
        ctx: CallContext,
        token_id: TokenId,
    ) -> Result<CallReceipt, RegistryError> {
        self.execute(RegistryCall::ConfirmFound { token_id }, ctx).await
    }

    async fn pay_reward(
        &self,
        ctx: CallContext,
        token_id: TokenId,
        finder: Address,
    ) -> Result<CallReceipt, RegistryError> {
        self.execute(RegistryCall::PayReward { token_id, finder }, ctx)
            .await
    }

    async fn register_vet_center(
        &self,
        ctx: CallContext,
        center: VetCenter,
    ) -> Result<CallReceipt, RegistryError> {
        self.execute(RegistryCall::RegisterVetCenter { center }, ctx)
            .await
    }

    async fn register_vet_official(
        &self,
        ctx: CallContext,
        vet_center_id: VetCenterId,
        slot: OfficialSlot,
        official: Address,
    ) -> Result<CallReceipt, RegistryError> {
        self.execute(
            RegistryCall::RegisterVetOfficial {
                vet_center_id,
                slot,
                official,
            },
            ctx,
        )
        .await
    }

    async fn add_vaccine_record(
        &self,
        ctx: CallContext,
        token_id: TokenId,
        vaccine: Vaccine,
        vet_center_id: VetCenterId,
    ) -> Result<CallReceipt, RegistryError> {
        self.execute(
            RegistryCall::AddVaccineRecord {
                token_id,
                vaccine,
                vet_center_id,
            },
            ctx,
        )
        .await
    }

    async fn list_for_sale(
        &self,
        ctx: CallContext,
        price: U256,
        token_id: TokenId,
    ) -> Result<CallReceipt, RegistryError> {
        self.execute(RegistryCall::ListForSale { token_id, price }, ctx)
            .await
    }

    async fn confirm_sale(
        &self,
        ctx: CallContext,
        order_id: OrderId,
    ) -> Result<CallReceipt, RegistryError> {
        self.execute(RegistryCall::ConfirmSale { order_id }, ctx).await
    }

    async fn cancel_order(
        &self,
        ctx: CallContext,
        order_id: OrderId,
    ) -> Result<CallReceipt, RegistryError> {
        self.execute(RegistryCall::CancelOrder { order_id }, ctx).await
    }
}
