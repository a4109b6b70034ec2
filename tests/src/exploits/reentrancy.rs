//! # Re-entrant Payout Attacks
//!
//! A hostile ledger calls back into the registry while custody is paying
//! out, the way a malicious receiving contract would. Every nested call must
//! be rejected and the outer operation must still settle exactly once.

use dogbase_registry::prelude::*;
use std::sync::{Arc, Mutex, OnceLock, Weak};
use tokio::task::JoinHandle;

/// Registry wired to a ledger that attacks it.
pub type HostileService = PetRegistryService<HostileLedger, InMemoryEventLog>;

/// How the ledger misbehaves when custody pays out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Attack {
    /// Call back into the registry to steal `target` for the payee.
    Reenter { target: TokenId },
    /// Refuse every payout credited to `victim`.
    RejectCredit { victim: Address },
    /// Spawn a theft of `target` for the payee without awaiting it.
    Deferred { target: TokenId },
}

/// Ledger that runs an [`Attack`] on every payout out of custody.
pub struct HostileLedger {
    inner: InMemoryLedger,
    custody: Address,
    attack: Attack,
    registry: OnceLock<Weak<HostileService>>,
    /// Outcome of every nested write and read, in order.
    nested: Mutex<Vec<RegistryError>>,
    /// Calls spawned by [`Attack::Deferred`].
    deferred: Mutex<Vec<JoinHandle<Result<CallReceipt, RegistryError>>>>,
}

impl HostileLedger {
    pub fn new(custody: Address, attack: Attack) -> Self {
        Self {
            inner: InMemoryLedger::new(),
            custody,
            attack,
            registry: OnceLock::new(),
            nested: Mutex::new(Vec::new()),
            deferred: Mutex::new(Vec::new()),
        }
    }

    pub fn mint(&self, account: Address, amount: U256) {
        self.inner.mint(account, amount).expect("mint");
    }

    pub fn nested_errors(&self) -> Vec<RegistryError> {
        self.nested.lock().expect("nested log").clone()
    }

    pub fn take_deferred(&self) -> Vec<JoinHandle<Result<CallReceipt, RegistryError>>> {
        std::mem::take(&mut *self.deferred.lock().expect("deferred calls"))
    }

    fn record(&self, error: RegistryError) {
        self.nested.lock().expect("nested log").push(error);
    }
}

#[async_trait::async_trait]
impl NativeLedger for HostileLedger {
    async fn balance_of(&self, account: Address) -> Result<U256, LedgerError> {
        self.inner.balance_of(account).await
    }

    async fn transfer(&self, from: Address, to: Address, amount: U256) -> Result<(), LedgerError> {
        if from == self.custody {
            match self.attack {
                Attack::Reenter { target } => {
                    if let Some(registry) = self.registry.get().and_then(Weak::upgrade) {
                        let steal = registry
                            .transfer(CallContext::new(to), target, to)
                            .await;
                        let peek = registry.owner_of(target).await;
                        for error in [steal.err(), peek.err()].into_iter().flatten() {
                            self.record(error);
                        }
                    }
                }
                Attack::RejectCredit { victim } if to == victim => {
                    return Err(LedgerError::Unavailable("credit refused".into()));
                }
                Attack::RejectCredit { .. } => {}
                Attack::Deferred { target } => {
                    if let Some(registry) = self.registry.get().and_then(Weak::upgrade) {
                        let handle = tokio::spawn(async move {
                            registry.transfer(CallContext::new(to), target, to).await
                        });
                        self.deferred.lock().expect("deferred calls").push(handle);
                    }
                }
            }
        }
        self.inner.transfer(from, to, amount).await
    }
}

/// Builds a registry over a [`HostileLedger`] and hands the ledger a handle
/// back to it.
pub fn hostile_service(attack: Attack) -> Arc<HostileService> {
    crate::fixtures::init_tracing();
    let config = RegistryConfig::with_admin(crate::fixtures::admin());
    let ledger = HostileLedger::new(config.custody, attack);
    let service = Arc::new(
        PetRegistryService::new(config, ledger, InMemoryEventLog::new()).expect("valid config"),
    );
    let _ = service.ledger().registry.set(Arc::downgrade(&service));
    service
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::*;

    async fn register(service: &HostileService, owner: Address, token_id: TokenId) {
        service
            .register(ctx(owner), token_id, pet("Max"), contact("owner@dogbase.io"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_reward_payout_cannot_reenter() {
        let service = hostile_service(Attack::Reenter { target: max_chip() });
        service.ledger().mint(alice(), U256::from(1_000));
        register(&service, alice(), max_chip()).await;

        service
            .pay_reward(ctx(alice()).with_value(U256::from(300)), max_chip(), mallory())
            .await
            .unwrap();

        assert_eq!(
            service.ledger().nested_errors(),
            vec![RegistryError::Reentrancy, RegistryError::Reentrancy]
        );
        assert_eq!(service.owner_of(max_chip()).await.unwrap(), Some(alice()));
        assert_eq!(
            service.ledger().balance_of(mallory()).await.unwrap(),
            U256::from(300)
        );
        assert_eq!(
            service.ledger().balance_of(service.custody()).await.unwrap(),
            U256::zero()
        );
        let stats = service.stats().await;
        assert_eq!(stats.reentrancy_rejections, 1);
        assert_eq!(stats.value_settled, U256::from(300));
    }

    #[tokio::test]
    async fn test_sale_payout_cannot_reenter() {
        let service = hostile_service(Attack::Reenter { target: max_chip() });
        service.ledger().mint(bob(), U256::from(500));
        register(&service, mallory(), max_chip()).await;
        let order_id = service
            .list_for_sale(ctx(mallory()), U256::from(400), max_chip())
            .await
            .unwrap()
            .output
            .order_id()
            .unwrap();

        service
            .confirm_sale(ctx(bob()).with_value(U256::from(500)), order_id)
            .await
            .unwrap();

        // One payout to the seller, one refund of the overpayment to the buyer.
        assert_eq!(service.ledger().nested_errors().len(), 4);
        assert!(service
            .ledger()
            .nested_errors()
            .iter()
            .all(|e| *e == RegistryError::Reentrancy));
        assert_eq!(service.owner_of(max_chip()).await.unwrap(), Some(bob()));
        assert_eq!(
            service.ledger().balance_of(mallory()).await.unwrap(),
            U256::from(400)
        );
        assert_eq!(
            service.ledger().balance_of(bob()).await.unwrap(),
            U256::from(100)
        );
        assert!(service.verify_invariants().await.unwrap().is_valid());
    }

    #[tokio::test]
    async fn test_refused_payout_rolls_sale_back() {
        let service = hostile_service(Attack::RejectCredit { victim: alice() });
        service.ledger().mint(bob(), U256::from(500));
        register(&service, alice(), max_chip()).await;
        service.approve(ctx(alice()), max_chip(), carol()).await.unwrap();
        let order_id = service
            .list_for_sale(ctx(alice()), U256::from(400), max_chip())
            .await
            .unwrap()
            .output
            .order_id()
            .unwrap();
        let records_before = service.events().len().await;

        let err = service
            .confirm_sale(ctx(bob()).with_value(U256::from(400)), order_id)
            .await
            .unwrap_err();

        assert!(matches!(err, RegistryError::Ledger(LedgerError::Unavailable(_))));
        assert_eq!(service.owner_of(max_chip()).await.unwrap(), Some(alice()));
        assert_eq!(service.get_approved(max_chip()).await.unwrap(), Some(carol()));
        let order = service.order(order_id).await.unwrap().unwrap();
        assert!(order.is_open());
        assert_eq!(order.buyer, None);
        assert_eq!(
            service.open_order_for(max_chip()).await.unwrap().map(|o| o.order_id),
            Some(order_id)
        );
        assert_eq!(
            service.ledger().balance_of(bob()).await.unwrap(),
            U256::from(500)
        );
        assert_eq!(
            service.ledger().balance_of(service.custody()).await.unwrap(),
            U256::zero()
        );
        assert_eq!(service.events().len().await, records_before);
        assert!(service.verify_invariants().await.unwrap().is_valid());
    }

    #[tokio::test]
    async fn test_spawned_callback_runs_after_commit() {
        let service = hostile_service(Attack::Deferred { target: max_chip() });
        service.ledger().mint(alice(), U256::from(1_000));
        register(&service, alice(), max_chip()).await;

        service
            .pay_reward(ctx(alice()).with_value(U256::from(300)), max_chip(), mallory())
            .await
            .unwrap();

        let handles = service.ledger().take_deferred();
        assert_eq!(handles.len(), 1);
        for handle in handles {
            let outcome = tokio::time::timeout(std::time::Duration::from_secs(5), handle)
                .await
                .expect("deferred call finished")
                .unwrap();
            assert_eq!(outcome.unwrap_err().kind(), ErrorKind::Unauthorized);
        }
        assert_eq!(service.owner_of(max_chip()).await.unwrap(), Some(alice()));
        assert_eq!(
            service.ledger().balance_of(mallory()).await.unwrap(),
            U256::from(300)
        );
        assert_eq!(service.stats().await.reentrancy_rejections, 0);
    }
}
