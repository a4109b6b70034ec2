//! # Property Tests
//!
//! Random operation sequences checked against the registry's global
//! invariants: token ids stay unique, ownership stays consistent, and value
//! is neither created nor lost by settlement.

use crate::fixtures::*;
use dogbase_registry::prelude::*;
use proptest::prelude::*;

/// Small actor pool so that random operations collide often.
pub fn actor(index: u8) -> Address {
    [alice(), bob(), carol(), mallory()][usize::from(index % 4)]
}

/// One randomly generated operation.
#[derive(Clone, Debug)]
pub enum Op {
    Register { caller: u8, token: u8 },
    Transfer { caller: u8, token: u8, to: u8 },
    List { caller: u8, token: u8, price: u16 },
    Confirm { caller: u8, order: u8, value: u16 },
    Cancel { caller: u8, order: u8 },
    Reward { caller: u8, token: u8, finder: u8, value: u16 },
}

impl Op {
    pub fn into_call(self) -> (RegistryCall, CallContext) {
        let token_id = |token: u8| TokenId::from(u64::from(token % 6) + 1);
        match self {
            Self::Register { caller, token } => (
                RegistryCall::Register {
                    token_id: token_id(token),
                    pet: pet("Random"),
                    contact: contact("random@dogbase.io"),
                },
                ctx(actor(caller)),
            ),
            Self::Transfer { caller, token, to } => (
                RegistryCall::Transfer {
                    token_id: token_id(token),
                    to: actor(to),
                },
                ctx(actor(caller)),
            ),
            Self::List {
                caller,
                token,
                price,
            } => (
                RegistryCall::ListForSale {
                    token_id: token_id(token),
                    price: U256::from(price),
                },
                ctx(actor(caller)),
            ),
            Self::Confirm {
                caller,
                order,
                value,
            } => (
                RegistryCall::ConfirmSale {
                    order_id: OrderId(u64::from(order % 8)),
                },
                ctx(actor(caller)).with_value(U256::from(value)),
            ),
            Self::Cancel { caller, order } => (
                RegistryCall::CancelOrder {
                    order_id: OrderId(u64::from(order % 8)),
                },
                ctx(actor(caller)),
            ),
            Self::Reward {
                caller,
                token,
                finder,
                value,
            } => (
                RegistryCall::PayReward {
                    token_id: token_id(token),
                    finder: actor(finder),
                },
                ctx(actor(caller)).with_value(U256::from(value)),
            ),
        }
    }
}

pub fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (any::<u8>(), any::<u8>()).prop_map(|(caller, token)| Op::Register { caller, token }),
        (any::<u8>(), any::<u8>(), any::<u8>())
            .prop_map(|(caller, token, to)| Op::Transfer { caller, token, to }),
        (any::<u8>(), any::<u8>(), 0u16..600).prop_map(|(caller, token, price)| Op::List {
            caller,
            token,
            price
        }),
        (any::<u8>(), any::<u8>(), 0u16..900).prop_map(|(caller, order, value)| Op::Confirm {
            caller,
            order,
            value
        }),
        (any::<u8>(), any::<u8>()).prop_map(|(caller, order)| Op::Cancel { caller, order }),
        (any::<u8>(), any::<u8>(), any::<u8>(), 0u16..900).prop_map(
            |(caller, token, finder, value)| Op::Reward {
                caller,
                token,
                finder,
                value
            }
        ),
    ]
}

/// Runs `ops` against a fresh service where every actor holds `funding` wei.
pub fn run_ops(ops: Vec<Op>, funding: u64) -> (TestService, Vec<Result<CallReceipt, RegistryError>>) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("runtime");
    let actors: Vec<Address> = (0..4).map(actor).collect();
    let service = funded_service(&actors, U256::from(funding));
    let results = runtime.block_on(async {
        let mut results = Vec::with_capacity(ops.len());
        for op in ops {
            let (call, ctx) = op.into_call();
            results.push(service.execute(call, ctx).await);
        }
        results
    });
    (service, results)
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_first_registration_wins(
            attempts in prop::collection::vec((any::<u8>(), 0u64..5), 1..40)
        ) {
            let mut state = RegistryState::new("DogBase", "DBT", admin());
            let mut first_owner = std::collections::HashMap::new();

            for (caller, id) in attempts {
                let token_id = TokenId::from(id);
                let result = state.register(actor(caller), token_id, pet("P"), contact("c@d.io"));
                match first_owner.get(&id) {
                    Some(_) => {
                        prop_assert_eq!(
                            result.unwrap_err(),
                            RegistryError::DuplicateEntity(EntityRef::Token(token_id))
                        );
                    }
                    None => {
                        prop_assert!(result.is_ok());
                        first_owner.insert(id, actor(caller));
                    }
                }
            }

            prop_assert_eq!(state.total_supply(), first_owner.len());
            for (id, owner) in &first_owner {
                prop_assert_eq!(state.owner_of(TokenId::from(*id)), Some(*owner));
            }
            prop_assert!(check_all_invariants(&state).is_valid());
        }

        #[test]
        fn prop_value_is_conserved(ops in prop::collection::vec(op_strategy(), 1..60)) {
            let funding = 2_000u64;
            let (service, _) = run_ops(ops, funding);
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("runtime");
            let actors: Vec<Address> = (0..4).map(actor).collect();

            let (total, custody) = runtime.block_on(async {
                (
                    total_value(&service, &actors).await,
                    service.ledger().balance_of(service.custody()).await.unwrap(),
                )
            });

            prop_assert_eq!(total, U256::from(funding * 4));
            prop_assert_eq!(custody, U256::zero());
            prop_assert_eq!(service.ledger().total_supply().unwrap(), U256::from(funding * 4));
        }

        #[test]
        fn prop_invariants_hold_after_any_sequence(ops in prop::collection::vec(op_strategy(), 1..60)) {
            let (service, results) = run_ops(ops, 2_000);
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("runtime");

            let check = runtime.block_on(service.verify_invariants()).unwrap();
            prop_assert!(check.is_valid(), "{:?}", check);

            let committed = results.iter().filter(|r| r.is_ok()).count() as u64;
            let stats = runtime.block_on(service.stats());
            prop_assert_eq!(stats.successful_calls, committed);
            prop_assert_eq!(stats.calls_executed, results.len() as u64);
        }
    }
}
