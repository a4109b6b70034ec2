//! # Marketplace
//!
//! Fixed-price listings settled through the registry's custody account.
//!
//! A token has at most one open order. An order whose seller no longer owns
//! the token is stale: it cannot be confirmed, and listing the token again
//! supersedes it.

use crate::domain::access::{is_approved_or_owner, is_owner};
use crate::domain::entities::{CallOutput, MarketOrder, OrderState};
use crate::domain::state::{Effects, RegistryState};
use crate::domain::value_objects::{Address, OrderId, TokenId, U256};
use crate::errors::{EntityRef, RegistryError, Role};
use crate::events::RegistryEvent;

/// Record of a committed sale, enough to pay it out or to undo it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SaleSettlement {
    pub order_id: OrderId,
    pub token_id: TokenId,
    pub seller: Address,
    pub buyer: Address,
    pub price: U256,
    /// Attached value above the price, owed back to the buyer.
    pub refund: U256,
    /// Single-token approval cleared by the sale.
    pub cleared_approval: Option<Address>,
}

impl RegistryState {
    /// Opens an order selling `token_id` for `price` wei.
    ///
    /// # Errors
    ///
    /// - `NotFound` for an unregistered token
    /// - `Unauthorized` unless the caller is owner, approved or operator
    /// - `InvalidState` when the price is zero
    /// - `DuplicateEntity` when a live open order already exists
    pub fn list_for_sale(
        &mut self,
        caller: Address,
        token_id: TokenId,
        price: U256,
    ) -> Result<Effects, RegistryError> {
        let seller = self.require_owner(token_id)?;
        if !is_approved_or_owner(self, caller, token_id) {
            return Err(RegistryError::unauthorized(
                caller,
                Role::OwnerOrDelegate(token_id),
            ));
        }
        if price.is_zero() {
            return Err(RegistryError::invalid("price must be greater than zero"));
        }
        let superseded = match self.open_order_for(token_id) {
            Some(open) if open.seller == seller => {
                return Err(RegistryError::DuplicateEntity(EntityRef::OpenOrder(token_id)));
            }
            Some(stale) => Some(stale.order_id),
            None => None,
        };

        let mut events = Vec::with_capacity(2);
        if let Some(stale_id) = superseded {
            if let Some(stale) = self.order_mut(stale_id) {
                stale.state = OrderState::Cancelled;
            }
            events.push(RegistryEvent::OrderCancelled {
                order_id: stale_id,
                token_id,
            });
        }

        let order_id = OrderId(self.order_count());
        self.orders.push(MarketOrder {
            order_id,
            token_id,
            price,
            seller,
            state: OrderState::Open,
            buyer: None,
        });
        self.open_orders.insert(token_id, order_id);
        events.push(RegistryEvent::Listed {
            order_id,
            token_id,
            price,
        });

        Ok(Effects::with_output(events, CallOutput::Order(order_id)))
    }

    /// Sells the order's token to `buyer` for the attached `value`.
    ///
    /// Ownership moves before anything is paid. The returned settlement names
    /// who must be paid out of custody, and is the input to
    /// [`RegistryState::rollback_sale`] if a payout fails.
    ///
    /// # Errors
    ///
    /// - `NotFound` for an unknown order
    /// - `InvalidState` if the order is not open, is stale, or the buyer is
    ///   the seller
    /// - `InsufficientFunds` if `value` is below the price
    pub fn confirm_sale(
        &mut self,
        buyer: Address,
        order_id: OrderId,
        value: U256,
    ) -> Result<(Effects, SaleSettlement), RegistryError> {
        let order = self
            .order(order_id)
            .ok_or(RegistryError::NotFound(EntityRef::Order(order_id)))?;
        if !order.is_open() {
            return Err(RegistryError::invalid(format!("order {order_id} is not open")));
        }
        let (token_id, seller, price) = (order.token_id, order.seller, order.price);
        if !is_owner(self, seller, token_id) {
            return Err(RegistryError::invalid(format!(
                "order {order_id} is stale: seller no longer owns token {token_id}"
            )));
        }
        if buyer == seller {
            return Err(RegistryError::invalid("buyer is the seller"));
        }
        if value < price {
            return Err(RegistryError::InsufficientFunds {
                required: price,
                attached: value,
            });
        }

        let cleared_approval = self.move_token(token_id, seller, buyer);
        if let Some(order) = self.order_mut(order_id) {
            order.state = OrderState::Confirmed;
            order.buyer = Some(buyer);
        }
        self.open_orders.remove(&token_id);

        let effects = Effects::events(vec![
            RegistryEvent::Transfer {
                from: seller,
                to: buyer,
                token_id,
            },
            RegistryEvent::SaleConfirmed {
                order_id,
                token_id,
                buyer,
                price,
            },
        ]);
        let settlement = SaleSettlement {
            order_id,
            token_id,
            seller,
            buyer,
            price,
            refund: value - price,
            cleared_approval,
        };
        Ok((effects, settlement))
    }

    /// Undoes a sale committed by [`RegistryState::confirm_sale`].
    ///
    /// Only valid while nothing else has touched the token since the sale.
    pub fn rollback_sale(&mut self, settlement: &SaleSettlement) {
        let token_id = settlement.token_id;
        self.move_token(token_id, settlement.buyer, settlement.seller);
        if let Some(approved) = settlement.cleared_approval {
            self.token_approvals.insert(token_id, approved);
        }
        if let Some(order) = self.order_mut(settlement.order_id) {
            order.state = OrderState::Open;
            order.buyer = None;
        }
        self.open_orders.insert(token_id, settlement.order_id);
    }

    /// Withdraws an open order.
    ///
    /// # Errors
    ///
    /// - `NotFound` for an unknown order
    /// - `InvalidState` if the order is not open
    /// - `Unauthorized` unless the caller is the seller or the token's owner
    pub fn cancel_order(
        &mut self,
        caller: Address,
        order_id: OrderId,
    ) -> Result<Effects, RegistryError> {
        let order = self
            .order(order_id)
            .ok_or(RegistryError::NotFound(EntityRef::Order(order_id)))?;
        if !order.is_open() {
            return Err(RegistryError::invalid(format!("order {order_id} is not open")));
        }
        let token_id = order.token_id;
        if caller != order.seller && !is_owner(self, caller, token_id) {
            return Err(RegistryError::unauthorized(
                caller,
                Role::SellerOrOwner(order_id),
            ));
        }

        if let Some(order) = self.order_mut(order_id) {
            order.state = OrderState::Cancelled;
        }
        if self.open_orders.get(&token_id) == Some(&order_id) {
            self.open_orders.remove(&token_id);
        }

        Ok(Effects::events(vec![RegistryEvent::OrderCancelled {
            order_id,
            token_id,
        }]))
    }
}
