//! Cart checkout saga.
//!
//! 1. Fetch the whole cart (not the page on display).
//! 2. Build the order from that snapshot and the address.
//! 3. Submit the order.
//! 4. On success, clear the local cart view.
//!
//! There is no compensation. If the fetch fails nothing is submitted; if the
//! submission fails the view is left as it was and nothing is retried. The
//! catalog service decides whether the snapshot is still valid (stock, items
//! removed meanwhile) and its rejection is returned unchanged.

use tracing::{info, warn};

use crate::cart::CartView;
use crate::catalog::CatalogApi;
use crate::error::ApiError;
use crate::models::{CartItem, Order};

pub struct CartOrderSaga<'a> {
    catalog: &'a CatalogApi,
}

impl<'a> CartOrderSaga<'a> {
    pub fn new(catalog: &'a CatalogApi) -> Self {
        Self { catalog }
    }

    /// Place an order for everything in the cart, shipped to `address`.
    /// Returns the order that was accepted.
    pub async fn checkout(&self, view: &mut CartView, address: &str) -> Result<Order, ApiError> {
        let snapshot: Vec<CartItem> = self
            .catalog
            .cart_all()
            .await
            .inspect_err(|e| warn!(error = %e, "checkout aborted: cart fetch failed"))?
            .iter()
            .map(CartItem::from)
            .collect();

        let order = Order::from_cart(address, &snapshot);

        self.catalog
            .place_order(&order)
            .await
            .inspect_err(|e| warn!(error = %e, items = order.items.len(), "order rejected"))?;

        view.clear();
        info!(items = order.items.len(), "order placed");
        Ok(order)
    }
}
