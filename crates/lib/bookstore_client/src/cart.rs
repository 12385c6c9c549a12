//! Local, paginated view of the user's cart.
//!
//! The view is never authoritative: it mirrors what the catalog service last
//! returned and is re-fetched on demand.

use crate::catalog::CatalogApi;
use crate::error::ApiError;
use crate::models::{BookSummary, CartItem};

/// Cart rows per page on the storefront cart page.
pub const DEFAULT_CART_PAGE_SIZE: u32 = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct CartView {
    pub items: Vec<BookSummary>,
    /// 1-based.
    pub current_page: u32,
    pub per_page: u32,
    pub total_items: u64,
    pub total_pages: u64,
}

impl Default for CartView {
    fn default() -> Self {
        Self::new(DEFAULT_CART_PAGE_SIZE)
    }
}

impl CartView {
    pub fn new(per_page: u32) -> Self {
        Self {
            items: Vec::new(),
            current_page: 1,
            per_page: per_page.max(1),
            total_items: 0,
            total_pages: 0,
        }
    }

    /// Fetch the totals and the first page. The view is left untouched if
    /// either call fails.
    pub async fn load(&mut self, catalog: &CatalogApi) -> Result<(), ApiError> {
        let total_items = catalog.cart_total().await?;
        let items = catalog.cart_page(1, self.per_page).await?;
        self.total_items = total_items;
        self.total_pages = page_count(total_items, self.per_page);
        self.current_page = 1;
        self.items = items;
        Ok(())
    }

    /// Fetch another page, keeping the totals.
    pub async fn go_to(&mut self, catalog: &CatalogApi, page: u32) -> Result<(), ApiError> {
        let page = page.max(1);
        let items = catalog.cart_page(page, self.per_page).await?;
        self.current_page = page;
        self.items = items;
        Ok(())
    }

    /// Reset to an empty cart after a successful order.
    pub fn clear(&mut self) {
        self.items.clear();
        self.current_page = 1;
        self.total_items = 0;
        self.total_pages = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.total_items == 0
    }

    /// Entries on the current page as cart items.
    pub fn page_items(&self) -> Vec<CartItem> {
        self.items.iter().map(CartItem::from).collect()
    }

    /// Sum of the prices on the current page.
    pub fn page_total(&self) -> f64 {
        self.items.iter().map(|b| b.price).sum()
    }
}

/// `ceil(total / per_page)`.
pub fn page_count(total: u64, per_page: u32) -> u64 {
    let per_page = u64::from(per_page.max(1));
    total.div_ceil(per_page)
}
