//! Typed payloads exchanged with the catalog and auth services.
//!
//! Wire names follow the services (`ISBN`, `Book_Title`, `access_token`, ...);
//! Rust field names follow the domain.

pub mod catalog;
pub mod session;

pub use catalog::{
    Book, BookDraft, BookSummary, BookUpdate, CartItem, EarningsPerMonth, Order, OrderItem,
    OrdersPerMonth, PublisherShare, Review,
};
pub use session::{AccessClaims, Role, Session, TokenPair};
