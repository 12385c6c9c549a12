//! Catalog, cart and order models.

use serde::{Deserialize, Deserializer, Serialize};

/// Full book record as served by `GET /book`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    #[serde(rename = "ISBN")]
    pub isbn: String,
    #[serde(rename = "Book_Title")]
    pub title: String,
    #[serde(rename = "Book_Author")]
    pub author: String,
    #[serde(rename = "Year_Of_Publication", default)]
    pub year: Option<i32>,
    #[serde(rename = "Publisher", default)]
    pub publisher: Option<String>,
    #[serde(rename = "Image_URL", default)]
    pub image_url: Option<String>,
    #[serde(rename = "Average_Rating", default)]
    pub average_rating: f64,
    #[serde(rename = "Price", deserialize_with = "non_negative_price")]
    pub price: f64,
    #[serde(rename = "Quantity", default)]
    pub quantity: u32,
}

/// List projection of a book, used by catalog search, cart and review pages.
///
/// In `/reviews` rows `average_rating` holds the user's own rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookSummary {
    #[serde(rename = "ISBN")]
    pub isbn: String,
    #[serde(rename = "Book_Title")]
    pub title: String,
    #[serde(rename = "Book_Author")]
    pub author: String,
    #[serde(rename = "Image_URL", default)]
    pub image_url: Option<String>,
    #[serde(rename = "Average_Rating", default)]
    pub average_rating: f64,
    #[serde(rename = "Price", deserialize_with = "non_negative_price")]
    pub price: f64,
}

/// A row of the user's review history.
pub type Review = BookSummary;

/// One cart entry. Each entry stands for a single copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub isbn: String,
}

impl From<&BookSummary> for CartItem {
    fn from(book: &BookSummary) -> Self {
        CartItem {
            isbn: book.isbn.clone(),
        }
    }
}

/// Line of an order payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub isbn: String,
}

/// Order payload for `POST /order`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub address: String,
    pub items: Vec<OrderItem>,
}

impl Order {
    /// Build an order from a cart snapshot, keeping the cart's item order.
    pub fn from_cart(address: impl Into<String>, cart: &[CartItem]) -> Self {
        Order {
            address: address.into(),
            items: cart
                .iter()
                .map(|item| OrderItem {
                    isbn: item.isbn.clone(),
                })
                .collect(),
        }
    }
}

/// New book for `POST /admin/book`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookDraft {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub year: i32,
    pub publisher: String,
    pub image: String,
    pub price: f64,
    pub quantity: u32,
}

/// Stock and price change for `PUT /admin/book`. Absent fields are left as is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookUpdate {
    pub isbn: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrdersPerMonth {
    /// `YYYY-MM`.
    pub month: String,
    #[serde(rename = "orderCount")]
    pub order_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarningsPerMonth {
    /// `YYYY-MM`.
    pub month: String,
    pub earnings: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublisherShare {
    pub publisher: String,
    #[serde(rename = "booksCount")]
    pub books_count: u64,
}

fn non_negative_price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let price = Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0);
    if price < 0.0 || price.is_nan() {
        return Err(serde::de::Error::custom(format!(
            "price must be non-negative, got {price}"
        )));
    }
    Ok(price)
}
