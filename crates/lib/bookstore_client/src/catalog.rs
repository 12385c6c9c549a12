//! Typed catalog-service API.
//!
//! One method per endpoint. Each builds a [`RequestSpec`], sends it through
//! the [`AuthenticatedClient`] and unwraps the service's response envelope.

use serde::{Deserialize, Deserializer};

use crate::client::AuthenticatedClient;
use crate::error::ApiError;
use crate::models::{
    Book, BookDraft, BookSummary, BookUpdate, CartItem, EarningsPerMonth, Order, OrdersPerMonth,
    PublisherShare, Review,
};
use crate::request::{ApiResponse, RequestSpec, error_message};

#[derive(Deserialize)]
struct TotalBooks {
    #[serde(rename = "totalBooks")]
    total: u64,
}

#[derive(Deserialize)]
struct Books {
    books: Vec<BookSummary>,
}

#[derive(Deserialize)]
struct BookEnvelope {
    book: Book,
}

#[derive(Deserialize)]
struct ReviewStatus {
    #[serde(rename = "bookRating", default, deserialize_with = "optional_rating")]
    rating: Option<u8>,
}

#[derive(Deserialize)]
struct TotalReviews {
    #[serde(rename = "totalReviews")]
    total: u64,
}

#[derive(Deserialize)]
struct Reviews {
    reviews: Vec<Review>,
}

#[derive(Deserialize)]
struct TotalCart {
    #[serde(rename = "totalBooksCart")]
    total: u64,
}

#[derive(Deserialize)]
struct BooksCart {
    #[serde(rename = "booksCart")]
    books: Vec<BookSummary>,
}

#[derive(Deserialize)]
struct InCart {
    #[serde(rename = "inCart")]
    in_cart: bool,
}

#[derive(Deserialize)]
struct Data<T> {
    data: Vec<T>,
}

/// Catalog-service operations for storefront and admin collaborators.
#[derive(Clone)]
pub struct CatalogApi {
    client: AuthenticatedClient,
}

impl CatalogApi {
    pub fn new(client: AuthenticatedClient) -> Self {
        Self { client }
    }

    // -----------------------------------------------------------------------
    // Catalog
    // -----------------------------------------------------------------------

    /// `GET /total-books?q=`: number of books matching `query`.
    pub async fn total_books(&self, query: &str) -> Result<u64, ApiError> {
        let resp = self
            .client
            .call(&RequestSpec::get("/total-books").query("q", query))
            .await?;
        Ok(resp.decode::<TotalBooks>("total books")?.total)
    }

    /// `GET /books?q=&page=&limit=`: one page of search results.
    pub async fn books(
        &self,
        query: &str,
        page: u32,
        limit: u32,
    ) -> Result<Vec<BookSummary>, ApiError> {
        let spec = RequestSpec::get("/books")
            .query("q", query)
            .query("page", page)
            .query("limit", limit);
        let resp = self.client.call(&spec).await?;
        Ok(resp.decode::<Books>("books")?.books)
    }

    /// `GET /book?isbn=`.
    pub async fn book(&self, isbn: &str) -> Result<Book, ApiError> {
        let resp = self
            .client
            .call(&RequestSpec::get("/book").query("isbn", isbn))
            .await?;
        Ok(resp.decode::<BookEnvelope>("book")?.book)
    }

    // -----------------------------------------------------------------------
    // Reviews
    // -----------------------------------------------------------------------

    /// `GET /book/review/status?isbn=`: the current user's rating, if any.
    pub async fn review_status(&self, isbn: &str) -> Result<Option<u8>, ApiError> {
        let resp = self
            .client
            .call(&RequestSpec::get("/book/review/status").query("isbn", isbn))
            .await?;
        Ok(resp.decode::<ReviewStatus>("review status")?.rating)
    }

    /// `POST /book/review {isbn, rating}`.
    pub async fn submit_review(&self, isbn: &str, rating: u8) -> Result<String, ApiError> {
        let spec = RequestSpec::post("/book/review")
            .json(&serde_json::json!({ "isbn": isbn, "rating": rating }))?;
        let resp = self.client.call(&spec).await?;
        Ok(message(&resp))
    }

    /// `GET /total-reviews`.
    pub async fn total_reviews(&self) -> Result<u64, ApiError> {
        let resp = self.client.call(&RequestSpec::get("/total-reviews")).await?;
        Ok(resp.decode::<TotalReviews>("total reviews")?.total)
    }

    /// `GET /reviews?page=&limit=`: the user's review history.
    pub async fn reviews(&self, page: u32, limit: u32) -> Result<Vec<Review>, ApiError> {
        let spec = RequestSpec::get("/reviews")
            .query("page", page)
            .query("limit", limit);
        let resp = self.client.call(&spec).await?;
        Ok(resp.decode::<Reviews>("reviews")?.reviews)
    }

    // -----------------------------------------------------------------------
    // Cart
    // -----------------------------------------------------------------------

    /// `POST /cart {isbn}`.
    pub async fn add_to_cart(&self, isbn: &str) -> Result<String, ApiError> {
        let spec = RequestSpec::post("/cart").json(&CartItem {
            isbn: isbn.to_string(),
        })?;
        let resp = self.client.call(&spec).await?;
        Ok(message(&resp))
    }

    /// `DELETE /cart {isbn}` (the ISBN travels in the body).
    pub async fn remove_from_cart(&self, isbn: &str) -> Result<String, ApiError> {
        let spec = RequestSpec::delete("/cart").json(&CartItem {
            isbn: isbn.to_string(),
        })?;
        let resp = self.client.call(&spec).await?;
        Ok(message(&resp))
    }

    /// `GET /cart/check?isbn=`.
    pub async fn is_in_cart(&self, isbn: &str) -> Result<bool, ApiError> {
        let resp = self
            .client
            .call(&RequestSpec::get("/cart/check").query("isbn", isbn))
            .await?;
        Ok(resp.decode::<InCart>("cart check")?.in_cart)
    }

    /// `GET /total-cart`: number of entries in the cart.
    pub async fn cart_total(&self) -> Result<u64, ApiError> {
        let resp = self.client.call(&RequestSpec::get("/total-cart")).await?;
        Ok(resp.decode::<TotalCart>("cart total")?.total)
    }

    /// `GET /cart?page=&limit=`: one page of the cart.
    pub async fn cart_page(&self, page: u32, limit: u32) -> Result<Vec<BookSummary>, ApiError> {
        let spec = RequestSpec::get("/cart")
            .query("page", page)
            .query("limit", limit);
        let resp = self.client.call(&spec).await?;
        Ok(resp.decode::<BooksCart>("cart")?.books)
    }

    /// `GET /cart` with no pagination: the whole cart.
    pub async fn cart_all(&self) -> Result<Vec<BookSummary>, ApiError> {
        let resp = self.client.call(&RequestSpec::get("/cart")).await?;
        Ok(resp.decode::<BooksCart>("cart")?.books)
    }

    /// `POST /order {address, items}`.
    pub async fn place_order(&self, order: &Order) -> Result<String, ApiError> {
        let spec = RequestSpec::post("/order").json(order)?;
        let resp = self.client.call(&spec).await?;
        Ok(message(&resp))
    }

    // -----------------------------------------------------------------------
    // Admin
    // -----------------------------------------------------------------------

    /// `POST /admin/book`.
    pub async fn add_book(&self, draft: &BookDraft) -> Result<String, ApiError> {
        let spec = RequestSpec::post("/admin/book").json(draft)?;
        let resp = self.client.call(&spec).await?;
        Ok(message(&resp))
    }

    /// `PUT /admin/book`.
    pub async fn update_book(&self, update: &BookUpdate) -> Result<String, ApiError> {
        let spec = RequestSpec::put("/admin/book").json(update)?;
        let resp = self.client.call(&spec).await?;
        Ok(message(&resp))
    }

    /// `DELETE /admin/book?isbn=`.
    pub async fn delete_book(&self, isbn: &str) -> Result<String, ApiError> {
        let resp = self
            .client
            .call(&RequestSpec::delete("/admin/book").query("isbn", isbn))
            .await?;
        Ok(message(&resp))
    }

    /// `GET /stats/orders-per-month?year=`.
    pub async fn orders_per_month(&self, year: i32) -> Result<Vec<OrdersPerMonth>, ApiError> {
        let resp = self
            .client
            .call(&RequestSpec::get("/stats/orders-per-month").query("year", year))
            .await?;
        Ok(resp.decode::<Data<OrdersPerMonth>>("orders per month")?.data)
    }

    /// `GET /stats/earnings-per-month?year=`.
    pub async fn earnings_per_month(&self, year: i32) -> Result<Vec<EarningsPerMonth>, ApiError> {
        let resp = self
            .client
            .call(&RequestSpec::get("/stats/earnings-per-month").query("year", year))
            .await?;
        Ok(resp.decode::<Data<EarningsPerMonth>>("earnings per month")?.data)
    }

    /// `GET /stats/publisher-distribution`.
    pub async fn publisher_distribution(&self) -> Result<Vec<PublisherShare>, ApiError> {
        let resp = self
            .client
            .call(&RequestSpec::get("/stats/publisher-distribution"))
            .await?;
        Ok(resp
            .decode::<Data<PublisherShare>>("publisher distribution")?
            .data)
    }
}

fn message(resp: &ApiResponse) -> String {
    error_message(&resp.body).unwrap_or_default()
}

/// The review-status endpoint returns `null`, a bare rating or a one-element
/// row such as `[4]`.
fn optional_rating<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bare(u8),
        Row(Vec<u8>),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        None => None,
        Some(Raw::Bare(rating)) => Some(rating),
        Some(Raw::Row(row)) => row.first().copied(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(body: serde_json::Value) -> Option<u8> {
        serde_json::from_value::<ReviewStatus>(body).unwrap().rating
    }

    #[test]
    fn review_status_accepts_every_shape() {
        assert_eq!(status(serde_json::json!({"bookRating": null})), None);
        assert_eq!(status(serde_json::json!({})), None);
        assert_eq!(status(serde_json::json!({"bookRating": 4})), Some(4));
        assert_eq!(status(serde_json::json!({"bookRating": [5]})), Some(5));
        assert_eq!(status(serde_json::json!({"bookRating": []})), None);
    }

    #[test]
    fn success_message_is_extracted() {
        let resp = ApiResponse::new(200, serde_json::json!({"message": "Book added to cart"}));
        assert_eq!(message(&resp), "Book added to cart");
        assert_eq!(message(&ApiResponse::new(204, serde_json::Value::Null)), "");
    }
}
