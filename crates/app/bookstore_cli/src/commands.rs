use bookstore_client::config::{parse_timeout, parse_url};
use bookstore_client::models::{BookDraft, BookUpdate, Session};
use bookstore_client::{ApiError, Area, CartView, ClientConfig, SignIn, Storefront};
use chrono::Datelike;
use serde::Serialize;
use serde_json::json;

use crate::cli::{AdminCommand, CartCommand, Commands, Connection, StatsCommand};
use crate::{Error, Result};

impl Connection {
    pub fn config(&self) -> Result<ClientConfig> {
        self.apply(ClientConfig::from_env()?)
    }

    /// Override `base` with the flags that were given.
    pub fn apply(&self, mut base: ClientConfig) -> Result<ClientConfig> {
        if let Some(url) = &self.catalog_url {
            base.catalog_url = parse_url("--catalog-url", url)?;
        }
        if let Some(url) = &self.auth_url {
            base.auth_url = parse_url("--auth-url", url)?;
        }
        if let Some(secs) = &self.timeout_secs {
            base.timeout = parse_timeout(secs)?;
        }
        if let Some(path) = &self.session_file {
            base.session_file = Some(path.clone());
        }
        Ok(base)
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_message(message: &str) -> Result<()> {
    print_json(&json!({ "message": message }))
}

fn print_sign_in(signed_in: &SignIn) -> Result<()> {
    print_json(&json!({
        "username": signed_in.session.username,
        "role": signed_in.session.role,
        "landing": signed_in.landing.path(),
    }))
}

// Wrong credentials come back as 401; that is not an expired session.
fn credentials_error(e: ApiError) -> Error {
    match e {
        ApiError::Unauthorized(message) if !message.is_empty() => Error::Custom(message),
        other => Error::Api(other),
    }
}

async fn require_session(storefront: &Storefront) -> Result<Session> {
    storefront
        .session
        .get()
        .await
        .ok_or_else(|| Error::Custom("not logged in".into()))
}

async fn require_admin(storefront: &Storefront) -> Result<()> {
    let session = require_session(storefront).await?;
    if Area::AdminDashboard.allows(session.role) {
        Ok(())
    } else {
        Err(Error::Custom("admin role required".into()))
    }
}

fn current_year() -> i32 {
    chrono::Local::now().year()
}

pub async fn execute(command: Commands, storefront: &Storefront) -> Result<()> {
    let catalog = &storefront.catalog;

    match command {
        Commands::Login { username, password } => {
            let signed_in = storefront
                .sign_in(&username, &password)
                .await
                .map_err(credentials_error)?;
            print_sign_in(&signed_in)?;
        }
        Commands::Register { username, password } => {
            let signed_in = storefront
                .sign_up(&username, &password)
                .await
                .map_err(credentials_error)?;
            print_sign_in(&signed_in)?;
        }
        Commands::Logout => {
            storefront.sign_out().await;
            print_message("signed out")?;
        }
        Commands::Whoami => {
            let session = require_session(storefront).await?;
            print_json(&json!({
                "username": session.username,
                "role": session.role,
                "landing": Area::for_role(session.role).path(),
            }))?;
        }
        Commands::Books { query, page, limit } => {
            require_session(storefront).await?;
            let total = catalog.total_books(&query).await?;
            let books = catalog.books(&query, page, limit).await?;
            print_json(&json!({ "total": total, "page": page, "books": books }))?;
        }
        Commands::Book { isbn } => {
            require_session(storefront).await?;
            print_json(&catalog.book(&isbn).await?)?;
        }
        Commands::Review { isbn, rating } => {
            require_session(storefront).await?;
            print_message(&catalog.submit_review(&isbn, rating).await?)?;
        }
        Commands::ReviewStatus { isbn } => {
            require_session(storefront).await?;
            let rating = catalog.review_status(&isbn).await?;
            print_json(&json!({ "isbn": isbn, "rating": rating }))?;
        }
        Commands::Reviews { page, limit } => {
            require_session(storefront).await?;
            let total = catalog.total_reviews().await?;
            let reviews = catalog.reviews(page, limit).await?;
            print_json(&json!({ "total": total, "page": page, "reviews": reviews }))?;
        }
        Commands::Cart(cart) => {
            require_session(storefront).await?;
            cart_command(cart, storefront).await?;
        }
        Commands::Checkout { address } => {
            require_session(storefront).await?;
            let mut view = CartView::default();
            let order = storefront.checkout(&mut view, &address).await?;
            print_json(&json!({ "message": "order placed", "order": order }))?;
        }
        Commands::Admin(admin) => {
            require_admin(storefront).await?;
            admin_command(admin, storefront).await?;
        }
        Commands::Stats(stats) => {
            require_admin(storefront).await?;
            match stats {
                StatsCommand::Orders { year } => {
                    let year = year.unwrap_or_else(current_year);
                    print_json(&catalog.orders_per_month(year).await?)?;
                }
                StatsCommand::Earnings { year } => {
                    let year = year.unwrap_or_else(current_year);
                    print_json(&catalog.earnings_per_month(year).await?)?;
                }
                StatsCommand::Publishers => {
                    print_json(&catalog.publisher_distribution().await?)?;
                }
            }
        }
        Commands::Version => {
            println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

async fn cart_command(command: CartCommand, storefront: &Storefront) -> Result<()> {
    let catalog = &storefront.catalog;

    match command {
        CartCommand::List { page } => {
            let mut view = CartView::default();
            view.load(catalog).await?;
            if page > 1 {
                view.go_to(catalog, page).await?;
            }
            print_json(&json!({
                "page": view.current_page,
                "total_pages": view.total_pages,
                "total_items": view.total_items,
                "items": view.items,
                "page_total": view.page_total(),
            }))?;
        }
        CartCommand::Add { isbn } => print_message(&catalog.add_to_cart(&isbn).await?)?,
        CartCommand::Remove { isbn } => print_message(&catalog.remove_from_cart(&isbn).await?)?,
        CartCommand::Check { isbn } => {
            let in_cart = catalog.is_in_cart(&isbn).await?;
            print_json(&json!({ "isbn": isbn, "in_cart": in_cart }))?;
        }
    }

    Ok(())
}

async fn admin_command(command: AdminCommand, storefront: &Storefront) -> Result<()> {
    let catalog = &storefront.catalog;

    let message = match command {
        AdminCommand::Add {
            isbn,
            title,
            author,
            year,
            publisher,
            image,
            price,
            quantity,
        } => {
            let draft = BookDraft {
                isbn,
                title,
                author,
                year,
                publisher,
                image,
                price,
                quantity,
            };
            catalog.add_book(&draft).await?
        }
        AdminCommand::Update {
            isbn,
            price,
            quantity,
        } => {
            if price.is_none() && quantity.is_none() {
                return Err(Error::Custom("nothing to update: pass --price or --quantity".into()));
            }
            catalog
                .update_book(&BookUpdate {
                    isbn,
                    price,
                    quantity,
                })
                .await?
        }
        AdminCommand::Delete { isbn } => catalog.delete_book(&isbn).await?,
    };

    print_message(&message)
}
