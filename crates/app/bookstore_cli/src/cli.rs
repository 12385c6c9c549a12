use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "bookstore", version, about = "Bookstore storefront in the terminal")]
pub struct Cli {
    #[command(flatten)]
    pub connection: Connection,

    #[command(subcommand)]
    pub command: Commands,
}

/// Service endpoints and session storage.
///
/// Unset flags fall back to `ClientConfig::from_env`, which applies the same
/// variables and the library defaults.
#[derive(Args, Debug, Default)]
pub struct Connection {
    /// Base URL of the catalog service.
    #[arg(long, global = true, env = "CATALOG_URL")]
    pub catalog_url: Option<String>,

    /// Base URL of the auth service.
    #[arg(long, global = true, env = "AUTH_URL")]
    pub auth_url: Option<String>,

    /// Per-request timeout in seconds.
    #[arg(long, global = true, env = "HTTP_TIMEOUT_SECS")]
    pub timeout_secs: Option<String>,

    /// Where the session is kept between runs.
    #[arg(long, global = true, env = "BOOKSTORE_SESSION_FILE")]
    pub session_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in and store the session.
    Login {
        username: String,
        #[arg(long, env = "BOOKSTORE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and sign in.
    Register {
        username: String,
        #[arg(long, env = "BOOKSTORE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session.
    Logout,
    /// Show who is signed in.
    Whoami,
    /// Search the catalog.
    Books {
        #[arg(long, short, default_value = "")]
        query: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
    /// Show one book.
    Book { isbn: String },
    /// Rate a book from 1 to 5.
    Review {
        isbn: String,
        #[arg(value_parser = clap::value_parser!(u8).range(1..=5))]
        rating: u8,
    },
    /// Show your rating for a book, if any.
    ReviewStatus { isbn: String },
    /// List the books you have rated.
    Reviews {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
    /// Inspect or change the cart.
    #[command(subcommand)]
    Cart(CartCommand),
    /// Order everything in the cart.
    Checkout {
        #[arg(long)]
        address: String,
    },
    /// Manage the catalog (admin only).
    #[command(subcommand)]
    Admin(AdminCommand),
    /// Sales statistics (admin only).
    #[command(subcommand)]
    Stats(StatsCommand),
    /// Print version information.
    Version,
}

#[derive(Subcommand, Debug)]
pub enum CartCommand {
    /// Show one page of the cart.
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    Add { isbn: String },
    Remove { isbn: String },
    /// Whether a book is already in the cart.
    Check { isbn: String },
}

#[derive(Subcommand, Debug)]
pub enum AdminCommand {
    /// Add a book to the catalog.
    Add {
        isbn: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        author: String,
        #[arg(long)]
        year: i32,
        #[arg(long)]
        publisher: String,
        #[arg(long, default_value = "")]
        image: String,
        #[arg(long)]
        price: f64,
        #[arg(long)]
        quantity: u32,
    },
    /// Change price or stock of a book.
    Update {
        isbn: String,
        #[arg(long)]
        price: Option<f64>,
        #[arg(long)]
        quantity: Option<u32>,
    },
    /// Remove a book from the catalog.
    Delete { isbn: String },
}

#[derive(Subcommand, Debug)]
pub enum StatsCommand {
    /// Orders per month of a year.
    Orders {
        /// Defaults to the current year.
        #[arg(long)]
        year: Option<i32>,
    },
    /// Earnings per month of a year.
    Earnings {
        #[arg(long)]
        year: Option<i32>,
    },
    /// Book count per publisher.
    Publishers,
}
