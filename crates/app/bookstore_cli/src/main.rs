// Import and re-export the `error` module
pub use self::error::{Error, Result};
mod error;

use bookstore_client::Storefront;
use clap::Parser;
use cli::Cli;
use tracing::debug;

mod cli;
mod commands;
mod logging;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        debug!(error = ?e, "command failed");
        eprintln!("error: {}", e.report());
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    logging::init()?;

    let args = Cli::parse();
    let config = args.connection.config()?;
    let storefront = Storefront::connect(&config)?;

    commands::execute(args.command, &storefront).await
}
