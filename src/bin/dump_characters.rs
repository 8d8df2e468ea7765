//! Dump characters binary - fetches pages from the API and prints them as
//! a plain table, without starting the terminal UI.
//!
//! Usage:
//!   cargo run --bin dump-characters            # First page, no filter
//!   cargo run --bin dump-characters -- 3       # First three pages
//!
//! Optional environment variables:
//! - RM_API_URL (defaults to the public endpoint)
//! - RM_STATUS (all/alive/dead/unknown)
//! - RM_SPECIES (free text, e.g. "human")
//! - RM_REQUEST_TIMEOUT_SECS (defaults to 30)

use anyhow::{bail, Context, Result};
use tracing::info;

use rickmorty_browser::api::{CharacterClient, CharacterFilter, StatusFilter};
use rickmorty_browser::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("rickmorty_browser=info".parse().unwrap()),
        )
        .init();

    // Load environment from .env file
    dotenvy::dotenv().ok();

    let pages: u32 = std::env::args()
        .nth(1)
        .map(|arg| arg.parse().context("page count must be a number"))
        .transpose()?
        .unwrap_or(1);

    let config = Config::from_env()?;

    let status = match std::env::var("RM_STATUS") {
        Ok(value) => match StatusFilter::parse(&value) {
            Some(status) => status,
            None => bail!("RM_STATUS must be one of: all, alive, dead, unknown"),
        },
        Err(_) => StatusFilter::All,
    };
    let species = std::env::var("RM_SPECIES").unwrap_or_default();
    let filter = CharacterFilter { status, species };

    let client = CharacterClient::new(&config)?;
    info!(api_url = %config.api_url, pages, "fetching characters");

    println!(
        "{:<30} {:<10} {:<14} {:<10} {}",
        "NAME", "STATUS", "SPECIES", "GENDER", "ORIGIN"
    );

    let mut total = 0usize;
    for page in 1..=pages {
        let result = client.fetch_page(page, &filter).await?;
        for character in &result.results {
            println!(
                "{:<30} {:<10} {:<14} {:<10} {}",
                character.name,
                character.status,
                character.species,
                character.gender,
                character.origin.name
            );
        }
        total += result.results.len();

        if result.info.next.is_none() {
            info!(page, "reached the last page");
            break;
        }
    }

    println!();
    println!("{total} characters");
    Ok(())
}
