mod logger;
mod rows;

use std::path::PathBuf;

use clap::Parser;
use tracing::{info, warn};

use catalog::Catalog;
use common::probes::{FsProbe, SystemClock};
use common::product::ProductSource;
use inventory::{ProductInventory, SortOrder};
use price_api::{RemotePriceSource, SupplementaryPriceSource};
use pricing::{PriceMatch, PriceService};

use crate::logger::configure_logger;
use crate::rows::CsvRowReader;

const REMOTE_API_BASE_URL: &str = "https://api.pokemontcg.io/v2";

/// Debug runner: loads the local catalog and price data, runs one query
/// through the whole engine and logs what comes back.
#[derive(Parser, Debug)]
struct Args {
    /// Directory holding per-set card JSON files.
    #[arg(long, default_value = "data/cards")]
    cards_dir: PathBuf,

    /// Directory holding the set metadata JSON files.
    #[arg(long, default_value = "data/sets")]
    sets_dir: PathBuf,

    /// Directory watched for the newest price spreadsheet export.
    #[arg(long, default_value = "data/prices")]
    prices_dir: PathBuf,

    /// Optional directory of scraped marketplace listings.
    #[arg(long)]
    products_dir: Option<PathBuf>,

    /// API key for the remote price source; omitted means offline only.
    #[arg(long)]
    api_key: Option<String>,

    #[arg(long, default_value_t = 12)]
    limit: usize,

    query: String,
}

#[tokio::main]
async fn main() {
    configure_logger();

    let args = Args::parse();

    let catalog = Catalog::load(&args.sets_dir, &args.cards_dir);
    info!("Catalog ready with {} cards", catalog.len());

    let prices = PriceService::new(
        &args.prices_dir,
        Box::new(FsProbe),
        Box::new(CsvRowReader),
    );

    let remote = args
        .api_key
        .map(|key| RemotePriceSource::new(REMOTE_API_BASE_URL, key, Box::new(SystemClock)));

    let hits = catalog.search(&args.query, args.limit);
    if hits.is_empty() {
        warn!("No cards matched '{}'", args.query);
    }

    for card in &hits {
        match prices.lookup_with_reason(&card.name, &card.set.name, &card.number) {
            PriceMatch::Found(record) => {
                info!(
                    "{} ({} #{}) -> {:?} {}",
                    card.name, card.set.name, card.number, record.market, record.currency
                );
            }
            PriceMatch::UnmatchedSet => {
                info!(
                    "{} ({} #{}) -> priced under a different set",
                    card.name, card.set.name, card.number
                );
            }
            PriceMatch::Absent => {
                info!("{} ({} #{}) -> no local price", card.name, card.set.name, card.number);
            }
        }
    }

    if let (Some(remote), Some(card)) = (&remote, hits.first()) {
        match remote.card_market_price(&card.id).await {
            Some(quote) => info!(
                "Remote quote for {}: {:?} {}",
                card.name, quote.market, quote.currency
            ),
            None => info!("No remote quote for {}", card.name),
        }
    }

    if let Some(card) = hits.first() {
        let rarity = card.rarity.as_deref().unwrap_or_default();
        let related = catalog.related_cards(&card.set.id, rarity, &card.id, 5);
        info!(
            "Related to {}: {:?}",
            card.name,
            related.iter().map(|c| c.name.as_str()).collect::<Vec<_>>()
        );
    }

    if let Some(products_dir) = args.products_dir {
        let listings = ProductInventory::new(
            products_dir,
            ProductSource::Other,
            Box::new(FsProbe),
            Box::new(CsvRowReader),
        );

        for product in listings.search(&args.query, SortOrder::PriceAsc) {
            info!("{} -> {} ({})", product.title, product.price, product.source);
        }
    }
}
