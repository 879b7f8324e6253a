//! Price history backfill.

use crate::domain::error::HousewatchError;
use crate::domain::trade::Filer;
use crate::ports::feed_port::DisclosureFeed;
use crate::ports::store_port::TradeStore;
use chrono::NaiveDate;
use tracing::{info, warn};

/// Progress-cursor task name for this job.
pub const PRICES_TASK: &str = "prices";

/// Backfill daily bars for every symbol one filer has traded.
///
/// For each symbol the fetch starts at the latest cached bar date at or
/// after the filer's earliest trade in it, or at that earliest trade date
/// when nothing is cached yet, and runs through `today`. Bars are upserted
/// with conflict-ignore, so coverage only ever extends and one filer's fetch
/// benefits every filer sharing the symbol. A per-symbol failure is logged
/// and skipped.
pub fn cache_prices_for_filer(
    feed: &dyn DisclosureFeed,
    store: &dyn TradeStore,
    filer: &Filer,
    today: NaiveDate,
) -> Result<(), HousewatchError> {
    let full_name = filer.full_name();
    for (symbol, first_trade) in store.symbol_first_trade_dates(filer)? {
        let from = store
            .latest_bar_date_from(&symbol, first_trade)?
            .unwrap_or(first_trade);
        match feed.fetch_price_history(&symbol, from, today) {
            Ok(bars) => {
                let inserted = store.upsert_bars(&bars)?;
                info!(
                    symbol = %symbol,
                    member = %full_name,
                    fetched = bars.len(),
                    inserted,
                    "cached bars"
                );
            }
            Err(e) => {
                warn!(symbol = %symbol, member = %full_name, error = %e, "price fetch failed");
            }
        }
    }
    Ok(())
}

/// Backfill prices for every filer past the stored watermark, advancing the
/// cursor after each filer completes. Uses the same watermark-skip iteration
/// as member enrichment, with its own independent cursor.
pub fn cache_prices(
    feed: &dyn DisclosureFeed,
    store: &dyn TradeStore,
    today: NaiveDate,
) -> Result<(), HousewatchError> {
    let filers = store.distinct_filers()?;
    let cursor = store.get_cursor(PRICES_TASK)?;
    for filer in filers {
        let full_name = filer.full_name();
        if cursor.as_deref().is_some_and(|last| full_name.as_str() <= last) {
            continue;
        }
        info!(member = %full_name, "updating price history");
        cache_prices_for_filer(feed, store, &filer, today)?;
        store.set_cursor(PRICES_TASK, &full_name)?;
    }
    Ok(())
}
