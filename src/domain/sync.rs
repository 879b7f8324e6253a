//! Trade fetch and incremental sync.

use crate::domain::error::HousewatchError;
use crate::domain::trade::TradeRecord;
use crate::ports::feed_port::{DisclosureFeed, TradesPage};
use crate::ports::store_port::TradeStore;
use tracing::{debug, info, warn};

/// Walk the paginated feed from page 0, concatenating batches in API order.
///
/// Stops on the feed's end-of-data signal or on an empty page. A page-level
/// failure aborts the whole fetch; retries happen only via the next external
/// invocation.
pub fn fetch_all_trades(
    feed: &dyn DisclosureFeed,
) -> Result<Vec<TradeRecord>, HousewatchError> {
    let mut trades = Vec::new();
    let mut page: u32 = 0;
    loop {
        match feed.fetch_trades_page(page)? {
            TradesPage::End => {
                debug!(page, "end of pages");
                break;
            }
            TradesPage::Records(batch) => {
                debug!(page, records = batch.len(), "fetched page");
                if batch.is_empty() {
                    break;
                }
                trades.extend(batch);
                page += 1;
            }
        }
    }
    info!(total = trades.len(), "fetched trades");
    Ok(trades)
}

/// Append only the fetched rows strictly newer than the stored maximum
/// transaction date. Returns the number of rows appended.
///
/// Known limitation, preserved deliberately: the filter is strictly-greater,
/// not identity-based dedupe, so a second run on the same calendar day drops
/// same-day trades disclosed between the two runs.
pub fn append_new_trades(
    store: &dyn TradeStore,
    fetched: Vec<TradeRecord>,
) -> Result<usize, HousewatchError> {
    let fresh: Vec<TradeRecord> = match store.max_transaction_date()? {
        Some(max) => fetched
            .into_iter()
            .filter(|t| t.transaction_date > max)
            .collect(),
        None => fetched,
    };
    if fresh.is_empty() {
        info!("no rows newer than stored maximum date");
        return Ok(0);
    }
    let appended = store.append_trades(&fresh)?;
    info!(appended, "appended new trades");
    Ok(appended)
}

/// One `update-trades` run: fetch the full feed, then append strictly-newer
/// rows. An empty fetch is a no-op, not an error.
pub fn sync_trades(
    feed: &dyn DisclosureFeed,
    store: &dyn TradeStore,
) -> Result<usize, HousewatchError> {
    let fetched = fetch_all_trades(feed)?;
    if fetched.is_empty() {
        warn!("no trades fetched");
        return Ok(0);
    }
    append_new_trades(store, fetched)
}
