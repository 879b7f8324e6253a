//! Remote disclosure feed port trait.

use crate::domain::error::HousewatchError;
use crate::domain::price::PriceBar;
use crate::domain::trade::TradeRecord;
use chrono::NaiveDate;

/// Result of fetching one page of the paginated trade feed.
#[derive(Debug)]
pub enum TradesPage {
    Records(Vec<TradeRecord>),
    /// The feed signalled end-of-data (HTTP 400). Normal termination.
    End,
}

pub trait DisclosureFeed {
    /// Fetch page `page` of the trade feed.
    ///
    /// Returns [`TradesPage::End`] on the feed's end-of-data signal,
    /// [`HousewatchError::FeedUnauthorized`] on an authentication rejection
    /// (fatal for the whole run), and [`HousewatchError::Feed`] for any other
    /// failure, which aborts the current fetch loop without retry.
    fn fetch_trades_page(&self, page: u32) -> Result<TradesPage, HousewatchError>;

    /// Fetch the opaque biographical document for one filer.
    fn fetch_member_detail(&self, full_name: &str) -> Result<String, HousewatchError>;

    /// Fetch daily bars for `symbol` over the inclusive date range.
    fn fetch_price_history(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PriceBar>, HousewatchError>;
}
