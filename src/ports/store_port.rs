//! Persistent store port trait.

use crate::domain::error::HousewatchError;
use crate::domain::price::PriceBar;
use crate::domain::trade::{Filer, JoinedTrade, TradeRecord};
use chrono::NaiveDate;

pub trait TradeStore {
    /// Create any missing tables; destructively repair a drifted price-table
    /// schema. Runs at the start of every mode.
    fn ensure_schema(&self) -> Result<(), HousewatchError>;

    /// Append trades verbatim. Returns the number of rows written.
    fn append_trades(&self, trades: &[TradeRecord]) -> Result<usize, HousewatchError>;

    /// Maximum stored transaction date, or None for an empty trade table.
    fn max_transaction_date(&self) -> Result<Option<NaiveDate>, HousewatchError>;

    /// Distinct filers in ascending full-name order.
    fn distinct_filers(&self) -> Result<Vec<Filer>, HousewatchError>;

    /// Last-processed watermark for a named task, if any.
    fn get_cursor(&self, task: &str) -> Result<Option<String>, HousewatchError>;

    /// Upsert the watermark for a named task.
    fn set_cursor(&self, task: &str, key: &str) -> Result<(), HousewatchError>;

    /// Store (or replace) the opaque detail document for a filer.
    fn store_member_detail(&self, full_name: &str, detail: &str)
    -> Result<(), HousewatchError>;

    /// Stored detail document for a filer, if any.
    fn member_detail(&self, full_name: &str) -> Result<Option<String>, HousewatchError>;

    /// For one filer: each traded symbol with its earliest transaction date.
    fn symbol_first_trade_dates(
        &self,
        filer: &Filer,
    ) -> Result<Vec<(String, NaiveDate)>, HousewatchError>;

    /// Latest cached bar date at or after `start` for a symbol, if any.
    fn latest_bar_date_from(
        &self,
        symbol: &str,
        start: NaiveDate,
    ) -> Result<Option<NaiveDate>, HousewatchError>;

    /// Insert bars with conflict-ignore on (symbol, date). Returns the number
    /// of rows actually inserted.
    fn upsert_bars(&self, bars: &[PriceBar]) -> Result<usize, HousewatchError>;

    /// Close price at exactly (symbol, date), if cached.
    fn close_on(&self, symbol: &str, date: NaiveDate) -> Result<Option<f64>, HousewatchError>;

    /// Most recent cached close at or before `date` for a symbol, if any.
    fn latest_close_at_or_before(
        &self,
        symbol: &str,
        date: NaiveDate,
    ) -> Result<Option<f64>, HousewatchError>;

    /// One filer's trades left-joined to exact-date price bars, ordered by
    /// transaction date.
    fn trades_with_prices(&self, full_name: &str) -> Result<Vec<JoinedTrade>, HousewatchError>;

    /// Destructive delete-all: truncate the trade table and reset every
    /// progress cursor, forcing a full rescan on the next runs.
    fn delete_all_trades(&self) -> Result<(), HousewatchError>;
}
