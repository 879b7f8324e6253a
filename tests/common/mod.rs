#![allow(dead_code)]

use chrono::NaiveDate;
use housewatch::domain::error::HousewatchError;
use housewatch::domain::price::PriceBar;
use housewatch::domain::trade::TradeRecord;
use housewatch::ports::feed_port::{DisclosureFeed, TradesPage};
use serde_json::json;
use std::collections::HashMap;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_trade(
    first: &str,
    last: &str,
    symbol: &str,
    on: NaiveDate,
    tx_type: &str,
    amount: &str,
) -> TradeRecord {
    TradeRecord {
        first_name: first.into(),
        last_name: last.into(),
        symbol: symbol.into(),
        transaction_date: on,
        tx_type: tx_type.into(),
        amount: amount.into(),
        asset_description: format!("{symbol} common stock"),
        raw: json!({
            "firstName": first,
            "lastName": last,
            "symbol": symbol,
            "transactionDate": on.format("%Y-%m-%d").to_string(),
            "type": tx_type,
            "amount": amount,
        }),
    }
}

pub fn make_bar(symbol: &str, on: NaiveDate, close: f64) -> PriceBar {
    PriceBar {
        symbol: symbol.into(),
        date: on,
        open: close - 0.5,
        high: close + 1.0,
        low: close - 1.0,
        close,
        volume: 10_000,
    }
}

/// In-memory disclosure feed: fixed pages of trades, per-member detail
/// documents (or failures), and per-symbol bar sets served by date range.
pub struct MockFeed {
    pub pages: Vec<Vec<TradeRecord>>,
    pub details: HashMap<String, String>,
    pub detail_errors: HashMap<String, String>,
    pub bars: HashMap<String, Vec<PriceBar>>,
    pub price_errors: HashMap<String, String>,
}

impl MockFeed {
    pub fn new() -> Self {
        Self {
            pages: Vec::new(),
            details: HashMap::new(),
            detail_errors: HashMap::new(),
            bars: HashMap::new(),
            price_errors: HashMap::new(),
        }
    }

    pub fn with_page(mut self, trades: Vec<TradeRecord>) -> Self {
        self.pages.push(trades);
        self
    }

    pub fn with_detail(mut self, full_name: &str, detail: &str) -> Self {
        self.details.insert(full_name.into(), detail.into());
        self
    }

    pub fn with_detail_error(mut self, full_name: &str, reason: &str) -> Self {
        self.detail_errors.insert(full_name.into(), reason.into());
        self
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<PriceBar>) -> Self {
        self.bars.insert(symbol.into(), bars);
        self
    }

    pub fn with_price_error(mut self, symbol: &str, reason: &str) -> Self {
        self.price_errors.insert(symbol.into(), reason.into());
        self
    }
}

impl DisclosureFeed for MockFeed {
    fn fetch_trades_page(&self, page: u32) -> Result<TradesPage, HousewatchError> {
        match self.pages.get(page as usize) {
            Some(trades) => Ok(TradesPage::Records(trades.clone())),
            None => Ok(TradesPage::End),
        }
    }

    fn fetch_member_detail(&self, full_name: &str) -> Result<String, HousewatchError> {
        if let Some(reason) = self.detail_errors.get(full_name) {
            return Err(HousewatchError::Feed {
                context: format!("detail for {full_name}"),
                reason: reason.clone(),
            });
        }
        self.details
            .get(full_name)
            .cloned()
            .ok_or_else(|| HousewatchError::Feed {
                context: format!("detail for {full_name}"),
                reason: "HTTP 404".into(),
            })
    }

    fn fetch_price_history(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PriceBar>, HousewatchError> {
        if let Some(reason) = self.price_errors.get(symbol) {
            return Err(HousewatchError::Feed {
                context: format!("price history for {symbol}"),
                reason: reason.clone(),
            });
        }
        Ok(self
            .bars
            .get(symbol)
            .map(|bars| {
                bars.iter()
                    .filter(|b| b.date >= from && b.date <= to)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}
