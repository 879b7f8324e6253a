//! Financial Modeling Prep feed adapter.
//!
//! Blocking HTTP client for the three remote endpoints: the paginated house
//! trade feed, the per-member detail endpoint, and daily price history.
//! Calls block with a fixed timeout; there is no retry or backoff — a failed
//! call surfaces to the caller and retries happen on the next invocation.

use crate::domain::error::HousewatchError;
use crate::domain::price::PriceBar;
use crate::domain::trade::TradeRecord;
use crate::ports::config_port::ConfigPort;
use crate::ports::feed_port::{DisclosureFeed, TradesPage};
use chrono::NaiveDate;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://financialmodelingprep.com";
const DEFAULT_PAGE_LIMIT: i64 = 500;
const DEFAULT_TIMEOUT_SECS: i64 = 10;

/// Daily-bar response body: `{"historical": [{date, open, ...}]}`.
#[derive(Debug, Deserialize)]
struct HistoricalResponse {
    #[serde(default)]
    historical: Vec<WireBar>,
}

#[derive(Debug, Deserialize)]
struct WireBar {
    date: NaiveDate,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: i64,
}

pub struct FmpClient {
    client: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
    page_limit: u32,
}

fn feed_err(context: impl Into<String>, reason: impl ToString) -> HousewatchError {
    HousewatchError::Feed {
        context: context.into(),
        reason: reason.to_string(),
    }
}

impl FmpClient {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, HousewatchError> {
        let api_key =
            config
                .get_string("feed", "api_key")
                .ok_or_else(|| HousewatchError::ConfigMissing {
                    section: "feed".into(),
                    key: "api_key".into(),
                })?;

        let base_url = config
            .get_string("feed", "base_url")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let page_limit = config.get_int("feed", "page_limit", DEFAULT_PAGE_LIMIT) as u32;
        let timeout = config.get_int("feed", "timeout_secs", DEFAULT_TIMEOUT_SECS) as u64;

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()
            .map_err(|e| feed_err("client construction", e))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            page_limit,
        })
    }
}

impl DisclosureFeed for FmpClient {
    fn fetch_trades_page(&self, page: u32) -> Result<TradesPage, HousewatchError> {
        let context = format!("trades page {page}");
        let url = format!(
            "{}/stable/house-latest?page={}&limit={}&apikey={}",
            self.base_url, page, self.page_limit, self.api_key
        );

        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| feed_err(&context, e))?;

        let status = resp.status();
        if status == StatusCode::BAD_REQUEST {
            // end-of-data signal, normal termination
            return Ok(TradesPage::End);
        }
        if status == StatusCode::UNAUTHORIZED {
            return Err(HousewatchError::FeedUnauthorized);
        }
        if !status.is_success() {
            return Err(feed_err(&context, format!("HTTP {status}")));
        }

        let values: Vec<Value> = resp.json().map_err(|e| feed_err(&context, e))?;
        let records = values
            .into_iter()
            .map(TradeRecord::from_json)
            .collect::<Result<Vec<_>, _>>()
            // a malformed record makes the whole page malformed
            .map_err(|e| match e {
                HousewatchError::Feed { reason, .. } => feed_err(&context, reason),
                other => other,
            })?;
        Ok(TradesPage::Records(records))
    }

    fn fetch_member_detail(&self, full_name: &str) -> Result<String, HousewatchError> {
        let context = format!("detail for {full_name}");
        let url = format!(
            "{}/api/v3/government-trading/members/{}?apikey={}",
            self.base_url,
            full_name.replace(' ', "%20"),
            self.api_key
        );

        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| feed_err(&context, e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(feed_err(&context, format!("HTTP {status}")));
        }

        // Stored verbatim as an opaque document; parsing only proves it is JSON.
        let detail: Value = resp.json().map_err(|e| feed_err(&context, e))?;
        Ok(detail.to_string())
    }

    fn fetch_price_history(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PriceBar>, HousewatchError> {
        let context = format!("price history for {symbol}");
        let url = format!(
            "{}/api/v3/historical-price-full/{}?from={}&to={}&apikey={}",
            self.base_url,
            symbol,
            from.format("%Y-%m-%d"),
            to.format("%Y-%m-%d"),
            self.api_key
        );

        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| feed_err(&context, e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(feed_err(&context, format!("HTTP {status}")));
        }

        let body: HistoricalResponse = resp.json().map_err(|e| feed_err(&context, e))?;
        Ok(body
            .historical
            .into_iter()
            .map(|bar| PriceBar {
                symbol: symbol.to_string(),
                date: bar.date,
                open: bar.open,
                high: bar.high,
                low: bar.low,
                close: bar.close,
                volume: bar.volume,
            })
            .collect())
    }
}
