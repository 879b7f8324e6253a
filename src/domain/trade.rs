//! Disclosure trade records.

use crate::domain::error::HousewatchError;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One disclosed transaction, as fetched from the trade feed.
///
/// Append-only: rows are never updated in place, and there is no natural
/// key, so duplicates are possible across sync windows.
#[derive(Debug, Clone)]
pub struct TradeRecord {
    pub first_name: String,
    pub last_name: String,
    pub symbol: String,
    pub transaction_date: NaiveDate,
    pub tx_type: String,
    /// Disclosed amount as reported: a dollar range string or a bare number.
    pub amount: String,
    pub asset_description: String,
    /// Original feed payload, stored verbatim alongside the typed columns.
    pub raw: Value,
}

/// A disclosing individual, identified by (first, last) name pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filer {
    pub first_name: String,
    pub last_name: String,
}

impl Filer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// One trade joined to its exact-date price bar, as served to the
/// presentation layer. `buy_price` is None when no bar exists on the
/// transaction date.
#[derive(Debug, Clone, Serialize)]
pub struct JoinedTrade {
    pub buy_date: NaiveDate,
    pub symbol: String,
    pub tx_type: String,
    pub amount: String,
    pub parsed_amount: f64,
    pub buy_price: Option<f64>,
    pub asset_description: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireTrade {
    first_name: String,
    last_name: String,
    #[serde(default)]
    symbol: String,
    transaction_date: NaiveDate,
    #[serde(rename = "type")]
    tx_type: String,
    #[serde(default, deserialize_with = "amount_as_text")]
    amount: String,
    #[serde(default)]
    asset_description: String,
}

/// The feed reports `amount` as either a range string or a bare number.
fn amount_as_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Wire {
        Text(String),
        Number(f64),
    }
    Ok(match Wire::deserialize(deserializer)? {
        Wire::Text(s) => s,
        Wire::Number(n) => n.to_string(),
    })
}

impl TradeRecord {
    /// Parse one feed object into a typed record, keeping the original
    /// payload. A record missing its required fields makes the whole page
    /// malformed and aborts the current fetch.
    pub fn from_json(value: Value) -> Result<Self, HousewatchError> {
        let wire: WireTrade =
            serde_json::from_value(value.clone()).map_err(|e| HousewatchError::Feed {
                context: "trade record".into(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            first_name: wire.first_name,
            last_name: wire.last_name,
            symbol: wire.symbol,
            transaction_date: wire.transaction_date,
            tx_type: wire.tx_type,
            amount: wire.amount,
            asset_description: wire.asset_description,
            raw: value,
        })
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Lossy parse of a disclosed amount.
///
/// Extracts every digit/comma group from a range string ("$1,000 - $15,000"),
/// strips commas, and averages the values; falls back to a plain float parse,
/// and to 0.0 when nothing is recognizable. Ranges are deliberately collapsed
/// to their midpoint — the disclosure never carries exact quantities.
pub fn parse_amount(text: &str) -> f64 {
    let mut values: Vec<f64> = Vec::new();
    let mut group = String::new();
    for c in text.chars().chain(std::iter::once(' ')) {
        if c.is_ascii_digit() || c == ',' {
            group.push(c);
        } else if !group.is_empty() {
            let digits: String = group.chars().filter(|c| *c != ',').collect();
            if let Ok(v) = digits.parse::<u64>() {
                values.push(v as f64);
            }
            group.clear();
        }
    }
    if !values.is_empty() {
        return values.iter().sum::<f64>() / values.len() as f64;
    }
    text.trim().parse::<f64>().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_amount_averages_range() {
        assert_eq!(parse_amount("$1,000-$15,000"), 8000.0);
        assert_eq!(parse_amount("$1,000 - $15,000"), 8000.0);
    }

    #[test]
    fn parse_amount_single_value() {
        assert_eq!(parse_amount("$50,000"), 50000.0);
    }

    #[test]
    fn parse_amount_plain_number() {
        assert_eq!(parse_amount("1234.5"), 1234.5);
    }

    #[test]
    fn parse_amount_garbage_defaults_to_zero() {
        assert_eq!(parse_amount("undisclosed"), 0.0);
        assert_eq!(parse_amount(""), 0.0);
    }

    #[test]
    fn from_json_typed_fields() {
        let value = json!({
            "firstName": "Jane",
            "lastName": "Doe",
            "symbol": "XYZ",
            "transactionDate": "2023-01-10",
            "type": "purchase",
            "amount": "$1,000-$15,000",
            "assetDescription": "XYZ Corp common stock",
            "link": "https://example.gov/filing/1"
        });
        let trade = TradeRecord::from_json(value.clone()).unwrap();
        assert_eq!(trade.full_name(), "Jane Doe");
        assert_eq!(trade.symbol, "XYZ");
        assert_eq!(
            trade.transaction_date,
            NaiveDate::from_ymd_opt(2023, 1, 10).unwrap()
        );
        assert_eq!(trade.tx_type, "purchase");
        // unmodeled fields survive in the raw payload
        assert_eq!(trade.raw, value);
    }

    #[test]
    fn from_json_numeric_amount() {
        let value = json!({
            "firstName": "Jane",
            "lastName": "Doe",
            "symbol": "XYZ",
            "transactionDate": "2023-01-10",
            "type": "sale",
            "amount": 8000.0
        });
        let trade = TradeRecord::from_json(value).unwrap();
        assert_eq!(trade.amount, "8000");
        assert_eq!(trade.asset_description, "");
    }

    #[test]
    fn from_json_missing_required_field_is_error() {
        let value = json!({"firstName": "Jane", "symbol": "XYZ"});
        let result = TradeRecord::from_json(value);
        assert!(matches!(result, Err(HousewatchError::Feed { .. })));
    }
}
