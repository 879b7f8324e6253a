//! Holding-period return series.

use crate::domain::error::HousewatchError;
use crate::ports::store_port::TradeStore;
use chrono::{Months, NaiveDate};
use serde::Serialize;

/// Anniversary horizons are evaluated for 1 through 5 whole years.
const MAX_HORIZON_YEARS: u32 = 5;

/// One (symbol, horizon, return) observation. The collection is unordered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnObservation {
    pub symbol: String,
    pub holding_period: String,
    pub return_pct: f64,
}

fn return_pct(observed: f64, buy: f64) -> f64 {
    (observed - buy) / buy * 100.0
}

/// `date + years` calendar years, clamped to the end of the month (a Feb 29
/// purchase lands on Feb 28 in non-leap years).
fn anniversary(date: NaiveDate, years: u32) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(12 * years))
}

/// Compute one filer's holding-period returns as of `as_of`.
///
/// Each trade joins to the bar on its exact transaction date — the same-day
/// close is the buy price, and a trade with no exact-date bar is excluded
/// entirely, with no interpolation or nearest-date fallback. Only
/// purchase-type transactions contribute. Then, per purchase:
///
/// - held under 365 days: one "to date" observation against the most recent
///   cached close at or before `as_of`, or nothing when no bar is cached;
/// - held 365 days or more: one `<k>yr` observation per whole-year
///   anniversary `k = 1..=5` that has an exact-date bar, stopping once the
///   anniversary passes `as_of`.
pub fn holding_returns(
    store: &dyn TradeStore,
    full_name: &str,
    as_of: NaiveDate,
) -> Result<Vec<ReturnObservation>, HousewatchError> {
    let trades = store.trades_with_prices(full_name)?;
    let mut observations = Vec::new();

    for trade in trades {
        if !trade.tx_type.to_lowercase().starts_with("purchase") {
            continue;
        }
        let Some(buy_price) = trade.buy_price else {
            continue;
        };

        let elapsed_days = (as_of - trade.buy_date).num_days();
        if elapsed_days < 365 {
            if let Some(current) = store.latest_close_at_or_before(&trade.symbol, as_of)? {
                observations.push(ReturnObservation {
                    symbol: trade.symbol.clone(),
                    holding_period: "to date".into(),
                    return_pct: return_pct(current, buy_price),
                });
            }
        } else {
            for years in 1..=MAX_HORIZON_YEARS {
                let Some(target) = anniversary(trade.buy_date, years) else {
                    break;
                };
                if target > as_of {
                    break;
                }
                if let Some(close) = store.close_on(&trade.symbol, target)? {
                    observations.push(ReturnObservation {
                        symbol: trade.symbol.clone(),
                        holding_period: format!("{years}yr"),
                        return_pct: return_pct(close, buy_price),
                    });
                }
            }
        }
    }

    Ok(observations)
}
