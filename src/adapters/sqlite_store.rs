//! SQLite store adapter.
//!
//! All four tables live in one embedded database file. Every method acquires
//! a pooled connection for its statement group and releases it on return.

use crate::domain::error::HousewatchError;
use crate::domain::price::PriceBar;
use crate::domain::trade::{parse_amount, Filer, JoinedTrade, TradeRecord};
use crate::ports::config_port::ConfigPort;
use crate::ports::store_port::TradeStore;
use chrono::NaiveDate;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, OptionalExtension};
use tracing::{info, warn};

const DATE_FMT: &str = "%Y-%m-%d";

/// Columns of the fixed price-history schema. A stored table with any other
/// column count is dropped and recreated.
const PRICE_COLUMNS: usize = 7;

pub struct SqliteStore {
    pool: Pool<SqliteConnectionManager>,
}

fn db_err(e: r2d2::Error) -> HousewatchError {
    HousewatchError::Database {
        reason: e.to_string(),
    }
}

fn query_err(e: rusqlite::Error) -> HousewatchError {
    HousewatchError::DatabaseQuery {
        reason: e.to_string(),
    }
}

fn parse_date(text: &str) -> Result<NaiveDate, HousewatchError> {
    NaiveDate::parse_from_str(text, DATE_FMT).map_err(|e: chrono::ParseError| {
        HousewatchError::Database {
            reason: e.to_string(),
        }
    })
}

impl SqliteStore {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, HousewatchError> {
        let db_path =
            config
                .get_string("database", "path")
                .ok_or_else(|| HousewatchError::ConfigMissing {
                    section: "database".into(),
                    key: "path".into(),
                })?;

        let pool_size = config.get_int("database", "pool_size", 4) as u32;

        let manager = SqliteConnectionManager::file(&db_path);
        let pool = Pool::builder()
            .max_size(pool_size)
            .build(manager)
            .map_err(db_err)?;

        Ok(Self { pool })
    }

    pub fn in_memory() -> Result<Self, HousewatchError> {
        // A single pooled connection, so every statement group sees the same
        // in-memory database.
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder().max_size(1).build(manager).map_err(db_err)?;

        Ok(Self { pool })
    }

    fn conn(&self) -> Result<PooledConnection<SqliteConnectionManager>, HousewatchError> {
        self.pool.get().map_err(db_err)
    }

    fn create_price_table(conn: &rusqlite::Connection) -> Result<(), HousewatchError> {
        conn.execute_batch(
            "CREATE TABLE price_history (
                symbol TEXT NOT NULL,
                price_date TEXT NOT NULL,
                open REAL NOT NULL,
                high REAL NOT NULL,
                low REAL NOT NULL,
                close REAL NOT NULL,
                volume INTEGER NOT NULL,
                PRIMARY KEY (symbol, price_date)
            );",
        )
        .map_err(query_err)?;
        info!("created price history table");
        Ok(())
    }

    fn price_table_column_count(
        conn: &rusqlite::Connection,
    ) -> Result<usize, HousewatchError> {
        let mut stmt = conn
            .prepare("PRAGMA table_info(price_history)")
            .map_err(query_err)?;
        let count = stmt
            .query_map([], |_| Ok(()))
            .map_err(query_err)?
            .count();
        Ok(count)
    }
}

impl TradeStore for SqliteStore {
    fn ensure_schema(&self) -> Result<(), HousewatchError> {
        let conn = self.conn()?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS house_trades (
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                symbol TEXT NOT NULL,
                transaction_date TEXT NOT NULL,
                tx_type TEXT NOT NULL,
                amount TEXT NOT NULL,
                asset_description TEXT NOT NULL,
                raw TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_house_trades_filer
                ON house_trades(first_name, last_name);
            CREATE TABLE IF NOT EXISTS member_details (
                member TEXT PRIMARY KEY,
                detail TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS progress (
                task TEXT PRIMARY KEY,
                last_key TEXT NOT NULL
            );",
        )
        .map_err(query_err)?;

        match Self::price_table_column_count(&conn)? {
            0 => Self::create_price_table(&conn)?,
            PRICE_COLUMNS => {}
            columns => {
                // Drifted schema: data loss is accepted to restore integrity.
                warn!(columns, "price table schema mismatch, recreating");
                conn.execute_batch("DROP TABLE price_history;")
                    .map_err(query_err)?;
                Self::create_price_table(&conn)?;
            }
        }

        Ok(())
    }

    fn append_trades(&self, trades: &[TradeRecord]) -> Result<usize, HousewatchError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction().map_err(query_err)?;

        for trade in trades {
            tx.execute(
                "INSERT INTO house_trades
                 (first_name, last_name, symbol, transaction_date, tx_type,
                  amount, asset_description, raw)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    trade.first_name,
                    trade.last_name,
                    trade.symbol,
                    trade.transaction_date.format(DATE_FMT).to_string(),
                    trade.tx_type,
                    trade.amount,
                    trade.asset_description,
                    trade.raw.to_string(),
                ],
            )
            .map_err(query_err)?;
        }

        tx.commit().map_err(query_err)?;
        Ok(trades.len())
    }

    fn max_transaction_date(&self) -> Result<Option<NaiveDate>, HousewatchError> {
        let conn = self.conn()?;
        // ISO dates sort lexicographically, so MAX over TEXT is chronological.
        let max: Option<String> = conn
            .query_row("SELECT MAX(transaction_date) FROM house_trades", [], |row| {
                row.get(0)
            })
            .map_err(query_err)?;
        max.map(|s| parse_date(&s)).transpose()
    }

    fn distinct_filers(&self) -> Result<Vec<Filer>, HousewatchError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT DISTINCT first_name, last_name FROM house_trades
                 ORDER BY first_name || ' ' || last_name",
            )
            .map_err(query_err)?;

        let rows = stmt
            .query_map([], |row| {
                Ok(Filer {
                    first_name: row.get(0)?,
                    last_name: row.get(1)?,
                })
            })
            .map_err(query_err)?;

        let mut filers = Vec::new();
        for row in rows {
            filers.push(row.map_err(query_err)?);
        }
        Ok(filers)
    }

    fn get_cursor(&self, task: &str) -> Result<Option<String>, HousewatchError> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT last_key FROM progress WHERE task = ?1",
            params![task],
            |row| row.get(0),
        )
        .optional()
        .map_err(query_err)
    }

    fn set_cursor(&self, task: &str, key: &str) -> Result<(), HousewatchError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT OR REPLACE INTO progress (task, last_key) VALUES (?1, ?2)",
            params![task, key],
        )
        .map_err(query_err)?;
        Ok(())
    }

    fn store_member_detail(
        &self,
        full_name: &str,
        detail: &str,
    ) -> Result<(), HousewatchError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT OR REPLACE INTO member_details (member, detail) VALUES (?1, ?2)",
            params![full_name, detail],
        )
        .map_err(query_err)?;
        Ok(())
    }

    fn member_detail(&self, full_name: &str) -> Result<Option<String>, HousewatchError> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT detail FROM member_details WHERE member = ?1",
            params![full_name],
            |row| row.get(0),
        )
        .optional()
        .map_err(query_err)
    }

    fn symbol_first_trade_dates(
        &self,
        filer: &Filer,
    ) -> Result<Vec<(String, NaiveDate)>, HousewatchError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT symbol, MIN(transaction_date) FROM house_trades
                 WHERE first_name = ?1 AND last_name = ?2
                 GROUP BY symbol ORDER BY symbol",
            )
            .map_err(query_err)?;

        let rows = stmt
            .query_map(params![filer.first_name, filer.last_name], |row| {
                let symbol: String = row.get(0)?;
                let date: String = row.get(1)?;
                Ok((symbol, date))
            })
            .map_err(query_err)?;

        let mut result = Vec::new();
        for row in rows {
            let (symbol, date) = row.map_err(query_err)?;
            result.push((symbol, parse_date(&date)?));
        }
        Ok(result)
    }

    fn latest_bar_date_from(
        &self,
        symbol: &str,
        start: NaiveDate,
    ) -> Result<Option<NaiveDate>, HousewatchError> {
        let conn = self.conn()?;
        let max: Option<String> = conn
            .query_row(
                "SELECT MAX(price_date) FROM price_history
                 WHERE symbol = ?1 AND price_date >= ?2",
                params![symbol, start.format(DATE_FMT).to_string()],
                |row| row.get(0),
            )
            .map_err(query_err)?;
        max.map(|s| parse_date(&s)).transpose()
    }

    fn upsert_bars(&self, bars: &[PriceBar]) -> Result<usize, HousewatchError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction().map_err(query_err)?;

        let mut inserted = 0;
        for bar in bars {
            inserted += tx
                .execute(
                    "INSERT OR IGNORE INTO price_history
                     (symbol, price_date, open, high, low, close, volume)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                    params![
                        bar.symbol,
                        bar.date.format(DATE_FMT).to_string(),
                        bar.open,
                        bar.high,
                        bar.low,
                        bar.close,
                        bar.volume,
                    ],
                )
                .map_err(query_err)?;
        }

        tx.commit().map_err(query_err)?;
        Ok(inserted)
    }

    fn close_on(&self, symbol: &str, date: NaiveDate) -> Result<Option<f64>, HousewatchError> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT close FROM price_history WHERE symbol = ?1 AND price_date = ?2",
            params![symbol, date.format(DATE_FMT).to_string()],
            |row| row.get(0),
        )
        .optional()
        .map_err(query_err)
    }

    fn latest_close_at_or_before(
        &self,
        symbol: &str,
        date: NaiveDate,
    ) -> Result<Option<f64>, HousewatchError> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT close FROM price_history
             WHERE symbol = ?1 AND price_date <= ?2
             ORDER BY price_date DESC LIMIT 1",
            params![symbol, date.format(DATE_FMT).to_string()],
            |row| row.get(0),
        )
        .optional()
        .map_err(query_err)
    }

    fn trades_with_prices(&self, full_name: &str) -> Result<Vec<JoinedTrade>, HousewatchError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT t.transaction_date, t.symbol, t.tx_type, t.amount,
                        p.close, t.asset_description
                 FROM house_trades t
                 LEFT JOIN price_history p
                   ON p.symbol = t.symbol AND p.price_date = t.transaction_date
                 WHERE t.first_name || ' ' || t.last_name = ?1
                 ORDER BY t.transaction_date",
            )
            .map_err(query_err)?;

        let rows = stmt
            .query_map(params![full_name], |row| {
                let date: String = row.get(0)?;
                let amount: String = row.get(3)?;
                Ok((
                    date,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    amount,
                    row.get::<_, Option<f64>>(4)?,
                    row.get::<_, String>(5)?,
                ))
            })
            .map_err(query_err)?;

        let mut trades = Vec::new();
        for row in rows {
            let (date, symbol, tx_type, amount, buy_price, asset_description) =
                row.map_err(query_err)?;
            let parsed_amount = parse_amount(&amount);
            trades.push(JoinedTrade {
                buy_date: parse_date(&date)?,
                symbol,
                tx_type,
                amount,
                parsed_amount,
                buy_price,
                asset_description,
            });
        }
        Ok(trades)
    }

    fn delete_all_trades(&self) -> Result<(), HousewatchError> {
        let conn = self.conn()?;
        conn.execute_batch("DELETE FROM house_trades; DELETE FROM progress;")
            .map_err(query_err)?;
        info!("deleted all trades and reset progress cursors");
        Ok(())
    }
}
