//! SQLite record sink.
//!
//! Schema: `stocks` keyed by ticker, append-only `stock_price`,
//! `key_analysis` and `sentiments` rows referencing it, and one
//! `fundamentals` row per company pointing at a fresh row in each of the
//! thirteen fundamentals group tables.

use chrono::Utc;
use rusqlite::types::Value;
use rusqlite::{Connection, Transaction, params, params_from_iter};
use saham_traits::{
    BalanceSheet, CashFlowStatement, Company, CurrentValuation, Dividend, Fundamental, Growth,
    IncomeStatement, KeyAnalysis, ManagementEffectiveness, MarketRank, PerShare,
    PricePerformance, Profitability, RecordSink, Result, Solvency, Stats,
};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use super::sink_error;

/// How long a writer waits on a locked database before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// One fundamentals group table: name, foreign-key column, field columns.
struct GroupTable {
    table: &'static str,
    key: &'static str,
    columns: &'static [&'static str],
}

const GROUP_TABLES: [GroupTable; 13] = [
    GroupTable { table: "stats", key: "stats_id", columns: Stats::COLUMNS },
    GroupTable { table: "current_valuations", key: "current_valuation_id", columns: CurrentValuation::COLUMNS },
    GroupTable { table: "per_shares", key: "per_share_id", columns: PerShare::COLUMNS },
    GroupTable { table: "solvencies", key: "solvency_id", columns: Solvency::COLUMNS },
    GroupTable {
        table: "management_effectivenesses",
        key: "management_effectiveness_id",
        columns: ManagementEffectiveness::COLUMNS,
    },
    GroupTable { table: "profitabilities", key: "profitability_id", columns: Profitability::COLUMNS },
    GroupTable { table: "growths", key: "growth_id", columns: Growth::COLUMNS },
    GroupTable { table: "dividends", key: "dividend_id", columns: Dividend::COLUMNS },
    GroupTable { table: "market_ranks", key: "market_rank_id", columns: MarketRank::COLUMNS },
    GroupTable { table: "income_statements", key: "income_statement_id", columns: IncomeStatement::COLUMNS },
    GroupTable { table: "balance_sheets", key: "balance_sheet_id", columns: BalanceSheet::COLUMNS },
    GroupTable {
        table: "cash_flow_statements",
        key: "cash_flow_statement_id",
        columns: CashFlowStatement::COLUMNS,
    },
    GroupTable {
        table: "price_performances",
        key: "price_performance_id",
        columns: PricePerformance::COLUMNS,
    },
];

/// Row values of each group, in [`GROUP_TABLES`] order.
fn group_values(f: &Fundamental) -> [Vec<Value>; 13] {
    let real = |values: Vec<f64>| values.into_iter().map(Value::Real).collect::<Vec<_>>();
    let dividend = &f.dividend;
    [
        real(f.stats.values()),
        real(f.current_valuation.values()),
        real(f.per_share.values()),
        real(f.solvency.values()),
        real(f.management_effectiveness.values()),
        real(f.profitability.values()),
        real(f.growth.values()),
        vec![
            Value::Real(dividend.dividend),
            Value::Real(dividend.dividend_ttm),
            Value::Real(dividend.payout_ratio),
            Value::Real(dividend.dividend_yield),
            Value::Text(dividend.latest_dividend_ex_date.clone()),
        ],
        real(f.market_rank.values()),
        real(f.income_statement.values()),
        real(f.balance_sheet.values()),
        real(f.cash_flow_statement.values()),
        real(f.price_performance.values()),
    ]
}

fn placeholders(n: usize) -> String {
    (1..=n).map(|i| format!("?{i}")).collect::<Vec<_>>().join(", ")
}

/// Create every table if missing.
pub(crate) fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS stocks (
            ticker TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL DEFAULT '',
            ipo_date TEXT NOT NULL DEFAULT '',
            note TEXT NOT NULL DEFAULT '',
            market_cap REAL NOT NULL DEFAULT 0,
            home_page TEXT NOT NULL DEFAULT ''
        );
        CREATE TABLE IF NOT EXISTS stock_price (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            stock_ticker TEXT NOT NULL REFERENCES stocks(ticker),
            price REAL NOT NULL, volume INTEGER NOT NULL, change REAL NOT NULL,
            percentage_change REAL NOT NULL, average REAL NOT NULL, close REAL NOT NULL,
            high REAL NOT NULL, low REAL NOT NULL, open REAL NOT NULL,
            ara REAL NOT NULL, arb REAL NOT NULL, frequency INTEGER NOT NULL,
            fsell REAL NOT NULL, fbuy REAL NOT NULL,
            created_at TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS sentiments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            stock_ticker TEXT NOT NULL REFERENCES stocks(ticker),
            content TEXT NOT NULL DEFAULT '',
            rate REAL NOT NULL DEFAULT 0,
            category TEXT NOT NULL DEFAULT '',
            posted_at TEXT NOT NULL
        );",
    )?;

    let key_columns = KeyAnalysis::COLUMNS
        .iter()
        .map(|c| format!("{c} REAL NOT NULL DEFAULT 0"))
        .collect::<Vec<_>>()
        .join(", ");
    conn.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS key_analysis (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            stock_ticker TEXT NOT NULL REFERENCES stocks(ticker),
            {key_columns},
            created_at TEXT NOT NULL
        );"
    ))?;

    for group in &GROUP_TABLES {
        let columns = group
            .columns
            .iter()
            .map(|c| {
                if *c == "latest_dividend_ex_date" {
                    format!("{c} TEXT NOT NULL DEFAULT ''")
                } else {
                    format!("{c} REAL NOT NULL DEFAULT 0")
                }
            })
            .collect::<Vec<_>>()
            .join(", ");
        conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {} (id INTEGER PRIMARY KEY AUTOINCREMENT, {columns});",
            group.table
        ))?;
    }

    let keys = GROUP_TABLES
        .iter()
        .map(|g| format!("{} INTEGER NOT NULL REFERENCES {}(id)", g.key, g.table))
        .collect::<Vec<_>>()
        .join(", ");
    conn.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS fundamentals (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            stock_ticker TEXT NOT NULL REFERENCES stocks(ticker),
            {keys},
            created_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_fundamentals_ticker ON fundamentals(stock_ticker);
        CREATE INDEX IF NOT EXISTS idx_stock_price_ticker ON stock_price(stock_ticker);
        CREATE INDEX IF NOT EXISTS idx_key_analysis_ticker ON key_analysis(stock_ticker);"
    ))?;
    Ok(())
}

fn insert_company(tx: &Transaction<'_>, company: &Company) -> rusqlite::Result<()> {
    let stock = &company.stock;
    let now = Utc::now().to_rfc3339();

    tx.execute(
        "INSERT INTO stocks (ticker, name, ipo_date, note, market_cap, home_page)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(ticker) DO UPDATE SET
            name = excluded.name, ipo_date = excluded.ipo_date, note = excluded.note,
            market_cap = excluded.market_cap, home_page = excluded.home_page",
        params![stock.ticker, stock.name, stock.ipo_date, stock.note, stock.market_cap, stock.home_page],
    )?;

    let p = &company.stock_price;
    tx.execute(
        "INSERT INTO stock_price (stock_ticker, price, volume, change, percentage_change, average,
            close, high, low, open, ara, arb, frequency, fsell, fbuy, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
        params![
            stock.ticker, p.price, p.volume, p.change, p.percentage_change, p.average, p.close,
            p.high, p.low, p.open, p.ara, p.arb, p.frequency, p.fsell, p.fbuy, now
        ],
    )?;

    let ka = &company.key_analysis;
    let mut values = vec![Value::Text(stock.ticker.clone())];
    values.extend(
        KeyAnalysis::COLUMNS
            .iter()
            .map(|c| Value::Real(ka.get(c).unwrap_or_default())),
    );
    values.push(Value::Text(now.clone()));
    tx.execute(
        &format!(
            "INSERT INTO key_analysis (stock_ticker, {}, created_at) VALUES ({})",
            KeyAnalysis::COLUMNS.join(", "),
            placeholders(values.len())
        ),
        params_from_iter(values),
    )?;

    for post in &company.sentiments {
        tx.execute(
            "INSERT INTO sentiments (stock_ticker, content, rate, category, posted_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![stock.ticker, post.content, post.rate, post.category, post.posted_at.to_rfc3339()],
        )?;
    }

    if let Some(f) = &company.fundamental {
        let mut ids = Vec::with_capacity(GROUP_TABLES.len());
        for (group, row) in GROUP_TABLES.iter().zip(group_values(f)) {
            tx.execute(
                &format!(
                    "INSERT INTO {} ({}) VALUES ({})",
                    group.table,
                    group.columns.join(", "),
                    placeholders(row.len())
                ),
                params_from_iter(row),
            )?;
            ids.push(Value::Integer(tx.last_insert_rowid()));
        }

        let keys = GROUP_TABLES.iter().map(|g| g.key).collect::<Vec<_>>().join(", ");
        let mut values = vec![Value::Text(stock.ticker.clone())];
        values.extend(ids);
        values.push(Value::Text(now));
        tx.execute(
            &format!(
                "INSERT INTO fundamentals (stock_ticker, {keys}, created_at) VALUES ({})",
                placeholders(values.len())
            ),
            params_from_iter(values),
        )?;
    }
    Ok(())
}

/// Persists companies into a SQLite database.
#[derive(Debug)]
pub struct DatabaseSink {
    conn: Connection,
}

impl DatabaseSink {
    /// Open (or create) the database at `path` and ensure the schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or the schema cannot be
    /// created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path).map_err(|e| sink_error("sqlite", e))?;
        Self::with_connection(conn)
    }

    /// Open a private in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| sink_error("sqlite", e))?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.busy_timeout(BUSY_TIMEOUT)
            .map_err(|e| sink_error("sqlite", e))?;
        init_schema(&conn).map_err(|e| sink_error("sqlite schema", e))?;
        Ok(Self { conn })
    }
}

impl RecordSink for DatabaseSink {
    fn name(&self) -> &str {
        "database"
    }

    fn persist(&mut self, company: &Company) -> Result<()> {
        let tx = self
            .conn
            .transaction()
            .map_err(|e| sink_error("sqlite", e))?;
        insert_company(&tx, company).map_err(|e| sink_error(company.ticker(), e))?;
        tx.commit().map_err(|e| sink_error("sqlite commit", e))?;
        debug!(ticker = company.ticker(), "persisted company");
        Ok(())
    }
}
