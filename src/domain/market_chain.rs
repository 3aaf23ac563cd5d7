//! Market data lookup for a resolved security.
//!
//! Quotes are taken from the first source that has any:
//! 1. the aggregated market data across all boards,
//! 2. each board's own market data, priority boards first,
//! 3. the most recent daily close with a yield over the past year.

use super::fallback::FallbackChain;
use super::resolver::resolve_secid;
use super::snapshot::{ExchangeQuote, MarketSnapshot, SecurityMeta};
use super::table::ProviderTable;
use crate::ports::exchange_port::ExchangePort;
use chrono::{Duration, NaiveDate};
use std::collections::HashSet;
use tokio::sync::OnceCell;

/// Bond boards checked before any board discovered for the security.
pub const PRIORITY_BOARDS: [&str; 8] = [
    "TQCB", "TQCBP", "TQOB", "TQO1", "TQIR", "TQOF", "TQOD", "TQCBF",
];

pub const HISTORY_LOOKBACK_DAYS: i64 = 365;

/// Priority boards, then boards from a `boards` section in first-seen order.
pub fn board_order(discovered: &ProviderTable) -> Vec<String> {
    let mut ordered: Vec<String> = PRIORITY_BOARDS.iter().map(|b| b.to_string()).collect();
    let mut seen: HashSet<String> = ordered.iter().cloned().collect();

    for row in discovered.rows() {
        if let Some(board) = row.str("BOARDID").filter(|b| !b.is_empty()) {
            if seen.insert(board.to_string()) {
                ordered.push(board.to_string());
            }
        }
    }
    ordered
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryClose {
    pub trade_date: Option<String>,
    pub yield_pct: f64,
    pub price: Option<f64>,
}

/// Most recent row of a `history` section that carries a yield.
///
/// Dates are ISO strings, so string order is date order. An earlier row
/// keeps its place on a tie. Undated rows only win while nothing dated has
/// been seen.
pub fn latest_close(table: &ProviderTable) -> Option<HistoryClose> {
    let mut best: Option<HistoryClose> = None;

    for row in table.rows() {
        let Some(yield_pct) = row.f64("YIELDCLOSE") else {
            continue;
        };
        let trade_date = row.str("TRADEDATE");

        let replace = match &best {
            None => true,
            Some(current) => match (&current.trade_date, trade_date) {
                (None, _) => true,
                (Some(cur), Some(date)) => date > cur.as_str(),
                (Some(_), None) => false,
            },
        };

        if replace {
            best = Some(HistoryClose {
                trade_date: trade_date.map(str::to_string),
                yield_pct,
                price: row.f64("LEGALCLOSEPRICE"),
            });
        }
    }
    best
}

pub async fn aggregated_snapshot(port: &dyn ExchangePort, secid: &str) -> MarketSnapshot {
    MarketSnapshot::from_table(&port.market_data(secid, None).await)
}

async fn discover_boards(port: &dyn ExchangePort, secid: &str) -> Vec<String> {
    board_order(&port.boards(secid).await)
}

/// Walk the three market data sources for `secid`.
///
/// The result is all-unknown when no source has data. `today` anchors the
/// history window.
pub async fn market_snapshot(
    port: &dyn ExchangePort,
    secid: &str,
    today: NaiveDate,
) -> MarketSnapshot {
    let boards: OnceCell<Vec<String>> = OnceCell::new();
    let boards = &boards;

    let chain = FallbackChain::new()
        .then("aggregate", async move {
            let snapshot = aggregated_snapshot(port, secid).await;
            snapshot.has_data().then_some(snapshot)
        })
        .then("board", async move {
            let order = boards.get_or_init(|| discover_boards(port, secid)).await;
            for board in order {
                let table = port.market_data(secid, Some(board.as_str())).await;
                let mut snapshot = MarketSnapshot::from_table(&table);
                if snapshot.has_data() {
                    snapshot.board.get_or_insert_with(|| board.clone());
                    return Some(snapshot);
                }
            }
            None
        })
        .then("history", async move {
            let order = boards.get_or_init(|| discover_boards(port, secid)).await;
            let from = today - Duration::days(HISTORY_LOOKBACK_DAYS);
            for board in order {
                let table = port.history(secid, board, from).await;
                if let Some(close) = latest_close(&table) {
                    return Some(MarketSnapshot {
                        yield_pct: Some(close.yield_pct),
                        last_price: close.price,
                        accrued_interest: None,
                        board: Some(board.clone()),
                    });
                }
            }
            None
        });

    match chain.first().await {
        Some((stage, snapshot)) => {
            tracing::debug!(secid, stage, board = ?snapshot.board, "market data found");
            snapshot
        }
        None => {
            tracing::debug!(secid, "no market data from any source");
            MarketSnapshot::default()
        }
    }
}

/// Resolve `isin` and gather its metadata and market data.
///
/// `None` only when the ISIN is unknown to the exchange. A known security
/// with no quotes still returns its metadata.
pub async fn fetch_quote(
    port: &dyn ExchangePort,
    isin: &str,
    today: NaiveDate,
) -> Option<ExchangeQuote> {
    let secid = resolve_secid(port, isin).await?;
    let meta = SecurityMeta::from_table(&port.security_description(&secid).await);
    let market = market_snapshot(port, &secid, today).await;
    Some(ExchangeQuote {
        secid,
        meta,
        market,
    })
}
