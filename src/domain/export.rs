//! One export pass over the brokerage catalog.

use super::error::BondExportError;
use super::market_chain::fetch_quote;
use super::merge::MergedBondRow;
use super::params::ExportParams;
use crate::ports::catalog_port::CatalogPort;
use crate::ports::exchange_port::ExchangePort;
use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Coupon schedule window, starting now.
pub const COUPON_WINDOW_DAYS: i64 = 365 * 5;

#[derive(Debug, Clone, Default)]
pub struct ExportOutcome {
    /// Instruments that survived the allow-list and were processed.
    pub candidates: usize,
    /// Rows that passed the filters, in catalog order.
    pub rows: Vec<MergedBondRow>,
}

/// Earliest coupon date not before `now`. Unknown on any failure.
pub async fn next_coupon_date(
    catalog: &dyn CatalogPort,
    figi: &str,
    now: DateTime<Utc>,
) -> Option<NaiveDate> {
    let to = now + Duration::days(COUPON_WINDOW_DAYS);
    match catalog.coupon_dates(figi, now, to).await {
        Ok(dates) => dates
            .into_iter()
            .filter(|d| *d >= now)
            .min()
            .map(|d| d.date_naive()),
        Err(e) => {
            tracing::debug!(figi, kind = e.kind(), error = %e, "coupon schedule unavailable");
            None
        }
    }
}

/// List the catalog, join each instrument with exchange data, filter.
///
/// Instruments are handled one at a time in catalog order. Only a failed
/// catalog listing is an error; everything else degrades to unknown fields.
pub async fn collect_rows(
    catalog: &dyn CatalogPort,
    exchange: &dyn ExchangePort,
    params: &ExportParams,
    now: DateTime<Utc>,
) -> Result<ExportOutcome, BondExportError> {
    let listed = catalog.list_bonds(params.scope).await?;
    let listed_count = listed.len();
    let instruments = params.restrict(listed);
    tracing::info!(
        listed = listed_count,
        selected = instruments.len(),
        scope = ?params.scope,
        "catalog loaded"
    );

    let today = now.date_naive();
    let mut rows = Vec::new();

    for record in &instruments {
        let quote = fetch_quote(exchange, &record.isin, today).await;
        if quote.is_none() {
            tracing::warn!(isin = %record.isin, "not found on the exchange");
        }

        let mut row = MergedBondRow::assemble(record, quote.as_ref(), now);

        if !params.filters.yield_passes(row.ytm) {
            tracing::debug!(isin = %record.isin, ytm = ?row.ytm, "below minimum yield");
            continue;
        }
        if !params.filters.duration_passes(row.duration_years) {
            tracing::debug!(isin = %record.isin, duration = ?row.duration_years, "above maximum duration");
            continue;
        }

        row.next_coupon = next_coupon_date(catalog, &record.figi, now).await;
        rows.push(row);
    }

    Ok(ExportOutcome {
        candidates: instruments.len(),
        rows,
    })
}
