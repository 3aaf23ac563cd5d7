//! Joining brokerage records with exchange quotes, derived fields and filters.

use super::instrument::{InstrumentRecord, RiskTier};
use super::snapshot::ExchangeQuote;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Europe::Moscow;

pub const DAYS_PER_YEAR: f64 = 365.25;

/// Coupons per year for a coupon period in days.
///
/// Halves round to even, so a 146-day period gives 2.
pub fn coupon_frequency(period_days: Option<f64>) -> Option<u32> {
    let period = period_days.filter(|p| *p > 0.0)?;
    Some((365.0 / period).round_ties_even() as u32)
}

/// Years from `now` until the start of the maturity day in Moscow, never
/// negative. Counts whole days only.
pub fn duration_years(maturity: NaiveDate, now: DateTime<Utc>) -> Option<f64> {
    let local_midnight = maturity.and_hms_opt(0, 0, 0)?;
    let maturity_utc = Moscow
        .from_local_datetime(&local_midnight)
        .earliest()?
        .with_timezone(&Utc);
    let days = (maturity_utc - now).num_days();
    Some((days as f64 / DAYS_PER_YEAR).max(0.0))
}

/// Maturity shown in the report: the brokerage date when it has one,
/// otherwise the exchange `MATDATE`.
pub fn choose_maturity(record: &InstrumentRecord, quote: Option<&ExchangeQuote>) -> Option<String> {
    record
        .maturity
        .map(|d| d.format("%Y-%m-%d").to_string())
        .or_else(|| quote.and_then(|q| q.meta.maturity_date()).map(str::to_string))
}

/// Threshold filters. An unset threshold or an unknown value never discards.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Filters {
    pub min_ytm: Option<f64>,
    pub max_duration: Option<f64>,
}

impl Filters {
    pub fn yield_passes(&self, ytm: Option<f64>) -> bool {
        match (self.min_ytm, ytm) {
            (Some(min), Some(y)) => y >= min,
            _ => true,
        }
    }

    pub fn duration_passes(&self, duration: Option<f64>) -> bool {
        match (self.max_duration, duration) {
            (Some(max), Some(d)) => d <= max,
            _ => true,
        }
    }
}

/// One line of the report.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedBondRow {
    pub isin: String,
    pub secid: Option<String>,
    pub issuer: String,
    pub last_price: Option<f64>,
    pub accrued_interest: Option<f64>,
    pub coupon_percent: Option<f64>,
    pub coupon_value: Option<f64>,
    pub coupon_frequency: Option<u32>,
    pub face_value: Option<f64>,
    pub next_coupon: Option<NaiveDate>,
    pub maturity: Option<String>,
    pub duration_years: Option<f64>,
    pub ytm: Option<f64>,
    pub coupon_type: &'static str,
    pub amortization: bool,
    /// Already inverted for display.
    pub risk: RiskTier,
}

impl MergedBondRow {
    /// Combine a catalog record with whatever the exchange returned.
    /// `next_coupon` is left unknown; the caller fills it in.
    pub fn assemble(
        record: &InstrumentRecord,
        quote: Option<&ExchangeQuote>,
        now: DateTime<Utc>,
    ) -> Self {
        let meta = quote.map(|q| &q.meta);
        let market = quote.map(|q| &q.market);

        let maturity = choose_maturity(record, quote);
        let duration_years = maturity
            .as_deref()
            .and_then(|m| NaiveDate::parse_from_str(m, "%Y-%m-%d").ok())
            .and_then(|d| duration_years(d, now));

        let issuer = meta
            .and_then(|m| m.short_name.clone())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| record.name.clone());

        Self {
            isin: record.isin.clone(),
            secid: quote.map(|q| q.secid.clone()),
            issuer,
            last_price: market.and_then(|m| m.last_price),
            accrued_interest: market
                .and_then(|m| m.accrued_interest)
                .or_else(|| meta.and_then(|m| m.accrued_interest)),
            coupon_percent: meta.and_then(|m| m.coupon_percent),
            coupon_value: meta.and_then(|m| m.coupon_value),
            coupon_frequency: coupon_frequency(meta.and_then(|m| m.coupon_period)),
            face_value: meta.and_then(|m| m.face_value),
            next_coupon: None,
            maturity,
            duration_years,
            ytm: market.and_then(|m| m.yield_pct),
            coupon_type: record.coupon_type(),
            amortization: record.amortization,
            risk: record.risk.inverted(),
        }
    }
}
