//! Exchange-side market data and catalog metadata.

use super::table::ProviderTable;

/// Sentinel ISS uses for "no maturity date".
pub const NO_DATE: &str = "0000-00-00";

/// Price and yield observed for a security. Every field may be unknown.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarketSnapshot {
    pub yield_pct: Option<f64>,
    pub last_price: Option<f64>,
    pub accrued_interest: Option<f64>,
    pub board: Option<String>,
}

impl MarketSnapshot {
    /// Read the first row of a `marketdata` section.
    pub fn from_table(table: &ProviderTable) -> Self {
        let Some(row) = table.first() else {
            return Self::default();
        };
        Self {
            yield_pct: row.f64("YIELD"),
            last_price: row.f64("LAST"),
            accrued_interest: row.f64("ACCRUEDINT"),
            board: row.str("BOARDID").map(str::to_string),
        }
    }

    /// True when at least one of yield, price or accrued interest is known.
    /// The board alone does not count.
    pub fn has_data(&self) -> bool {
        self.yield_pct.is_some() || self.last_price.is_some() || self.accrued_interest.is_some()
    }
}

/// Catalog metadata ISS keeps for a security.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SecurityMeta {
    pub short_name: Option<String>,
    /// Raw `MATDATE`, possibly [`NO_DATE`].
    pub maturity: Option<String>,
    pub coupon_percent: Option<f64>,
    pub coupon_value: Option<f64>,
    /// Days between coupons.
    pub coupon_period: Option<f64>,
    pub face_value: Option<f64>,
    pub accrued_interest: Option<f64>,
}

impl SecurityMeta {
    pub fn from_table(table: &ProviderTable) -> Self {
        let Some(row) = table.first() else {
            return Self::default();
        };
        Self {
            short_name: row.str("SHORTNAME").map(str::to_string),
            maturity: row.str("MATDATE").map(str::to_string),
            coupon_percent: row.f64("COUPONPERCENT"),
            coupon_value: row.f64("COUPONVALUE"),
            coupon_period: row.f64("COUPONPERIOD"),
            face_value: row.f64("FACEVALUE"),
            accrued_interest: row.f64("ACCRUEDINT"),
        }
    }

    /// `MATDATE` unless it is missing, blank or the no-date sentinel.
    pub fn maturity_date(&self) -> Option<&str> {
        self.maturity
            .as_deref()
            .filter(|d| !d.is_empty() && *d != NO_DATE)
    }
}

/// Everything the exchange side knows about one ISIN.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExchangeQuote {
    pub secid: String,
    pub meta: SecurityMeta,
    pub market: MarketSnapshot,
}
