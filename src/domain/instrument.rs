//! Brokerage-side bond records.

use chrono::NaiveDate;
use std::fmt;

/// Which slice of the brokerage catalog to enumerate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UniverseScope {
    /// Instruments tradable through the brokerage's base offering.
    #[default]
    Base,
    /// Every instrument the brokerage knows about.
    All,
}

/// Risk tier as carried by the brokerage catalog.
///
/// The raw scale is 0 unspecified, 1 low, 2 moderate, 3 high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RiskTier {
    #[default]
    Unspecified,
    Low,
    Moderate,
    High,
}

impl RiskTier {
    pub fn from_raw(raw: i64) -> Self {
        match raw {
            1 => RiskTier::Low,
            2 => RiskTier::Moderate,
            3 => RiskTier::High,
            _ => RiskTier::Unspecified,
        }
    }

    /// The tier shown in reports: LOW and HIGH trade places.
    pub fn inverted(self) -> Self {
        match self {
            RiskTier::Low => RiskTier::High,
            RiskTier::High => RiskTier::Low,
            other => other,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskTier::Unspecified => "UNSPECIFIED",
            RiskTier::Low => "LOW",
            RiskTier::Moderate => "MODERATE",
            RiskTier::High => "HIGH",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentRecord {
    pub isin: String,
    pub figi: String,
    pub name: String,
    /// Maturity as a Moscow-local calendar date.
    pub maturity: Option<NaiveDate>,
    pub floating_coupon: bool,
    pub amortization: bool,
    pub risk: RiskTier,
}

impl InstrumentRecord {
    pub fn coupon_type(&self) -> &'static str {
        if self.floating_coupon {
            "Floating"
        } else {
            "Fixed"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_scale_maps_to_tiers() {
        assert_eq!(RiskTier::from_raw(0), RiskTier::Unspecified);
        assert_eq!(RiskTier::from_raw(1), RiskTier::Low);
        assert_eq!(RiskTier::from_raw(2), RiskTier::Moderate);
        assert_eq!(RiskTier::from_raw(3), RiskTier::High);
        assert_eq!(RiskTier::from_raw(42), RiskTier::Unspecified);
    }

    #[test]
    fn inversion_swaps_low_and_high_only() {
        assert_eq!(RiskTier::Low.inverted(), RiskTier::High);
        assert_eq!(RiskTier::High.inverted(), RiskTier::Low);
        assert_eq!(RiskTier::Moderate.inverted(), RiskTier::Moderate);
        assert_eq!(RiskTier::Unspecified.inverted(), RiskTier::Unspecified);
    }

    #[test]
    fn coupon_type_follows_floating_flag() {
        let mut record = InstrumentRecord {
            isin: "RU000A1234Z6".into(),
            figi: "BBG000000001".into(),
            name: "Test bond".into(),
            maturity: None,
            floating_coupon: false,
            amortization: false,
            risk: RiskTier::Low,
        };
        assert_eq!(record.coupon_type(), "Fixed");
        record.floating_coupon = true;
        assert_eq!(record.coupon_type(), "Floating");
    }
}
