//! Report layout shared by the spreadsheet writers.

use super::merge::MergedBondRow;

pub const REPORT_HEADERS: [&str; 15] = [
    "ISIN",
    "Issuer",
    "Last price",
    "Accrued interest",
    "Coupon rate, %",
    "Coupon amount",
    "Coupons per year",
    "Face value",
    "Next coupon date",
    "Maturity date",
    "Duration, years (approx.)",
    "YTM (MOEX, % p.a.)",
    "Coupon type",
    "Amortization",
    "Risk",
];

#[derive(Debug, Clone, PartialEq)]
pub enum ReportCell {
    Text(String),
    Number(f64),
    Bool(bool),
    Empty,
}

impl ReportCell {
    fn number(v: Option<f64>) -> Self {
        v.map(ReportCell::Number).unwrap_or(ReportCell::Empty)
    }

    fn text(v: Option<String>) -> Self {
        v.map(ReportCell::Text).unwrap_or(ReportCell::Empty)
    }

    /// Plain-text rendering; unknown values are blank.
    pub fn render(&self) -> String {
        match self {
            ReportCell::Text(s) => s.clone(),
            ReportCell::Number(n) => n.to_string(),
            ReportCell::Bool(b) => b.to_string(),
            ReportCell::Empty => String::new(),
        }
    }
}

/// Cells of one report row, aligned with [`REPORT_HEADERS`].
pub fn row_cells(row: &MergedBondRow) -> [ReportCell; 15] {
    [
        ReportCell::Text(row.isin.clone()),
        ReportCell::Text(row.issuer.clone()),
        ReportCell::number(row.last_price),
        ReportCell::number(row.accrued_interest),
        ReportCell::number(row.coupon_percent),
        ReportCell::number(row.coupon_value),
        ReportCell::number(row.coupon_frequency.map(f64::from)),
        ReportCell::number(row.face_value),
        ReportCell::text(row.next_coupon.map(|d| d.format("%Y-%m-%d").to_string())),
        ReportCell::text(row.maturity.clone()),
        ReportCell::number(row.duration_years),
        ReportCell::number(row.ytm),
        ReportCell::Text(row.coupon_type.to_string()),
        ReportCell::Bool(row.amortization),
        ReportCell::Text(row.risk.label().to_string()),
    ]
}
