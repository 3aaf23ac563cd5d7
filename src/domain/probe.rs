//! Quick exchange lookup for a handful of ISINs.

use super::market_chain::aggregated_snapshot;
use super::resolver::resolve_secid;
use super::snapshot::SecurityMeta;
use crate::ports::exchange_port::ExchangePort;

pub const PROBE_HEADER: &str = "ISIN\tSECID\tSHORTNAME\tMATDATE\tBOARD\tLAST\tYTM";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProbeLine {
    pub isin: String,
    pub secid: Option<String>,
    pub short_name: Option<String>,
    pub maturity: Option<String>,
    pub board: Option<String>,
    pub last_price: Option<f64>,
    pub yield_pct: Option<f64>,
}

impl ProbeLine {
    pub fn to_tsv(&self) -> String {
        let num = |v: Option<f64>| v.map(|x| x.to_string()).unwrap_or_default();
        [
            self.isin.clone(),
            self.secid.clone().unwrap_or_default(),
            self.short_name.clone().unwrap_or_default(),
            self.maturity.clone().unwrap_or_default(),
            self.board.clone().unwrap_or_default(),
            num(self.last_price),
            num(self.yield_pct),
        ]
        .join("\t")
    }
}

/// Resolve one ISIN and read its aggregated quote. No board or history
/// fallback.
pub async fn probe_isin(port: &dyn ExchangePort, isin: &str) -> ProbeLine {
    let Some(secid) = resolve_secid(port, isin).await else {
        return ProbeLine {
            isin: isin.to_string(),
            ..Default::default()
        };
    };

    let meta = SecurityMeta::from_table(&port.security_description(&secid).await);
    let market = aggregated_snapshot(port, &secid).await;

    ProbeLine {
        isin: isin.to_string(),
        secid: Some(secid),
        short_name: meta.short_name,
        maturity: meta.maturity,
        board: market.board,
        last_price: market.last_price,
        yield_pct: market.yield_pct,
    }
}
