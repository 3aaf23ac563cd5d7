//! ISIN to exchange SECID resolution.

use super::fallback::FallbackChain;
use super::table::ProviderTable;
use crate::ports::exchange_port::ExchangePort;

/// Which exchange catalog a lookup searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogScope {
    /// Securities listed on the bond market.
    BondMarket,
    /// The exchange-wide security catalog.
    Global,
}

/// How the ISIN is submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// `isin=` filter.
    Isin,
    /// `q=` free text search.
    FreeText,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecurityQuery {
    pub scope: CatalogScope,
    pub mode: MatchMode,
}

impl SecurityQuery {
    /// Lookups tried by [`resolve_secid`], in order.
    pub const RESOLUTION_ORDER: [SecurityQuery; 4] = [
        SecurityQuery {
            scope: CatalogScope::BondMarket,
            mode: MatchMode::Isin,
        },
        SecurityQuery {
            scope: CatalogScope::BondMarket,
            mode: MatchMode::FreeText,
        },
        SecurityQuery {
            scope: CatalogScope::Global,
            mode: MatchMode::Isin,
        },
        SecurityQuery {
            scope: CatalogScope::Global,
            mode: MatchMode::FreeText,
        },
    ];

    pub fn label(self) -> &'static str {
        match (self.scope, self.mode) {
            (CatalogScope::BondMarket, MatchMode::Isin) => "bonds-isin",
            (CatalogScope::BondMarket, MatchMode::FreeText) => "bonds-text",
            (CatalogScope::Global, MatchMode::Isin) => "global-isin",
            (CatalogScope::Global, MatchMode::FreeText) => "global-text",
        }
    }
}

/// SECID of the first row whose ISIN matches, ignoring case.
pub fn secid_from_table(table: &ProviderTable, isin: &str) -> Option<String> {
    if !table.has_column("SECID") || !table.has_column("ISIN") {
        return None;
    }
    table
        .rows()
        .find(|row| row.str("ISIN").is_some_and(|v| v.eq_ignore_ascii_case(isin)))
        .and_then(|row| row.str("SECID"))
        .filter(|secid| !secid.is_empty())
        .map(str::to_string)
}

/// Find the exchange SECID for `isin`.
///
/// `None` means none of the four catalog lookups knows the ISIN; the caller
/// treats that as final for this instrument.
pub async fn resolve_secid(port: &dyn ExchangePort, isin: &str) -> Option<String> {
    let mut chain = FallbackChain::new();
    for query in SecurityQuery::RESOLUTION_ORDER {
        chain = chain.then(query.label(), async move {
            let table = port.search_securities(query, isin).await;
            secid_from_table(&table, isin)
        });
    }

    match chain.first().await {
        Some((stage, secid)) => {
            tracing::debug!(isin, secid = %secid, stage, "resolved security");
            Some(secid)
        }
        None => {
            tracing::debug!(isin, "security not found on the exchange");
            None
        }
    }
}
