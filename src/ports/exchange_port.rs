//! Exchange information port (ISS).

use crate::domain::resolver::SecurityQuery;
use crate::domain::table::ProviderTable;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Table-level access to the exchange information service.
///
/// Every method returns the decoded section it asked for. A failed request,
/// a missing section or a malformed body all come back as an empty table.
#[async_trait]
pub trait ExchangePort: Send + Sync {
    /// `securities` section with `SECID` and `ISIN` columns.
    async fn search_securities(&self, query: SecurityQuery, isin: &str) -> ProviderTable;

    /// `securities` section describing one security on the bond market.
    async fn security_description(&self, secid: &str) -> ProviderTable;

    /// `marketdata` section, aggregated across boards when `board` is `None`.
    async fn market_data(&self, secid: &str, board: Option<&str>) -> ProviderTable;

    /// `boards` section listing where the security is listed.
    async fn boards(&self, secid: &str) -> ProviderTable;

    /// `history` section of daily closes on `board` starting at `from`.
    async fn history(&self, secid: &str, board: &str, from: NaiveDate) -> ProviderTable;
}
