//! Brokerage instrument catalog port.

use crate::domain::error::{BondExportError, FetchError};
use crate::domain::instrument::{InstrumentRecord, UniverseScope};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait CatalogPort: Send + Sync {
    /// Every bond in `scope`, in catalog order.
    async fn list_bonds(&self, scope: UniverseScope)
    -> Result<Vec<InstrumentRecord>, BondExportError>;

    /// Coupon payment dates for `figi` between `from` and `to`.
    async fn coupon_dates(
        &self,
        figi: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<DateTime<Utc>>, FetchError>;
}
