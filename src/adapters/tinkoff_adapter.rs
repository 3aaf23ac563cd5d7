//! T-Bank Invest REST adapter implementing CatalogPort.
//!
//! The REST gateway mirrors the gRPC contract: every call is a POST of a
//! JSON request message to `<base>/<service>/<method>`, authorised with the
//! account's bearer token. Messages use camelCase field names, enums arrive
//! as their string names and timestamps as RFC 3339.

use super::http_fetch::HttpFetcher;
use crate::domain::error::{BondExportError, FetchError};
use crate::domain::instrument::{InstrumentRecord, RiskTier, UniverseScope};
use crate::ports::catalog_port::CatalogPort;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use chrono_tz::Europe::Moscow;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_BASE_URL: &str = "https://invest-public-api.tinkoff.ru/rest";

const INSTRUMENTS_SERVICE: &str = "tinkoff.public.invest.api.contract.v1.InstrumentsService";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BondsRequest {
    instrument_status: &'static str,
}

#[derive(Debug, Serialize)]
struct CouponsRequest<'a> {
    figi: &'a str,
    from: String,
    to: String,
}

#[derive(Debug, Deserialize)]
struct BondsResponse {
    #[serde(default)]
    instruments: Vec<BondPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BondPayload {
    #[serde(default)]
    figi: String,
    #[serde(default)]
    isin: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    maturity_date: Option<String>,
    #[serde(default)]
    floating_coupon_flag: bool,
    #[serde(default)]
    amortization_flag: bool,
    #[serde(default)]
    risk_level: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct CouponsResponse {
    #[serde(default)]
    events: Vec<CouponPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CouponPayload {
    #[serde(default)]
    coupon_date: Option<String>,
}

fn status_name(scope: UniverseScope) -> &'static str {
    match scope {
        UniverseScope::Base => "INSTRUMENT_STATUS_BASE",
        UniverseScope::All => "INSTRUMENT_STATUS_ALL",
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Maturity as a Moscow calendar date. An unset timestamp comes through as
/// the Unix epoch and means "no date".
fn maturity_date(raw: Option<&str>) -> Option<NaiveDate> {
    let ts = parse_timestamp(raw?)?;
    if ts.timestamp() == 0 {
        return None;
    }
    Some(ts.with_timezone(&Moscow).date_naive())
}

fn risk_tier(raw: Option<&Value>) -> RiskTier {
    match raw {
        Some(Value::Number(n)) => n.as_i64().map(RiskTier::from_raw).unwrap_or_default(),
        Some(Value::String(name)) => match name.as_str() {
            "RISK_LEVEL_LOW" => RiskTier::Low,
            "RISK_LEVEL_MODERATE" => RiskTier::Moderate,
            "RISK_LEVEL_HIGH" => RiskTier::High,
            _ => RiskTier::Unspecified,
        },
        _ => RiskTier::Unspecified,
    }
}

impl From<BondPayload> for InstrumentRecord {
    fn from(p: BondPayload) -> Self {
        InstrumentRecord {
            maturity: maturity_date(p.maturity_date.as_deref()),
            risk: risk_tier(p.risk_level.as_ref()),
            isin: p.isin,
            figi: p.figi,
            name: p.name,
            floating_coupon: p.floating_coupon_flag,
            amortization: p.amortization_flag,
        }
    }
}

pub struct TinkoffRestAdapter {
    http: HttpFetcher,
    base_url: String,
    token: String,
}

impl TinkoffRestAdapter {
    pub fn new(http: HttpFetcher, token: String) -> Self {
        Self::with_base_url(http, token, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(http: HttpFetcher, token: String, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/{}/{}", self.base_url, INSTRUMENTS_SERVICE, method)
    }

    async fn call<B, R>(&self, method: &str, body: &B) -> Result<R, FetchError>
    where
        B: Serialize + Sync,
        R: for<'de> Deserialize<'de>,
    {
        let url = self.method_url(method);
        let value = self.http.post_json(&url, &self.token, body).await?;
        serde_json::from_value(value).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

#[async_trait]
impl CatalogPort for TinkoffRestAdapter {
    async fn list_bonds(
        &self,
        scope: UniverseScope,
    ) -> Result<Vec<InstrumentRecord>, BondExportError> {
        let request = BondsRequest {
            instrument_status: status_name(scope),
        };
        let response: BondsResponse = self
            .call("Bonds", &request)
            .await
            .map_err(BondExportError::Catalog)?;
        Ok(response
            .instruments
            .into_iter()
            .map(InstrumentRecord::from)
            .collect())
    }

    async fn coupon_dates(
        &self,
        figi: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<DateTime<Utc>>, FetchError> {
        let request = CouponsRequest {
            figi,
            from: from.to_rfc3339_opts(SecondsFormat::Secs, true),
            to: to.to_rfc3339_opts(SecondsFormat::Secs, true),
        };
        let response: CouponsResponse = self.call("GetBondCoupons", &request).await?;
        Ok(response
            .events
            .iter()
            .filter_map(|e| e.coupon_date.as_deref().and_then(parse_timestamp))
            .collect())
    }
}
