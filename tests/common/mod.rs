#![allow(dead_code)]

use async_trait::async_trait;
use bondexport::domain::error::{BondExportError, FetchError};
use bondexport::domain::instrument::{InstrumentRecord, RiskTier, UniverseScope};
use bondexport::domain::resolver::SecurityQuery;
use bondexport::domain::table::ProviderTable;
use bondexport::ports::catalog_port::CatalogPort;
use bondexport::ports::exchange_port::ExchangePort;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Mutex;

/// Exchange port answering from canned tables. Anything not configured is
/// an empty table. Every call is logged as a short string.
pub struct MockExchangePort {
    pub search: HashMap<(&'static str, String), ProviderTable>,
    pub descriptions: HashMap<String, ProviderTable>,
    pub market: HashMap<(String, Option<String>), ProviderTable>,
    pub boards: HashMap<String, ProviderTable>,
    pub history: HashMap<(String, String), ProviderTable>,
    pub calls: Mutex<Vec<String>>,
}

impl MockExchangePort {
    pub fn new() -> Self {
        Self {
            search: HashMap::new(),
            descriptions: HashMap::new(),
            market: HashMap::new(),
            boards: HashMap::new(),
            history: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_search(mut self, label: &'static str, isin: &str, table: ProviderTable) -> Self {
        self.search.insert((label, isin.to_string()), table);
        self
    }

    pub fn with_description(mut self, secid: &str, table: ProviderTable) -> Self {
        self.descriptions.insert(secid.to_string(), table);
        self
    }

    pub fn with_market(mut self, secid: &str, board: Option<&str>, table: ProviderTable) -> Self {
        self.market
            .insert((secid.to_string(), board.map(str::to_string)), table);
        self
    }

    pub fn with_boards(mut self, secid: &str, table: ProviderTable) -> Self {
        self.boards.insert(secid.to_string(), table);
        self
    }

    pub fn with_history(mut self, secid: &str, board: &str, table: ProviderTable) -> Self {
        self.history
            .insert((secid.to_string(), board.to_string()), table);
        self
    }

    fn log(&self, entry: String) {
        self.calls.lock().unwrap().push(entry);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_starting_with(&self, prefix: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with(prefix))
            .collect()
    }
}

#[async_trait]
impl ExchangePort for MockExchangePort {
    async fn search_securities(&self, query: SecurityQuery, isin: &str) -> ProviderTable {
        self.log(format!("search:{}:{}", query.label(), isin));
        self.search
            .get(&(query.label(), isin.to_string()))
            .cloned()
            .unwrap_or_default()
    }

    async fn security_description(&self, secid: &str) -> ProviderTable {
        self.log(format!("description:{secid}"));
        self.descriptions.get(secid).cloned().unwrap_or_default()
    }

    async fn market_data(&self, secid: &str, board: Option<&str>) -> ProviderTable {
        self.log(format!("market:{}:{}", secid, board.unwrap_or("*")));
        self.market
            .get(&(secid.to_string(), board.map(str::to_string)))
            .cloned()
            .unwrap_or_default()
    }

    async fn boards(&self, secid: &str) -> ProviderTable {
        self.log(format!("boards:{secid}"));
        self.boards.get(secid).cloned().unwrap_or_default()
    }

    async fn history(&self, secid: &str, board: &str, from: NaiveDate) -> ProviderTable {
        self.log(format!("history:{secid}:{board}:{from}"));
        self.history
            .get(&(secid.to_string(), board.to_string()))
            .cloned()
            .unwrap_or_default()
    }
}

/// Catalog port over a fixed instrument list and coupon schedules.
pub struct MockCatalogPort {
    pub records: Vec<InstrumentRecord>,
    pub coupons: HashMap<String, Vec<DateTime<Utc>>>,
    pub list_status: Option<u16>,
    pub scopes: Mutex<Vec<UniverseScope>>,
    pub coupon_calls: Mutex<Vec<String>>,
}

impl MockCatalogPort {
    pub fn new(records: Vec<InstrumentRecord>) -> Self {
        Self {
            records,
            coupons: HashMap::new(),
            list_status: None,
            scopes: Mutex::new(Vec::new()),
            coupon_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_coupons(mut self, figi: &str, dates: Vec<DateTime<Utc>>) -> Self {
        self.coupons.insert(figi.to_string(), dates);
        self
    }

    /// Make `list_bonds` fail as if the service answered `status`.
    pub fn failing(mut self, status: u16) -> Self {
        self.list_status = Some(status);
        self
    }

    pub fn coupon_calls(&self) -> Vec<String> {
        self.coupon_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CatalogPort for MockCatalogPort {
    async fn list_bonds(
        &self,
        scope: UniverseScope,
    ) -> Result<Vec<InstrumentRecord>, BondExportError> {
        self.scopes.lock().unwrap().push(scope);
        if let Some(status) = self.list_status {
            return Err(BondExportError::Catalog(FetchError::Status(status)));
        }
        Ok(self.records.clone())
    }

    async fn coupon_dates(
        &self,
        figi: &str,
        _from: DateTime<Utc>,
        _to: DateTime<Utc>,
    ) -> Result<Vec<DateTime<Utc>>, FetchError> {
        self.coupon_calls.lock().unwrap().push(figi.to_string());
        self.coupons
            .get(figi)
            .cloned()
            .ok_or(FetchError::Status(404))
    }
}

pub fn table(columns: &[&str], rows: Vec<Vec<Value>>) -> ProviderTable {
    ProviderTable::new(columns.iter().map(|c| c.to_string()).collect(), rows)
}

pub fn securities(secid: &str, isin: &str) -> ProviderTable {
    table(&["SECID", "ISIN"], vec![vec![json!(secid), json!(isin)]])
}

pub fn marketdata(yield_pct: Option<f64>, last: Option<f64>) -> ProviderTable {
    table(
        &["BOARDID", "LAST", "YIELD", "ACCRUEDINT"],
        vec![vec![json!("TQCB"), json!(last), json!(yield_pct), json!(null)]],
    )
}

pub fn description(short_name: &str, matdate: &str) -> ProviderTable {
    table(
        &[
            "SECID",
            "SHORTNAME",
            "MATDATE",
            "COUPONPERCENT",
            "COUPONVALUE",
            "COUPONPERIOD",
            "FACEVALUE",
            "ACCRUEDINT",
        ],
        vec![vec![
            json!("SU1234"),
            json!(short_name),
            json!(matdate),
            json!(11.5),
            json!(28.68),
            json!(91),
            json!(1000),
            json!(4.1),
        ]],
    )
}

pub fn record(isin: &str, figi: &str, name: &str) -> InstrumentRecord {
    InstrumentRecord {
        isin: isin.to_string(),
        figi: figi.to_string(),
        name: name.to_string(),
        maturity: NaiveDate::from_ymd_opt(2027, 6, 15),
        floating_coupon: false,
        amortization: false,
        risk: RiskTier::Low,
    }
}

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
}

pub fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}
