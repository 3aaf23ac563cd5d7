//! Moscow Exchange ISS adapter implementing ExchangePort.
//!
//! ISS is anonymous and answers every query with table sections. Each
//! request asks for exactly one section (`iss.only`) with an explicit
//! column list and metadata turned off.

use super::http_fetch::HttpFetcher;
use crate::domain::resolver::{CatalogScope, MatchMode, SecurityQuery};
use crate::domain::table::ProviderTable;
use crate::ports::exchange_port::ExchangePort;
use async_trait::async_trait;
use chrono::NaiveDate;

pub const DEFAULT_BASE_URL: &str = "https://iss.moex.com";

const BONDS_MARKET: &str = "/engines/stock/markets/bonds";

const SEARCH_COLUMNS: &str = "SECID,ISIN";
const DESCRIPTION_COLUMNS: &str =
    "SECID,SHORTNAME,MATDATE,COUPONPERCENT,COUPONVALUE,COUPONPERIOD,FACEVALUE,ACCRUEDINT";
const AGGREGATE_MARKET_COLUMNS: &str = "BOARDID,LAST,YIELD,ACCRUEDINT";
const BOARD_MARKET_COLUMNS: &str = "LAST,YIELD,ACCRUEDINT";
const BOARD_COLUMNS: &str = "BOARDID,IS_TRADING";
const HISTORY_COLUMNS: &str = "TRADEDATE,YIELDCLOSE,LEGALCLOSEPRICE";

pub struct MoexIssAdapter {
    http: HttpFetcher,
    base_url: String,
}

impl MoexIssAdapter {
    pub fn new(http: HttpFetcher) -> Self {
        Self::with_base_url(http, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(http: HttpFetcher, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn security_url(&self, secid: &str) -> String {
        format!("{}/iss{}/securities/{}.json", self.base_url, BONDS_MARKET, secid)
    }

    /// Fetch `url` and decode `section`, requesting only `columns` of it.
    async fn section(
        &self,
        url: &str,
        section: &str,
        columns: &str,
        extra: &[(&str, &str)],
    ) -> ProviderTable {
        let columns_key = format!("{section}.columns");
        let mut query: Vec<(&str, &str)> = extra.to_vec();
        query.extend([
            ("iss.only", section),
            ("iss.meta", "off"),
            (columns_key.as_str(), columns),
        ]);

        let body = self.http.get_json(url, &query).await;
        ProviderTable::from_response(body.as_ref(), section)
    }
}

#[async_trait]
impl ExchangePort for MoexIssAdapter {
    async fn search_securities(&self, query: SecurityQuery, isin: &str) -> ProviderTable {
        let url = match query.scope {
            CatalogScope::BondMarket => {
                format!("{}/iss{}/securities.json", self.base_url, BONDS_MARKET)
            }
            CatalogScope::Global => format!("{}/iss/securities.json", self.base_url),
        };
        let key = match query.mode {
            MatchMode::Isin => "isin",
            MatchMode::FreeText => "q",
        };
        self.section(&url, "securities", SEARCH_COLUMNS, &[(key, isin)])
            .await
    }

    async fn security_description(&self, secid: &str) -> ProviderTable {
        let url = self.security_url(secid);
        self.section(&url, "securities", DESCRIPTION_COLUMNS, &[]).await
    }

    async fn market_data(&self, secid: &str, board: Option<&str>) -> ProviderTable {
        match board {
            None => {
                let url = self.security_url(secid);
                self.section(&url, "marketdata", AGGREGATE_MARKET_COLUMNS, &[])
                    .await
            }
            Some(board) => {
                let url = format!(
                    "{}/iss{}/boards/{}/securities/{}.json",
                    self.base_url, BONDS_MARKET, board, secid
                );
                self.section(&url, "marketdata", BOARD_MARKET_COLUMNS, &[])
                    .await
            }
        }
    }

    async fn boards(&self, secid: &str) -> ProviderTable {
        let url = self.security_url(secid);
        self.section(&url, "boards", BOARD_COLUMNS, &[]).await
    }

    async fn history(&self, secid: &str, board: &str, from: NaiveDate) -> ProviderTable {
        let url = format!(
            "{}/iss/history{}/boards/{}/securities/{}.json",
            self.base_url, BONDS_MARKET, board, secid
        );
        let from = from.format("%Y-%m-%d").to_string();
        self.section(&url, "history", HISTORY_COLUMNS, &[("from", from.as_str())])
            .await
    }
}
