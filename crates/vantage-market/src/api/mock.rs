//! In-memory market data for tests

use super::{CompanyInfo, MarketDataProvider, Quote};
use crate::error::{Result, StockError};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

/// Serves canned data; symbols listed in `failing` return an upstream error
#[derive(Default)]
pub(crate) struct StaticMarketData {
    pub closes: HashMap<String, f64>,
    pub info: HashMap<String, CompanyInfo>,
    pub history: HashMap<String, Vec<Quote>>,
    pub failing: Vec<String>,
    pub history_calls: Mutex<Vec<(String, String, String)>>,
}

impl StaticMarketData {
    pub fn with_close(mut self, symbol: &str, close: f64) -> Self {
        self.closes.insert(symbol.to_string(), close);
        self
    }

    pub fn with_info(mut self, symbol: &str, info: CompanyInfo) -> Self {
        self.info.insert(symbol.to_string(), info);
        self
    }

    pub fn with_history(mut self, symbol: &str, closes: &[f64]) -> Self {
        let quotes = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Quote {
                timestamp: Utc
                    .with_ymd_and_hms(2025, 1, 1 + i as u32, 3, 45, 0)
                    .single()
                    .unwrap_or_default(),
                open: close - 1.0,
                high: close + 2.0,
                low: close - 2.0,
                close,
                volume: 1_000,
            })
            .collect();
        self.history.insert(symbol.to_string(), quotes);
        self
    }

    pub fn failing(mut self, symbol: &str) -> Self {
        self.failing.push(symbol.to_string());
        self
    }

    fn check(&self, symbol: &str) -> Result<()> {
        if self.failing.iter().any(|s| s == symbol) {
            return Err(StockError::YahooFinanceError("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl MarketDataProvider for StaticMarketData {
    async fn latest_close(&self, symbol: &str) -> Result<Option<f64>> {
        self.check(symbol)?;
        Ok(self.closes.get(symbol).copied())
    }

    async fn company_info(&self, symbol: &str) -> Result<CompanyInfo> {
        self.check(symbol)?;
        Ok(self.info.get(symbol).cloned().unwrap_or_default())
    }

    async fn price_history(
        &self,
        symbol: &str,
        period: &str,
        interval: &str,
    ) -> Result<Vec<Quote>> {
        self.history_calls.lock().unwrap().push((
            symbol.to_string(),
            period.to_string(),
            interval.to_string(),
        ));
        self.check(symbol)?;
        Ok(self.history.get(symbol).cloned().unwrap_or_default())
    }
}
