use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use yahoo_finance_api::YahooConnector;

use crate::error::PortfolioError;

/// One closing-price observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Source of historical closing prices.
///
/// `range` is a Yahoo-style trailing window string such as "1y" or "6mo".
/// Implementations return quotes in ascending date order; an empty result
/// means the ticker has no data for the window.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    async fn fetch(&self, ticker: &str, range: &str) -> Result<Vec<PricePoint>, PortfolioError>;
}

/// Yahoo Finance backed provider.
pub struct YahooProvider {
    client: YahooConnector,
}

impl YahooProvider {
    pub fn new() -> Self {
        Self {
            client: YahooConnector::new(),
        }
    }
}

impl Default for YahooProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PriceProvider for YahooProvider {
    async fn fetch(&self, ticker: &str, range: &str) -> Result<Vec<PricePoint>, PortfolioError> {
        let response = self
            .client
            .get_quote_range(ticker, "1d", range)
            .await
            .map_err(|e| PortfolioError::Fetch {
                ticker: ticker.to_string(),
                source: e.into(),
            })?;
        let quotes = response.quotes().map_err(|e| PortfolioError::Fetch {
            ticker: ticker.to_string(),
            source: e.into(),
        })?;

        let mut points = Vec::with_capacity(quotes.len());
        for quote in quotes {
            // quote timestamps are unix seconds
            if let Some(ts) = DateTime::from_timestamp(quote.timestamp as i64, 0) {
                points.push(PricePoint {
                    date: ts.date_naive(),
                    close: quote.close,
                });
            }
        }
        Ok(points)
    }
}
