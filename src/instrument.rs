use std::collections::HashMap;

use chrono::NaiveDate;

use crate::error::PortfolioError;
use crate::provider::{PricePoint, PriceProvider};

/// Trailing window requested from the provider.
pub const FETCH_RANGE: &str = "1y";

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Trend direction from the 20/50-day moving-average crossover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
    Flat,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Up => "up",
            Trend::Down => "down",
            Trend::Flat => "flat",
        }
    }
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One ticker's fetched price history and the metrics derived from it.
/// Fetched once at construction and immutable afterwards.
#[derive(Clone)]
pub struct Instrument {
    pub ticker: String,
    pub current_price: f64,
    pub past_prices: Vec<PricePoint>,
    pub volatility: f64,
    pub moving_averages: HashMap<String, f64>,
}

impl std::fmt::Debug for Instrument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Instrument {{ ticker: {}, current_price: {}, volatility: {} }}",
            self.ticker, self.current_price, self.volatility
        )
    }
}

impl std::fmt::Display for Instrument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: ${:.2}", self.ticker, self.current_price)
    }
}

impl Instrument {
    /// Fetches a trailing year of closes for the ticker and derives
    /// volatility and moving averages.
    pub async fn create(
        provider: &dyn PriceProvider,
        ticker: &str,
    ) -> Result<Self, PortfolioError> {
        let ticker = ticker.to_uppercase();
        let past_prices = provider.fetch(&ticker, FETCH_RANGE).await?;
        let current_price = match past_prices.last() {
            Some(point) => point.close,
            None => return Err(PortfolioError::NoData { ticker }),
        };

        let mut instrument = Self {
            ticker,
            current_price,
            past_prices,
            volatility: 0.0,
            moving_averages: HashMap::new(),
        };
        instrument.compute_metrics();
        Ok(instrument)
    }

    /// Day-over-day fractional change series. The first observation has
    /// no defined return and is dropped.
    pub fn daily_returns(&self) -> Vec<(NaiveDate, f64)> {
        self.past_prices
            .windows(2)
            .map(|w| (w[1].date, (w[1].close - w[0].close) / w[0].close))
            .collect()
    }

    fn compute_metrics(&mut self) {
        let returns: Vec<f64> = self.daily_returns().into_iter().map(|(_, r)| r).collect();

        // annualized sample standard deviation of daily returns
        self.volatility = if returns.len() > 1 {
            let mean = returns.iter().sum::<f64>() / returns.len() as f64;
            let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>()
                / (returns.len() - 1) as f64;
            variance.sqrt() * TRADING_DAYS_PER_YEAR.sqrt()
        } else {
            0.0
        };

        self.moving_averages = HashMap::from([
            ("MA_20".to_string(), self.trailing_mean(20)),
            ("MA_50".to_string(), self.trailing_mean(50)),
        ]);
    }

    // mean of the last `window` closes, or of all of them if fewer
    fn trailing_mean(&self, window: usize) -> f64 {
        let n = self.past_prices.len().min(window);
        if n == 0 {
            return 0.0;
        }
        let tail = &self.past_prices[self.past_prices.len() - n..];
        tail.iter().map(|p| p.close).sum::<f64>() / n as f64
    }

    /// Crossover signal: 20-day mean above the 50-day reads as upward
    /// momentum.
    pub fn predict_change(&self) -> Trend {
        let ma20 = self.moving_averages.get("MA_20").copied().unwrap_or(0.0);
        let ma50 = self.moving_averages.get("MA_50").copied().unwrap_or(0.0);

        if ma20 > ma50 {
            Trend::Up
        } else if ma20 < ma50 {
            Trend::Down
        } else {
            Trend::Flat
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Days;

    fn series(closes: &[f64]) -> Vec<PricePoint> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PricePoint {
                date: start + Days::new(i as u64),
                close,
            })
            .collect()
    }

    fn instrument(closes: &[f64]) -> Instrument {
        let past_prices = series(closes);
        let mut instrument = Instrument {
            ticker: "TEST".to_string(),
            current_price: past_prices.last().map(|p| p.close).unwrap_or(0.0),
            past_prices,
            volatility: 0.0,
            moving_averages: HashMap::new(),
        };
        instrument.compute_metrics();
        instrument
    }

    struct CannedProvider {
        closes: Vec<f64>,
    }

    #[async_trait]
    impl PriceProvider for CannedProvider {
        async fn fetch(
            &self,
            _ticker: &str,
            _range: &str,
        ) -> Result<Vec<PricePoint>, PortfolioError> {
            Ok(series(&self.closes))
        }
    }

    #[test]
    fn test_moving_averages_over_sixty_closes() {
        let closes: Vec<f64> = (1..=60).map(|x| x as f64).collect();
        let instrument = instrument(&closes);

        // last 20 of 1..60 are 41..60, last 50 are 11..60
        assert!((instrument.moving_averages["MA_20"] - 50.5).abs() < 1e-9);
        assert!((instrument.moving_averages["MA_50"] - 35.5).abs() < 1e-9);
        assert!(instrument.volatility >= 0.0);
        assert_eq!(instrument.predict_change(), Trend::Up);
    }

    #[test]
    fn test_short_series_averages_available_closes() {
        let instrument = instrument(&[2.0, 4.0, 6.0]);

        assert!((instrument.moving_averages["MA_20"] - 4.0).abs() < 1e-9);
        assert!((instrument.moving_averages["MA_50"] - 4.0).abs() < 1e-9);
        assert_eq!(instrument.predict_change(), Trend::Flat);
    }

    #[test]
    fn test_volatility_zero_below_two_returns() {
        let instrument = instrument(&[100.0, 110.0]);
        assert_eq!(instrument.volatility, 0.0);
    }

    #[test]
    fn test_daily_returns_drop_first_observation() {
        let instrument = instrument(&[100.0, 110.0, 99.0]);
        let returns = instrument.daily_returns();

        assert_eq!(returns.len(), 2);
        assert!((returns[0].1 - 0.10).abs() < 1e-12);
        assert!((returns[1].1 + 0.10).abs() < 1e-12);
    }

    #[test]
    fn test_trend_symbols() {
        let mut instrument = instrument(&[1.0, 2.0, 3.0]);

        instrument.moving_averages.insert("MA_20".to_string(), 10.0);
        instrument.moving_averages.insert("MA_50".to_string(), 5.0);
        assert_eq!(instrument.predict_change().as_str(), "up");

        instrument.moving_averages.insert("MA_20".to_string(), 5.0);
        instrument.moving_averages.insert("MA_50".to_string(), 10.0);
        assert_eq!(instrument.predict_change().as_str(), "down");

        instrument.moving_averages.insert("MA_20".to_string(), 7.0);
        instrument.moving_averages.insert("MA_50".to_string(), 7.0);
        assert_eq!(instrument.predict_change().as_str(), "flat");
    }

    #[tokio::test]
    async fn test_create_uppercases_ticker_and_sets_price() {
        let provider = CannedProvider {
            closes: vec![100.0, 110.0],
        };
        let instrument = Instrument::create(&provider, "aapl").await.unwrap();

        assert_eq!(instrument.ticker, "AAPL");
        assert_eq!(instrument.current_price, 110.0);
    }

    #[tokio::test]
    async fn test_create_fails_on_empty_series() {
        let provider = CannedProvider { closes: vec![] };
        let err = Instrument::create(&provider, "none").await.unwrap_err();

        assert!(matches!(err, PortfolioError::NoData { ticker } if ticker == "NONE"));
    }
}
