use std::collections::{HashMap, HashSet};

use anyhow::Result;
use chrono::NaiveDate;
use log::info;
use polars::prelude::*;

use crate::chart::ChartRenderer;
use crate::error::PortfolioError;
use crate::instrument::Instrument;
use crate::provider::PriceProvider;

/// A named set of holdings with a weight per ticker.
pub struct Portfolio {
    pub name: String,
    pub instruments: Vec<Instrument>,
    // ticker to weight, renormalized to sum to 1 after every mutation
    pub weights: HashMap<String, f64>,
    pub total_value: f64,
    pub roi: f64,
}

impl std::fmt::Display for Portfolio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} holdings, ${:.2}",
            self.name,
            self.instruments.len(),
            self.total_value
        )
    }
}

impl Portfolio {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            instruments: Vec::new(),
            weights: HashMap::new(),
            total_value: 0.0,
            roi: 0.0,
        }
    }

    /// Fetches the ticker through the provider and folds it in under the
    /// given weight. Weights are relative and get renormalized to sum
    /// to 1. A rejected weight or failed fetch leaves the portfolio
    /// untouched.
    pub async fn add(
        &mut self,
        provider: &dyn PriceProvider,
        ticker: &str,
        weight: f64,
    ) -> Result<(), PortfolioError> {
        if !(weight > 0.0) {
            return Err(PortfolioError::InvalidWeight(weight));
        }
        let instrument = Instrument::create(provider, ticker).await?;

        self.weights.insert(instrument.ticker.clone(), weight);
        self.instruments.push(instrument);
        self.normalize_weights()?;
        self.analyze();
        Ok(())
    }

    /// Drops every holding under the ticker. Unknown tickers are a no-op.
    pub fn remove(&mut self, ticker: &str) -> Result<(), PortfolioError> {
        let ticker = ticker.to_uppercase();
        self.instruments.retain(|i| i.ticker != ticker);
        self.weights.remove(&ticker);
        self.normalize_weights()?;
        self.analyze();
        Ok(())
    }

    fn normalize_weights(&mut self) -> Result<(), PortfolioError> {
        if self.weights.is_empty() {
            return Ok(());
        }
        let total: f64 = self.weights.values().sum();
        if total == 0.0 {
            return Err(PortfolioError::DegenerateWeights);
        }
        for weight in self.weights.values_mut() {
            *weight /= total;
        }
        Ok(())
    }

    /// Recomputes total value and ROI from the current holdings. ROI is
    /// the unweighted mean of each holding's percentage move from its
    /// first to its last observed close.
    pub fn analyze(&mut self) {
        self.total_value = self
            .instruments
            .iter()
            .fold(0.0, |acc, i| acc + i.current_price);

        let returns: Vec<f64> = self
            .instruments
            .iter()
            .filter_map(|i| {
                let first = i.past_prices.first()?.close;
                if first == 0.0 {
                    return None;
                }
                Some((i.current_price - first) / first * 100.0)
            })
            .collect();
        self.roi = if returns.is_empty() {
            0.0
        } else {
            returns.iter().sum::<f64>() / returns.len() as f64
        };
    }

    /// Weighted portfolio return per day, over the dates every holding
    /// has a return for. Ordering follows the first holding's series.
    pub fn daily_returns(&self) -> Vec<(NaiveDate, f64)> {
        let first = match self.instruments.first() {
            Some(instrument) => instrument,
            None => return Vec::new(),
        };

        let per_instrument: Vec<(f64, HashMap<NaiveDate, f64>)> = self
            .instruments
            .iter()
            .map(|i| {
                let weight = self.weights.get(&i.ticker).copied().unwrap_or(0.0);
                (weight, i.daily_returns().into_iter().collect())
            })
            .collect();

        first
            .daily_returns()
            .into_iter()
            .filter(|(date, _)| {
                per_instrument
                    .iter()
                    .all(|(_, returns)| returns.contains_key(date))
            })
            .map(|(date, _)| {
                let weighted: f64 = per_instrument
                    .iter()
                    .map(|(weight, returns)| weight * returns[&date])
                    .sum();
                (date, weighted)
            })
            .collect()
    }

    /// Combines two portfolios into a new one without touching either
    /// input. Shared tickers keep the first occurrence's instrument and
    /// get the sum of both weights before renormalization.
    pub fn merge(&self, other: &Portfolio) -> Result<Portfolio, PortfolioError> {
        let mut merged = Portfolio::new(&format!("{}{}", self.name, other.name));

        merged.instruments = self.instruments.clone();
        let mut seen: HashSet<String> = merged
            .instruments
            .iter()
            .map(|i| i.ticker.clone())
            .collect();
        for instrument in &other.instruments {
            if seen.insert(instrument.ticker.clone()) {
                merged.instruments.push(instrument.clone());
            }
        }

        merged.weights = self.weights.clone();
        for (ticker, weight) in &other.weights {
            *merged.weights.entry(ticker.clone()).or_insert(0.0) += weight;
        }

        merged.normalize_weights()?;
        merged.analyze();
        Ok(merged)
    }

    /// Draws current prices per ticker as a bar chart.
    pub fn render(&self, renderer: &dyn ChartRenderer) {
        if self.instruments.is_empty() {
            info!("{}: nothing to plot", self.name);
            return;
        }
        let tickers: Vec<String> = self.instruments.iter().map(|i| i.ticker.clone()).collect();
        let prices: Vec<f64> = self.instruments.iter().map(|i| i.current_price).collect();
        renderer.bar_chart(&tickers, &prices, "Stock", "Price ($)", &self.name);
    }

    pub fn weights_frame(&self) -> Result<DataFrame> {
        let tickers: Vec<_> = self.weights.keys().cloned().collect();
        let weights: Vec<_> = self.weights.values().cloned().collect();
        Ok(df!(
            "ticker" => tickers,
            "weight" => weights
        )?)
    }
}
