use thiserror::Error;

/// Errors surfaced by portfolio operations.
#[derive(Debug, Error)]
pub enum PortfolioError {
    /// The provider returned nothing for the ticker.
    #[error("no price data found for {ticker}")]
    NoData { ticker: String },

    /// Weights must be strictly positive.
    #[error("weight must be positive, got {0}")]
    InvalidWeight(f64),

    /// Weight sum hit exactly zero during normalization. Unreachable
    /// unless the weight map was corrupted from outside.
    #[error("portfolio weights sum to zero")]
    DegenerateWeights,

    /// The provider call itself failed.
    #[error("error fetching {ticker}: {source}")]
    Fetch {
        ticker: String,
        #[source]
        source: anyhow::Error,
    },
}
