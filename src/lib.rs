pub mod chart;
pub mod error;
pub mod instrument;
pub mod portfolio;
pub mod provider;

pub use chart::{ChartRenderer, TextChart};
pub use error::PortfolioError;
pub use instrument::{Instrument, Trend};
pub use portfolio::Portfolio;
pub use provider::{PricePoint, PriceProvider, YahooProvider};
