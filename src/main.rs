use anyhow::Result;
use log::warn;

use portfolio_tracker::chart::TextChart;
use portfolio_tracker::portfolio::Portfolio;
use portfolio_tracker::provider::YahooProvider;

const AAPL: &str = "AAPL";
const MSFT: &str = "MSFT";
const NVDA: &str = "NVDA";
const SPY: &str = "SPY";

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let provider = YahooProvider::new();
    let mut portfolio = Portfolio::new("Tech");

    for (ticker, weight) in [(AAPL, 0.3), (MSFT, 0.3), (NVDA, 0.2), (SPY, 0.2)] {
        if let Err(e) = portfolio.add(&provider, ticker, weight).await {
            warn!("skipping {}: {}", ticker, e);
        }
    }

    println!("{}", portfolio);
    println!("ROI: {:.2}%", portfolio.roi);
    println!("{}", portfolio.weights_frame()?);

    for instrument in &portfolio.instruments {
        println!(
            "{} (volatility {:.3}, trend {})",
            instrument,
            instrument.volatility,
            instrument.predict_change()
        );
    }

    if let Some((date, ret)) = portfolio.daily_returns().last() {
        println!("Latest weighted daily return ({}): {:.4}", date, ret);
    }

    portfolio.render(&TextChart::new());
    Ok(())
}
