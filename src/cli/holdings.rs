//! Holdings command implementation

use crate::config::Config;
use crate::exchange::Credentials;
use crate::service::TradingService;
use clap::Args;
use std::fmt;

#[derive(Args)]
pub struct HoldingsArgs {
    /// Binance API key
    #[arg(long, env = "BINANCE_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Binance API secret
    #[arg(long, env = "BINANCE_API_SECRET", hide_env_values = true)]
    pub api_secret: String,

    /// Only list assets worth selling
    #[arg(short, long)]
    pub sellable: bool,
}

impl fmt::Debug for HoldingsArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HoldingsArgs")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("sellable", &self.sellable)
            .finish()
    }
}

impl HoldingsArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let service = TradingService::from_config(config)?;
        let credentials = Credentials::new(&self.api_key, &self.api_secret);

        let assets = if self.sellable {
            service.sellable_holdings(&credentials).await?
        } else {
            service.holdings(&credentials).await?
        };

        let quote = service.quote_asset();
        println!(
            "{:<10} {:>20} {:>16} {:>16}",
            "ASSET",
            "AMOUNT",
            "PRICE",
            format!("VALUE ({quote})")
        );
        for asset in &assets {
            println!(
                "{:<10} {:>20} {:>16} {:>16}",
                asset.symbol,
                asset.amount.normalize(),
                asset.price.normalize(),
                asset.value.round_dp(2)
            );
        }

        let total: rust_decimal::Decimal = assets.iter().map(|a| a.value).sum();
        println!("{} assets, total {} {quote}", assets.len(), total.round_dp(2));
        Ok(())
    }
}
