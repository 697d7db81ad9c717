//! Serve command implementation

use crate::api;
use crate::config::Config;
use crate::service::TradingService;
use clap::Args;
use std::sync::Arc;

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Listen address, overrides `server.bind`
    #[arg(short, long)]
    pub bind: Option<String>,
}

impl ServeArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let mut server = config.server.clone();
        if let Some(bind) = &self.bind {
            server.bind = bind.clone();
        }

        let service = Arc::new(TradingService::from_config(config)?);
        tracing::info!(
            quote = service.quote_asset(),
            origins = server.cors_origins.len(),
            "Starting HTTP API"
        );

        api::serve(service, &server).await
    }
}
