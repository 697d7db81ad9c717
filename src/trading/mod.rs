//! Order pipeline
//!
//! Quantity normalization, trading-rule validation, market order execution
//! and the batch orchestrator tying them together for both sides

mod batch;
mod executor;
mod quantity;
mod rules;
mod types;

pub use batch::BatchOrchestrator;
pub use executor::{empty_fill_warning, Execution, OrderExecutor};
pub use quantity::normalize_quantity;
pub use rules::{FilterCache, TradingFilters, TradingRules};
pub use types::{TradeError, TradeRequest, TradeResult};
