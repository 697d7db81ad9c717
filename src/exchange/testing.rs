//! In-memory exchange for tests
//!
//! Compiled for the crate's own tests and behind the `testing` feature for
//! integration tests.

use super::{
    Credentials, ExchangeApi, ExchangeConnector, ExchangeError, Fill, Holding, OrderAck,
    PriceTable, Side, SymbolFilter,
};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct State {
    holdings: Vec<Holding>,
    prices: HashMap<String, Decimal>,
    filters: HashMap<String, Vec<SymbolFilter>>,
    fills: HashMap<String, Vec<Fill>>,
    order_errors: HashMap<String, (i64, String)>,
    account_error: Option<(i64, String)>,
    filter_lookups: usize,
    orders: Vec<(String, Side, Decimal)>,
    connected_keys: Vec<String>,
}

/// Scriptable exchange; clones share state
#[derive(Clone, Default)]
pub struct FakeExchange {
    state: Arc<Mutex<State>>,
}

impl FakeExchange {
    pub fn new() -> Self {
        Self::default()
    }

    fn update(self, f: impl FnOnce(&mut State)) -> Self {
        f(&mut self.state.lock().unwrap());
        self
    }

    pub fn with_holding(self, asset: &str, free: Decimal, locked: Decimal) -> Self {
        self.update(|s| {
            s.holdings.push(Holding {
                symbol: asset.to_string(),
                free_amount: free,
                locked_amount: locked,
            })
        })
    }

    pub fn with_price(self, pair: &str, price: Decimal) -> Self {
        self.update(|s| {
            s.prices.insert(pair.to_string(), price);
        })
    }

    pub fn with_filters(self, pair: &str, filters: Vec<SymbolFilter>) -> Self {
        self.update(|s| {
            s.filters.insert(pair.to_string(), filters);
        })
    }

    pub fn with_standard_filters(self, pair: &str, min_qty: Decimal, min_notional: Decimal) -> Self {
        self.with_filters(
            pair,
            vec![
                SymbolFilter::LotSize {
                    min_qty,
                    max_qty: Decimal::new(9_000_000, 0),
                    step_size: min_qty,
                },
                SymbolFilter::Notional { min_notional },
            ],
        )
    }

    pub fn with_fills(self, pair: &str, fills: Vec<Fill>) -> Self {
        self.update(|s| {
            s.fills.insert(pair.to_string(), fills);
        })
    }

    pub fn with_order_error(self, pair: &str, code: i64, msg: &str) -> Self {
        self.update(|s| {
            s.order_errors.insert(pair.to_string(), (code, msg.to_string()));
        })
    }

    pub fn with_account_error(self, code: i64, msg: &str) -> Self {
        self.update(|s| s.account_error = Some((code, msg.to_string())))
    }

    pub fn filter_lookups(&self) -> usize {
        self.state.lock().unwrap().filter_lookups
    }

    pub fn orders(&self) -> Vec<(String, Side, Decimal)> {
        self.state.lock().unwrap().orders.clone()
    }

    pub fn connected_keys(&self) -> Vec<String> {
        self.state.lock().unwrap().connected_keys.clone()
    }
}

fn api_error(code: i64, msg: &str) -> ExchangeError {
    ExchangeError::Api {
        status: 400,
        code,
        msg: msg.to_string(),
    }
}

#[async_trait]
impl ExchangeApi for FakeExchange {
    async fn account_snapshot(&self) -> Result<Vec<Holding>, ExchangeError> {
        let state = self.state.lock().unwrap();
        match &state.account_error {
            Some((code, msg)) => Err(api_error(*code, msg)),
            None => Ok(state.holdings.clone()),
        }
    }

    async fn price_table(&self) -> Result<PriceTable, ExchangeError> {
        let state = self.state.lock().unwrap();
        Ok(PriceTable::new(state.prices.clone()))
    }

    async fn symbol_filters(&self, pair: &str) -> Result<Option<Vec<SymbolFilter>>, ExchangeError> {
        let mut state = self.state.lock().unwrap();
        state.filter_lookups += 1;
        Ok(state.filters.get(pair).cloned())
    }

    async fn submit_market_order(
        &self,
        pair: &str,
        side: Side,
        quantity: Decimal,
    ) -> Result<OrderAck, ExchangeError> {
        let mut state = self.state.lock().unwrap();
        if let Some((code, msg)) = state.order_errors.get(pair) {
            return Err(api_error(*code, msg));
        }
        state.orders.push((pair.to_string(), side, quantity));
        let order_id = state.orders.len() as u64;
        Ok(OrderAck {
            symbol: pair.to_string(),
            order_id,
            client_order_id: format!("fake-{}", order_id),
            status: "FILLED".to_string(),
            fills: state.fills.get(pair).cloned().unwrap_or_default(),
        })
    }
}

impl ExchangeConnector for FakeExchange {
    fn connect(&self, credentials: &Credentials) -> Box<dyn ExchangeApi> {
        self.state
            .lock()
            .unwrap()
            .connected_keys
            .push(credentials.api_key.clone());
        Box::new(self.clone())
    }
}
