//! Route handlers

use super::error::ApiError;
use super::types::{
    AssetBody, BalanceRequest, BatchRequest, BatchResponse, BuyRequest, SellRequest,
};
use crate::service::TradingService;
use axum::extract::State;
use axum::Json;
use std::sync::Arc;

pub async fn health() -> &'static str {
    "ok"
}

pub async fn balance(
    State(service): State<Arc<TradingService>>,
    Json(body): Json<BalanceRequest>,
) -> Result<Json<Vec<AssetBody>>, ApiError> {
    let assets = service.holdings(&body.credentials()).await?;
    Ok(Json(assets.into_iter().map(AssetBody::from).collect()))
}

pub async fn sellable_assets(
    State(service): State<Arc<TradingService>>,
    Json(body): Json<BalanceRequest>,
) -> Result<Json<Vec<AssetBody>>, ApiError> {
    let assets = service.sellable_holdings(&body.credentials()).await?;
    Ok(Json(assets.into_iter().map(AssetBody::from).collect()))
}

pub async fn sell(
    State(service): State<Arc<TradingService>>,
    Json(body): Json<SellRequest>,
) -> Result<Json<BatchResponse>, ApiError> {
    run_batch(&service, body.into()).await
}

pub async fn buy(
    State(service): State<Arc<TradingService>>,
    Json(body): Json<BuyRequest>,
) -> Result<Json<BatchResponse>, ApiError> {
    run_batch(&service, body.into()).await
}

async fn run_batch(
    service: &TradingService,
    batch: BatchRequest,
) -> Result<Json<BatchResponse>, ApiError> {
    let results = service
        .execute_batch(&batch.credentials, batch.side, &batch.requests)
        .await?;

    Ok(Json(BatchResponse {
        results: results.into_iter().map(Into::into).collect(),
    }))
}
