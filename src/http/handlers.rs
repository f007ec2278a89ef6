//! Request handlers for the faucet's HTTP entry points.

use axum::{
    extract::{ConnectInfo, Path, State},
    http::HeaderMap,
    Form, Json,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

use crate::faucet::{ChainInfo, DisbursementOperation, KnownAddress};
use crate::http::request::requester_identity;
use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::rpc::TotalBalance;

/// Data behind the home page.
#[derive(Debug, Serialize, Deserialize)]
pub struct HomeView {
    pub chain_info: ChainInfo,
    pub message: Option<String>,
    pub operation: Option<DisbursementOperation>,
}

/// Claim form submitted to `POST /`.
#[derive(Debug, Deserialize)]
pub struct ClaimForm {
    #[serde(default)]
    pub address: String,
}

pub async fn home(State(state): State<AppState>) -> Json<HomeView> {
    Json(HomeView {
        chain_info: state.coordinator.chain_info().as_ref().clone(),
        message: None,
        operation: None,
    })
}

pub async fn claim(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Form(form): Form<ClaimForm>,
) -> Result<Json<HomeView>, ApiError> {
    let requester = requester_identity(peer, &headers, state.trust_forwarded_for);
    tracing::debug!(requester = %requester, address = %form.address, "Claim received");

    let operation = state.coordinator.submit_claim(&requester, &form.address).await?;

    let message = match &operation.transaction_id {
        Some(txid) => format!(
            "Sent {} to {} in transaction {}",
            operation.amount, operation.address, txid
        ),
        None => format!("Sent {} to {}", operation.amount, operation.address),
    };

    Ok(Json(HomeView {
        chain_info: state.coordinator.chain_info().as_ref().clone(),
        message: Some(message),
        operation: Some(operation),
    }))
}

pub async fn balance(State(state): State<AppState>) -> Result<Json<TotalBalance>, ApiError> {
    Ok(Json(state.coordinator.balance().await?))
}

pub async fn operations(State(state): State<AppState>) -> Json<Vec<DisbursementOperation>> {
    Json(state.coordinator.operations())
}

pub async fn operation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DisbursementOperation>, ApiError> {
    Ok(Json(state.coordinator.operation_status(&id)?))
}

pub async fn addresses(State(state): State<AppState>) -> Result<Json<Vec<KnownAddress>>, ApiError> {
    Ok(Json(state.coordinator.known_addresses().await?))
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
