use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use custodia_storage::db::Storage;
use custodia_types::state::{Address, BankState};
use custodia_types::transaction::Transaction;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tower_http::cors::CorsLayer;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub bank: Arc<RwLock<BankState>>,
    pub storage: Arc<Storage>,
    pub tx_sender: mpsc::Sender<Transaction>,
}

#[derive(Serialize)]
pub struct StateView {
    pub owner: String,
    pub total_score: u64,
    pub revenue_balance: u64,
    pub bonded_collateral: u64,
    pub num_active_operators: u64,
    pub accounts: usize,
    pub custodied_assets: usize,
    pub live_loans: usize,
}

#[derive(Serialize)]
pub struct AccountView {
    pub address: String,
    pub nonce: u64,
    pub native_balance: u64,
    pub reward_balance: u64,
    pub score: u64,
    pub custodied_assets: Vec<u64>,
}

#[derive(Serialize)]
pub struct OperatorView {
    pub address: String,
    pub authorized: bool,
    pub collateral_posted: bool,
    pub has_live_loan: bool,
}

#[derive(Serialize)]
pub struct LoanView {
    pub operator: String,
    pub holder: String,
    pub asset_ids: Vec<u64>,
    pub borrowed_at: u64,
}

pub async fn start_server(
    listen: SocketAddr,
    bank: Arc<RwLock<BankState>>,
    storage: Arc<Storage>,
    tx_sender: mpsc::Sender<Transaction>,
) -> anyhow::Result<()> {
    let state = AppState { bank, storage, tx_sender };

    let app = Router::new()
        .route("/", get(root))
        .route("/state", get(get_state))
        .route("/account/:addr", get(get_account))
        .route("/operators", get(get_operators))
        .route("/loans", get(get_loans))
        .route("/score/:addr", get(get_score))
        .route("/tx", post(submit_tx))
        .route("/tx/:hash", get(get_tx))
        .layer(CorsLayer::permissive())
        .with_state(state);

    info!("API listening on {}", listen);
    let listener = tokio::net::TcpListener::bind(listen).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn parse_address(hex_addr: &str) -> Result<Address, StatusCode> {
    let mut addr = [0u8; 32];
    hex::decode_to_slice(hex_addr.trim_start_matches("0x"), &mut addr)
        .map_err(|_| StatusCode::BAD_REQUEST)?;
    Ok(addr)
}

async fn root() -> &'static str {
    "Custodia Bank API v0.1"
}

async fn get_state(State(state): State<AppState>) -> Json<StateView> {
    let bank = state.bank.read().await;
    Json(StateView {
        owner: hex::encode(bank.config.owner),
        total_score: bank.total_score,
        revenue_balance: bank.revenue_balance,
        bonded_collateral: bank.bonded_collateral,
        num_active_operators: bank.num_active_operators,
        accounts: bank.accounts.len(),
        custodied_assets: bank.custody.len(),
        live_loans: bank.loans.len(),
    })
}

async fn get_account(
    State(state): State<AppState>,
    Path(addr): Path<String>,
) -> Result<Json<AccountView>, StatusCode> {
    let addr = parse_address(&addr)?;
    let bank = state.bank.read().await;
    let account = bank.account(&addr).cloned().unwrap_or_default();
    Ok(Json(AccountView {
        address: hex::encode(addr),
        nonce: account.nonce,
        native_balance: account.native_balance,
        reward_balance: account.reward_balance,
        score: bank.score_of(&addr),
        custodied_assets: bank.custodied_assets_of(&addr),
    }))
}

async fn get_operators(State(state): State<AppState>) -> Json<Vec<OperatorView>> {
    let bank = state.bank.read().await;
    let mut views: Vec<OperatorView> = bank
        .operators
        .iter()
        .map(|(addr, op)| OperatorView {
            address: hex::encode(addr),
            authorized: op.authorized,
            collateral_posted: op.collateral_posted,
            has_live_loan: bank.loans.contains_key(addr),
        })
        .collect();
    views.sort_by(|a, b| a.address.cmp(&b.address));
    Json(views)
}

async fn get_loans(State(state): State<AppState>) -> Json<Vec<LoanView>> {
    let bank = state.bank.read().await;
    let mut views: Vec<LoanView> = bank
        .loans
        .iter()
        .map(|(operator, loan)| LoanView {
            operator: hex::encode(operator),
            holder: hex::encode(loan.holder),
            asset_ids: loan.asset_ids.clone(),
            borrowed_at: loan.borrowed_at,
        })
        .collect();
    views.sort_by(|a, b| a.operator.cmp(&b.operator));
    Json(views)
}

async fn get_score(
    State(state): State<AppState>,
    Path(addr): Path<String>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let addr = parse_address(&addr)?;
    let bank = state.bank.read().await;
    Ok(Json(serde_json::json!({
        "address": hex::encode(addr),
        "score": bank.score_of(&addr),
        "total_score": bank.total_score,
    })))
}

async fn get_tx(
    State(state): State<AppState>,
    Path(hash): Path<String>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let hash = hash.trim_start_matches("0x").to_ascii_lowercase();
    let tx = state
        .storage
        .load_tx_by_hash(&hash)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(serde_json::json!({
        "id": hash,
        "sender": hex::encode(tx.sender),
        "nonce": tx.nonce,
        "instruction": tx.instruction,
    })))
}

async fn submit_tx(
    State(state): State<AppState>,
    Json(tx): Json<Transaction>,
) -> (StatusCode, Json<serde_json::Value>) {
    let id = hex::encode(tx.id());
    match state.tx_sender.send(tx).await {
        Ok(_) => (StatusCode::ACCEPTED, Json(serde_json::json!({ "submitted": id }))),
        Err(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({ "error": "executor unavailable" })),
        ),
    }
}
