//! API Routes
//!
//! HTTP endpoint definitions.

use axum::{
    extract::{rejection::JsonRejection, Extension, State},
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::auth::AuthenticatedAccount;
use crate::domain::{Account, AccountId, AccountNumber};
use crate::error::AppError;
use crate::handlers::{
    CreateAccountCommand, CreateAccountHandler, LoginCommand, LoginHandler, TransferCommand,
    TransferHandler,
};
use crate::state::AppState;

use super::middleware::require_account_token;

// =========================================================================
// Request/Response types
// =========================================================================

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub number: AccountNumber,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub number: AccountNumber,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub to_account: AccountId,
    pub amount: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TransferResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteAccountResponse {
    pub deleted: AccountId,
}

/// Turn a body that failed to parse into a 400 with the parser's message
fn invalid_body(rejection: JsonRejection) -> AppError {
    AppError::InvalidRequest(rejection.body_text())
}

// =========================================================================
// API Router
// =========================================================================

/// Create the API router
///
/// `/account/:id` is only reachable through the token gate.
pub fn create_router(state: &AppState) -> Router<AppState> {
    let account_routes = Router::new()
        .route("/account/:id", get(get_account).delete(delete_account))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_account_token,
        ));

    Router::new()
        .route("/account", post(create_account))
        .route("/accounts", get(list_accounts))
        .route("/transfer", post(transfer))
        .route("/login", post(login))
        .merge(account_routes)
}

// =========================================================================
// POST /account
// =========================================================================

async fn create_account(
    State(state): State<AppState>,
    payload: Result<Json<CreateAccountRequest>, JsonRejection>,
) -> Result<Json<Account>, AppError> {
    let Json(request) = payload.map_err(invalid_body)?;
    let handler = CreateAccountHandler::new(state.directory.clone(), state.passwords);

    let command =
        CreateAccountCommand::new(request.first_name, request.last_name, request.password);
    let account = handler.execute(command).await?;

    Ok(Json(account))
}

// =========================================================================
// GET /accounts
// =========================================================================

async fn list_accounts(State(state): State<AppState>) -> Result<Json<Vec<Account>>, AppError> {
    Ok(Json(state.directory.list().await?))
}

// =========================================================================
// GET /account/:id
// =========================================================================

/// The token gate has already loaded the account.
async fn get_account(
    Extension(AuthenticatedAccount(account)): Extension<AuthenticatedAccount>,
) -> Json<Account> {
    Json(account)
}

// =========================================================================
// DELETE /account/:id
// =========================================================================

async fn delete_account(
    State(state): State<AppState>,
    Extension(AuthenticatedAccount(account)): Extension<AuthenticatedAccount>,
) -> Result<Json<DeleteAccountResponse>, AppError> {
    state.directory.delete(account.id).await?;
    tracing::info!(account_id = account.id, number = account.number, "Account deleted");

    Ok(Json(DeleteAccountResponse {
        deleted: account.id,
    }))
}

// =========================================================================
// POST /transfer
// =========================================================================

async fn transfer(
    State(state): State<AppState>,
    payload: Result<Json<TransferRequest>, JsonRejection>,
) -> Result<Json<TransferResponse>, AppError> {
    let Json(request) = payload.map_err(invalid_body)?;
    let handler = TransferHandler::new(state.directory.clone());

    handler
        .execute(TransferCommand::new(request.to_account, request.amount))
        .await?;

    Ok(Json(TransferResponse {
        message: "amount transferred".to_string(),
    }))
}

// =========================================================================
// POST /login
// =========================================================================

async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let Json(request) = payload.map_err(invalid_body)?;
    let handler = LoginHandler::new(
        state.directory.clone(),
        state.passwords,
        state.tokens.clone(),
    );

    let result = handler
        .execute(LoginCommand::new(request.number, request.password))
        .await?;

    Ok(Json(LoginResponse {
        token: result.token,
        number: result.number,
    }))
}
