//! Route handlers for transaction CRUD.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::{Value, json};

use crate::{
    AppState, Error,
    models::{DatabaseID, NewTransaction, Transaction},
    stores::{TransactionQuery, TransactionStore},
};

pub async fn get_transactions(
    State(state): State<AppState>,
) -> Result<Json<Vec<Transaction>>, Error> {
    state
        .transaction_store
        .get_query(TransactionQuery::default())
        .map(Json)
}

pub async fn create_transaction(
    State(state): State<AppState>,
    Json(data): Json<NewTransaction>,
) -> Result<(StatusCode, Json<Transaction>), Error> {
    let transaction = state.transaction_store.create(data)?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

pub async fn get_transaction(
    State(state): State<AppState>,
    Path(transaction_id): Path<DatabaseID>,
) -> Result<Json<Transaction>, Error> {
    state.transaction_store.get(transaction_id).map(Json)
}

pub async fn delete_transaction(
    State(state): State<AppState>,
    Path(transaction_id): Path<DatabaseID>,
) -> Result<Json<Value>, Error> {
    state.transaction_store.delete(transaction_id)?;

    Ok(Json(json!({ "message": "Deleted transaction" })))
}
