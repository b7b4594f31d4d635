//! Route handlers for category CRUD.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    AppState, Error,
    models::{Category, CategoryName, CategoryPatch, DatabaseID, NewCategory},
    stores::CategoryStore,
};

/// The payload for creating a category.
#[derive(Debug, Deserialize)]
pub struct CategoryData {
    name: String,
    color: Option<String>,
}

pub async fn get_categories(State(state): State<AppState>) -> Result<Json<Vec<Category>>, Error> {
    state.category_store.get_all().map(Json)
}

pub async fn create_category(
    State(state): State<AppState>,
    Json(data): Json<CategoryData>,
) -> Result<(StatusCode, Json<Category>), Error> {
    let category = state.category_store.create(NewCategory {
        name: CategoryName::new(&data.name)?,
        color: data.color,
    })?;

    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn get_category(
    State(state): State<AppState>,
    Path(category_id): Path<DatabaseID>,
) -> Result<Json<Category>, Error> {
    state.category_store.get(category_id).map(Json)
}

pub async fn update_category(
    State(state): State<AppState>,
    Path(category_id): Path<DatabaseID>,
    Json(patch): Json<CategoryPatch>,
) -> Result<Json<Category>, Error> {
    state.category_store.update(category_id, patch).map(Json)
}

pub async fn delete_category(
    State(state): State<AppState>,
    Path(category_id): Path<DatabaseID>,
) -> Result<Json<Value>, Error> {
    state.category_store.delete(category_id)?;

    Ok(Json(json!({ "message": "Deleted category" })))
}
