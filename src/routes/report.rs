//! Route handlers for the aggregate reports.
//!
//! Each handler accepts an optional `year` query parameter and defaults to
//! the current UTC year, mirroring the "current year" windows the reports
//! are defined over.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    reports::{CategoryExpense, MonthlyTotal, ReportService},
    stores::sqlite::{SQLiteCategoryStore, SQLiteTransactionStore},
};

#[derive(Debug, Deserialize)]
pub struct YearQuery {
    year: Option<i32>,
}

impl YearQuery {
    fn year_or_current(&self) -> i32 {
        self.year
            .unwrap_or_else(|| OffsetDateTime::now_utc().year())
    }
}

#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    balance: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalIncomeResponse {
    total_income: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalExpenseResponse {
    total_expense: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseByCategoryResponse {
    pie_chart_data: Vec<CategoryExpense>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTotalsResponse {
    bar_chart_data: Vec<MonthlyTotal>,
}

fn report_service(state: &AppState) -> ReportService<SQLiteTransactionStore, SQLiteCategoryStore> {
    ReportService::new(
        state.transaction_store.clone(),
        state.category_store.clone(),
    )
}

pub async fn get_current_balance(
    State(state): State<AppState>,
) -> Result<Json<BalanceResponse>, Error> {
    let balance = report_service(&state).get_balance()?;

    Ok(Json(BalanceResponse { balance }))
}

pub async fn get_total_income(
    State(state): State<AppState>,
    Query(query): Query<YearQuery>,
) -> Result<Json<TotalIncomeResponse>, Error> {
    let total_income = report_service(&state).get_total_income(query.year_or_current())?;

    Ok(Json(TotalIncomeResponse { total_income }))
}

pub async fn get_total_expense(
    State(state): State<AppState>,
    Query(query): Query<YearQuery>,
) -> Result<Json<TotalExpenseResponse>, Error> {
    let total_expense = report_service(&state).get_total_expense(query.year_or_current())?;

    Ok(Json(TotalExpenseResponse { total_expense }))
}

pub async fn get_expense_by_category(
    State(state): State<AppState>,
    Query(query): Query<YearQuery>,
) -> Result<Json<ExpenseByCategoryResponse>, Error> {
    let pie_chart_data =
        report_service(&state).get_expense_by_category(query.year_or_current())?;

    Ok(Json(ExpenseByCategoryResponse { pie_chart_data }))
}

pub async fn get_monthly_totals(
    State(state): State<AppState>,
    Query(query): Query<YearQuery>,
) -> Result<Json<MonthlyTotalsResponse>, Error> {
    let bar_chart_data = report_service(&state).get_monthly_totals(query.year_or_current())?;

    Ok(Json(MonthlyTotalsResponse { bar_chart_data }))
}
