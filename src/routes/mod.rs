//! The JSON REST API over the ledger and the ingestion pipeline.
//!
//! The handlers here are deliberately thin: they translate HTTP payloads to
//! and from the store, report and pipeline types and hold no logic of their
//! own.

mod category;
mod ingest;
mod report;
mod transaction;

pub mod endpoints;

use axum::{
    Router,
    routing::{get, post},
};

use crate::AppState;

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            endpoints::CATEGORIES,
            get(category::get_categories).post(category::create_category),
        )
        .route(
            endpoints::CATEGORY,
            get(category::get_category)
                .put(category::update_category)
                .delete(category::delete_category),
        )
        .route(
            endpoints::TRANSACTIONS,
            get(transaction::get_transactions).post(transaction::create_transaction),
        )
        .route(
            endpoints::TRANSACTION,
            get(transaction::get_transaction).delete(transaction::delete_transaction),
        )
        .route(endpoints::CURRENT_BALANCE, get(report::get_current_balance))
        .route(endpoints::TOTAL_INCOME, get(report::get_total_income))
        .route(endpoints::TOTAL_EXPENSE, get(report::get_total_expense))
        .route(
            endpoints::TOTAL_EXPENSE_BY_CATEGORY,
            get(report::get_expense_by_category),
        )
        .route(endpoints::MONTHLY_TOTALS, get(report::get_monthly_totals))
        .route(endpoints::SCAN_RECEIPT, post(ingest::scan_receipt))
        .with_state(state)
}

#[cfg(test)]
mod router_tests {
    use std::{sync::Arc, time::Duration};

    use async_trait::async_trait;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::{Value, json};

    use crate::{
        AppState, Error,
        extraction::ExtractionClient,
        routes::endpoints,
    };

    use super::build_router;

    struct StubClient;

    #[async_trait]
    impl ExtractionClient for StubClient {
        async fn submit(
            &self,
            _file_bytes: &[u8],
            _mime_type: &str,
            _display_name: &str,
            _prompt: &str,
        ) -> Result<String, Error> {
            Ok("{}".to_owned())
        }
    }

    fn get_test_server() -> TestServer {
        let connection =
            Connection::open_in_memory().expect("Could not open database in memory.");

        let state = AppState::new(connection, Arc::new(StubClient), Duration::from_secs(5))
            .expect("Could not initialize the database.");

        TestServer::new(build_router(state))
    }

    async fn create_category(server: &TestServer, name: &str) -> i64 {
        let response = server
            .post(endpoints::CATEGORIES)
            .json(&json!({ "name": name }))
            .await;

        response.assert_status(StatusCode::CREATED);
        response.json::<Value>()["id"].as_i64().unwrap()
    }

    async fn create_transaction(
        server: &TestServer,
        amount: f64,
        date: &str,
        transaction_type: &str,
        category_id: i64,
    ) {
        let response = server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({
                "date": date,
                "amount": amount,
                "category": category_id,
                "type": transaction_type,
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
    }

    #[tokio::test]
    async fn category_crud_round_trip() {
        let server = get_test_server();
        let category_id = create_category(&server, "Groceries").await;

        let response = server
            .put(&format!("/api/categories/{category_id}"))
            .json(&json!({ "color": "#ff8800" }))
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["color"], "#ff8800");

        let response = server.get(endpoints::CATEGORIES).await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>().as_array().unwrap().len(), 1);

        let response = server
            .delete(&format!("/api/categories/{category_id}"))
            .await;
        response.assert_status_ok();

        let response = server.get(&format!("/api/categories/{category_id}")).await;
        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.json::<Value>()["error"], "not_found");
    }

    #[tokio::test]
    async fn create_category_with_empty_name_returns_validation_error() {
        let server = get_test_server();

        let response = server
            .post(endpoints::CATEGORIES)
            .json(&json!({ "name": "" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["error"], "validation");
    }

    #[tokio::test]
    async fn create_transaction_with_unknown_category_returns_validation_error() {
        let server = get_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({
                "date": "2024-01-05",
                "amount": 10.0,
                "category": 999,
                "type": "expense",
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["error"], "validation");
    }

    #[tokio::test]
    async fn report_endpoints_return_worked_example() {
        let server = get_test_server();
        let category_id = create_category(&server, "General").await;

        create_transaction(&server, 100.0, "2024-01-05", "income", category_id).await;
        create_transaction(&server, 30.0, "2024-01-10", "expense", category_id).await;
        create_transaction(&server, 50.0, "2024-02-01", "income", category_id).await;

        let response = server.get(endpoints::CURRENT_BALANCE).await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["balance"], 120.0);

        let response = server
            .get(endpoints::TOTAL_INCOME)
            .add_query_param("year", 2024)
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["totalIncome"], 150.0);

        let response = server
            .get(endpoints::TOTAL_EXPENSE)
            .add_query_param("year", 2024)
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["totalExpense"], 30.0);

        let response = server
            .get(endpoints::TOTAL_EXPENSE_BY_CATEGORY)
            .add_query_param("year", 2024)
            .await;
        response.assert_status_ok();
        assert_eq!(
            response.json::<Value>()["pieChartData"],
            json!([{ "category": "General", "totalExpense": 30.0 }])
        );

        let response = server
            .get(endpoints::MONTHLY_TOTALS)
            .add_query_param("year", 2024)
            .await;
        response.assert_status_ok();
        let months = response.json::<Value>()["barChartData"].clone();
        let months = months.as_array().unwrap();
        assert_eq!(months.len(), 12);
        assert_eq!(
            months[0],
            json!({ "month": "January", "totalIncome": 100.0, "totalExpense": 30.0 })
        );
        assert_eq!(
            months[1],
            json!({ "month": "February", "totalIncome": 50.0, "totalExpense": 0.0 })
        );
        assert_eq!(months[11]["month"], "December");
        assert_eq!(months[11]["totalIncome"], 0.0);
    }

    #[tokio::test]
    async fn reports_on_empty_ledger_return_zeroes_not_errors() {
        let server = get_test_server();

        let response = server.get(endpoints::CURRENT_BALANCE).await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["balance"], 0.0);

        let response = server
            .get(endpoints::MONTHLY_TOTALS)
            .add_query_param("year", 2024)
            .await;
        response.assert_status_ok();
        assert_eq!(
            response.json::<Value>()["barChartData"]
                .as_array()
                .unwrap()
                .len(),
            12
        );
    }
}
