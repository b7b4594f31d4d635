//! Route handler for scanning a receipt into a candidate transaction.

use axum::{
    Json,
    extract::{Multipart, State, multipart::Field},
};

use crate::{
    AppState, Error,
    ingest::Upload,
    models::CandidateTransaction,
};

const FALLBACK_MIME_TYPE: &str = "application/octet-stream";
const FALLBACK_FILE_NAME: &str = "receipt";

/// Accepts a multipart form with a `file` field, runs it through the
/// ingestion pipeline and returns the extracted candidate transaction.
///
/// The candidate is not persisted; the client confirms it with a separate
/// create-transaction request once the category has been resolved.
pub async fn scan_receipt(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<CandidateTransaction>, Error> {
    let upload = parse_upload(multipart).await?;

    tracing::info!(
        "Scanning receipt '{}' ({}, {} bytes)",
        upload.file_name,
        upload.mime_type,
        upload.bytes.len()
    );

    state.pipeline.ingest(upload).await.map(Json)
}

async fn parse_upload(mut multipart: Multipart) -> Result<Upload, Error> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|error| Error::MultipartError(error.to_string()))?
    {
        if field.name() == Some("file") {
            return read_file_field(field).await;
        }
    }

    Err(Error::NoFileUploaded)
}

async fn read_file_field(field: Field<'_>) -> Result<Upload, Error> {
    let mime_type = field
        .content_type()
        .unwrap_or(FALLBACK_MIME_TYPE)
        .to_owned();
    let file_name = field.file_name().unwrap_or(FALLBACK_FILE_NAME).to_owned();

    let bytes = field.bytes().await.map_err(|error| {
        tracing::error!("Could not read data from multipart form field: {error}");
        Error::MultipartError("could not read data from multipart form field".to_owned())
    })?;

    Ok(Upload {
        bytes: bytes.to_vec(),
        mime_type,
        file_name,
    })
}

#[cfg(test)]
mod scan_receipt_tests {
    use std::{sync::Arc, time::Duration};

    use async_trait::async_trait;
    use axum::{
        body::Body,
        extract::{FromRequest, Multipart, State},
        http::Request,
    };
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        AppState, Error,
        extraction::ExtractionClient,
        routes::endpoints,
    };

    use super::scan_receipt;

    struct StubClient {
        response: String,
    }

    #[async_trait]
    impl ExtractionClient for StubClient {
        async fn submit(
            &self,
            _file_bytes: &[u8],
            _mime_type: &str,
            _display_name: &str,
            _prompt: &str,
        ) -> Result<String, Error> {
            Ok(self.response.clone())
        }
    }

    fn get_test_state(response: &str) -> AppState {
        let connection = Connection::open_in_memory().unwrap();

        AppState::new(
            connection,
            Arc::new(StubClient {
                response: response.to_owned(),
            }),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    async fn must_make_multipart(field_name: &str) -> Multipart {
        let boundary = "MY_BOUNDARY123456789";

        let body = [
            format!("--{boundary}"),
            format!(
                "Content-Disposition: form-data; name=\"{field_name}\"; filename=\"receipt.jpg\""
            ),
            "Content-Type: image/jpeg".to_owned(),
            String::new(),
            "fake image bytes".to_owned(),
            format!("--{boundary}--"),
        ]
        .join("\r\n");

        let request = Request::builder()
            .method("POST")
            .uri(endpoints::SCAN_RECEIPT)
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();

        Multipart::from_request(request, &()).await.unwrap()
    }

    #[tokio::test]
    async fn scan_receipt_returns_candidate_transaction() {
        let state = get_test_state(
            r#"{"label": "Lunch", "amount": 18.5, "date": "2024-01-05", "category": "Food"}"#,
        );

        let result = scan_receipt(State(state), must_make_multipart("file").await).await;

        let candidate = result.unwrap().0;
        assert_eq!(candidate.label, "Lunch");
        assert_eq!(candidate.amount, 18.5);
        assert_eq!(candidate.date, Some(date!(2024 - 01 - 05)));
        assert_eq!(candidate.category, "Food");
    }

    #[tokio::test]
    async fn scan_receipt_without_file_field_returns_validation_error() {
        let state = get_test_state("{}");

        let result = scan_receipt(State(state), must_make_multipart("attachment").await).await;

        assert!(matches!(result, Err(Error::NoFileUploaded)));
    }
}
