//! The contract boundary to the external document-understanding service,
//! and its Gemini-backed implementation.
//!
//! The adapter is deliberately narrow: upload the document, ask for a
//! structured description, return the raw response text. It carries no retry
//! policy; whether a retry is safe is the ingestion pipeline's call.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::Error;

/// The Gemini model used for receipt extraction.
const GEMINI_MODEL: &str = "gemini-1.5-pro";

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// The fixed prompt sent with every receipt, describing the JSON shape the
/// ingestion pipeline expects back.
pub const EXTRACTION_PROMPT: &str = r#"Return a json object in the following form:
{
  label: "A suiting label for this expense",
  description: "A short description of the expense",
  date: "The date of the expense",
  amount: "Total amount of the expense",
  currency: "Currency of the amount",
  category: "A suiting category of the expense",
  business: "Name of the store where the expense was made",
}"#;

/// A client for the external document-understanding service.
///
/// Implementations upload the document and return the raw response text.
/// The response is *expected* to contain a single JSON object but the
/// contract does not guarantee it; turning the text into a usable record is
/// the caller's problem (see [crate::ingest::parse_candidate]).
#[async_trait]
pub trait ExtractionClient: Send + Sync {
    /// Send `file_bytes` plus `prompt` to the service and return the raw
    /// response text.
    ///
    /// # Errors
    /// Returns [Error::ExtractionService] on network failure, a non-success
    /// status code, or a response payload the transport cannot make sense
    /// of.
    async fn submit(
        &self,
        file_bytes: &[u8],
        mime_type: &str,
        display_name: &str,
        prompt: &str,
    ) -> Result<String, Error>;
}

/// An [ExtractionClient] backed by the Google Gemini API.
///
/// Each submission is two calls: a media upload that yields an opaque file
/// reference, then a content generation call referencing that file.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    file: FileReference,
}

#[derive(Debug, Deserialize)]
struct FileReference {
    uri: String,
    #[serde(rename = "mimeType")]
    mime_type: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GeminiClient {
    /// Create a client for the public Gemini API.
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, GEMINI_BASE_URL.to_owned())
    }

    /// Create a client pointed at a custom base URL.
    ///
    /// Intended for tests that stand in for the remote service.
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            base_url,
        }
    }

    async fn upload_file(
        &self,
        file_bytes: &[u8],
        mime_type: &str,
        display_name: &str,
    ) -> Result<FileReference, Error> {
        let metadata = json!({ "file": { "display_name": display_name } });

        let form = reqwest::multipart::Form::new()
            .part(
                "metadata",
                reqwest::multipart::Part::text(metadata.to_string())
                    .mime_str("application/json")
                    .map_err(service_error)?,
            )
            .part(
                "file",
                reqwest::multipart::Part::bytes(file_bytes.to_vec())
                    .file_name(display_name.to_owned())
                    .mime_str(mime_type)
                    .map_err(service_error)?,
            );

        let response = self
            .http
            .post(format!(
                "{}/upload/v1beta/files?key={}",
                self.base_url, self.api_key
            ))
            .header("X-Goog-Upload-Protocol", "multipart")
            .multipart(form)
            .send()
            .await
            .map_err(service_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::ExtractionService(format!(
                "file upload failed with status {status}"
            )));
        }

        let upload: UploadResponse = response.json().await.map_err(service_error)?;

        Ok(upload.file)
    }

    async fn generate_content(&self, file: &FileReference, prompt: &str) -> Result<String, Error> {
        let body = json!({
            "contents": [{
                "parts": [
                    { "fileData": { "mimeType": file.mime_type, "fileUri": file.uri } },
                    { "text": prompt },
                ],
            }],
        });

        let response = self
            .http
            .post(format!(
                "{}/v1beta/models/{}:generateContent?key={}",
                self.base_url, GEMINI_MODEL, self.api_key
            ))
            .json(&body)
            .send()
            .await
            .map_err(service_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::ExtractionService(format!(
                "content generation failed with status {status}"
            )));
        }

        let generated: GenerateResponse = response.json().await.map_err(service_error)?;

        let text: String = generated
            .candidates
            .first()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect()
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(Error::ExtractionService(
                "the response contained no candidate text".to_owned(),
            ));
        }

        Ok(text)
    }
}

fn service_error(error: reqwest::Error) -> Error {
    Error::ExtractionService(error.to_string())
}


#[async_trait]
impl ExtractionClient for GeminiClient {
    async fn submit(
        &self,
        file_bytes: &[u8],
        mime_type: &str,
        display_name: &str,
        prompt: &str,
    ) -> Result<String, Error> {
        let file = self.upload_file(file_bytes, mime_type, display_name).await?;

        tracing::debug!(
            "Uploaded '{}' ({} bytes) to the extraction service as {}",
            display_name,
            file_bytes.len(),
            file.uri
        );

        self.generate_content(&file, prompt).await
    }
}
