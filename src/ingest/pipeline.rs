//! Orchestrates one receipt upload from staging through extraction to a
//! reviewable candidate transaction.

use std::{path::PathBuf, sync::Arc, time::Duration};

use crate::{
    Error,
    extraction::{EXTRACTION_PROMPT, ExtractionClient},
    ingest::{Upload, parse::parse_candidate, staging::StagedUpload},
    models::CandidateTransaction,
};

/// Runs the ingestion pipeline for receipt uploads.
///
/// The extraction client is injected at construction so tests can substitute
/// a double for the remote service. The pipeline performs no store writes;
/// persisting a confirmed candidate is the caller's job.
#[derive(Clone)]
pub struct IngestionPipeline {
    client: Arc<dyn ExtractionClient>,
    timeout: Duration,
    staging_dir: Option<PathBuf>,
}

impl IngestionPipeline {
    /// Create a pipeline that submits uploads to `client`, giving up after
    /// `timeout` per remote call.
    pub fn new(client: Arc<dyn ExtractionClient>, timeout: Duration) -> Self {
        Self {
            client,
            timeout,
            staging_dir: None,
        }
    }

    /// Stage uploads in `staging_dir` instead of the OS temporary directory.
    pub fn with_staging_dir(mut self, staging_dir: PathBuf) -> Self {
        self.staging_dir = Some(staging_dir);
        self
    }

    /// Run one upload through the pipeline and return the extracted
    /// candidate transaction.
    ///
    /// The staging file created for the upload is removed on every exit
    /// path, including errors, timeouts and the future being dropped.
    ///
    /// # Errors
    /// Returns [Error::TempStorage] if the upload cannot be staged, or
    /// [Error::ExtractionService] if the remote call fails or does not
    /// complete within the configured timeout. Low-quality extraction
    /// results are not errors; see [parse_candidate].
    pub async fn ingest(&self, upload: Upload) -> Result<CandidateTransaction, Error> {
        let staged = StagedUpload::stage(&upload, self.staging_dir.as_deref())?;

        let bytes = tokio::fs::read(staged.path())
            .await
            .map_err(|error| Error::TempStorage(error.to_string()))?;

        let submission = self.client.submit(
            &bytes,
            staged.mime_type(),
            staged.display_name(),
            EXTRACTION_PROMPT,
        );

        let raw = match tokio::time::timeout(self.timeout, submission).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(Error::ExtractionService(format!(
                    "no response within {} seconds",
                    self.timeout.as_secs()
                )));
            }
        };

        tracing::debug!("Extraction response for '{}': {raw:?}", staged.display_name());

        Ok(parse_candidate(&raw))
        // `staged` drops here and on every early return above, removing the
        // temporary file.
    }
}
