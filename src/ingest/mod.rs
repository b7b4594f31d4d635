//! The receipt ingestion pipeline.
//!
//! Each upload moves through a fixed sequence: the received file is staged
//! to a request-scoped temporary file, submitted to the extraction service
//! with a fixed schema prompt, and the response text is decoded leniently
//! into a [crate::models::CandidateTransaction] for the user to review.
//!
//! Only infrastructure failures (no file, staging I/O, the remote call
//! failing or timing out) reject an upload. A low-quality extraction never
//! does: missing or malformed fields degrade to empty values, because the
//! candidate is always reviewed by a human before anything is persisted.
//! The pipeline itself writes nothing to the stores.
//!
//! The staging file is private to one invocation and is removed on every
//! exit path, including early errors, the remote call timing out, and the
//! request future being dropped.

mod parse;
mod pipeline;
mod staging;

pub use parse::parse_candidate;
pub use pipeline::IngestionPipeline;
pub use staging::StagedUpload;

/// An uploaded file as received from the API layer.
#[derive(Debug, Clone)]
pub struct Upload {
    /// The raw bytes of the uploaded document.
    pub bytes: Vec<u8>,
    /// The declared MIME type, e.g. "image/jpeg".
    pub mime_type: String,
    /// The original file name as sent by the client.
    pub file_name: String,
}
