//! Request-scoped staging of uploaded documents.

use std::{
    io::Write,
    path::Path,
};

use tempfile::NamedTempFile;

use crate::{Error, ingest::Upload};

/// An upload staged to a temporary file for the duration of one pipeline
/// invocation.
///
/// The file is created by [StagedUpload::stage] and deleted when the value
/// is dropped, which covers every exit path of the pipeline: success, error
/// returns, and the invocation's future being dropped on cancellation. The
/// path is never shared between invocations.
#[derive(Debug)]
pub struct StagedUpload {
    file: NamedTempFile,
    mime_type: String,
    display_name: String,
}

impl StagedUpload {
    /// Write the upload's bytes to a fresh temporary file.
    ///
    /// The file is placed in `staging_dir` when given, otherwise in the OS
    /// temporary directory.
    ///
    /// # Errors
    /// Returns [Error::TempStorage] if the file cannot be created or
    /// written.
    pub fn stage(upload: &Upload, staging_dir: Option<&Path>) -> Result<Self, Error> {
        let mut file = match staging_dir {
            Some(dir) => NamedTempFile::new_in(dir),
            None => NamedTempFile::new(),
        }
        .map_err(|error| Error::TempStorage(error.to_string()))?;

        file.write_all(&upload.bytes)
            .and_then(|_| file.flush())
            .map_err(|error| Error::TempStorage(error.to_string()))?;

        tracing::debug!(
            "Staged '{}' ({} bytes) at {}",
            upload.file_name,
            upload.bytes.len(),
            file.path().display()
        );

        Ok(Self {
            file,
            mime_type: upload.mime_type.clone(),
            display_name: upload.file_name.clone(),
        })
    }

    /// The path of the staged file.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// The declared MIME type of the upload.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// The original file name of the upload.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }
}
