//! Local files uploaded with a Bot API call.

use std::path::{Path, PathBuf};

use crate::mime::{self, OCTET_STREAM};
use crate::{Error, Result};

/// A local file sent as a multipart file part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    path: PathBuf,
    file_name: String,
    content_type: Option<String>,
}

impl Attachment {
    /// Reference a local file.
    ///
    /// The content type is detected when the upload starts, unless one is
    /// declared with [`Attachment::with_content_type`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAttachment`] if the path has no file name or
    /// is not a regular file.
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| {
                Error::invalid_attachment(format!("{} has no file name", path.display()))
            })?;
        if !path.is_file() {
            return Err(Error::invalid_attachment(format!(
                "{} is not a regular file",
                path.display()
            )));
        }

        Ok(Self {
            path,
            file_name,
            content_type: None,
        })
    }

    /// Declare the content type instead of detecting it.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Send the file under another name.
    #[must_use]
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    /// Path of the local file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name sent in the `Content-Disposition` header.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Declared content type, if any.
    #[must_use]
    pub fn declared_content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Content type to send: declared, else detected, else
    /// `application/octet-stream`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file has to be sniffed and cannot be read.
    pub async fn resolve_content_type(&self) -> std::io::Result<String> {
        if let Some(content_type) = &self.content_type {
            return Ok(content_type.clone());
        }
        let detected = mime::probe(&self.path).await?;
        Ok(detected.unwrap_or_else(|| OCTET_STREAM.to_string()))
    }
}
