//! Streaming `multipart/form-data` writer for file uploads.
//!
//! Parts are written straight to an [`AsyncWrite`] sink in call order, so
//! an attachment never has to fit in memory.
//!
//! # Example
//!
//! ```ignore
//! use tgbot_core::MultipartWriter;
//!
//! let mut multipart = MultipartWriter::new(sink);
//! let content_type = multipart.content_type();
//! multipart.add_form_field("chat_id", "42").await?;
//! multipart.add_file_part("sticker", &attachment).await?;
//! let sink = multipart.finish().await?;
//! ```

use std::time::{SystemTime, UNIX_EPOCH};

use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::{Attachment, ContentType};

const LINE_FEED: &str = "\r\n";

/// Size of the chunks an attachment is copied with.
const CHUNK_SIZE: usize = 4096;

/// Writes one multipart body to a sink.
///
/// The writer is consumed by [`MultipartWriter::finish`], which writes the
/// closing boundary; no part can be added afterwards.
#[derive(Debug)]
pub struct MultipartWriter<W> {
    boundary: String,
    sink: W,
}

impl<W> MultipartWriter<W>
where
    W: AsyncWrite + Unpin,
{
    /// Create a writer with a fresh boundary.
    pub fn new(sink: W) -> Self {
        Self::with_boundary(sink, generate_boundary())
    }

    /// Create a writer with a custom boundary.
    ///
    /// The boundary must not appear in any part data.
    pub fn with_boundary(sink: W, boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            sink,
        }
    }

    /// Boundary token separating the parts.
    #[must_use]
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// `Content-Type` header value for the request carrying this body.
    #[must_use]
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Write a text field. The value is trimmed.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink fails.
    pub async fn add_form_field(&mut self, name: &str, value: &str) -> std::io::Result<()> {
        let head = format!(
            "--{boundary}{LINE_FEED}\
             Content-Disposition: form-data; name=\"{name}\"{LINE_FEED}\
             Content-Type: {content_type}{LINE_FEED}\
             {LINE_FEED}",
            boundary = self.boundary,
            name = escape_quoted(name),
            content_type = ContentType::PlainText,
        );
        self.sink.write_all(head.as_bytes()).await?;
        self.sink.write_all(value.trim().as_bytes()).await?;
        self.sink.write_all(LINE_FEED.as_bytes()).await?;
        self.sink.flush().await
    }

    /// Write a file part, copying the attachment's raw bytes.
    ///
    /// The content type is the declared one, else the detected one, else
    /// `application/octet-stream`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the sink fails.
    pub async fn add_file_part(
        &mut self,
        field_name: &str,
        attachment: &Attachment,
    ) -> std::io::Result<()> {
        let content_type = attachment.resolve_content_type().await?;
        let mut file = tokio::fs::File::open(attachment.path()).await?;

        let head = format!(
            "--{boundary}{LINE_FEED}\
             Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"{LINE_FEED}\
             Content-Type: {content_type}{LINE_FEED}\
             Content-Transfer-Encoding: binary{LINE_FEED}\
             {LINE_FEED}",
            boundary = self.boundary,
            name = escape_quoted(field_name),
            filename = escape_quoted(attachment.file_name()),
        );
        self.sink.write_all(head.as_bytes()).await?;

        let mut buffer = vec![0_u8; CHUNK_SIZE];
        loop {
            let read = file.read(&mut buffer).await?;
            let Some(chunk) = buffer.get(..read).filter(|chunk| !chunk.is_empty()) else {
                break;
            };
            self.sink.write_all(chunk).await?;
        }

        self.sink.write_all(LINE_FEED.as_bytes()).await?;
        self.sink.flush().await
    }

    /// Write the closing boundary and hand the sink back.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink fails.
    pub async fn finish(mut self) -> std::io::Result<W> {
        let tail = format!("--{}--{LINE_FEED}", self.boundary);
        self.sink.write_all(tail.as_bytes()).await?;
        self.sink.flush().await?;
        Ok(self.sink)
    }
}

/// Make a value safe inside a quoted header parameter.
fn escape_quoted(value: &str) -> String {
    value
        .replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Generate a boundary from the clock and a random component.
fn generate_boundary() -> String {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let nonce = uuid::Uuid::new_v4().simple();

    format!("----TgbotBoundary{timestamp:x}{nonce}")
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn attachment(dir: &tempfile::TempDir, name: &str, content: &[u8]) -> Attachment {
        let path = dir.path().join(name);
        std::fs::write(&path, content).expect("write");
        Attachment::from_path(path).expect("attachment")
    }

    #[test]
    fn boundaries_are_unique() {
        let boundaries: HashSet<_> = (0..64).map(|_| generate_boundary()).collect();
        assert_eq!(boundaries.len(), 64);
        assert!(boundaries.iter().all(|b| b.starts_with("----TgbotBoundary")));
    }

    #[test]
    fn content_type_header() {
        let multipart = MultipartWriter::with_boundary(Vec::new(), "xyz");
        assert_eq!(multipart.boundary(), "xyz");
        assert_eq!(
            multipart.content_type(),
            "multipart/form-data; boundary=xyz"
        );
    }

    #[tokio::test]
    async fn fields_then_file_in_call_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let sticker =
            attachment(&dir, "pic.webp", b"RIFF\x00\x01WEBP").with_content_type("image/webp");

        let mut multipart = MultipartWriter::with_boundary(Vec::new(), "BOUNDARY");
        multipart.add_form_field("a", "1").await.expect("field a");
        multipart.add_form_field("b", " 2\n").await.expect("field b");
        multipart
            .add_file_part("sticker", &sticker)
            .await
            .expect("file");
        let body = multipart.finish().await.expect("finish");

        let mut expected = Vec::new();
        expected.extend_from_slice(
            b"--BOUNDARY\r\n\
              Content-Disposition: form-data; name=\"a\"\r\n\
              Content-Type: text/plain; charset=UTF-8\r\n\
              \r\n\
              1\r\n\
              --BOUNDARY\r\n\
              Content-Disposition: form-data; name=\"b\"\r\n\
              Content-Type: text/plain; charset=UTF-8\r\n\
              \r\n\
              2\r\n\
              --BOUNDARY\r\n\
              Content-Disposition: form-data; name=\"sticker\"; filename=\"pic.webp\"\r\n\
              Content-Type: image/webp\r\n\
              Content-Transfer-Encoding: binary\r\n\
              \r\n",
        );
        expected.extend_from_slice(b"RIFF\x00\x01WEBP");
        expected.extend_from_slice(b"\r\n--BOUNDARY--\r\n");

        assert_eq!(body, expected);
    }

    #[tokio::test]
    async fn file_bytes_pass_through_untouched() {
        let dir = tempfile::tempdir().expect("tempdir");
        // Larger than one chunk, with bytes that are not valid UTF-8.
        let content: Vec<u8> = (0..10_000_u32).map(|i| (i % 251) as u8).collect();
        let file = attachment(&dir, "data.bin", &content);

        let mut multipart = MultipartWriter::with_boundary(Vec::new(), "B");
        multipart.add_file_part("document", &file).await.expect("file");
        let body = multipart.finish().await.expect("finish");

        let header_end = body
            .windows(4)
            .position(|w| w == b"\r\n\r\n")
            .expect("header end")
            + 4;
        let trailer = b"\r\n--B--\r\n";
        assert_eq!(&body[header_end..body.len() - trailer.len()], content.as_slice());
        assert!(body.ends_with(trailer));

        let headers = String::from_utf8_lossy(&body[..header_end]);
        assert!(headers.contains("Content-Type: application/octet-stream\r\n"));
    }

    #[tokio::test]
    async fn detected_type_is_used_when_not_declared() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = attachment(&dir, "photo.png", b"\x89PNG\r\n\x1a\n");

        let mut multipart = MultipartWriter::with_boundary(Vec::new(), "B");
        multipart.add_file_part("photo", &file).await.expect("file");
        let body = multipart.finish().await.expect("finish");

        let text = String::from_utf8_lossy(&body);
        assert!(text.contains("filename=\"photo.png\"\r\nContent-Type: image/png\r\n"));
    }

    #[tokio::test]
    async fn empty_form_is_just_the_closing_boundary() {
        let multipart = MultipartWriter::with_boundary(Vec::new(), "B");
        let body = multipart.finish().await.expect("finish");
        assert_eq!(body, b"--B--\r\n");
    }

    #[tokio::test]
    async fn quotes_in_names_are_escaped() {
        let mut multipart = MultipartWriter::with_boundary(Vec::new(), "B");
        multipart
            .add_form_field("we\"ird", "v")
            .await
            .expect("field");
        let body = multipart.finish().await.expect("finish");

        let text = String::from_utf8_lossy(&body);
        assert!(text.contains("name=\"we%22ird\"\r\n"));
    }
}
