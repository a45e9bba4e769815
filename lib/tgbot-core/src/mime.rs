//! Content type detection for attachments.
//!
//! Detection runs in two tiers: the file name is checked first since it
//! costs nothing, then the leading bytes of the file are sniffed for a
//! known magic number.

use std::path::Path;

use tokio::io::AsyncReadExt;

use crate::ContentType;

/// Placeholder type meaning "no idea".
pub const OCTET_STREAM: &str = ContentType::OctetStream.as_str();

/// Bytes read from the head of a file for content sniffing.
const SNIFF_LEN: u64 = 8192;

/// Guess the MIME type from the file name alone.
#[must_use]
pub fn guess_from_name(path: &Path) -> Option<String> {
    mime_guess::from_path(path)
        .first()
        .map(|mime| mime.essence_str().to_string())
        .filter(|mime| mime != OCTET_STREAM)
}

/// Guess the MIME type from magic numbers.
#[must_use]
pub fn guess_from_bytes(bytes: &[u8]) -> Option<String> {
    infer::get(bytes)
        .map(|kind| kind.mime_type().to_string())
        .filter(|mime| mime != OCTET_STREAM)
}

/// Determine the MIME type of a local file.
///
/// Returns `Ok(None)` when neither the name nor the content gives a
/// conclusive answer.
///
/// # Errors
///
/// Returns an error only if the file has to be sniffed and cannot be read.
pub async fn probe(path: impl AsRef<Path>) -> std::io::Result<Option<String>> {
    let path = path.as_ref();
    if let Some(mime) = guess_from_name(path) {
        return Ok(Some(mime));
    }

    let file = tokio::fs::File::open(path).await?;
    let mut head = Vec::new();
    file.take(SNIFF_LEN).read_to_end(&mut head).await?;

    Ok(guess_from_bytes(&head))
}
