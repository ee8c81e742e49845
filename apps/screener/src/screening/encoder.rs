use base64::Engine;
use thiserror::Error;

use crate::screening::models::{EncodedPayload, UploadedFile};

const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Could not read content of file: {file_name}")]
pub struct EncodingError {
    pub file_name: String,
}

/// Encodes a file into a base64 payload for inline transport.
///
/// Empty files and files whose content length disagrees with the declared size are
/// treated as unreadable. Encoding runs on the blocking pool since uploads can be
/// several megabytes.
pub async fn encode(file: &UploadedFile) -> Result<EncodedPayload, EncodingError> {
    let unreadable = || EncodingError {
        file_name: file.name.clone(),
    };

    if file.bytes.is_empty() || file.bytes.len() as u64 != file.size {
        return Err(unreadable());
    }

    let bytes = file.bytes.clone();
    let content = tokio::task::spawn_blocking(move || {
        base64::engine::general_purpose::STANDARD.encode(&bytes)
    })
    .await
    .map_err(|_| unreadable())?;

    Ok(EncodedPayload {
        content,
        mime_type: resolve_mime_type(file),
    })
}

/// Declared content type, or a guess from the extension when the client sent none.
fn resolve_mime_type(file: &UploadedFile) -> String {
    let declared = file.content_type.trim();
    if !declared.is_empty() {
        return declared.to_string();
    }
    mime_guess::from_path(&file.name)
        .first_raw()
        .unwrap_or(FALLBACK_MIME_TYPE)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn file(name: &str, content_type: &str, bytes: &'static [u8]) -> UploadedFile {
        UploadedFile::new(name, content_type, Bytes::from_static(bytes))
    }

    #[tokio::test]
    async fn test_encode_preserves_bytes() {
        let raw: &'static [u8] = b"%PDF-1.7\n\x00\xff\x10binary";
        let payload = encode(&file("cv.pdf", "application/pdf", raw)).await.unwrap();

        let decoded = base64::engine::general_purpose::STANDARD
            .decode(&payload.content)
            .unwrap();
        assert_eq!(decoded, raw);
        assert_eq!(payload.mime_type, "application/pdf");
    }

    #[tokio::test]
    async fn test_encode_known_vector() {
        let payload = encode(&file("a.txt", "text/plain", b"hello")).await.unwrap();
        assert_eq!(payload.content, "aGVsbG8=");
    }

    #[tokio::test]
    async fn test_empty_file_is_unreadable() {
        let err = encode(&file("blank.pdf", "application/pdf", b"")).await.unwrap_err();
        assert_eq!(err.to_string(), "Could not read content of file: blank.pdf");
    }

    #[tokio::test]
    async fn test_truncated_content_is_unreadable() {
        let mut f = file("short.pdf", "application/pdf", b"abc");
        f.size = 10;
        let err = encode(&f).await.unwrap_err();
        assert_eq!(err.file_name, "short.pdf");
    }

    #[tokio::test]
    async fn test_missing_content_type_is_guessed_from_extension() {
        let payload = encode(&file("resume.pdf", "", b"data")).await.unwrap();
        assert_eq!(payload.mime_type, "application/pdf");
    }

    #[tokio::test]
    async fn test_unknown_extension_falls_back_to_octet_stream() {
        let payload = encode(&file("resume", " ", b"data")).await.unwrap();
        assert_eq!(payload.mime_type, "application/octet-stream");
    }
}
