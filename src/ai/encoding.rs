//! Binary-to-text helpers for inline image and audio payloads.

use crate::{Error, Result};
use base64::Engine as _;
use std::path::Path;

const DATA_URI_SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

pub fn encode_base64(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

pub fn decode_base64(payload: &str) -> Result<Vec<u8>> {
    Ok(base64::engine::general_purpose::STANDARD.decode(payload.trim())?)
}

/// `data:<mime>;base64,<payload>` for an already-encoded payload.
pub fn to_data_uri(mime_type: &str, base64_payload: &str) -> String {
    format!("{DATA_URI_SCHEME}{mime_type}{BASE64_MARKER}{base64_payload}")
}

/// Returns the raw base64 payload, dropping a data-URI header when present.
pub fn strip_data_uri_prefix(value: &str) -> &str {
    if value.starts_with(DATA_URI_SCHEME) {
        value
            .split_once(',')
            .map(|(_, payload)| payload)
            .unwrap_or_default()
    } else {
        value
    }
}

/// MIME type declared by a base64 data URI.
pub fn data_uri_mime_type(value: &str) -> Option<&str> {
    value
        .strip_prefix(DATA_URI_SCHEME)?
        .split_once(BASE64_MARKER)
        .map(|(mime, _)| mime)
        .filter(|mime| !mime.is_empty())
}

/// Decode the payload of a base64 data URI into bytes.
pub fn decode_data_uri(value: &str) -> Result<Vec<u8>> {
    if !value.starts_with(DATA_URI_SCHEME) {
        return Err(Error::InvalidInput("value is not a data URI".to_string()));
    }
    decode_base64(strip_data_uri_prefix(value))
}

/// Read an image file and encode it as a data URI.
pub async fn read_file_as_data_uri(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await?;
    let mime_type = crate::ai::mime::detect_image_mime(&bytes).ok_or_else(|| {
        Error::InvalidInput(format!("{} is not a readable image", path.display()))
    })?;

    tracing::debug!(
        "Encoded {} ({} bytes, {})",
        path.display(),
        bytes.len(),
        mime_type
    );

    Ok(to_data_uri(mime_type, &encode_base64(&bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_strip_data_uri_prefix() {
        assert_eq!(
            strip_data_uri_prefix("data:image/png;base64,AAAA"),
            "AAAA"
        );
        assert_eq!(strip_data_uri_prefix("AAAA"), "AAAA");
        assert_eq!(strip_data_uri_prefix("data:broken"), "");
    }

    #[test]
    fn test_data_uri_mime_type() {
        assert_eq!(
            data_uri_mime_type("data:image/jpeg;base64,AAAA"),
            Some("image/jpeg")
        );
        assert_eq!(data_uri_mime_type("data:;base64,AAAA"), None);
        assert_eq!(data_uri_mime_type("AAAA"), None);
    }

    #[test]
    fn test_decode_data_uri_requires_scheme() {
        assert!(decode_data_uri("AAAA").is_err());
        assert_eq!(
            decode_data_uri("data:audio/wav;base64,AQID").unwrap(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_invalid_base64_is_decode_error() {
        let err = decode_base64("!!!invalid-base64!!!").unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[tokio::test]
    async fn test_file_round_trip_through_data_uri() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pixel.png");
        let mut original = PNG_HEADER.to_vec();
        original.extend((0u8..=255).collect::<Vec<_>>());
        std::fs::write(&path, &original).unwrap();

        let data_uri = read_file_as_data_uri(&path).await.unwrap();
        assert!(data_uri.starts_with("data:image/png;base64,"));

        let payload = strip_data_uri_prefix(&data_uri);
        assert!(!payload.starts_with("data:"));
        assert_eq!(decode_base64(payload).unwrap(), original);
    }

    #[tokio::test]
    async fn test_read_file_rejects_non_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"plain text").unwrap();

        let err = read_file_as_data_uri(&path).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
