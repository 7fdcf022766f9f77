/// Image MIME types the provider accepts for inline vision input.
pub const ACCEPTED_IMAGE_MIME_TYPES: &[&str] = &[
    "image/png",
    "image/jpeg",
    "image/webp",
    "image/heic",
    "image/heif",
];

pub fn is_accepted_image_mime(mime: &str) -> bool {
    ACCEPTED_IMAGE_MIME_TYPES.contains(&mime)
}

/// Sniff an image MIME type from its leading bytes.
///
/// Returns `None` when the content is not a recognizable image.
pub fn detect_image_mime(bytes: &[u8]) -> Option<&'static str> {
    // ISO-BMFF brands are not covered by `image::guess_format`.
    if let [_, _, _, _, b'f', b't', b'y', b'p', brand @ ..] = bytes {
        match brand.get(..4) {
            Some(b"heic" | b"heix" | b"hevc" | b"hevx" | b"heim" | b"heis") => {
                return Some("image/heic")
            }
            Some(b"mif1" | b"msf1" | b"heif") => return Some("image/heif"),
            _ => {}
        }
    }

    match image::guess_format(bytes) {
        Ok(format) => Some(format.to_mime_type()),
        Err(_) => {
            tracing::warn!(
                "Unrecognized image format (first 4 bytes: {:02X?})",
                &bytes[..bytes.len().min(4)]
            );
            None
        }
    }
}
