//! One decoding contract for every `generateContent` mode.
//!
//! Each mode differs only in which part it wants from the first candidate and
//! in the fixed messages it reports, so those live in [`ContentKind`].

use super::types::{GenerateContentResponse, InlineData, Part};
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Text,
    Vision,
    Image,
    Audio,
}

impl ContentKind {
    /// Reported when the provider answers with a non-2xx status and no
    /// embedded error message.
    pub fn http_failure_message(self) -> &'static str {
        match self {
            ContentKind::Text => "Failed to generate content",
            ContentKind::Vision => "Failed to analyze image",
            ContentKind::Image => "Failed to generate image",
            ContentKind::Audio => "Failed to generate audio",
        }
    }

    /// Reported when there is no first candidate carrying a content object.
    pub fn missing_content_message(self) -> &'static str {
        match self {
            ContentKind::Text | ContentKind::Vision => "No content generated",
            ContentKind::Image => "No image generated",
            ContentKind::Audio => "No audio generated",
        }
    }

    /// Reported when the content holds no part of the wanted kind.
    pub fn missing_part_message(self) -> &'static str {
        match self {
            ContentKind::Text | ContentKind::Vision => "No content generated",
            ContentKind::Image => "No image data found in response",
            ContentKind::Audio => "No audio data found in response",
        }
    }
}

/// Find the first part of the first candidate accepted by `select`.
pub fn decode_first_part<'a, T>(
    response: &'a GenerateContentResponse,
    kind: ContentKind,
    select: impl Fn(&'a Part) -> Option<T>,
) -> Result<T> {
    let content = response
        .candidates
        .first()
        .and_then(|candidate| candidate.content.as_ref())
        .ok_or_else(|| Error::Schema(kind.missing_content_message().to_string()))?;

    content
        .parts
        .iter()
        .find_map(select)
        .ok_or_else(|| Error::Schema(kind.missing_part_message().to_string()))
}

pub fn decode_text(response: &GenerateContentResponse, kind: ContentKind) -> Result<String> {
    decode_first_part(response, kind, Part::as_text).map(str::to_string)
}

pub fn decode_inline_data(
    response: &GenerateContentResponse,
    kind: ContentKind,
) -> Result<&InlineData> {
    decode_first_part(response, kind, Part::as_inline_data)
}
