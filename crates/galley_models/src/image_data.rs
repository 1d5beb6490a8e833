//! Normalizing vendor image payloads into data URLs.

use base64::{Engine, engine::general_purpose::STANDARD};
use galley_core::FoodImage;
use galley_error::{ProviderError, ProviderErrorKind, ProviderResult};
use std::str::FromStr;

/// Image formats accepted from vendors.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::AsRefStr,
    strum::EnumString,
    strum::EnumIter,
)]
pub enum ImageMime {
    /// PNG
    #[strum(serialize = "image/png")]
    Png,
    /// JPEG
    #[strum(to_string = "image/jpeg", serialize = "image/jpg")]
    Jpeg,
    /// WebP
    #[strum(serialize = "image/webp")]
    Webp,
    /// GIF
    #[strum(serialize = "image/gif")]
    Gif,
}

impl ImageMime {
    /// Detect the format from the payload's leading magic bytes.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, ..] => Some(Self::Png),
            [0xFF, 0xD8, 0xFF, ..] => Some(Self::Jpeg),
            [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some(Self::Webp),
            [b'G', b'I', b'F', b'8', b'7' | b'9', b'a', ..] => Some(Self::Gif),
            _ => None,
        }
    }
}

/// Validate raw image bytes and wrap them in a `data:` URL.
///
/// `declared` is the vendor's content type, if any. Non-image content types
/// (such as `application/octet-stream`) are ignored; an image content type
/// must be supported and must agree with the detected format.
///
/// # Errors
///
/// Returns [`ProviderErrorKind::InvalidImage`] for empty payloads,
/// unrecognized formats, unsupported declared types, and mismatches.
///
/// # Example
///
/// ```
/// use galley_models::normalize_image_bytes;
///
/// let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];
/// let image = normalize_image_bytes(&png, Some("image/png")).unwrap();
/// assert!(image.image_url.starts_with("data:image/png;base64,"));
/// assert!(normalize_image_bytes(b"<html>", None).is_err());
/// ```
pub fn normalize_image_bytes(bytes: &[u8], declared: Option<&str>) -> ProviderResult<FoodImage> {
    if bytes.is_empty() {
        return Err(invalid("empty image payload"));
    }

    let detected = ImageMime::sniff(bytes)
        .ok_or_else(|| invalid("payload is not a supported image format"))?;

    if let Some(declared) = declared.map(media_type).filter(|t| t.starts_with("image/")) {
        let declared_mime = ImageMime::from_str(&declared)
            .map_err(|_| invalid(format!("unsupported MIME type {}", declared)))?;
        if declared_mime != detected {
            return Err(invalid(format!(
                "declared {} but payload is {}",
                declared_mime, detected
            )));
        }
    }

    let data = STANDARD.encode(bytes);
    Ok(FoodImage {
        image_url: format!("data:{};base64,{}", detected, data),
        image_data: Some(data),
        mime_type: Some(detected.to_string()),
    })
}

/// Decode a base64 image payload and normalize it.
///
/// # Errors
///
/// Returns [`ProviderErrorKind::InvalidImage`] for malformed base64 and for
/// everything [`normalize_image_bytes`] rejects.
pub fn normalize_base64_image(encoded: &str, declared: Option<&str>) -> ProviderResult<FoodImage> {
    let encoded = encoded.trim();
    if encoded.is_empty() {
        return Err(invalid("empty image payload"));
    }
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|e| invalid(format!("malformed base64: {}", e)))?;
    normalize_image_bytes(&bytes, declared)
}

/// `image/png; charset=binary` -> `image/png`
fn media_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

#[track_caller]
fn invalid(message: impl Into<String>) -> ProviderError {
    ProviderError::new(ProviderErrorKind::InvalidImage(message.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];
    const WEBP: &[u8] = b"RIFF\x24\x00\x00\x00WEBPVP8 ";
    const GIF: &[u8] = b"GIF89a\x01\x00";

    #[test]
    fn sniffs_every_supported_format() {
        assert_eq!(ImageMime::sniff(JPEG), Some(ImageMime::Jpeg));
        assert_eq!(ImageMime::sniff(WEBP), Some(ImageMime::Webp));
        assert_eq!(ImageMime::sniff(GIF), Some(ImageMime::Gif));
        assert_eq!(ImageMime::sniff(b"{\"error\":1}"), None);
        assert_eq!(ImageMime::iter().count(), 4);
    }

    #[test]
    fn declared_type_parameters_are_ignored() {
        let image = normalize_image_bytes(JPEG, Some("image/jpeg; charset=binary")).unwrap();
        assert_eq!(image.mime_type.as_deref(), Some("image/jpeg"));
        assert!(normalize_image_bytes(JPEG, Some("application/octet-stream")).is_ok());
    }

    #[test]
    fn rejects_mismatched_and_unsupported_types() {
        let mismatch = normalize_image_bytes(JPEG, Some("image/png")).unwrap_err();
        assert!(matches!(mismatch.kind, ProviderErrorKind::InvalidImage(_)));

        let unsupported = normalize_image_bytes(JPEG, Some("image/tiff")).unwrap_err();
        assert!(unsupported.message().contains("unsupported MIME type image/tiff"));
    }

    #[test]
    fn rejects_empty_and_malformed_base64() {
        assert!(normalize_base64_image("", None).is_err());
        let err = normalize_base64_image("not base64!!", None).unwrap_err();
        assert!(err.message().contains("malformed base64"));
    }

    #[test]
    fn base64_round_trip_keeps_payload() {
        let encoded = STANDARD.encode(GIF);
        let image = normalize_base64_image(&encoded, None).unwrap();
        assert_eq!(image.image_data.as_deref(), Some(encoded.as_str()));
        assert_eq!(image.image_url, format!("data:image/gif;base64,{}", encoded));
    }
}
