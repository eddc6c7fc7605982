//! Image payloads carried as data URIs
//!
//! The browser client sends images as `data:<mime>;base64,<payload>`. A bare
//! base64 string is accepted too, in which case the format is sniffed from
//! the decoded magic bytes.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::{Error, Result};

/// Image formats recognised by magic bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Webp,
    Gif,
}

impl ImageFormat {
    /// Detect the format from the leading bytes of an image
    pub fn detect(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [0xFF, 0xD8, 0xFF, ..] => Some(Self::Jpeg),
            [0x89, 0x50, 0x4E, 0x47, ..] => Some(Self::Png),
            [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some(Self::Webp),
            [b'G', b'I', b'F', b'8', ..] => Some(Self::Gif),
            _ => None,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Webp => "image/webp",
            Self::Gif => "image/gif",
        }
    }
}

/// A decoded-and-verified image ready to forward to the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    mime_type: String,
    /// Standard base64, no data URI prefix
    data: String,
    size_bytes: usize,
}

impl ImagePayload {
    /// Parse a data URI or bare base64 string
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(Error::invalid_image("image data is empty"));
        }

        match input.strip_prefix("data:") {
            Some(rest) => Self::parse_data_uri(rest),
            None => Self::parse_bare(input),
        }
    }

    /// Build a payload from raw bytes and a known mime type
    pub fn from_bytes(bytes: &[u8], mime_type: impl Into<String>) -> Result<Self> {
        if bytes.is_empty() {
            return Err(Error::invalid_image("image data is empty"));
        }
        Ok(Self {
            mime_type: mime_type.into(),
            data: STANDARD.encode(bytes),
            size_bytes: bytes.len(),
        })
    }

    fn parse_data_uri(rest: &str) -> Result<Self> {
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| Error::invalid_image("data URI has no payload separator"))?;

        let mut params = header.split(';');
        let mime_type = params.next().unwrap_or_default().trim().to_ascii_lowercase();
        if !params.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
            return Err(Error::invalid_image("data URI is not base64 encoded"));
        }
        if !mime_type.starts_with("image/") {
            return Err(Error::invalid_image(format!(
                "unsupported media type '{}'",
                mime_type
            )));
        }

        let payload = payload.trim();
        let bytes = decode(payload)?;
        Ok(Self {
            mime_type,
            data: payload.to_string(),
            size_bytes: bytes.len(),
        })
    }

    fn parse_bare(input: &str) -> Result<Self> {
        let bytes = decode(input)?;
        let format = ImageFormat::detect(&bytes)
            .ok_or_else(|| Error::invalid_image("unrecognised image format"))?;

        Ok(Self {
            mime_type: format.mime_type().to_string(),
            data: input.to_string(),
            size_bytes: bytes.len(),
        })
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Base64 payload without the data URI prefix
    pub fn base64_data(&self) -> &str {
        &self.data
    }

    /// Size of the decoded image in bytes
    pub fn size_bytes(&self) -> usize {
        self.size_bytes
    }

    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

fn decode(payload: &str) -> Result<Vec<u8>> {
    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| Error::invalid_image(format!("invalid base64 encoding: {}", e)))?;
    if bytes.is_empty() {
        return Err(Error::invalid_image("image data is empty"));
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_parse_data_uri() {
        let uri = format!("data:image/png;base64,{}", STANDARD.encode(PNG_HEADER));
        let payload = ImagePayload::parse(&uri).unwrap();

        assert_eq!(payload.mime_type(), "image/png");
        assert_eq!(payload.size_bytes(), PNG_HEADER.len());
        assert_eq!(payload.to_data_uri(), uri);
    }

    #[test]
    fn test_parse_bare_base64_sniffs_format() {
        let jpeg = STANDARD.encode([0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10]);
        let payload = ImagePayload::parse(&jpeg).unwrap();

        assert_eq!(payload.mime_type(), "image/jpeg");
        assert_eq!(payload.base64_data(), jpeg);
    }

    #[test]
    fn test_surrounding_whitespace_is_not_forwarded() {
        let encoded = STANDARD.encode(PNG_HEADER);

        let payload = ImagePayload::parse(&format!("data:image/png;base64,\n {}\n", encoded)).unwrap();
        assert_eq!(payload.base64_data(), encoded);

        let bare = ImagePayload::parse(&format!("  {}\r\n", encoded)).unwrap();
        assert_eq!(bare.base64_data(), encoded);
        assert_eq!(bare.mime_type(), "image/png");
    }

    #[test]
    fn test_rejects_non_image_media_type() {
        let uri = format!("data:text/plain;base64,{}", STANDARD.encode("halo"));
        assert!(matches!(
            ImagePayload::parse(&uri),
            Err(Error::InvalidImage(_))
        ));
    }

    #[test]
    fn test_rejects_non_base64_data_uri() {
        assert!(ImagePayload::parse("data:image/svg+xml,<svg/>").is_err());
    }

    #[test]
    fn test_rejects_bad_base64() {
        assert!(ImagePayload::parse("data:image/png;base64,@@@").is_err());
        assert!(ImagePayload::parse("data:image/png;base64,").is_err());
    }

    #[test]
    fn test_rejects_unknown_bare_bytes() {
        let text = STANDARD.encode("bukan gambar");
        assert!(ImagePayload::parse(&text).is_err());
    }

    #[test]
    fn test_detect_webp() {
        let mut bytes = b"RIFF\0\0\0\0WEBPVP8 ".to_vec();
        bytes.extend_from_slice(&[0; 4]);
        assert_eq!(ImageFormat::detect(&bytes), Some(ImageFormat::Webp));
        assert_eq!(ImageFormat::detect(b"GIF89a"), Some(ImageFormat::Gif));
        assert_eq!(ImageFormat::detect(b"ab"), None);
    }

    #[test]
    fn test_from_bytes_round_trips_through_parse() {
        let payload = ImagePayload::from_bytes(&PNG_HEADER, "image/png").unwrap();
        let reparsed = ImagePayload::parse(&payload.to_data_uri()).unwrap();
        assert_eq!(payload, reparsed);
        assert!(ImagePayload::from_bytes(&[], "image/png").is_err());
    }
}
