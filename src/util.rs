//! Shared byte-level helpers: text decoding and image format sniffing.

use std::borrow::Cow;

/// Decode bytes to a string, handling various encodings.
///
/// 1. UTF-8 first (a BOM is handled by encoding_rs)
/// 2. If malformed, the hint encoding (usually from `<meta charset>`)
/// 3. Windows-1252 as the last resort
///
/// Uses `Cow<str>` to avoid allocation when the input is valid UTF-8.
pub fn decode_text<'a>(bytes: &'a [u8], hint_encoding: Option<&str>) -> Cow<'a, str> {
    let (result, _encoding, malformed) = encoding_rs::UTF_8.decode(bytes);

    if !malformed {
        return result;
    }

    if let Some(name) = hint_encoding
        && let Some(encoding) = encoding_rs::Encoding::for_label(name.as_bytes())
    {
        let (result, _, _) = encoding.decode(bytes);
        return result;
    }

    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}

/// Decode an HTML document, honouring a `<meta charset>` near the top.
pub fn decode_html(bytes: &[u8]) -> Cow<'_, str> {
    decode_text(bytes, extract_meta_charset(bytes))
}

/// Extract the charset from `<meta charset="...">` or a
/// `content="text/html; charset=..."` declaration.
///
/// Only the first 1024 bytes are checked.
pub fn extract_meta_charset(bytes: &[u8]) -> Option<&str> {
    let prefix = &bytes[..bytes.len().min(1024)];

    let pos = prefix
        .windows(8)
        .position(|w| w.eq_ignore_ascii_case(b"charset="))?;
    let rest = &prefix[pos + 8..];
    let rest = match rest.first() {
        Some(b'"' | b'\'') => &rest[1..],
        _ => rest,
    };

    let end = rest
        .iter()
        .position(|&b| matches!(b, b'"' | b'\'' | b';' | b'>' | b'/') || b.is_ascii_whitespace())
        .unwrap_or(rest.len());
    let name = std::str::from_utf8(&rest[..end]).ok()?;
    (!name.is_empty()).then_some(name)
}

// ============================================================================
// Image Format Detection
// ============================================================================

/// Image formats that can be embedded as data URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    /// SVG image (vector)
    Svg,
    WebP,
    Bmp,
    Ico,
}

impl ImageFormat {
    /// Get the MIME type string for this format.
    pub fn mime_type(self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
            ImageFormat::Gif => "image/gif",
            ImageFormat::Svg => "image/svg+xml",
            ImageFormat::WebP => "image/webp",
            ImageFormat::Bmp => "image/bmp",
            ImageFormat::Ico => "image/x-icon",
        }
    }
}

/// Detect an image format from its path and/or raw bytes.
///
/// Extension-based detection is tried first, then magic bytes.
pub fn detect_image_format(path: &str, data: &[u8]) -> Option<ImageFormat> {
    let path_lower = path.to_lowercase();
    let extension = path_lower.rsplit_once('.').map(|(_, ext)| ext);

    match extension {
        Some("jpg" | "jpeg") => return Some(ImageFormat::Jpeg),
        Some("png") => return Some(ImageFormat::Png),
        Some("gif") => return Some(ImageFormat::Gif),
        Some("svg") => return Some(ImageFormat::Svg),
        Some("webp") => return Some(ImageFormat::WebP),
        Some("bmp") => return Some(ImageFormat::Bmp),
        Some("ico") => return Some(ImageFormat::Ico),
        _ => {}
    }

    match data {
        // JPEG: FF D8 FF
        [0xFF, 0xD8, 0xFF, ..] => Some(ImageFormat::Jpeg),
        // PNG: 89 50 4E 47 (.PNG)
        [0x89, b'P', b'N', b'G', ..] => Some(ImageFormat::Png),
        [b'G', b'I', b'F', b'8', ..] => Some(ImageFormat::Gif),
        // WebP: RIFF....WEBP
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some(ImageFormat::WebP),
        [b'B', b'M', ..] => Some(ImageFormat::Bmp),
        [0x00, 0x00, 0x01, 0x00, ..] => Some(ImageFormat::Ico),
        _ if looks_like_svg(data) => Some(ImageFormat::Svg),
        _ => None,
    }
}

fn looks_like_svg(data: &[u8]) -> bool {
    let head = decode_text(&data[..data.len().min(256)], None);
    let head = head.trim_start();
    head.starts_with("<svg") || (head.starts_with("<?xml") && head.contains("<svg"))
}

/// Detect MIME type from file extension or magic bytes.
///
/// Returns `None` if the data is not a recognized image.
pub fn detect_mime_type(filename: &str, data: &[u8]) -> Option<&'static str> {
    detect_image_format(filename, data).map(ImageFormat::mime_type)
}

// ============================================================================
// Tests
// ============================================================================
