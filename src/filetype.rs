//! Content classification for file viewer pages.
//!
//! Classification is content based and never looks at file names:
//! 1. Magic byte detection for common binary formats
//! 2. NUL byte heuristic (git's binary detection approach)
//! 3. Text sniffing (JSON, XML, SVG, HTML, scripts, plain text)
//!
//! The sniffed media type is then mapped onto a [`Category`] using an
//! [`AllowList`] of non-`text/*` types that render safely as text.

/// Maximum bytes to check for NUL byte heuristic (git uses 8KB).
const BINARY_CHECK_LEN: usize = 8192;

/// Bytes inspected when looking for a root element.
const ROOT_CHECK_LEN: usize = 1024;

/// Non-`text/*` media types treated as viewable by default.
pub const DEFAULT_ALLOWED_TYPES: &[&str] =
    &["application/json", "application/xml", "image/svg+xml"];

/// Magic byte signatures and the media type they identify.
const SIGNATURES: &[(&[u8], &str)] = &[
    (&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A], "image/png"),
    (&[0xFF, 0xD8, 0xFF], "image/jpeg"),
    (b"GIF87a", "image/gif"),
    (b"GIF89a", "image/gif"),
    (b"%PDF-", "application/pdf"),
    (b"PK\x03\x04", "application/zip"),
    (&[0x1F, 0x8B], "application/gzip"),
    (b"BZh", "application/x-bzip2"),
    (&[0xFD, b'7', b'z', b'X', b'Z', 0x00], "application/x-xz"),
    (&[b'7', b'z', 0xBC, 0xAF, 0x27, 0x1C], "application/x-7z-compressed"),
    (&[0x7F, b'E', b'L', b'F'], "application/x-executable"),
    (b"\0asm", "application/wasm"),
];

/// Closed set of content categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Media type under `text/`
    Text,
    /// Allow-listed non-text type that renders as text
    StructuredText,
    /// Binary data: images, archives, executables
    Binary,
    /// Anything else, including empty content
    Other,
}

/// Media types that render safely as text despite not being `text/*`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowList {
    types: Vec<String>,
}

impl Default for AllowList {
    fn default() -> Self {
        Self::new(DEFAULT_ALLOWED_TYPES.iter().copied())
    }
}

impl AllowList {
    pub fn new<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            types: types.into_iter().map(Into::into).collect(),
        }
    }

    /// Adds media types to the list, ignoring duplicates.
    pub fn extend<I, S>(&mut self, types: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for media_type in types {
            let media_type = media_type.into();
            if !self.contains(&media_type) {
                self.types.push(media_type);
            }
        }
    }

    pub fn contains(&self, media_type: &str) -> bool {
        self.types.iter().any(|t| t.eq_ignore_ascii_case(media_type))
    }
}

/// Sniffed media type and its category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    media_type: &'static str,
    category: Category,
}

impl Classification {
    pub fn media_type(&self) -> &'static str {
        self.media_type
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// Whether the content gets a viewer page.
    pub fn is_viewable(&self) -> bool {
        matches!(self.category, Category::Text | Category::StructuredText)
    }
}

/// Classifies content against an allow-list.
///
/// # Examples
///
/// ```
/// use gitpages::{AllowList, Category, classify};
///
/// let allow = AllowList::default();
/// assert_eq!(classify(b"{\"a\":1}", &allow).category(), Category::StructuredText);
/// assert_eq!(classify(b"hello\n", &allow).category(), Category::Text);
/// assert_eq!(classify(&[0, 1, 2, 3], &allow).category(), Category::Binary);
/// ```
pub fn classify(bytes: &[u8], allow: &AllowList) -> Classification {
    let media_type = sniff(bytes);
    let category = if media_type.starts_with("text/") {
        Category::Text
    } else if allow.contains(media_type) {
        Category::StructuredText
    } else if is_binary_type(media_type) {
        Category::Binary
    } else {
        Category::Other
    };

    Classification {
        media_type,
        category,
    }
}

/// Shorthand for `classify(bytes, allow).is_viewable()`.
pub fn is_viewable(bytes: &[u8], allow: &AllowList) -> bool {
    classify(bytes, allow).is_viewable()
}

/// Detects the media type of `bytes` from content alone.
pub fn sniff(bytes: &[u8]) -> &'static str {
    if bytes.is_empty() {
        return "application/x-empty";
    }

    if let Some(media_type) = sniff_magic(bytes) {
        return media_type;
    }

    if is_binary(bytes) {
        return "application/octet-stream";
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => sniff_text(text),
        // Legacy 8-bit encodings still read as text; decoding decides later.
        Err(_) if looks_like_legacy_text(bytes) => "text/plain",
        Err(_) => "application/octet-stream",
    }
}

/// NUL byte heuristic over the first 8KB.
pub fn is_binary(bytes: &[u8]) -> bool {
    let check_len = bytes.len().min(BINARY_CHECK_LEN);
    bytes[..check_len].contains(&0)
}

fn sniff_magic(bytes: &[u8]) -> Option<&'static str> {
    if let Some((_, media_type)) = SIGNATURES
        .iter()
        .find(|(signature, _)| bytes.starts_with(signature))
    {
        return Some(*media_type);
    }

    // WebP: RIFF....WEBP
    if bytes.len() >= 12 && bytes.starts_with(b"RIFF") && &bytes[8..12] == b"WEBP" {
        return Some("image/webp");
    }

    if is_valid_bmp(bytes) {
        return Some("image/bmp");
    }

    if is_valid_ico(bytes) {
        return Some("image/x-icon");
    }

    None
}

fn sniff_text(text: &str) -> &'static str {
    let trimmed = text.trim_start_matches('\u{feff}').trim_start();

    if (trimmed.starts_with('{') || trimmed.starts_with('['))
        && serde_json::from_str::<serde_json::Value>(trimmed).is_ok()
    {
        return "application/json";
    }

    if is_svg_root_element(trimmed) {
        return "image/svg+xml";
    }

    if trimmed.starts_with("<?xml") {
        return "application/xml";
    }

    let head: String = trimmed
        .chars()
        .take(ROOT_CHECK_LEN)
        .collect::<String>()
        .to_ascii_lowercase();
    if head.starts_with("<!doctype html") || head.starts_with("<html") {
        return "text/html";
    }

    if text.starts_with("#!") {
        return "text/x-script";
    }

    "text/plain"
}

/// Checks if content has SVG as root element.
///
/// `<svg` must be the root element after an optional XML declaration and
/// DOCTYPE, not just appear somewhere in the content.
fn is_svg_root_element(text: &str) -> bool {
    let mut content = &text[..floor_char_boundary(text, ROOT_CHECK_LEN)];

    if let Some(rest) = content.strip_prefix("<?xml") {
        match rest.find("?>") {
            Some(end) => content = rest[end + 2..].trim_start(),
            None => return false,
        }
    }

    if let Some(rest) = content.strip_prefix("<!DOCTYPE") {
        match rest.find('>') {
            Some(end) => content = rest[end + 1..].trim_start(),
            None => return false,
        }
    }

    content.starts_with("<svg")
}

fn floor_char_boundary(text: &str, index: usize) -> usize {
    if index >= text.len() {
        return text.len();
    }
    (0..=index)
        .rev()
        .find(|&i| text.is_char_boundary(i))
        .unwrap_or(0)
}

/// Byte content that is not UTF-8 but has no control characters besides
/// common whitespace and escape.
fn looks_like_legacy_text(bytes: &[u8]) -> bool {
    bytes[..bytes.len().min(BINARY_CHECK_LEN)]
        .iter()
        .all(|&b| b >= 0x20 || matches!(b, b'\t' | b'\n' | b'\r' | 0x0C | 0x1B))
}

fn is_binary_type(media_type: &str) -> bool {
    media_type.starts_with("image/")
        || matches!(
            media_type,
            "application/octet-stream"
                | "application/pdf"
                | "application/zip"
                | "application/gzip"
                | "application/x-bzip2"
                | "application/x-xz"
                | "application/x-7z-compressed"
                | "application/x-executable"
                | "application/wasm"
        )
}

/// Validates BMP file structure.
///
/// BMP files start with "BM" followed by a 4-byte little-endian file size of
/// at least the minimum header size (54 bytes).
fn is_valid_bmp(bytes: &[u8]) -> bool {
    if bytes.len() < 6 || !bytes.starts_with(b"BM") {
        return false;
    }

    let file_size = u32::from_le_bytes([bytes[2], bytes[3], bytes[4], bytes[5]]);

    // 14 file header + 40 DIB header
    file_size >= 54
}

/// Validates ICO file structure: 00 00 01 00 and an image count of 1-20.
fn is_valid_ico(bytes: &[u8]) -> bool {
    if bytes.len() < 6 || !bytes.starts_with(&[0x00, 0x00, 0x01, 0x00]) {
        return false;
    }

    let image_count = u16::from_le_bytes([bytes[4], bytes[5]]);

    (1..=20).contains(&image_count)
}
