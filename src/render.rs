//! Text renderer.
//!
//! Turns decoded body bytes into terminal text by interpreting them in the
//! declared charset and dropping every `<...>` span. Entities are left as-is.

use log::warn;

/// Converts a decoded response body into printable text.
pub trait Render {
    /// `charset` is the lowercased `charset` parameter of `content-type`, if any.
    fn render(&self, body: &[u8], charset: Option<&str>) -> String;
}

/// The default renderer: charset decoding followed by [`strip_tags`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TagStripper;

impl Render for TagStripper {
    fn render(&self, body: &[u8], charset: Option<&str>) -> String {
        strip_tags(&decode_text(body, charset))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagState {
    OutsideTag,
    InsideTag,
}

/// Removes markup tags, keeping everything outside `<...>` in order.
///
/// An unterminated tag at the end of input is dropped. A `>` outside a tag is
/// ordinary text.
///
/// ```
/// assert_eq!(plainfetch::render::strip_tags("<a>hi</a> there"), "hi there");
/// ```
pub fn strip_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut state = TagState::OutsideTag;
    for c in text.chars() {
        match (state, c) {
            (TagState::OutsideTag, '<') => state = TagState::InsideTag,
            (TagState::InsideTag, '>') => state = TagState::OutsideTag,
            (TagState::OutsideTag, c) => out.push(c),
            (TagState::InsideTag, _) => {}
        }
    }
    out
}

/// Interprets `bytes` in `charset`, defaulting to UTF-8.
///
/// UTF-8 decoding is lossy (invalid sequences become U+FFFD). ISO-8859-1 and
/// US-ASCII map each byte to the code point of the same value. Other charsets
/// are decoded as UTF-8 with a warning.
pub fn decode_text(bytes: &[u8], charset: Option<&str>) -> String {
    match charset.map(str::to_ascii_lowercase).as_deref() {
        None | Some("utf-8") | Some("utf8") => String::from_utf8_lossy(bytes).into_owned(),
        Some("iso-8859-1" | "latin1" | "latin-1" | "l1" | "us-ascii" | "ascii") => {
            bytes.iter().map(|&b| char::from(b)).collect()
        }
        Some(other) => {
            warn!("Unsupported charset {other:?}, decoding as UTF-8");
            String::from_utf8_lossy(bytes).into_owned()
        }
    }
}
