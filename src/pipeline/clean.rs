//! Text hygiene for text recovered from PDF pages.
//!
//! Two deterministic passes, applied in this order by [`clean_text`]:
//!
//! 1. repair UTF-8 punctuation that was decoded as Windows-1252 somewhere
//!    upstream (`â€™` instead of `’` and friends);
//! 2. drop characters that XML 1.0 forbids, since the text ends up inside
//!    `word/document.xml` and a single stray control character makes Word
//!    refuse the whole file.

use once_cell::sync::Lazy;
use regex::Regex;

/// Mojibake sequence → intended text. The third character is what the
/// trailing UTF-8 byte (0x9C, 0x9D, 0x99, 0x93, 0x94, 0xA6) turns into under
/// Windows-1252.
const MOJIBAKE: [(&str, &str); 7] = [
    ("\u{E2}\u{20AC}\u{153}", "\""),
    ("\u{E2}\u{20AC}\u{9D}", "\""),
    // 0x9D is unassigned in Windows-1252; some decoders emit U+015D instead
    ("\u{E2}\u{20AC}\u{15D}", "\""),
    ("\u{E2}\u{20AC}\u{2122}", "'"),
    ("\u{E2}\u{20AC}\u{201C}", "\u{2013}"),
    ("\u{E2}\u{20AC}\u{201D}", "\u{2014}"),
    ("\u{E2}\u{20AC}\u{A6}", "\u{2026}"),
];

/// Repair mojibake, then strip XML-illegal characters.
pub fn clean_text(input: &str) -> String {
    sanitize_for_xml(&fix_mojibake(input))
}

pub fn fix_mojibake(input: &str) -> String {
    if !input.contains('\u{E2}') {
        return input.to_string();
    }
    MOJIBAKE
        .iter()
        .fold(input.to_string(), |acc, (bad, good)| acc.replace(bad, good))
}

static RE_XML_ILLEGAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\x00-\x08\x0B\x0C\x0E-\x1F\x7F\x{FFFE}\x{FFFF}]").unwrap());

/// Remove C0 controls other than TAB/LF/CR, DEL, and U+FFFE/U+FFFF.
pub fn sanitize_for_xml(input: &str) -> String {
    RE_XML_ILLEGAL.replace_all(input, "").into_owned()
}
