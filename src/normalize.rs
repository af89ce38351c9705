use regex::Regex;
use std::sync::LazyLock;

static CONTROL_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\x00-\x1F\x7F]").expect("control character pattern is valid"));

/// Cleans a string read from the DOM
///
/// The input is trimmed of whitespace and the information separators
/// (0x1C-0x1F), then every remaining control character (0x00-0x1F, 0x7F)
/// is replaced with a single space.
pub fn normalize(input: &str) -> String {
    CONTROL_CHARS
        .replace_all(input.trim_matches(is_trimmed), " ")
        .into_owned()
}

fn is_trimmed(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

/// Cleans raw bytes, dropping every sequence that is not valid UTF-8
pub fn normalize_bytes(input: &[u8]) -> String {
    normalize(&repair_utf8(input))
}

/// Decodes UTF-8, discarding invalid byte sequences instead of substituting them
fn repair_utf8(input: &[u8]) -> String {
    input.utf8_chunks().map(|chunk| chunk.valid()).collect()
}
