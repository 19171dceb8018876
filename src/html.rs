//! HTML preparation for values rendered into markup.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref ENTITY: Regex = Regex::new(r"^&(?:[a-zA-Z][a-zA-Z0-9]*|#[0-9]+|#[xX][0-9a-fA-F]+);").unwrap();
}

/// Escapes `& < > " '` so the string can be embedded in HTML. Character
/// references that are already encoded are left alone, so preparing a value
/// twice does not double-escape it.
pub fn prepare(content: &str) -> String {
    let mut prepared = String::with_capacity(content.len());
    for (idx, ch) in content.char_indices() {
        match ch {
            '&' if ENTITY.is_match(&content[idx..]) => prepared.push('&'),
            '&' => prepared.push_str("&amp;"),
            '<' => prepared.push_str("&lt;"),
            '>' => prepared.push_str("&gt;"),
            '"' => prepared.push_str("&quot;"),
            '\'' => prepared.push_str("&#039;"),
            _ => prepared.push(ch),
        }
    }
    prepared
}
