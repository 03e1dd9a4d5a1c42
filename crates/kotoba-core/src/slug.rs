//! Slug derivation.
//!
//! Slugs are lowercase, hyphen-separated identifiers derived from a
//! human-readable attribute. Each character is transliterated to ASCII with
//! `deunicode`; characters with no transliteration are kept as they are, so a
//! name in a script `deunicode` does not cover still yields a usable slug.

use deunicode::deunicode_char;

/// Derive a URL-safe slug from `source`.
///
/// Deterministic: the same input always produces the same slug.
///
/// ```
/// use kotoba_core::slug::slugify;
///
/// assert_eq!(slugify("Hello World"), "hello-world");
/// assert_eq!(slugify("  Minna no Nihongo: Shokyu I  "), "minna-no-nihongo-shokyu-i");
/// ```
#[must_use]
pub fn slugify(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut pending_dash = false;

    for ch in source.chars() {
        for c in transliterate(ch).chars() {
            if c.is_alphanumeric() {
                if pending_dash && !out.is_empty() {
                    out.push('-');
                }
                pending_dash = false;
                out.extend(c.to_lowercase());
            } else {
                pending_dash = true;
            }
        }
    }

    out
}

fn transliterate(ch: char) -> String {
    if ch.is_ascii() {
        return ch.to_string();
    }
    match deunicode_char(ch) {
        Some(ascii) if !ascii.is_empty() && ascii != "[?]" => ascii.to_string(),
        _ => ch.to_string(),
    }
}
