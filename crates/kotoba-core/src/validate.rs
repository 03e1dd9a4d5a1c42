//! Structural input rules.
//!
//! These run when an insert payload is constructed, never inside the generic
//! record store.

use std::sync::LazyLock;

use regex::Regex;

use crate::errors::CoreError;

/// Hiragana, katakana and whitespace only.
static KANA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\x{3040}-\x{309F}\x{30A0}-\x{30FF}\s]+$").expect("kana pattern is valid")
});

/// At least one CJK unified ideograph.
static KANJI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\x{4E00}-\x{9FAF}]").expect("kanji pattern is valid"));

/// Check that `kana` is written in a phonetic script only.
///
/// # Errors
///
/// Returns `CoreError::Validation` for empty input or any character outside
/// hiragana, katakana and whitespace.
pub fn check_kana(kana: &str) -> Result<(), CoreError> {
    if kana.trim().is_empty() || !KANA.is_match(kana) {
        return Err(CoreError::Validation(format!(
            "kana '{kana}' should only contain hiragana or katakana characters"
        )));
    }
    Ok(())
}

/// Check that `kanji` contains at least one logographic character.
///
/// # Errors
///
/// Returns `CoreError::Validation` if no kanji is present.
pub fn check_kanji(kanji: &str) -> Result<(), CoreError> {
    if !KANJI.is_match(kanji) {
        return Err(CoreError::Validation(format!(
            "kanji '{kanji}' should contain at least one kanji character"
        )));
    }
    Ok(())
}

/// Minimal email shape check: `local@domain` with a dot in the domain.
///
/// # Errors
///
/// Returns `CoreError::Validation` if the address is malformed.
pub fn check_email(email: &str) -> Result<(), CoreError> {
    let valid = email.split_once('@').is_some_and(|(local, domain)| {
        !local.is_empty()
            && !domain.contains('@')
            && domain.contains('.')
            && !domain.starts_with('.')
            && !domain.ends_with('.')
            && !email.chars().any(char::is_whitespace)
    });
    if valid {
        Ok(())
    } else {
        Err(CoreError::Validation(format!("'{email}' is not a valid email address")))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("ひらがな", true)]
    #[case("カタカナ", true)]
    #[case("ひらがな カタカナ", true)]
    #[case("abc123", false)]
    #[case("漢字", false)]
    #[case("ひらがなa", false)]
    #[case("", false)]
    #[case("   ", false)]
    fn kana_rule(#[case] input: &str, #[case] ok: bool) {
        assert_eq!(check_kana(input).is_ok(), ok, "input: {input:?}");
    }

    #[rstest]
    #[case("漢字", true)]
    #[case("食べる", true)]
    #[case("ひらがな", false)]
    #[case("kanji", false)]
    fn kanji_rule(#[case] input: &str, #[case] ok: bool) {
        assert_eq!(check_kanji(input).is_ok(), ok, "input: {input:?}");
    }

    #[rstest]
    #[case("student@example.com", true)]
    #[case("a@b.co", true)]
    #[case("no-at-sign.com", false)]
    #[case("@example.com", false)]
    #[case("a@localhost", false)]
    #[case("a b@example.com", false)]
    #[case("a@@example.com", false)]
    fn email_rule(#[case] input: &str, #[case] ok: bool) {
        assert_eq!(check_email(input).is_ok(), ok, "input: {input:?}");
    }

    #[test]
    fn kana_error_names_the_input() {
        let err = check_kana("abc123").unwrap_err();
        assert!(err.to_string().contains("abc123"));
    }
}
