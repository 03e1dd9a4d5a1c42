use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::enums::LinkTarget;
use crate::errors::CoreError;
use crate::validate::{check_kana, check_kanji};

// ---------------------------------------------------------------------------
// Word
// ---------------------------------------------------------------------------

/// A vocabulary entry. `(kana, translation)` is unique.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Word {
    pub id: i64,
    pub kanji: Option<String>,
    pub kana: String,
    pub translation: Option<String>,
    pub example_sentences: Option<String>,
    pub slug: Option<String>,
    /// Lesson the word was introduced in, if any.
    pub lesson_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NewWord {
    pub kanji: Option<String>,
    pub kana: String,
    pub translation: Option<String>,
    pub example_sentences: Option<String>,
    pub slug: Option<String>,
    pub lesson_id: Option<i64>,
}

impl NewWord {
    /// Build a word payload from its kana reading and translation.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if `kana` is not purely phonetic script.
    pub fn new(kana: impl Into<String>, translation: Option<String>) -> Result<Self, CoreError> {
        let word = Self {
            kanji: None,
            kana: kana.into(),
            translation,
            example_sentences: None,
            slug: None,
            lesson_id: None,
        };
        word.validate()?;
        Ok(word)
    }

    /// Attach the written form.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if `kanji` contains no kanji.
    pub fn with_kanji(mut self, kanji: impl Into<String>) -> Result<Self, CoreError> {
        let kanji = kanji.into();
        check_kanji(&kanji)?;
        self.kanji = Some(kanji);
        Ok(self)
    }

    #[must_use]
    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.example_sentences = Some(example.into());
        self
    }

    #[must_use]
    pub const fn with_lesson(mut self, lesson_id: i64) -> Self {
        self.lesson_id = Some(lesson_id);
        self
    }

    /// Re-check a payload that did not come through [`NewWord::new`]
    /// (e.g. deserialized from user input).
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` on the first broken rule.
    pub fn validate(&self) -> Result<(), CoreError> {
        check_kana(&self.kana)?;
        if let Some(kanji) = &self.kanji {
            check_kanji(kanji)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Grammar / Topic
// ---------------------------------------------------------------------------

/// A grammar point taught in a lesson. `name_russian` is unique.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Grammar {
    pub id: i64,
    pub name_russian: String,
    pub name_japanese: Option<String>,
    pub lesson_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NewGrammar {
    pub name_russian: String,
    pub name_japanese: Option<String>,
    pub lesson_id: i64,
}

/// A conversation or culture topic taught in a lesson. `name_russian` is unique.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Topic {
    pub id: i64,
    pub name_russian: String,
    pub name_japanese: Option<String>,
    pub lesson_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NewTopic {
    pub name_russian: String,
    pub name_japanese: Option<String>,
    pub lesson_id: i64,
}

// ---------------------------------------------------------------------------
// UsefulLink
// ---------------------------------------------------------------------------

/// External reference material for exactly one grammar point or topic.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct UsefulLink {
    pub id: i64,
    /// Globally unique.
    pub url: String,
    pub description: Option<String>,
    pub entity_type: LinkTarget,
    pub grammar_id: Option<i64>,
    pub topic_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NewUsefulLink {
    pub url: String,
    pub description: Option<String>,
    pub entity_type: LinkTarget,
    pub grammar_id: Option<i64>,
    pub topic_id: Option<i64>,
}

impl NewUsefulLink {
    #[must_use]
    pub fn for_grammar(url: impl Into<String>, description: Option<String>, grammar_id: i64) -> Self {
        Self {
            url: url.into(),
            description,
            entity_type: LinkTarget::Grammar,
            grammar_id: Some(grammar_id),
            topic_id: None,
        }
    }

    #[must_use]
    pub fn for_topic(url: impl Into<String>, description: Option<String>, topic_id: i64) -> Self {
        Self {
            url: url.into(),
            description,
            entity_type: LinkTarget::Topic,
            grammar_id: None,
            topic_id: Some(topic_id),
        }
    }

    /// The URL must be an absolute http(s) URL with a host, and exactly one
    /// reference must be set, matching `entity_type`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` describing the broken rule.
    pub fn validate(&self) -> Result<(), CoreError> {
        let parsed = Url::parse(&self.url)
            .map_err(|e| CoreError::Validation(format!("url '{}' is invalid: {e}", self.url)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(CoreError::Validation(format!(
                "url '{}' must use http:// or https:// (found '{}')",
                self.url,
                parsed.scheme()
            )));
        }
        if parsed.host_str().is_none_or(str::is_empty) {
            return Err(CoreError::Validation(format!(
                "url '{}' must include a host",
                self.url
            )));
        }
        match (self.entity_type, self.grammar_id, self.topic_id) {
            (LinkTarget::Grammar, Some(_), None) | (LinkTarget::Topic, None, Some(_)) => Ok(()),
            (_, Some(_), Some(_)) => Err(CoreError::Validation(
                "a link references either a grammar point or a topic, not both".into(),
            )),
            (_, None, None) => Err(CoreError::Validation(
                "a link must reference a grammar point or a topic".into(),
            )),
            (target, _, _) => Err(CoreError::Validation(format!(
                "{target}_id must be set for a {target} link"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn new_word_rejects_latin_kana() {
        assert!(NewWord::new("abc123", None).is_err());
        assert!(NewWord::new("ひらがな", Some("хирагана".into())).is_ok());
    }

    #[test]
    fn with_kanji_requires_a_kanji() {
        let word = NewWord::new("たべる", Some("есть".into())).unwrap();
        assert!(word.clone().with_kanji("たべる").is_err());
        let word = word.with_kanji("食べる").unwrap();
        assert_eq!(word.kanji.as_deref(), Some("食べる"));
    }

    #[test]
    fn deserialized_word_is_revalidated() {
        let word: NewWord = serde_json::from_value(serde_json::json!({
            "kanji": null,
            "kana": "kana",
            "translation": null,
            "example_sentences": null,
            "slug": null,
            "lesson_id": null,
        }))
        .unwrap();
        assert!(word.validate().is_err());
    }

    #[test]
    fn link_constructors_validate() {
        assert!(NewUsefulLink::for_grammar("https://a.example", None, 1).validate().is_ok());
        assert!(NewUsefulLink::for_topic("https://b.example", None, 2).validate().is_ok());
    }

    #[test]
    fn link_with_both_or_neither_reference_is_rejected() {
        let mut both = NewUsefulLink::for_grammar("https://a.example", None, 1);
        both.topic_id = Some(2);
        assert!(both.validate().is_err());

        let mut neither = NewUsefulLink::for_topic("https://a.example", None, 1);
        neither.topic_id = None;
        assert!(neither.validate().is_err());
    }

    #[test]
    fn link_tag_must_match_reference() {
        let mut link = NewUsefulLink::for_grammar("https://a.example", None, 1);
        link.entity_type = LinkTarget::Topic;
        let err = link.validate().unwrap_err();
        assert!(err.to_string().contains("topic_id"));
    }

    #[rstest]
    #[case::ftp_scheme("ftp://a.example")]
    #[case::mailto("mailto:sensei@example.com")]
    #[case::scheme_only("https://")]
    #[case::no_scheme("a.example/path")]
    #[case::plain_words("not a url")]
    #[case::space_in_host("https://exa mple.com")]
    #[case::bad_port("http://a.example:99999")]
    #[case::empty("")]
    fn link_rejects_non_http_urls(#[case] url: &str) {
        let link = NewUsefulLink::for_topic(url, None, 1);
        assert!(link.validate().is_err(), "{url} should be rejected");
    }

    #[rstest]
    #[case("http://a.example")]
    #[case("https://www3.nhk.or.jp/news/easy/")]
    #[case("https://jisho.org/search/%E9%A3%9F%E3%81%B9%E3%82%8B?page=2#top")]
    #[case("http://localhost:8080/notes")]
    fn link_accepts_http_urls(#[case] url: &str) {
        assert!(NewUsefulLink::for_grammar(url, None, 1).validate().is_ok());
    }
}
