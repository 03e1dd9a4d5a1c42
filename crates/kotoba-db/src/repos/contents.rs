//! Study material repository: words, grammar points, topics and useful links.

use kotoba_core::entities::{
    Grammar, NewGrammar, NewTopic, NewUsefulLink, NewWord, Topic, UsefulLink, Word,
};
use kotoba_core::enums::LinkTarget;
use serde_json::json;

use crate::descriptor::{fields, to_fields};
use crate::error::DatabaseError;
use crate::service::KotobaService;

impl KotobaService {
    /// # Errors
    ///
    /// Returns `DatabaseError::Validation` if the kana or kanji break the
    /// script rules, `AlreadyExists` ("Такое слово") for a duplicate
    /// `(kana, translation)` pair.
    pub async fn create_word(&self, word: NewWord) -> Result<Word, DatabaseError> {
        word.validate()?;
        self.words
            .insert_with_derived_slug(self.conn(), to_fields(&word)?)
            .await
    }

    /// The word with exactly this kana whose translation contains
    /// `translation` (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::AmbiguousResult` if several words match.
    pub async fn search_word(
        &self,
        kana: &str,
        translation: &str,
    ) -> Result<Option<Word>, DatabaseError> {
        let needle = translation.to_lowercase();
        let mut matches: Vec<Word> = self
            .words
            .get_all_matching(self.conn(), &fields([("kana", json!(kana))]))
            .await?
            .into_iter()
            .filter(|w| {
                w.translation
                    .as_deref()
                    .is_some_and(|t| t.to_lowercase().contains(&needle))
            })
            .collect();
        if matches.len() > 1 {
            return Err(DatabaseError::AmbiguousResult {
                entity: "word".into(),
                filter: format!("kana = {kana}, translation ~ {translation}"),
            });
        }
        Ok(matches.pop())
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` when no word has this id.
    pub async fn get_word(&self, id: i64) -> Result<Word, DatabaseError> {
        self.words
            .get_by_id(self.conn(), id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound {
                entity: "word".into(),
                detail: format!("id = {id}"),
            })
    }

    /// # Errors
    ///
    /// Returns `AlreadyExists` ("Такая грамматика") for a duplicate Russian name.
    pub async fn create_grammar(&self, grammar: NewGrammar) -> Result<Grammar, DatabaseError> {
        self.grammars.insert(self.conn(), to_fields(&grammar)?).await
    }

    /// # Errors
    ///
    /// Returns `AlreadyExists` ("Такая тема") for a duplicate Russian name.
    pub async fn create_topic(&self, topic: NewTopic) -> Result<Topic, DatabaseError> {
        self.topics.insert(self.conn(), to_fields(&topic)?).await
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::Validation` unless exactly one matching
    /// reference is set, `AlreadyExists` ("Такая ссылка") for a known URL.
    pub async fn add_useful_link(&self, link: NewUsefulLink) -> Result<UsefulLink, DatabaseError> {
        link.validate()?;
        self.links.insert(self.conn(), to_fields(&link)?).await
    }

    /// Links attached to one grammar point or topic.
    pub async fn links_for(
        &self,
        target: LinkTarget,
        id: i64,
    ) -> Result<Vec<UsefulLink>, DatabaseError> {
        let column = match target {
            LinkTarget::Grammar => "grammar_id",
            LinkTarget::Topic => "topic_id",
        };
        self.links
            .get_all_matching(self.conn(), &fields([(column, json!(id))]))
            .await
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_support::helpers::{seed_textbook, test_service};

    fn word(kana: &str, translation: &str) -> NewWord {
        NewWord::new(kana, Some(translation.into())).unwrap()
    }

    #[tokio::test]
    async fn word_slug_comes_from_kana() {
        let svc = test_service().await;
        let created = svc.create_word(word("ねこ", "кошка")).await.unwrap();
        let slug = created.slug.unwrap();
        assert!(!slug.is_empty());
        assert!(slug.is_ascii(), "{slug}");
    }

    #[tokio::test]
    async fn same_kana_with_other_translation_is_a_new_word() {
        let svc = test_service().await;
        svc.create_word(word("はし", "мост")).await.unwrap();
        svc.create_word(word("はし", "палочки")).await.unwrap();
        let err = svc.create_word(word("はし", "мост")).await.unwrap_err();
        assert_eq!(err.to_string(), "Такое слово уже существует: はし");
    }

    #[tokio::test]
    async fn unvalidated_word_is_rejected_before_insert() {
        let svc = test_service().await;
        let mut bad = word("ねこ", "кошка");
        bad.kana = "neko".into();
        let err = svc.create_word(bad).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Validation(_)));
    }

    #[tokio::test]
    async fn search_matches_translation_fragment_case_insensitively() {
        let svc = test_service().await;
        let bridge = svc.create_word(word("はし", "Мост")).await.unwrap();
        svc.create_word(word("はし", "палочки")).await.unwrap();

        let found = svc.search_word("はし", "мос").await.unwrap();
        assert_eq!(found.map(|w| w.id), Some(bridge.id));
        assert!(svc.search_word("はし", "река").await.unwrap().is_none());
        assert!(svc.search_word("かわ", "мост").await.unwrap().is_none());

        let err = svc.search_word("はし", "").await.unwrap_err();
        assert!(matches!(err, DatabaseError::AmbiguousResult { .. }));
    }

    #[tokio::test]
    async fn links_are_listed_per_target() {
        let svc = test_service().await;
        let (_, lessons) = seed_textbook(&svc, "Genki", &["L1"]).await;
        let grammar = svc
            .create_grammar(NewGrammar {
                name_russian: "Частица を".into(),
                name_japanese: Some("を".into()),
                lesson_id: lessons[0].id,
            })
            .await
            .unwrap();
        let topic = svc
            .create_topic(NewTopic {
                name_russian: "Покупки".into(),
                name_japanese: None,
                lesson_id: lessons[0].id,
            })
            .await
            .unwrap();

        svc.add_useful_link(NewUsefulLink::for_grammar("https://a.example/wo", None, grammar.id))
            .await
            .unwrap();
        svc.add_useful_link(NewUsefulLink::for_topic("https://a.example/shop", None, topic.id))
            .await
            .unwrap();

        let grammar_links = svc.links_for(LinkTarget::Grammar, grammar.id).await.unwrap();
        assert_eq!(grammar_links.len(), 1);
        assert_eq!(grammar_links[0].entity_type, LinkTarget::Grammar);
        assert_eq!(svc.links_for(LinkTarget::Topic, topic.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn link_with_both_references_is_a_validation_error() {
        let svc = test_service().await;
        let mut link = NewUsefulLink::for_grammar("https://a.example", None, 1);
        link.topic_id = Some(1);
        let err = svc.add_useful_link(link).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Validation(_)), "{err:?}");
    }
}
