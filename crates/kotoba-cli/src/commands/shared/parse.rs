use serde::de::DeserializeOwned;

/// Parse a snake_case enum value using serde-deserialization.
pub fn parse_enum<T>(raw: &str, field: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let normalized = raw.replace('-', "_");
    let json = format!("\"{normalized}\"");
    serde_json::from_str(&json).map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

#[cfg(test)]
mod tests {
    use kotoba_core::enums::{EntityKind, LinkTarget};

    use super::parse_enum;

    #[test]
    fn parses_snake_case_enum() {
        let kind: EntityKind = parse_enum("user_lesson", "entity").expect("kind should parse");
        assert_eq!(kind, EntityKind::UserLesson);
    }

    #[test]
    fn parses_hyphenated_alias() {
        let kind: EntityKind = parse_enum("class-word", "entity").expect("kind should parse");
        assert_eq!(kind, EntityKind::ClassWord);
    }

    #[test]
    fn errors_on_invalid_enum() {
        let err = parse_enum::<LinkTarget>("lesson", "target").expect_err("should fail");
        assert!(err.to_string().contains("invalid target 'lesson'"));
    }
}
