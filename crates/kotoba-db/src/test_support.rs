//! Shared test utilities for kotoba-db unit tests.

#[cfg(test)]
pub(crate) mod helpers {
    use kotoba_config::KotobaConfig;
    use kotoba_core::entities::{Lesson, NewLesson, NewTextbook, Textbook, User};

    use crate::KotobaDb;
    use crate::service::KotobaService;

    /// A freshly migrated in-memory database.
    pub async fn test_db() -> KotobaDb {
        KotobaDb::open_local(":memory:").await.unwrap()
    }

    /// Defaults with a signing secret and the cheapest bcrypt cost.
    pub fn test_config() -> KotobaConfig {
        let mut config = KotobaConfig::default();
        config.database.path = ":memory:".into();
        config.auth.secret_key = "test-secret".into();
        config.auth.bcrypt_cost = 4;
        config
    }

    /// An in-memory service built from [`test_config`].
    pub async fn test_service() -> KotobaService {
        KotobaService::new(test_db().await, &test_config()).unwrap()
    }

    pub async fn seed_user(svc: &KotobaService, name: &str) -> User {
        let email = format!("{}@example.com", name.to_lowercase());
        svc.register_user(name, None, &email, "password").await.unwrap()
    }

    /// A textbook with one lesson per entry of `lessons`.
    pub async fn seed_textbook(
        svc: &KotobaService,
        name: &str,
        lessons: &[&str],
    ) -> (Textbook, Vec<Lesson>) {
        let textbook = svc
            .create_textbook(NewTextbook {
                name: name.into(),
                slug: None,
            })
            .await
            .unwrap();
        let payloads = lessons
            .iter()
            .map(|lesson| NewLesson {
                name: (*lesson).into(),
                slug: None,
                textbook_id: textbook.id,
            })
            .collect();
        let lessons = svc.create_lessons(payloads).await.unwrap();
        (textbook, lessons)
    }
}
