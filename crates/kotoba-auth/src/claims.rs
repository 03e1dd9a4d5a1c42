use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Claims carried by a Kotoba access token.
///
/// `sub` is the user's email, the same key `authenticate` looks users up by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    /// Expiration time (Unix timestamp, seconds).
    pub exp: i64,
    /// Issued at (Unix timestamp, seconds).
    pub iat: i64,
}

impl Claims {
    /// Claims for `subject`, valid for `ttl` from `now`.
    #[must_use]
    pub fn new(subject: impl Into<String>, now: DateTime<Utc>, ttl: TimeDelta) -> Self {
        Self {
            sub: subject.into(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        }
    }

    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Check if the token is expired or expires within `buffer_secs`.
    #[must_use]
    pub fn is_near_expiry(&self, buffer_secs: i64) -> bool {
        let threshold = Utc::now() + TimeDelta::seconds(buffer_secs);
        self.expires_at() <= threshold
    }
}
