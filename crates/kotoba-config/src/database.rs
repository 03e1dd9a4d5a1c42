//! libSQL database configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_path() -> String {
    ".kotoba/kotoba.db".to_string()
}

/// How long SQLite waits on a locked database before failing.
const fn default_busy_timeout_ms() -> u64 {
    5_000
}

/// Upper bound for a single store operation, round-trips included.
const fn default_operation_timeout_ms() -> u64 {
    10_000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Database file path, or `:memory:`.
    #[serde(default = "default_path")]
    pub path: String,

    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,

    #[serde(default = "default_operation_timeout_ms")]
    pub operation_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            busy_timeout_ms: default_busy_timeout_ms(),
            operation_timeout_ms: default_operation_timeout_ms(),
        }
    }
}

impl DatabaseConfig {
    /// Whether the database lives only in memory.
    pub fn is_in_memory(&self) -> bool {
        self.path == ":memory:"
    }

    pub const fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }

    pub const fn operation_timeout(&self) -> Duration {
        Duration::from_millis(self.operation_timeout_ms)
    }

    /// The busy timeout actually handed to SQLite.
    ///
    /// Local statements run synchronously, so a lock wait longer than the
    /// operation timeout would block past it. Capped at the operation timeout.
    pub fn lock_wait(&self) -> Duration {
        self.busy_timeout().min(self.operation_timeout())
    }
}
