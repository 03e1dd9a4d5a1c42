//! Repository modules implementing the domain operations.
//!
//! Each module adds methods to `KotobaService` via `impl KotobaService` blocks.

pub mod classes;
pub mod contents;
pub mod progress;
pub mod textbooks;
pub mod users;
