//! # kotoba-core
//!
//! Core types and pure helpers for Kotoba, a language-learning tracker.
//!
//! This crate provides the foundational types shared across all Kotoba crates:
//! - Entity structs for every table (users, textbooks, lessons, classes, words,
//!   grammar, topics, useful links and the association rows between them)
//! - Insert payloads (`New*`) that validate their input on construction
//! - The `EntityKind` enum naming every entity type
//! - Slug derivation (`slug::slugify`)
//! - Cross-cutting error types
//! - CLI response types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod responses;
pub mod slug;
pub mod validate;
