use clap::{Args, Subcommand};

use crate::cli::subcommands::{
    ClassCommands, GrammarCommands, LessonCommands, LinkCommands, ProgressCommands,
    TextbookCommands, TopicCommands, UserCommands, WordCommands,
};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Accounts and login.
    User {
        #[command(subcommand)]
        action: UserCommands,
    },
    /// Textbooks.
    Textbook {
        #[command(subcommand)]
        action: TextbookCommands,
    },
    /// Lessons of a textbook.
    Lesson {
        #[command(subcommand)]
        action: LessonCommands,
    },
    /// Enroll in a textbook: one progress row per lesson.
    Enroll(EnrollArgs),
    /// Completion tracking.
    Progress {
        #[command(subcommand)]
        action: ProgressCommands,
    },
    /// Classes and what was studied in them.
    Class {
        #[command(subcommand)]
        action: ClassCommands,
    },
    /// Vocabulary.
    Word {
        #[command(subcommand)]
        action: WordCommands,
    },
    /// Grammar points.
    Grammar {
        #[command(subcommand)]
        action: GrammarCommands,
    },
    /// Conversation topics.
    Topic {
        #[command(subcommand)]
        action: TopicCommands,
    },
    /// Useful links for grammar points and topics.
    Link {
        #[command(subcommand)]
        action: LinkCommands,
    },
    /// Print the JSON schema of an entity.
    Schema(SchemaArgs),
}

#[derive(Clone, Debug, Args)]
pub struct EnrollArgs {
    /// Textbook ID.
    pub textbook: i64,
    /// User ID (defaults to the logged-in user).
    #[arg(long)]
    pub user: Option<i64>,
}

#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// Entity kind, e.g. `word` or `user_lesson`.
    pub entity: String,
}
