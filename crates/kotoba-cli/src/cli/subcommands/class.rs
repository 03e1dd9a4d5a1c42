use chrono::NaiveDate;
use clap::{Args, Subcommand};

/// Class commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ClassCommands {
    /// Create a class (one per user and date).
    Create {
        /// Class date, `YYYY-MM-DD`.
        #[arg(long)]
        date: NaiveDate,
        #[arg(long)]
        name: String,
        #[arg(long)]
        plan: Option<String>,
        #[arg(long)]
        homework: Option<String>,
        #[arg(long)]
        questions: Option<String>,
        /// User ID (defaults to the logged-in user).
        #[arg(long)]
        user: Option<i64>,
    },
    /// List a user's classes with their material.
    List {
        #[arg(long)]
        user: Option<i64>,
    },
    /// Show one class with its material.
    Get { id: i64 },
    /// Attach a word, grammar point, topic or user-lesson to a class.
    Attach {
        /// Class ID.
        class: i64,
        #[command(flatten)]
        material: MaterialArgs,
    },
    /// Detach material from a class.
    Detach {
        class: i64,
        #[command(flatten)]
        material: MaterialArgs,
    },
}

#[derive(Clone, Copy, Debug, Args)]
#[group(required = true, multiple = false)]
pub struct MaterialArgs {
    #[arg(long)]
    pub word: Option<i64>,
    #[arg(long)]
    pub grammar: Option<i64>,
    #[arg(long)]
    pub topic: Option<i64>,
    #[arg(long)]
    pub user_lesson: Option<i64>,
}

/// One piece of class material, by ID.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Material {
    Word(i64),
    Grammar(i64),
    Topic(i64),
    UserLesson(i64),
}

impl MaterialArgs {
    #[must_use]
    pub fn resolve(self) -> Option<Material> {
        match (self.word, self.grammar, self.topic, self.user_lesson) {
            (Some(id), None, None, None) => Some(Material::Word(id)),
            (None, Some(id), None, None) => Some(Material::Grammar(id)),
            (None, None, Some(id), None) => Some(Material::Topic(id)),
            (None, None, None, Some(id)) => Some(Material::UserLesson(id)),
            _ => None,
        }
    }
}
