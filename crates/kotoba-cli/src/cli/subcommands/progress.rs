use clap::Subcommand;

/// Completion tracking commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ProgressCommands {
    /// Show every enrolled textbook with its lessons.
    Show {
        /// User ID (defaults to the logged-in user).
        #[arg(long)]
        user: Option<i64>,
    },
    /// Mark a user-lesson as completed.
    Lesson {
        /// User-lesson ID.
        id: i64,
        /// Clear the flag instead.
        #[arg(long)]
        undo: bool,
    },
    /// Mark a user-textbook as completed.
    Textbook {
        /// User-textbook ID.
        id: i64,
        /// Clear the flag instead.
        #[arg(long)]
        undo: bool,
    },
}
