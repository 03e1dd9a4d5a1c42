use clap::Subcommand;

/// Textbook commands.
#[derive(Clone, Debug, Subcommand)]
pub enum TextbookCommands {
    /// Create a textbook.
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        slug: Option<String>,
    },
    /// List textbooks.
    List,
}

/// Lesson commands.
#[derive(Clone, Debug, Subcommand)]
pub enum LessonCommands {
    /// Create one lesson.
    Create {
        #[arg(long)]
        textbook: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        slug: Option<String>,
    },
    /// Create several lessons at once; all or nothing.
    CreateMany {
        #[arg(long)]
        textbook: i64,
        /// Lesson name (repeatable, kept in order).
        #[arg(long = "name", required = true)]
        names: Vec<String>,
    },
    /// List the lessons of a textbook.
    List {
        #[arg(long)]
        textbook: i64,
    },
}
