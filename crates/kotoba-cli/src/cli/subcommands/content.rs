use clap::Subcommand;

/// Vocabulary commands.
#[derive(Clone, Debug, Subcommand)]
pub enum WordCommands {
    /// Add a word.
    Add {
        /// Reading in hiragana or katakana.
        kana: String,
        #[arg(long)]
        translation: Option<String>,
        #[arg(long)]
        kanji: Option<String>,
        #[arg(long)]
        example: Option<String>,
        /// Lesson the word was introduced in.
        #[arg(long)]
        lesson: Option<i64>,
    },
    /// Find the word with this kana whose translation contains a fragment.
    Search {
        kana: String,
        #[arg(default_value = "")]
        translation: String,
    },
    /// Get a word by ID.
    Get { id: i64 },
}

/// Grammar point commands.
#[derive(Clone, Debug, Subcommand)]
pub enum GrammarCommands {
    /// Create a grammar point.
    Create {
        #[arg(long)]
        russian: String,
        #[arg(long)]
        japanese: Option<String>,
        #[arg(long)]
        lesson: i64,
    },
}

/// Topic commands.
#[derive(Clone, Debug, Subcommand)]
pub enum TopicCommands {
    /// Create a topic.
    Create {
        #[arg(long)]
        russian: String,
        #[arg(long)]
        japanese: Option<String>,
        #[arg(long)]
        lesson: i64,
    },
}
