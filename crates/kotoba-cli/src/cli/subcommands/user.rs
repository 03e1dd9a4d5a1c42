use clap::{Args, Subcommand};

/// Account commands.
#[derive(Clone, Debug, Subcommand)]
pub enum UserCommands {
    /// Create an account.
    Register(UserRegisterArgs),
    /// Log in and store the access token.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Clear the stored access token.
    Logout,
    /// Show the logged-in user.
    Me,
    /// List users.
    List,
    /// Get a user by ID.
    Get { id: i64 },
    /// Delete the one user with this name, with everything they own.
    Delete { name: String },
    /// Delete every user matching all given filters.
    DeleteMany {
        /// Match any of these emails (repeatable).
        #[arg(long = "email")]
        emails: Vec<String>,
        /// Match any of these names (repeatable).
        #[arg(long = "name")]
        names: Vec<String>,
        /// Match any of these IDs (repeatable).
        #[arg(long = "id")]
        ids: Vec<i64>,
    },
}

#[derive(Clone, Debug, Args)]
pub struct UserRegisterArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub password: String,
    /// Explicit slug (derived from the name when omitted).
    #[arg(long)]
    pub slug: Option<String>,
}
