use clap::{Args, Subcommand};
use kotoba_core::enums::LinkTarget;

/// Useful link commands.
#[derive(Clone, Debug, Subcommand)]
pub enum LinkCommands {
    /// Add a link to a grammar point or a topic.
    Add {
        url: String,
        #[arg(long)]
        description: Option<String>,
        #[command(flatten)]
        target: LinkTargetArgs,
    },
    /// List the links of a grammar point or a topic.
    List {
        #[command(flatten)]
        target: LinkTargetArgs,
    },
}

#[derive(Clone, Copy, Debug, Args)]
#[group(required = true, multiple = false)]
pub struct LinkTargetArgs {
    #[arg(long)]
    pub grammar: Option<i64>,
    #[arg(long)]
    pub topic: Option<i64>,
}

impl LinkTargetArgs {
    /// The one reference clap let through.
    #[must_use]
    pub fn resolve(self) -> Option<(LinkTarget, i64)> {
        match (self.grammar, self.topic) {
            (Some(id), None) => Some((LinkTarget::Grammar, id)),
            (None, Some(id)) => Some((LinkTarget::Topic, id)),
            _ => None,
        }
    }
}
