//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the gogsapi binary.

use clap::{Parser, Subcommand, ValueEnum};

use crate::SortKey;

/// Gogs API command-line interface.
#[derive(Parser, Debug)]
#[command(name = "gogsapi", about = "Gogs API CLI", version)]
pub struct Cli {
    /// Output results as JSON instead of a table.
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Print the request log to stderr when done.
    #[arg(long, global = true, default_value = "false")]
    pub show_log: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show a user (the authenticated user when NAME is omitted).
    User {
        /// Username.
        name: Option<String>,
    },

    /// List repositories.
    Repos {
        /// List another user's repositories instead of your own.
        #[arg(long)]
        owner: Option<String>,

        /// Sort order.
        #[arg(long, value_enum, default_value = "index")]
        sort: SortField,

        /// Reverse the sort order.
        #[arg(long, default_value = "false")]
        desc: bool,

        /// Skip this many entries.
        #[arg(long)]
        offset: Option<usize>,

        /// Show at most this many entries.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Search users or repositories on the server.
    Search {
        /// What to search.
        target: SearchTarget,

        /// Text to look for.
        query: String,

        /// Maximum number of results.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// List the branches of a repository.
    Branches {
        /// Repository as OWNER/REPO.
        repo: String,
    },

    /// List organizations (your own when USER is omitted).
    Orgs {
        /// Username.
        user: Option<String>,
    },
}

/// Named sort orders for repository listings.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortField {
    /// Key order (full name).
    Index,
    /// Creation date, oldest first.
    Created,
    /// Last update, oldest first.
    Updated,
    /// Owner username.
    Owner,
}

impl From<SortField> for SortKey {
    fn from(field: SortField) -> Self {
        match field {
            SortField::Index => SortKey::Index,
            SortField::Created => SortKey::Created,
            SortField::Updated => SortKey::Updated,
            SortField::Owner => SortKey::Owner,
        }
    }
}

/// Entity types the server can search.
#[derive(ValueEnum, Clone, Debug, PartialEq, Eq)]
pub enum SearchTarget {
    /// User accounts.
    #[value(alias = "user")]
    Users,
    /// Repositories.
    #[value(alias = "repo")]
    Repos,
}
