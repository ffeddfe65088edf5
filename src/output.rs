//! Output formatting for CLI display.
//!
//! Provides the [`PrettyPrint`] trait for human-readable output
//! as an alternative to JSON serialization.

use crate::{Branch, Org, Repo, Token, User};

/// Trait for human-readable key-value output.
///
/// Implemented by entity types to provide formatted output
/// suitable for terminal display when `--json` is not specified.
pub trait PrettyPrint {
    /// Returns a formatted string for terminal display.
    fn pretty_print(&self) -> String;
}

fn header(kind: &str, title: &str) -> Vec<String> {
    let header = format!("{kind}: {title}");
    let divider = "─".repeat(header.chars().count().max(30));
    vec![header, divider]
}

impl PrettyPrint for User {
    fn pretty_print(&self) -> String {
        let mut lines = header("User", self.username().unwrap_or("(unknown)"));

        if let Some(id) = self.id() {
            lines.push(format!("ID:             {id}"));
        }

        if let Some(name) = self.full_name().filter(|n| !n.is_empty()) {
            lines.push(format!("Full Name:      {name}"));
        }

        if let Some(email) = self.email() {
            lines.push(format!("Email:          {email}"));
        }

        if let Some(avatar) = self.avatar_url() {
            lines.push(format!("Avatar:         {avatar}"));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for Org {
    fn pretty_print(&self) -> String {
        let mut lines = header("Organization", self.username().unwrap_or("(unknown)"));

        if let Some(name) = self.full_name().filter(|n| !n.is_empty()) {
            lines.push(format!("Full Name:      {name}"));
        }

        if let Some(description) = self.description().filter(|d| !d.is_empty()) {
            lines.push(format!("Description:    {description}"));
        }

        if let Some(website) = self.website().filter(|w| !w.is_empty()) {
            lines.push(format!("Website:        {website}"));
        }

        if let Some(location) = self.location().filter(|l| !l.is_empty()) {
            lines.push(format!("Location:       {location}"));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for Repo {
    fn pretty_print(&self) -> String {
        let title = self
            .full_name()
            .or_else(|| self.name())
            .unwrap_or("(unknown)");
        let mut lines = header("Repository", title);

        if let Some(description) = self.description().filter(|d| !d.is_empty()) {
            lines.push(format!("Description:    {description}"));
        }

        lines.push(format!(
            "Visibility:     {}",
            if self.is_private() { "private" } else { "public" }
        ));

        if self.is_mirror() {
            lines.push("Mirror:         yes".to_string());
        }

        if self.is_fork() {
            lines.push("Fork:           yes".to_string());
        }

        if let Some(branch) = self.default_branch() {
            lines.push(format!("Default Branch: {branch}"));
        }

        lines.push(format!("Stars:          {}", self.stars_count()));

        if let Some(created) = self.created_at() {
            lines.push(format!("Created:        {}", created.format("%Y-%m-%d %H:%M:%S %z")));
        }

        if let Some(updated) = self.updated_at() {
            lines.push(format!("Updated:        {}", updated.format("%Y-%m-%d %H:%M:%S %z")));
        }

        if let Some(url) = self.clone_url() {
            lines.push(format!("Clone URL:      {url}"));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for Branch {
    fn pretty_print(&self) -> String {
        let mut lines = header("Branch", self.name().unwrap_or("(unknown)"));
        lines.push(format!("Repository:     {}", self.repo().full_name()));

        if let Some(id) = self.commit_id() {
            lines.push(format!("Commit:         {id}"));
        }

        if let Some(message) = self.commit_message() {
            lines.push(format!("Message:        {}", message.trim_end()));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for Token {
    fn pretty_print(&self) -> String {
        let mut lines = header("Token", self.name().unwrap_or("(unnamed)"));

        if let Some(sha1) = self.sha1() {
            lines.push(format!("SHA1:           {sha1}"));
        }

        lines.join("\n")
    }
}
