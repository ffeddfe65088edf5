//! CLI argument parsing tests.

use clap::Parser;
use gogsapi::cli::{Cli, Command, SearchTarget, SortField};
use gogsapi::SortKey;

#[test]
fn test_cli_parses_user_subcommand() {
    let cli = Cli::parse_from(["gogsapi", "user", "alice"]);

    assert!(!cli.json);
    match cli.command {
        Command::User { name } => assert_eq!(name.as_deref(), Some("alice")),
        _ => panic!("Expected User command"),
    }
}

#[test]
fn test_user_name_is_optional() {
    let cli = Cli::parse_from(["gogsapi", "user"]);

    match cli.command {
        Command::User { name } => assert!(name.is_none()),
        _ => panic!("Expected User command"),
    }
}

#[test]
fn test_cli_parses_repos_subcommand() {
    let cli = Cli::parse_from([
        "gogsapi", "repos", "--owner", "bob", "--sort", "created", "--desc", "--limit", "2",
    ]);

    match cli.command {
        Command::Repos {
            owner,
            sort,
            desc,
            offset,
            limit,
        } => {
            assert_eq!(owner.as_deref(), Some("bob"));
            assert_eq!(sort, SortField::Created);
            assert!(desc);
            assert_eq!(offset, None);
            assert_eq!(limit, Some(2));
        }
        _ => panic!("Expected Repos command"),
    }
}

#[test]
fn test_repos_defaults() {
    let cli = Cli::parse_from(["gogsapi", "repos"]);

    match cli.command {
        Command::Repos { sort, desc, .. } => {
            assert_eq!(sort, SortField::Index);
            assert!(!desc);
        }
        _ => panic!("Expected Repos command"),
    }
}

#[test]
fn test_cli_parses_search_subcommand() {
    let cli = Cli::parse_from(["gogsapi", "search", "repos", "demo", "--limit", "5"]);

    match cli.command {
        Command::Search {
            target,
            query,
            limit,
        } => {
            assert_eq!(target, SearchTarget::Repos);
            assert_eq!(query, "demo");
            assert_eq!(limit, Some(5));
        }
        _ => panic!("Expected Search command"),
    }
}

#[test]
fn test_search_target_aliases() {
    let cli = Cli::parse_from(["gogsapi", "search", "user", "ali"]);

    match cli.command {
        Command::Search { target, .. } => assert_eq!(target, SearchTarget::Users),
        _ => panic!("Expected Search command"),
    }
}

#[test]
fn test_cli_parses_branches_subcommand() {
    let cli = Cli::parse_from(["gogsapi", "branches", "alice/demo"]);

    match cli.command {
        Command::Branches { repo } => assert_eq!(repo, "alice/demo"),
        _ => panic!("Expected Branches command"),
    }
}

#[test]
fn test_global_flags() {
    // --json before subcommand
    let cli = Cli::parse_from(["gogsapi", "--json", "orgs"]);
    assert!(cli.json);
    assert!(!cli.show_log);

    // flags after subcommand (global)
    let cli = Cli::parse_from(["gogsapi", "orgs", "alice", "--json", "--show-log"]);
    assert!(cli.json);
    assert!(cli.show_log);
}

#[test]
fn test_sort_field_maps_to_sort_key() {
    assert_eq!(SortKey::from(SortField::Index), SortKey::Index);
    assert_eq!(SortKey::from(SortField::Created), SortKey::Created);
    assert_eq!(SortKey::from(SortField::Updated), SortKey::Updated);
    assert_eq!(SortKey::from(SortField::Owner), SortKey::Owner);
}

#[test]
fn test_invalid_sort_rejected() {
    let result = Cli::try_parse_from(["gogsapi", "repos", "--sort", "stars"]);
    assert!(result.is_err());
}

#[test]
fn test_missing_subcommand_rejected() {
    let result = Cli::try_parse_from(["gogsapi"]);
    assert!(result.is_err());
}
