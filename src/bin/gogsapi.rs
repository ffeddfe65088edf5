//! Gogs API CLI binary.
//!
//! A command-line interface for browsing a Gogs server.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use gogsapi::cli::{Cli, Command, SearchTarget, SortField};
use gogsapi::output::PrettyPrint;
use gogsapi::{
    Branch, Branches, GogsClient, GogsError, Org, Repo, RepoRef, Resource, ResourceCollection,
    SearchParams, User,
};
use serde_json::Value;
use tabled::{Table, Tabled};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let client = match GogsClient::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Hint: Set GOGS_API_TOKEN (and GOGS_API_URL) environment variables");
            return ExitCode::FAILURE;
        }
    };

    let show_log = cli.show_log;
    let result = run(&client, cli).await;

    if show_log {
        for line in client.log().lines() {
            eprintln!("{line}");
        }
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            if e.is_not_authorized() {
                eprintln!("Hint: the token may lack the rights for this operation");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(client: &GogsClient, cli: Cli) -> gogsapi::Result<()> {
    match cli.command {
        Command::User { name } => handle_user(client, name.as_deref(), cli.json).await,
        Command::Repos {
            owner,
            sort,
            desc,
            offset,
            limit,
        } => handle_repos(client, owner.as_deref(), sort, desc, offset, limit, cli.json).await,
        Command::Search {
            target,
            query,
            limit,
        } => handle_search(client, target, &query, limit, cli.json).await,
        Command::Branches { repo } => handle_branches(client, &repo, cli.json).await,
        Command::Orgs { user } => handle_orgs(client, user.as_deref(), cli.json).await,
    }
}

async fn handle_user(client: &GogsClient, name: Option<&str>, json: bool) -> gogsapi::Result<()> {
    let mut user = client.user(name.unwrap_or("me"));
    user.load(false).await?;
    output_single(&user, json)
}

async fn handle_repos(
    client: &GogsClient,
    owner: Option<&str>,
    sort: SortField,
    desc: bool,
    offset: Option<usize>,
    limit: Option<usize>,
    json: bool,
) -> gogsapi::Result<()> {
    let mut repos = match owner {
        Some(name) => client.user(name).repos(),
        None => client.repos(),
    };
    repos.load(false).await?;

    let mut view = repos.sort_by(sort.into(), desc).items().clone();
    if let Some(n) = offset {
        view = view.offset(n);
    }
    if let Some(n) = limit {
        view = view.limit(n);
    }

    output_list(view.values(), json, |x| RepoRow::from(x))
}

async fn handle_search(
    client: &GogsClient,
    target: SearchTarget,
    query: &str,
    limit: Option<usize>,
    json: bool,
) -> gogsapi::Result<()> {
    let mut params = SearchParams::new(query);
    params.limit = limit;

    match target {
        SearchTarget::Users => {
            let found = client.users().search(&params, false).await?;
            output_list(found.items().values(), json, |x| UserRow::from(x))
        }
        SearchTarget::Repos => {
            let found = client.repos().search(&params, false).await?;
            output_list(found.items().values(), json, |x| RepoRow::from(x))
        }
    }
}

async fn handle_branches(client: &GogsClient, repo: &str, json: bool) -> gogsapi::Result<()> {
    let repo = RepoRef::parse(repo).ok_or_else(|| GogsError::InvalidParam {
        name: "repo".to_string(),
        reason: format!("expected OWNER/REPO, got '{repo}'"),
    })?;

    let mut branches = Branches::new(client.transport(), repo);
    branches.load(false).await?;
    output_list(branches.items().values(), json, |x| BranchRow::from(x))
}

async fn handle_orgs(client: &GogsClient, user: Option<&str>, json: bool) -> gogsapi::Result<()> {
    let mut orgs = client.user(user.unwrap_or("me")).orgs();
    orgs.load(false).await?;
    output_list(orgs.items().values(), json, |x| OrgRow::from(x))
}

fn output_single<T: Resource + PrettyPrint>(item: &T, json: bool) -> gogsapi::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&item.to_json())?);
    } else {
        println!("{}", item.pretty_print());
    }
    Ok(())
}

fn output_list<'a, T, R, F>(
    items: impl Iterator<Item = &'a Arc<T>>,
    json: bool,
    to_row: F,
) -> gogsapi::Result<()>
where
    T: Resource + 'a,
    R: Tabled,
    F: Fn(&T) -> R,
{
    let items: Vec<&Arc<T>> = items.collect();
    if json {
        let values: Vec<Value> = items.iter().map(|item| item.to_json()).collect();
        println!("{}", serde_json::to_string_pretty(&values)?);
    } else {
        let rows: Vec<R> = items.iter().map(|item| to_row(&***item)).collect();
        let count = rows.len();
        println!("{}", Table::new(rows));
        println!("\n{count} entries");
    }
    Ok(())
}

// Table row types for non-JSON output

#[derive(Tabled)]
struct UserRow {
    id: String,
    username: String,
    full_name: String,
    email: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            id: u.id().map(|id| id.to_string()).unwrap_or_default(),
            username: u.username().unwrap_or_default().to_string(),
            full_name: u.full_name().unwrap_or_default().to_string(),
            email: u.email().unwrap_or_default().to_string(),
        }
    }
}

#[derive(Tabled)]
struct RepoRow {
    full_name: String,
    visibility: String,
    stars: i64,
    updated: String,
}

impl From<&Repo> for RepoRow {
    fn from(r: &Repo) -> Self {
        Self {
            full_name: r.full_name().unwrap_or_default().to_string(),
            visibility: if r.is_private() { "private" } else { "public" }.to_string(),
            stars: r.stars_count(),
            updated: r
                .updated_at()
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct BranchRow {
    name: String,
    commit: String,
}

impl From<&Branch> for BranchRow {
    fn from(b: &Branch) -> Self {
        Self {
            name: b.name().unwrap_or_default().to_string(),
            commit: b
                .commit_id()
                .map(|id| id.chars().take(10).collect())
                .unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct OrgRow {
    username: String,
    full_name: String,
    website: String,
}

impl From<&Org> for OrgRow {
    fn from(o: &Org) -> Self {
        Self {
            username: o.username().unwrap_or_default().to_string(),
            full_name: o.full_name().unwrap_or_default().to_string(),
            website: o.website().unwrap_or_default().to_string(),
        }
    }
}
