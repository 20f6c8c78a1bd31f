mod cache;
mod config;
mod service;
mod state;
mod storage;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::{json, Value};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use academia_core::academic::Entity;
use academia_core::storage::{clauses_from_shorthand, FilterClause, PageRequest, ShorthandMode};

use crate::{config::Config, service::AcademicService, state::AppState};

/// Academia - universities, faculties and specialties behind a cache
#[derive(Parser, Debug)]
#[command(name = "academia")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the SQLite database file
    #[arg(long, env = "SQLITE_PATH")]
    sqlite_path: Option<String>,

    #[command(subcommand)]
    entity: EntityCommand,
}

#[derive(Subcommand, Debug)]
enum EntityCommand {
    /// Manage universities
    University {
        #[command(subcommand)]
        action: Action,
    },
    /// Manage faculties
    Faculty {
        #[command(subcommand)]
        action: Action,
    },
    /// Manage specialties
    Specialty {
        #[command(subcommand)]
        action: Action,
    },
}

#[derive(Subcommand, Debug)]
enum Action {
    /// List one page of records
    List(ListArgs),
    /// Show a single record
    Get { id: i64 },
    /// Create a record from a JSON payload
    Create {
        #[arg(long)]
        data: String,
    },
    /// Apply a partial JSON update to a record
    Update {
        id: i64,
        #[arg(long)]
        data: String,
    },
    /// Delete a record and everything it owns
    Delete { id: i64 },
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Page number, starting at 1
    #[arg(long, default_value_t = 1)]
    page: u32,

    /// Records per page
    #[arg(long, default_value_t = PageRequest::DEFAULT_PER_PAGE)]
    per_page: u32,

    /// Field filter as key=value (repeatable)
    #[arg(long = "filter", value_parser = parse_key_value)]
    filters: Vec<(String, String)>,

    /// Match --filter values as case-insensitive substrings
    #[arg(long)]
    contains: bool,

    /// JSON array of {"field", "op", "value"} clauses
    #[arg(long = "where")]
    where_clauses: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut config = Config::from_env();
    if let Some(path) = cli.sqlite_path {
        config.sqlite_path = path;
    }

    let state = AppState::new(&config).await?;

    match cli.entity {
        EntityCommand::University { action } => run(&state.universities, action).await,
        EntityCommand::Faculty { action } => run(&state.faculties, action).await,
        EntityCommand::Specialty { action } => run(&state.specialties, action).await,
    }
}

/// Logs go to stderr so stdout only carries results.
fn init_tracing() {
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "academia=info".into()),
        )
        .with(json_logs.then(|| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
        }))
        .with((!json_logs).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();
}

async fn run<E: Entity>(service: &AcademicService<E>, action: Action) -> Result<()> {
    match action {
        Action::List(args) => {
            let filters = list_filters(&args)?;
            let page = PageRequest::new(args.page, args.per_page)?;
            print_json(&service.list(&filters, page).await?)
        }
        Action::Get { id } => match service.get(id).await? {
            Some(record) => print_json(&record),
            None => bail!("{} {} not found", E::KIND, id),
        },
        Action::Create { data } => {
            let request: E::Create =
                serde_json::from_str(&data).context("Invalid --data payload")?;
            print_json(&service.create(&request).await?)
        }
        Action::Update { id, data } => {
            let request: E::Update =
                serde_json::from_str(&data).context("Invalid --data payload")?;
            match service.update(id, &request).await? {
                Some(record) => print_json(&record),
                None => bail!("{} {} not found", E::KIND, id),
            }
        }
        Action::Delete { id } => {
            let outcome = service.delete(id).await?;
            let removed: Vec<Value> = outcome
                .removed()
                .iter()
                .map(|(kind, id)| json!({ "entity": kind, "id": id }))
                .collect();
            print_json(&json!({ "removed": removed }))
        }
    }
}

/// Combines `--filter` shorthands with the `--where` clause list. Every
/// `--filter` becomes its own clause, so repeating a key narrows the result.
fn list_filters(args: &ListArgs) -> Result<Vec<FilterClause>> {
    let mode = if args.contains {
        ShorthandMode::Contains
    } else {
        ShorthandMode::Exact
    };
    let mut filters = clauses_from_shorthand(
        args.filters
            .iter()
            .map(|(key, value)| (key.as_str(), shorthand_value(value))),
        mode,
    )?;

    if let Some(raw) = &args.where_clauses {
        let clauses: Vec<FilterClause> =
            serde_json::from_str(raw).context("Invalid --where clauses")?;
        filters.extend(clauses);
    }

    Ok(filters)
}

/// Integers and booleans keep their JSON type; anything else is text.
fn shorthand_value(raw: &str) -> Value {
    match serde_json::from_str::<Value>(raw) {
        Ok(value @ (Value::Number(_) | Value::Bool(_))) => value,
        _ => Value::String(raw.to_string()),
    }
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected key=value, got '{raw}'")),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
