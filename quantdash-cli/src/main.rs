//! QuantDash CLI — list, inspect, compare and delete backtest tasks.
//!
//! Commands:
//! - `tasks` — refresh and list every task
//! - `show <id>` — result detail for one task, plus a summary for multi-symbol tasks
//! - `compare <id>...` — up to four tasks side by side
//! - `status <id>` — live status of one task, straight from the backend
//! - `delete <id>` — remove a task on the backend
//!
//! Listing commands never fail on an unreachable or misconfigured backend:
//! they print demo data and an advisory on stderr.

mod render;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use quantdash_core::config::{default_config_path, QuantDashConfig};
use quantdash_core::source::{HttpResultSource, OfflineSource};
use quantdash_core::{CompareOutcome, ResultSource, ResultsStore, MAX_COMPARE};

#[derive(Parser)]
#[command(
    name = "quantdash",
    about = "QuantDash CLI — backtest results from the command line",
    version
)]
struct Cli {
    /// Config file. Defaults to <config dir>/quantdash/config.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL; overrides the config file and QUANTDASH_API_URL.
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Offline mode: no network access, demo data only.
    #[arg(long, global = true, default_value_t = false)]
    offline: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Refresh and list all tasks.
    Tasks {
        /// Print the task list as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Show the result of one task.
    Show {
        task_id: String,

        /// Print the task's results as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Compare up to four tasks side by side.
    Compare {
        #[arg(required = true)]
        task_ids: Vec<String>,
    },
    /// Show the live status of one task.
    Status { task_id: String },
    /// Delete a task on the backend.
    Delete { task_id: String },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Tasks { json } => run_tasks(&config, cli.offline, json),
        Commands::Show { task_id, json } => run_show(&config, cli.offline, &task_id, json),
        Commands::Compare { task_ids } => run_compare(&config, cli.offline, &task_ids),
        Commands::Status { task_id } => run_status(&config, cli.offline, &task_id),
        Commands::Delete { task_id } => run_delete(&config, cli.offline, &task_id),
    }
}

fn load_config(cli: &Cli) -> Result<QuantDashConfig> {
    let path = cli.config.clone().unwrap_or_else(default_config_path);
    let mut config = QuantDashConfig::load_or_default(&path)
        .with_context(|| format!("loading {}", path.display()))?
        .with_env_overrides();
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }
    Ok(config)
}

/// Source for listing commands. An unusable base URL degrades to offline.
fn listing_source(config: &QuantDashConfig, offline: bool) -> Box<dyn ResultSource> {
    if offline {
        return Box::new(OfflineSource);
    }
    match HttpResultSource::new(&config.api) {
        Ok(source) => {
            log::debug!("using backend {}", source.base_url());
            Box::new(source)
        }
        Err(err) => {
            eprintln!("warning: {err}; running offline");
            Box::new(OfflineSource)
        }
    }
}

/// Build a store and run one refresh against the configured source.
fn refreshed_store(config: &QuantDashConfig, offline: bool) -> ResultsStore {
    let mut store = ResultsStore::new();
    let source = listing_source(config, offline);
    store.refresh_data(&*source);
    log::debug!(
        "refresh finished: {} tasks, {} results, phase {:?}",
        store.tasks().len(),
        store.results().len(),
        store.phase()
    );
    if let Some(advisory) = store.error() {
        eprintln!("warning: {advisory}");
    }
    store
}

fn run_tasks(config: &QuantDashConfig, offline: bool, json: bool) -> Result<()> {
    let store = refreshed_store(config, offline);
    if json {
        println!("{}", serde_json::to_string_pretty(store.tasks())?);
    } else {
        print!("{}", render::tasks_table(store.tasks()));
    }
    Ok(())
}

fn run_show(config: &QuantDashConfig, offline: bool, task_id: &str, json: bool) -> Result<()> {
    let mut store = refreshed_store(config, offline);
    if !store.select_task(task_id) {
        match store.task(task_id) {
            Some(task) => bail!("task {task_id} is {} and has no results yet", task.status),
            None => bail!("unknown task: {task_id}"),
        }
    }

    let all: Vec<_> = store.selected_results().into_iter().cloned().collect();
    if json {
        println!("{}", serde_json::to_string_pretty(&all)?);
        return Ok(());
    }
    // select_task returned true, so a result is resolved.
    if let Some(selected) = store.selected_result() {
        print!("{}", render::result_detail(selected, &all));
    }
    Ok(())
}

fn run_compare(config: &QuantDashConfig, offline: bool, task_ids: &[String]) -> Result<()> {
    let mut store = refreshed_store(config, offline);
    store.toggle_compare_mode();

    for id in task_ids {
        match store.add_to_compare(id.as_str()) {
            CompareOutcome::Added => {
                if store.task(id).is_none() {
                    eprintln!("warning: unknown task {id}");
                }
            }
            CompareOutcome::AlreadyPresent => eprintln!("skipped {id}: listed twice"),
            CompareOutcome::AtCapacity => {
                eprintln!("skipped {id}: at most {MAX_COMPARE} tasks can be compared")
            }
        }
    }

    print!("{}", render::compare_table(&store.compare_results()));
    Ok(())
}

fn run_status(config: &QuantDashConfig, offline: bool, task_id: &str) -> Result<()> {
    if offline {
        bail!("status needs the backend; drop --offline");
    }
    let source = HttpResultSource::new(&config.api)?;
    let task = source
        .task_status(task_id)
        .with_context(|| format!("fetching status of {task_id} from {}", source.base_url()))?;
    print!("{}", render::task_status(&task));
    Ok(())
}

fn run_delete(config: &QuantDashConfig, offline: bool, task_id: &str) -> Result<()> {
    if offline {
        bail!("delete needs the backend; drop --offline");
    }
    let source = HttpResultSource::new(&config.api)?;
    source
        .delete_task(task_id)
        .with_context(|| format!("deleting {task_id}"))?;
    println!("Deleted {task_id}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["quantdash", "tasks", "--offline", "--json"]).unwrap();
        assert!(cli.offline);
        assert!(matches!(cli.command, Commands::Tasks { json: true }));
    }

    #[test]
    fn compare_requires_ids() {
        assert!(Cli::try_parse_from(["quantdash", "compare"]).is_err());
        let cli = Cli::try_parse_from(["quantdash", "compare", "a", "b", "c", "d", "e"]).unwrap();
        match cli.command {
            Commands::Compare { task_ids } => assert_eq!(task_ids.len(), 5),
            _ => panic!("expected compare"),
        }
    }

    #[test]
    fn api_url_flag_overrides_config() {
        let cli = Cli::try_parse_from([
            "quantdash",
            "--api-url",
            "http://10.0.0.5:8000/api",
            "--config",
            "/nonexistent/quantdash.toml",
            "tasks",
        ])
        .unwrap();
        let config = load_config(&cli).unwrap();
        assert_eq!(config.api.base_url, "http://10.0.0.5:8000/api");
    }

    #[test]
    fn offline_show_resolves_demo_task() {
        let config = QuantDashConfig::default();
        let mut store = refreshed_store(&config, true);
        assert!(store.select_task("demo_task_1"));
        assert_eq!(store.selected_result().unwrap().symbol, "BTCUSDT");
    }

    #[test]
    fn malformed_api_url_falls_back_to_demo_data() {
        let mut config = QuantDashConfig::default();
        config.api.base_url = "not a url".into();
        let store = refreshed_store(&config, false);
        assert!(store.is_fallback());
        assert_eq!(store.tasks().len(), 2);
        assert!(run_tasks(&config, false, true).is_ok());
    }

    #[test]
    fn status_subcommand_parses() {
        let cli = Cli::try_parse_from(["quantdash", "status", "t1"]).unwrap();
        assert!(matches!(cli.command, Commands::Status { task_id } if task_id == "t1"));
    }

    #[test]
    fn offline_status_is_refused() {
        let config = QuantDashConfig::default();
        assert!(run_status(&config, true, "demo_task_1").is_err());
    }

    #[test]
    fn offline_delete_is_refused() {
        let config = QuantDashConfig::default();
        assert!(run_delete(&config, true, "demo_task_1").is_err());
    }
}
