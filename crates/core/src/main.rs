#![forbid(unsafe_code)]

use std::sync::Arc;

use anyhow::{bail, Context};
use prompt_manager_core::{
    actions::PromptActions,
    config::Config,
    db::SqliteStore,
    logging, server,
    ui::{render, ListView},
};
use tracing::info;

const USAGE: &str = "\
Usage: prompt-manager [COMMAND]

Commands:
  serve   Run the WebSocket server until Ctrl-C (default)
  list    Print the prompt list once and exit
  home    Print the landing page
  help    Show this message

Environment:
  PROMPT_MANAGER_CONFIG      JSON file of defaults, overridden by the rest
  PROMPT_MANAGER_DB          SQLite database path
  PROMPT_MANAGER_BIND        Bind address (default 127.0.0.1:0)
  PROMPT_MANAGER_TIMEOUT_MS  Store call timeout in milliseconds
  PROMPT_MANAGER_LOG_FORMAT  plain | json
  PROMPT_MANAGER_LOCKFILE_DIR  Directory for <port>.json lockfiles
";

async fn open_actions(config: &Config) -> anyhow::Result<PromptActions> {
    let store = SqliteStore::open(&config.database_path)
        .await
        .with_context(|| format!("opening {}", config.database_path.display()))?;
    Ok(PromptActions::from_config(Arc::new(store), config))
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let actions = open_actions(&config).await?;
    let handle = server::start(&config, actions).await?;

    println!("listening on {}", handle.local_addr());
    println!("lockfile: {}", handle.lockfile_path().display());

    tokio::signal::ctrl_c().await.context("waiting for Ctrl-C")?;
    info!("shutdown requested");
    handle.stop().await;
    Ok(())
}

async fn list(config: Config) -> anyhow::Result<()> {
    let actions = open_actions(&config).await?;
    let mut view = ListView::new(actions);
    view.mount().await;
    println!("{}", render::render_page(&view));
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    logging::init(&config);

    let command = std::env::args().nth(1).unwrap_or_else(|| "serve".to_string());
    match command.as_str() {
        "serve" => serve(config).await,
        "list" => list(config).await,
        "home" => {
            println!("{}", render::render_landing());
            Ok(())
        },
        "help" | "-h" | "--help" => {
            print!("{USAGE}");
            Ok(())
        },
        other => {
            eprint!("{USAGE}");
            bail!("unknown command: {other}")
        },
    }
}
