//! Terminal front end for the to-do list.
//!
//! Reads commands from stdin and prints the rendered list after each one.
//! Configuration comes from `TODOLIST_*` environment variables and logging
//! from `RUST_LOG`.

use anyhow::Context;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use todolist::shell::{Command, TerminalConfirm, HELP};
use todolist::{Config, FileStorage, TodoEnvironment, TodoStore, View};
use todolist_core::environment::{AlwaysConfirm, Confirm, SystemClock};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they never interleave with the rendered list
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todolist=info,todolist_runtime=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = Config::from_env();
    tracing::info!(
        path = %config.storage_path.display(),
        key = %config.storage_key,
        "Starting todolist"
    );

    let storage = Arc::new(FileStorage::new(&config.storage_path));
    let env = TodoEnvironment::new(Arc::new(SystemClock), storage)
        .with_storage_key(config.storage_key.clone());
    let store = TodoStore::new(env);
    store.load().await.with_context(|| {
        format!("failed to load tasks from {}", config.storage_path.display())
    })?;

    let confirm: Arc<dyn Confirm> = if config.assume_yes {
        Arc::new(AlwaysConfirm(true))
    } else {
        Arc::new(TerminalConfirm)
    };
    let mut view = View::mount(store, confirm).await;
    println!("{view}");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        io::stdout().flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(e) => {
                eprintln!("{e}");
                continue;
            },
        };

        match command {
            Command::Quit => break,
            Command::Nothing => continue,
            Command::Help => {
                println!("{HELP}");
                continue;
            },
            Command::Html => {
                println!("{}", view.to_html());
                continue;
            },
            Command::Show => {},
            other => {
                for event in other.into_events() {
                    view.dispatch(event).await?;
                }
            },
        }
        println!("{view}");
    }

    Ok(())
}
