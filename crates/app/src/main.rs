//! Tasks host
//!
//! Composition root for the to-do list. Opens the task database, wires the
//! repository and follows the task list through a headless view model,
//! logging every change until interrupted.

mod config;
mod state;

use anyhow::Context;
use tasks_core::presentation::TasksViewModel;
use tasks_core::task::Task;
use tokio::runtime::Handle;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::AppConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tasks_app=debug,tasks_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env();
    tracing::info!("Using data directory: {:?}", config.data_dir);

    let app_state = AppState::new(&config, Handle::current())
        .await
        .context("Failed to initialize application state")?;

    let view_model = TasksViewModel::new(app_state.repository());
    view_model.load_tasks(true).await;

    let mut items = view_model.items();
    let mut snackbar = view_model.snackbar_text();
    log_items(&items.borrow_and_update());

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            changed = items.changed() => {
                if changed.is_err() {
                    break;
                }
                log_items(&items.borrow_and_update());
            }
            changed = snackbar.changed() => {
                if changed.is_err() {
                    break;
                }
                let message = snackbar
                    .borrow_and_update()
                    .as_ref()
                    .and_then(|event| event.content_if_not_handled().copied());
                if let Some(message) = message {
                    tracing::info!("{}", message);
                }
            }
            result = &mut shutdown => {
                result.context("Failed to listen for shutdown signal")?;
                tracing::info!("Shutting down");
                break;
            }
        }
    }

    Ok(())
}

fn log_items(tasks: &[Task]) {
    let active = tasks.iter().filter(|t| t.is_active()).count();
    tracing::info!(
        "{} tasks ({} active, {} completed)",
        tasks.len(),
        active,
        tasks.len() - active
    );
    for task in tasks {
        let mark = if task.completed { "x" } else { " " };
        tracing::debug!("[{}] {} {}", mark, task.id, task.title);
    }
}
