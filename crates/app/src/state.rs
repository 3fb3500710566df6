//! Application state
//!
//! Assembles store, data source and repository once at startup.

use std::sync::Arc;

use tasks_core::data::{DefaultTasksRepository, LocalTasksDataSource, TasksRepository};
use tasks_core::store::TaskStore;
use tokio::runtime::Handle;
use tracing::info;

use crate::config::AppConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    repository: Arc<dyn TasksRepository>,
}

impl AppState {
    /// Open the configured store and wire the repository to `runtime`
    pub async fn new(config: &AppConfig, runtime: Handle) -> tasks_core::Result<Self> {
        let store = if config.in_memory {
            info!("Using in-memory task database");
            TaskStore::open_in_memory()?
        } else {
            let path = config.database_path();
            runtime
                .spawn_blocking(move || TaskStore::open(path))
                .await??
        };
        let data_source = Arc::new(LocalTasksDataSource::new(Arc::new(store), runtime.clone()));
        let repository: Arc<dyn TasksRepository> =
            Arc::new(DefaultTasksRepository::new(data_source, runtime));

        Ok(Self {
            inner: Arc::new(AppStateInner { repository }),
        })
    }

    /// Get the repository handed to presentation
    pub fn repository(&self) -> Arc<dyn TasksRepository> {
        Arc::clone(&self.inner.repository)
    }
}
