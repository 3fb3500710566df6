//! SQLite-backed task store
//!
//! Every method is synchronous and holds the connection lock for its whole
//! duration. Writes that change at least one row re-read the table and push
//! the result to the observable query before releasing the lock, so
//! subscribers see snapshots in commit order.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension, Row};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::query::{Snapshot, TaskQuery};
use crate::task::Task;
use crate::{Error, Result};

/// Version written to `PRAGMA user_version` for the current table layout
pub const SCHEMA_VERSION: i32 = 1;

const SCHEMA_TASKS: &str = "CREATE TABLE IF NOT EXISTS tasks (
    id TEXT NOT NULL PRIMARY KEY,
    title TEXT NOT NULL,
    is_completed INTEGER NOT NULL DEFAULT 0
);";
const INSERT_TASK: &str = "INSERT OR REPLACE INTO tasks (id, title, is_completed) VALUES (?1, ?2, ?3)";
const SELECT_TASKS: &str = "SELECT id, title, is_completed FROM tasks ORDER BY rowid";
const SELECT_TASK_BY_ID: &str = "SELECT id, title, is_completed FROM tasks WHERE id = ?1";
const UPDATE_COMPLETED: &str = "UPDATE tasks SET is_completed = ?2 WHERE id = ?1";
const DELETE_TASK: &str = "DELETE FROM tasks WHERE id = ?1";
const DELETE_COMPLETED_TASKS: &str = "DELETE FROM tasks WHERE is_completed = 1";

/// Single-table task storage
pub struct TaskStore {
    conn: Mutex<Connection>,
    snapshots: watch::Sender<Snapshot>,
    /// Set when a write landed while nobody was subscribed
    stale: AtomicBool,
}

impl TaskStore {
    /// Open (or create) the database file at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        let store = Self::with_connection(conn)?;
        info!("Opened task database at {}", path.display());
        Ok(store)
    }

    /// Open a private in-memory database; contents vanish on drop
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        migrate(&conn)?;
        let initial = query_tasks(&conn)?;
        let (snapshots, _) = watch::channel(Ok(initial));

        Ok(Self {
            conn: Mutex::new(conn),
            snapshots,
            stale: AtomicBool::new(false),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| Error::Storage("task database lock poisoned".to_string()))
    }

    /// Insert a task, replacing every field of an existing record with the same id
    pub fn insert_task(&self, task: &Task) -> Result<()> {
        let conn = self.lock()?;
        let changed = conn.execute(INSERT_TASK, params![task.id, task.title, task.completed])?;
        debug!("Saved task {}", task.id);
        self.invalidate(&conn, changed);
        Ok(())
    }

    /// All stored tasks in row order
    pub fn get_tasks(&self) -> Result<Vec<Task>> {
        let conn = self.lock()?;
        query_tasks(&conn)
    }

    /// The task with `id`, or `None` when absent
    pub fn get_task_by_id(&self, id: &str) -> Result<Option<Task>> {
        let conn = self.lock()?;
        let task = conn
            .query_row(SELECT_TASK_BY_ID, params![id], task_from_row)
            .optional()?;
        Ok(task)
    }

    /// Set the completion flag; unknown ids are ignored
    pub fn update_completed(&self, id: &str, completed: bool) -> Result<()> {
        let conn = self.lock()?;
        let changed = conn.execute(UPDATE_COMPLETED, params![id, completed])?;
        debug!("Set completed={} on task {} ({} row)", completed, id, changed);
        self.invalidate(&conn, changed);
        Ok(())
    }

    /// Remove one task; unknown ids are ignored
    pub fn delete_task_by_id(&self, id: &str) -> Result<()> {
        let conn = self.lock()?;
        let changed = conn.execute(DELETE_TASK, params![id])?;
        debug!("Deleted task {} ({} row)", id, changed);
        self.invalidate(&conn, changed);
        Ok(())
    }

    /// Remove every completed task, returning how many were removed
    pub fn delete_completed_tasks(&self) -> Result<usize> {
        let conn = self.lock()?;
        let changed = conn.execute(DELETE_COMPLETED_TASKS, [])?;
        debug!("Deleted {} completed tasks", changed);
        self.invalidate(&conn, changed);
        Ok(changed)
    }

    /// Subscribe to the task table
    pub fn observe_tasks(&self) -> TaskQuery {
        let receiver = match self.lock() {
            Ok(conn) => {
                if self.stale.swap(false, Ordering::AcqRel) {
                    self.refresh(&conn);
                }
                self.snapshots.subscribe()
            }
            Err(err) => {
                self.snapshots.send_replace(Err(err));
                self.snapshots.subscribe()
            }
        };
        TaskQuery::new(receiver)
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.snapshots.receiver_count()
    }

    fn invalidate(&self, conn: &Connection, changed: usize) {
        if changed == 0 {
            return;
        }
        if self.snapshots.receiver_count() == 0 {
            self.stale.store(true, Ordering::Release);
            return;
        }
        self.refresh(conn);
    }

    fn refresh(&self, conn: &Connection) {
        let snapshot = query_tasks(conn);
        if let Err(e) = &snapshot {
            warn!("Failed to refresh task snapshot: {}", e);
            self.stale.store(true, Ordering::Release);
        }
        self.snapshots.send_replace(snapshot);
    }
}

impl std::fmt::Debug for TaskStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskStore")
            .field("subscribers", &self.subscriber_count())
            .finish_non_exhaustive()
    }
}

fn migrate(conn: &Connection) -> Result<()> {
    let version: i32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    if version > SCHEMA_VERSION {
        return Err(Error::Storage(format!(
            "Unsupported task database version {} (expected {})",
            version, SCHEMA_VERSION
        )));
    }

    conn.execute_batch(SCHEMA_TASKS)?;
    if version < SCHEMA_VERSION {
        conn.execute_batch(&format!("PRAGMA user_version = {}", SCHEMA_VERSION))?;
    }
    Ok(())
}

fn query_tasks(conn: &Connection) -> Result<Vec<Task>> {
    let mut stmt = conn.prepare(SELECT_TASKS)?;
    let tasks = stmt
        .query_map([], task_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(tasks)
}

fn task_from_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        completed: row.get(2)?,
    })
}
