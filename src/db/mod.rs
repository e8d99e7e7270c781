// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer (SQLite).
//!
//! A single worker thread owns the connection. Callers hand it closures
//! through [`Database::execute`] and await the reply, so every statement
//! runs serialized and a multi-statement write can sit in one transaction.

pub mod courses;
pub mod holes;
mod migrations;
pub mod readings;
pub mod users;

use std::{
    sync::{mpsc, Arc, Mutex},
    thread::{self, JoinHandle},
};

use anyhow::{anyhow, Context, Result};
use rusqlite::Connection;
use tokio::sync::oneshot;
use uuid::Uuid;

use migrations::run_migrations;

pub use holes::ProvisionOutcome;

/// Path that selects a private in-memory database.
pub const IN_MEMORY: &str = ":memory:";

type DbTask = Box<dyn FnOnce(&mut Connection) + Send + 'static>;

enum DbCommand {
    Execute(DbTask),
    Shutdown,
}

struct DatabaseInner {
    sender: mpsc::Sender<DbCommand>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Drop for DatabaseInner {
    fn drop(&mut self) {
        let mut guard = match self.worker.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some(handle) = guard.take() {
            if let Err(err) = self.sender.send(DbCommand::Shutdown) {
                tracing::error!(error = %err, "Failed to send shutdown to DB thread");
            }
            if let Err(join_err) = handle.join() {
                tracing::error!(error = ?join_err, "Failed to join DB thread");
            }
        }
    }
}

pub(crate) fn parse_uuid(value: &str, field: &str) -> Result<Uuid> {
    Uuid::parse_str(value).map_err(|err| anyhow!("invalid {field} '{value}': {err}"))
}

/// SQLite database handle. Cheap to clone.
#[derive(Clone)]
pub struct Database {
    inner: Arc<DatabaseInner>,
}

impl Database {
    /// Open (or create) the database at `path` and bring the schema up to date.
    ///
    /// `":memory:"` opens a private in-memory database, which is what the tests use.
    pub fn open(path: &str) -> Result<Self> {
        let (command_tx, command_rx) = mpsc::channel::<DbCommand>();
        let (ready_tx, ready_rx) = mpsc::channel();
        let path_for_thread = path.to_string();

        let worker = thread::Builder::new()
            .name("green-book-db".into())
            .spawn(move || {
                let opened = if path_for_thread == IN_MEMORY {
                    Connection::open_in_memory()
                } else {
                    Connection::open(&path_for_thread)
                };
                let mut conn = match opened {
                    Ok(connection) => connection,
                    Err(err) => {
                        let _ = ready_tx.send(Err(anyhow::Error::new(err)
                            .context("failed to open SQLite database")));
                        return;
                    }
                };

                if path_for_thread != IN_MEMORY {
                    if let Err(err) = conn.pragma_update(None, "journal_mode", "WAL") {
                        tracing::error!(error = %err, "Failed to enable WAL mode");
                    }
                }
                // Foreign keys carry the ownership chain; refuse to run without them.
                let init_result = conn
                    .pragma_update(None, "foreign_keys", "ON")
                    .context("failed to enable foreign keys")
                    .and_then(|_| {
                        run_migrations(&mut conn).context("failed to run database migrations")
                    });
                if ready_tx.send(init_result).is_err() {
                    tracing::error!("DB initialization receiver dropped before ready signal");
                    return;
                }

                while let Ok(command) = command_rx.recv() {
                    match command {
                        DbCommand::Execute(task) => task(&mut conn),
                        DbCommand::Shutdown => break,
                    }
                }

                tracing::info!("Database thread shutting down");
            })
            .context("failed to spawn database worker thread")?;

        ready_rx
            .recv()
            .context("database worker exited before signaling readiness")??;

        tracing::info!(path, "Database initialized");

        Ok(Self {
            inner: Arc::new(DatabaseInner {
                sender: command_tx,
                worker: Mutex::new(Some(worker)),
            }),
        })
    }

    /// Fresh in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Self::open(IN_MEMORY)
    }

    /// Run `task` on the database thread and await its result.
    pub async fn execute<F, T>(&self, task: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let (reply_tx, reply_rx) = oneshot::channel();

        let command = DbCommand::Execute(Box::new(move |conn| {
            let result = task(conn);
            if reply_tx.send(result).is_err() {
                tracing::warn!("DB caller dropped before receiving result");
            }
        }));

        self.inner
            .sender
            .send(command)
            .map_err(|err| anyhow!("failed to send command to DB thread: {err}"))?;

        reply_rx
            .await
            .map_err(|_| anyhow!("database thread terminated unexpectedly"))?
    }
}
