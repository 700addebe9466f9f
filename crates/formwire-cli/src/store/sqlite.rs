// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! SQLite-backed todo store.

use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

use super::{StoreError, StoreResult, Todo};

/// Todo store on a single SQLite connection.
///
/// Cloning is cheap and shares the connection. Every call runs on the
/// blocking thread pool and is awaited.
#[derive(Clone)]
pub struct TodoStore {
    conn: Arc<Mutex<Connection>>,
}

impl TodoStore {
    /// Opens (creating if needed) `data_dir/todos.db`.
    pub fn open(data_dir: &Path) -> StoreResult<Self> {
        std::fs::create_dir_all(data_dir)?;
        let db_path = data_dir.join("todos.db");
        debug!(path = %db_path.display(), "opening todo store");
        Self::with_connection(Connection::open(&db_path)?)
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> StoreResult<Self> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS todos (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                done INTEGER NOT NULL DEFAULT 0,
                created_at INTEGER NOT NULL
            )
            "#,
            [],
        )?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Get current Unix timestamp.
    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0)
    }

    async fn run<T, F>(&self, op: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> StoreResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(|_| StoreError::Poisoned)?;
            op(&conn)
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }

    /// All todos, oldest first.
    pub async fn list(&self) -> StoreResult<Vec<Todo>> {
        self.run(|conn| {
            let mut stmt = conn.prepare("SELECT id, title, done, created_at FROM todos ORDER BY id")?;
            let rows = stmt.query_map([], |row| {
                Ok(Todo {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    done: row.get(2)?,
                    created_at: row.get(3)?,
                })
            })?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        })
        .await
    }

    /// Inserts a todo and returns it.
    pub async fn insert(&self, title: impl Into<String>) -> StoreResult<Todo> {
        let title = title.into();
        self.run(move |conn| {
            let created_at = Self::now();
            conn.execute(
                "INSERT INTO todos (title, done, created_at) VALUES (?1, 0, ?2)",
                params![title, created_at],
            )?;
            Ok(Todo {
                id: conn.last_insert_rowid(),
                title,
                done: false,
                created_at,
            })
        })
        .await
    }

    /// Deletes a todo. Returns false if it did not exist.
    pub async fn delete(&self, id: i64) -> StoreResult<bool> {
        self.run(move |conn| {
            let affected = conn.execute("DELETE FROM todos WHERE id = ?1", params![id])?;
            Ok(affected > 0)
        })
        .await
    }

    /// Flips the done flag. Returns false if the todo did not exist.
    pub async fn toggle(&self, id: i64) -> StoreResult<bool> {
        self.run(move |conn| {
            let affected = conn.execute("UPDATE todos SET done = NOT done WHERE id = ?1", params![id])?;
            Ok(affected > 0)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_and_list() {
        let store = TodoStore::open_in_memory().unwrap();
        let first = store.insert("Buy milk").await.unwrap();
        store.insert("Walk dog").await.unwrap();

        let todos = store.list().await.unwrap();
        assert_eq!(todos.len(), 2);
        assert_eq!(todos[0], first);
        assert!(!todos[0].done);
        assert_eq!(todos[1].title, "Walk dog");
    }

    #[tokio::test]
    async fn test_delete_reports_absence() {
        let store = TodoStore::open_in_memory().unwrap();
        let todo = store.insert("Buy milk").await.unwrap();

        assert!(store.delete(todo.id).await.unwrap());
        assert!(!store.delete(todo.id).await.unwrap());
        assert!(!store.delete(7).await.unwrap());
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_toggle() {
        let store = TodoStore::open_in_memory().unwrap();
        let todo = store.insert("Buy milk").await.unwrap();

        assert!(store.toggle(todo.id).await.unwrap());
        assert!(store.list().await.unwrap()[0].done);
        assert!(store.toggle(todo.id).await.unwrap());
        assert!(!store.list().await.unwrap()[0].done);
        assert!(!store.toggle(99).await.unwrap());
    }

    #[tokio::test]
    async fn test_persists_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("data");
        {
            let store = TodoStore::open(&data_dir).unwrap();
            store.insert("Buy milk").await.unwrap();
        }

        let store = TodoStore::open(&data_dir).unwrap();
        assert_eq!(store.list().await.unwrap()[0].title, "Buy milk");
    }
}
