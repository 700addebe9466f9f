// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Todo persistence using SQLite.

mod sqlite;

pub use sqlite::TodoStore;

use serde::Serialize;
use thiserror::Error;

/// A stored todo item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Todo {
    /// Row id.
    pub id: i64,
    /// What to do.
    pub title: String,
    /// Whether it is done.
    pub done: bool,
    /// Unix timestamp of creation.
    pub created_at: i64,
}

/// Errors raised by the todo store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite reported an error.
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The data directory could not be prepared.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A blocking store task did not finish.
    #[error("Store task failed: {0}")]
    Task(String),

    /// The connection lock was poisoned by a panicking thread.
    #[error("Store connection is unavailable")]
    Poisoned,
}

/// Convenience type alias for store results.
pub type StoreResult<T> = Result<T, StoreError>;
