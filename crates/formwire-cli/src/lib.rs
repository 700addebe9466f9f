// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

// Warn on missing documentation for public items
#![warn(missing_docs)]

//! formwire CLI library.
//!
//! The command-line interface and reference application for formwire: an
//! axum server hosting a SQLite-backed todo list whose add, toggle and delete
//! forms work with or without client-side script.
//!
//! # Usage
//!
//! This crate is primarily used through the `formwire` binary:
//!
//! ```bash
//! formwire init todos   # Create formwire.toml and static/
//! formwire serve        # Serve the todo application
//! formwire actions      # List action identifiers
//! ```
//!
//! # Configuration
//!
//! Projects are configured via `formwire.toml` at the project root.

/// The todo application (state, actions, pages).
pub mod app;
/// CLI commands (init, serve, actions).
pub mod commands;
/// Project configuration from `formwire.toml`.
pub mod config;
/// HTTP server.
pub mod server;
/// Todo store with SQLite backend.
pub mod store;
