// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Server command.
//!
//! Opens the todo store, registers the actions and serves until Ctrl-C.

use std::path::Path;
use std::sync::Arc;

use console::style;

use crate::app;
use crate::config::Config;
use crate::server::http::{self, AppState};
use crate::store::TodoStore;

/// Starts the HTTP server. `host` and `port` override `formwire.toml`.
pub async fn run(host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    let config = Config::load()?;
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);
    let addr = format!("{}:{}", host, port);

    let data_dir = Path::new(&config.store.data_dir);
    let store = TodoStore::open(data_dir)?;
    let (dispatcher, actions) = app::build(store, &config.actions)?;

    println!("{}", style("Starting formwire server...").cyan().bold());
    println!("{} {}", style("Database:").dim(), data_dir.join("todos.db").display());
    println!(
        "{} {} action(s) registered",
        style("Loaded").green(),
        dispatcher.registry().len()
    );
    println!(
        "{} {}",
        style("Server:").cyan(),
        style(format!("http://{}", addr)).green().bold()
    );

    let state = Arc::new(AppState {
        dispatcher,
        actions,
        project_name: config.project.name.clone(),
        max_body_bytes: config.server.max_body_bytes,
    });

    http::run(&addr, state, Path::new(&config.server.static_dir)).await
}
