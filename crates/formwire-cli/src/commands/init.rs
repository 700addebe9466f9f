// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Project initialization command.

use console::style;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{Config, CONFIG_FILE};

const APP_CSS: &str = r#"body { font-family: system-ui, sans-serif; max-width: 40rem; margin: 2rem auto; padding: 0 1rem; }
form { display: inline-flex; gap: 0.5rem; }
.todos { list-style: none; padding: 0; }
.todos li { display: flex; gap: 0.75rem; align-items: center; padding: 0.25rem 0; }
.todos li.done span { text-decoration: line-through; color: #888; }
.error { background: #fde8e8; border-left: 4px solid #e94560; padding: 0.5rem 1rem; }
.issue { color: #c0392b; margin: 0.25rem 0; }
"#;

/// Initializes a formwire project: `formwire.toml` plus the static directory.
pub async fn run(name: Option<String>) -> anyhow::Result<()> {
    let is_current_dir = matches!(name.as_deref(), Some(".") | None);
    let (project_dir, project_name) = resolve_project_path(name)?;

    let written = init_project(&project_dir, &project_name)?;
    tracing::info!(dir = %project_dir.display(), "initialized project");

    println!(
        "{} {}",
        style("Created formwire project:").green().bold(),
        project_name
    );
    for path in written {
        println!("  {} {}", style("+").green(), path.display());
    }
    println!();
    println!("Next steps:");
    if !is_current_dir {
        println!("  cd {}", project_name);
    }
    println!("  formwire serve");
    Ok(())
}

/// Writes the project files. An existing `formwire.toml` is left untouched.
pub fn init_project(project_dir: &Path, project_name: &str) -> anyhow::Result<Vec<PathBuf>> {
    fs::create_dir_all(project_dir)?;
    let mut written = Vec::new();

    let config_path = project_dir.join(CONFIG_FILE);
    if config_path.exists() {
        println!(
            "{} {} already exists, keeping it",
            style("!").yellow(),
            CONFIG_FILE
        );
    } else {
        let mut config = Config::default();
        config.project.name = project_name.to_string();
        fs::write(&config_path, config.to_toml()?)?;
        written.push(config_path);
    }

    let config = Config::load_from(&project_dir.join(CONFIG_FILE))?;
    let static_dir = project_dir.join(&config.server.static_dir);
    fs::create_dir_all(&static_dir)?;
    let css_path = static_dir.join("app.css");
    if !css_path.exists() {
        fs::write(&css_path, APP_CSS)?;
        written.push(css_path);
    }

    Ok(written)
}

fn resolve_project_path(name: Option<String>) -> anyhow::Result<(PathBuf, String)> {
    let current = std::env::current_dir()?;
    match name.as_deref() {
        None | Some(".") => {
            let project_name = current
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "formwire-app".to_string());
            Ok((current, project_name))
        }
        Some(name) => Ok((current.join(name), name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_writes_config_and_static() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("todos");
        let written = init_project(&project, "todos").unwrap();

        assert_eq!(written.len(), 2);
        let config = Config::load_from(&project.join(CONFIG_FILE)).unwrap();
        assert_eq!(config.project.name, "todos");
        assert!(project.join("static/app.css").exists());
    }

    #[test]
    fn test_init_keeps_existing_config() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "[project]\nname = \"mine\"\n").unwrap();

        let written = init_project(dir.path(), "other").unwrap();
        assert_eq!(written.len(), 1);
        let config = Config::load_from(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config.project.name, "mine");
    }
}
