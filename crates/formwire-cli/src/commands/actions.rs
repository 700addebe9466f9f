// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Lists registered actions with their identifiers.

use console::style;

use crate::app;

/// Prints one line per action: identifier, then declaration coordinates.
pub async fn run() -> anyhow::Result<()> {
    let registry = app::registry()?;

    println!("{}", style(format!("{} action(s)", registry.len())).cyan().bold());
    for line in listing(&registry) {
        println!("{}", line);
    }
    Ok(())
}

fn listing(registry: &formwire::actions::ActionRegistry<app::TodoApp>) -> Vec<String> {
    registry
        .actions()
        .map(|descriptor| format!("  {}  {}", descriptor.id(), descriptor.location()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_shows_id_and_location() {
        let registry = app::registry().unwrap();
        let lines = listing(&registry);

        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("formwire_cli::app::todos#add_todo"));
        assert!(lines[1].ends_with("formwire_cli::app::todos#delete_todo"));
        assert!(lines[2].ends_with("formwire_cli::app::todos#toggle_todo"));
    }
}
