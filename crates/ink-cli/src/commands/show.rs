use std::path::Path;

use colored::Colorize;

pub fn run(script_id: &str, scripts_dir: Option<&Path>) -> Result<(), String> {
    let registry = super::load_registry(scripts_dir)?;
    let script = registry.load(script_id).map_err(|e| e.to_string())?;

    println!("  {} [{}]", script.title.bold(), script.id.dimmed());
    let mut flags = Vec::new();
    if script.supports_import {
        flags.push("import");
    }
    if script.export_ends_session {
        flags.push("export ends session");
    }
    if script.reset_bundles {
        flags.push("reset bundles");
    }
    if script.editing {
        flags.push("editing");
    }
    if !flags.is_empty() {
        println!("  {}", flags.join(", ").dimmed());
    }
    println!();

    for (i, category) in script.categories.iter().enumerate() {
        println!("  {}. {}", i + 1, category.title.bold());
        for question in &category.questions {
            println!("     {:<14} {}", question.summary_key(), question.prompt);
        }
        println!();
    }

    let commands: Vec<&str> = script.commands.iter().map(|s| s.command.name()).collect();
    println!("  commands: {}", commands.join(", "));

    Ok(())
}
