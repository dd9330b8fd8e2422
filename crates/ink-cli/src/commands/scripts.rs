use std::path::Path;

use comfy_table::{ContentArrangement, Table};

pub fn run(scripts_dir: Option<&Path>) -> Result<(), String> {
    let registry = super::load_registry(scripts_dir)?;

    if registry.is_empty() {
        println!("  No scripts found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Id", "Title", "Categories", "Questions", "Import"]);

    for script in registry.scripts() {
        let import = if script.supports_import { "yes" } else { "-" };
        table.add_row(vec![
            script.id.clone(),
            script.title.clone(),
            script.categories.len().to_string(),
            script.question_count().to_string(),
            import.to_string(),
        ]);
    }

    println!("{table}");
    println!();
    println!("  {} scripts", registry.len());

    Ok(())
}
