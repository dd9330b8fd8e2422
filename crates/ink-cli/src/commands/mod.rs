pub mod run;
pub mod scripts;
pub mod show;

use std::path::Path;

use ink_core::ScriptRegistry;

/// Built-in scripts, plus those in `scripts_dir` when given.
fn load_registry(scripts_dir: Option<&Path>) -> Result<ScriptRegistry, String> {
    let registry = match scripts_dir {
        Some(dir) => ScriptRegistry::from_dir(dir),
        None => ScriptRegistry::builtin(),
    };
    registry.map_err(|e| e.to_string())
}
