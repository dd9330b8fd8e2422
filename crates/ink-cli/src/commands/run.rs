use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Arc;

use colored::Colorize;

use ink_interview::{EngineConfig, InterviewError, InterviewSession, ReplyKind};

pub fn run(
    script: &str,
    root: Option<&Path>,
    config_path: Option<&Path>,
    scripts_dir: Option<&Path>,
) -> Result<(), String> {
    let mut config = match config_path {
        Some(path) => EngineConfig::load(path),
        None => EngineConfig::discover(root.unwrap_or(Path::new("."))),
    }
    .map_err(|e| e.to_string())?;
    if let Some(root) = root {
        config = config.with_root(root);
    }
    if let Some(dir) = scripts_dir {
        config = config.with_scripts_dir(dir);
    }

    let registry = super::load_registry(config.scripts_dir.as_deref())?;
    let mut session = InterviewSession::new(Arc::new(registry), script, &config)
        .map_err(|e| format!("failed to start session: {e}"))?;

    println!("  {} {}", "Starting".bold(), session.script().id);
    println!("  Writing under {}", config.root.display());
    println!("  Type 'help' for commands. End a line with '\\' to continue it on the next.\n");
    println!("{}\n", session.opening());

    let stdin = io::stdin();
    let mut reader = stdin.lock();

    loop {
        print!("> ");
        io::stdout().flush().map_err(|e| e.to_string())?;

        let Some(input) = read_utterance(&mut reader)? else {
            break; // EOF
        };
        if input.trim().is_empty() {
            continue;
        }

        match session.process(&input) {
            Ok(reply) => {
                match reply.kind {
                    ReplyKind::Clarify(_) => println!("{}\n", reply.to_string().cyan()),
                    ReplyKind::Saved => println!("{}\n", reply.to_string().green()),
                    _ => println!("{reply}\n"),
                }
                if reply.is_ended() {
                    break;
                }
            }
            Err(InterviewError::SessionEnded) => break,
            Err(e) => {
                println!("{}\n", e.to_string().yellow());
            }
        }
    }

    Ok(())
}

/// Read one utterance. A trailing `\` joins the next line on.
fn read_utterance(reader: &mut impl BufRead) -> Result<Option<String>, String> {
    let mut utterance = String::new();
    let mut line = String::new();
    loop {
        line.clear();
        let read = reader.read_line(&mut line).map_err(|e| e.to_string())?;
        if read == 0 {
            return Ok((!utterance.is_empty()).then_some(utterance));
        }
        let trimmed = line.trim_end_matches(['\n', '\r']);
        match trimmed.strip_suffix('\\') {
            Some(head) => {
                utterance.push_str(head);
                utterance.push('\n');
            }
            None => {
                utterance.push_str(trimmed);
                return Ok(Some(utterance));
            }
        }
    }
}
