//! Batch mode: REPL commands read from a file.

use crate::error::{CliError, Result};
use crate::prompt::NoPrompt;
use crate::repl::{help_text, parse_repl_command, run_action, ReplCommand};
use crate::session::Session;
use libris_domain::Clock;
use std::fs;
use std::io::Write;
use std::path::Path;

/// What a script run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScriptSummary {
    /// Commands that succeeded
    pub succeeded: usize,
    /// Commands the library rejected
    pub failed: usize,
}

/// Execute the script at `path`.
pub fn run_script<C: Clock, W: Write>(path: &Path, session: &mut Session<C>, out: &mut W) -> Result<ScriptSummary> {
    let contents = fs::read_to_string(path)?;
    tracing::info!("Running script {}", path.display());
    run_lines(contents.lines(), session, out)
}

/// Execute script lines, writing each command's output to `out`.
///
/// Blank lines and `#` comments are skipped and `exit` ends the script early.
/// A rejected transaction is reported and the script moves on; a line that
/// cannot be parsed, or lacks a required field, aborts the run.
pub fn run_lines<'l, C, W, I>(lines: I, session: &mut Session<C>, out: &mut W) -> Result<ScriptSummary>
where
    C: Clock,
    W: Write,
    I: IntoIterator<Item = &'l str>,
{
    let mut summary = ScriptSummary::default();

    for (idx, line) in lines.into_iter().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let abort = |e: CliError| CliError::Script {
            line: idx + 1,
            message: e.to_string(),
        };

        match parse_repl_command(line).map_err(abort)? {
            ReplCommand::Exit => break,
            ReplCommand::Help => write!(out, "{}", help_text())?,
            ReplCommand::Action(action, args) => {
                match run_action(action, args, &mut NoPrompt, session) {
                    Ok(output) => {
                        if !output.is_empty() {
                            writeln!(out, "{}", output)?;
                        }
                        summary.succeeded += 1;
                    }
                    Err(CliError::Library(e)) => {
                        tracing::warn!("Line {}: {}", idx + 1, e);
                        writeln!(out, "{}", session.formatter.error(&e.to_string()))?;
                        summary.failed += 1;
                    }
                    Err(e) => return Err(abort(e)),
                }
            }
        }
    }

    Ok(summary)
}
