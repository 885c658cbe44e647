//! Interactive REPL (Read-Eval-Print Loop) and numbered menu modes.

use crate::commands::{self, Action};
use crate::config::libris_home;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::prompt::{split_fields, EditorPrompter, Fields, Prompter};
use crate::session::Session;
use libris_domain::Clock;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;

/// REPL command type.
#[derive(Debug, PartialEq, Eq)]
pub enum ReplCommand {
    /// Leave the session
    Exit,
    /// Show available commands
    Help,
    /// Run a library command with the fields typed after it
    Action(Action, Vec<String>),
}

/// Parse a REPL command line.
pub fn parse_repl_command(line: &str) -> Result<ReplCommand> {
    let line = line.trim();
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));

    match word {
        "" => Err(CliError::InvalidInput("Empty command".to_string())),
        "exit" | "quit" | "q" => Ok(ReplCommand::Exit),
        "help" | "?" => Ok(ReplCommand::Help),
        _ => Action::parse(word)
            .map(|action| ReplCommand::Action(action, split_fields(rest)))
            .ok_or_else(|| {
                CliError::InvalidInput(format!(
                    "Unknown command: {}. Type 'help' for available commands.",
                    word
                ))
            }),
    }
}

/// Run one action, reading missing fields from `prompter`.
pub fn run_action<C: Clock>(
    action: Action,
    args: Vec<String>,
    prompter: &mut dyn Prompter,
    session: &mut Session<C>,
) -> Result<String> {
    tracing::debug!("Running {} with {} given field(s)", action.name(), args.len());
    let mut fields = Fields::new(args, prompter);
    commands::execute(action, &mut fields, session)
}

/// Run the interactive REPL.
pub fn run_repl<C: Clock>(session: &mut Session<C>, history_size: usize) -> Result<()> {
    println!(
        "{}",
        session
            .formatter
            .info("Libris REPL - Type 'help' for commands, 'exit' to quit")
    );
    println!();

    let mut editor = new_editor(history_size)?;
    let history_path = get_history_path()?;
    let _ = editor.load_history(&history_path);

    loop {
        match editor.readline("libris> ") {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                editor.add_history_entry(line).ok();

                match parse_repl_command(line) {
                    Ok(ReplCommand::Exit) => {
                        println!("{}", session.formatter.info("Goodbye!"));
                        break;
                    }
                    Ok(ReplCommand::Help) => {
                        print!("{}", help_text());
                    }
                    Ok(ReplCommand::Action(action, args)) => {
                        let mut prompter = EditorPrompter::new(&mut editor);
                        let result = run_action(action, args, &mut prompter, session);
                        report(result, &session.formatter);
                    }
                    Err(e) => {
                        eprintln!("{}", session.formatter.error(&e.to_string()));
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", session.formatter.info("Use 'exit' to quit"));
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("{}", session.formatter.error(&format!("Error: {}", err)));
                break;
            }
        }
    }

    editor.save_history(&history_path).ok();

    Ok(())
}

/// Menu entries, numbered from 1. The entry after the last one exits.
const MENU: [(&str, Action); 8] = [
    ("Add Book", Action::AddBook),
    ("Add Borrower", Action::AddBorrower),
    ("Borrow Book", Action::Borrow),
    ("Return Book", Action::Return),
    ("Search Books", Action::Search),
    ("List All Books", Action::Books),
    ("List Borrowed by Borrower", Action::Status),
    ("List Overdue", Action::Overdue),
];

/// What a menu choice selects.
#[derive(Debug, PartialEq, Eq)]
pub enum MenuChoice {
    /// One of the [`MENU`] actions
    Action(Action),
    /// The final "Exit" entry
    Exit,
}

/// Parse a menu choice.
pub fn parse_menu_choice(choice: &str) -> Option<MenuChoice> {
    let n: usize = choice.trim().parse().ok()?;
    match n {
        0 => None,
        n if n <= MENU.len() => Some(MenuChoice::Action(MENU[n - 1].1)),
        n if n == MENU.len() + 1 => Some(MenuChoice::Exit),
        _ => None,
    }
}

/// Run the numbered menu, prompting for every field.
pub fn run_menu<C: Clock>(session: &mut Session<C>, history_size: usize) -> Result<()> {
    let mut editor = new_editor(history_size)?;

    loop {
        print_menu();
        let choice = match editor.readline("Enter choice: ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        };

        match parse_menu_choice(&choice) {
            Some(MenuChoice::Exit) => {
                println!("{}", session.formatter.info("Goodbye."));
                break;
            }
            Some(MenuChoice::Action(action)) => {
                let mut prompter = EditorPrompter::new(&mut editor);
                let result = run_action(action, Vec::new(), &mut prompter, session);
                report(result, &session.formatter);
            }
            None => {
                println!("{}", session.formatter.warning("Invalid choice. Try again."));
            }
        }
    }

    Ok(())
}

/// Help text listing every command.
pub fn help_text() -> String {
    let mut text = String::from("Available commands:\n\n");
    for action in Action::ALL {
        let synopsis = format!("{} {}", action.name(), action.usage());
        text.push_str(&format!("  {:<40} - {}\n", synopsis.trim_end(), action.summary()));
    }
    text.push_str(&format!("  {:<40} - {}\n", "help, ?", "Show this help"));
    text.push_str(&format!("  {:<40} - {}\n", "exit, quit, q", "Exit REPL"));
    text.push('\n');
    text.push_str("Fields separated by '|' may contain spaces; missing fields are prompted for.\n\n");
    text
}

fn print_menu() {
    println!();
    println!("=== Library Menu ===");
    for (idx, (label, _)) in MENU.iter().enumerate() {
        println!("{}. {}", idx + 1, label);
    }
    println!("{}. Exit", MENU.len() + 1);
}

fn report(result: Result<String>, formatter: &Formatter) {
    match result {
        Ok(output) => println!("{}", output),
        Err(e) => eprintln!("{}", formatter.error(&e.to_string())),
    }
}

fn new_editor(history_size: usize) -> Result<DefaultEditor> {
    let config = rustyline::Config::builder()
        .max_history_size(history_size)?
        .auto_add_history(false)
        .build();
    Ok(DefaultEditor::with_config(config)?)
}

fn get_history_path() -> Result<PathBuf> {
    let libris_dir = libris_home()?;
    std::fs::create_dir_all(&libris_dir)?;
    Ok(libris_dir.join("history.txt"))
}
