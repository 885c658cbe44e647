//! Field input for commands.
//!
//! A command reads its fields in order. Each one comes from the command line
//! if it was given there, otherwise the user is asked for it. In script mode
//! nobody can be asked, so missing fields come back empty.

use crate::error::{CliError, Result};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::collections::VecDeque;

/// Something that can ask the user for a value.
pub trait Prompter {
    /// Ask for `label`. `Ok(None)` means no answer is available.
    fn ask(&mut self, label: &str) -> Result<Option<String>>;
}

/// Interactive prompts on the REPL's line editor.
pub struct EditorPrompter<'a> {
    editor: &'a mut DefaultEditor,
}

impl<'a> EditorPrompter<'a> {
    /// Prompt through `editor`
    pub fn new(editor: &'a mut DefaultEditor) -> Self {
        Self { editor }
    }
}

impl Prompter for EditorPrompter<'_> {
    fn ask(&mut self, label: &str) -> Result<Option<String>> {
        match self.editor.readline(&format!("{}: ", label)) {
            Ok(line) => Ok(Some(line.trim().to_string())),
            Err(ReadlineError::Eof) => Ok(None),
            Err(ReadlineError::Interrupted) => Err(CliError::InvalidInput("Cancelled".to_string())),
            Err(e) => Err(e.into()),
        }
    }
}

/// Never asks; used for scripts.
#[derive(Debug, Default)]
pub struct NoPrompt;

impl Prompter for NoPrompt {
    fn ask(&mut self, _label: &str) -> Result<Option<String>> {
        Ok(None)
    }
}

/// The fields of one command: given arguments first, prompts after.
pub struct Fields<'a> {
    given: VecDeque<String>,
    prompter: &'a mut dyn Prompter,
}

impl<'a> Fields<'a> {
    /// Wrap the arguments typed after a command word.
    pub fn new(given: Vec<String>, prompter: &'a mut dyn Prompter) -> Self {
        Self {
            given: given.into(),
            prompter,
        }
    }

    /// Next field, or `None` if it was neither given nor answered.
    pub fn next(&mut self, label: &str) -> Result<Option<String>> {
        match self.given.pop_front() {
            Some(value) => Ok(Some(value)),
            None => self.prompter.ask(label),
        }
    }

    /// Next field as free text; missing becomes empty.
    pub fn text(&mut self, label: &str) -> Result<String> {
        Ok(self.next(label)?.unwrap_or_default())
    }

    /// Next field, which must be non-empty.
    pub fn required(&mut self, label: &str) -> Result<String> {
        self.next(label)?
            .filter(|value| !value.is_empty())
            .ok_or_else(|| CliError::InvalidInput(format!("{} is required", label)))
    }

    /// Next field as an optional value; empty counts as absent.
    pub fn optional(&mut self, label: &str) -> Result<Option<String>> {
        Ok(self.next(label)?.filter(|value| !value.is_empty()))
    }

    /// Everything still given, joined by spaces, or one prompted answer.
    pub fn rest(&mut self, label: &str) -> Result<String> {
        if self.given.is_empty() {
            return self.text(label);
        }
        let parts: Vec<String> = self.given.drain(..).collect();
        Ok(parts.join(" "))
    }
}

/// Split what follows a command word into fields.
///
/// With a `|` anywhere, fields are `|`-separated and may contain spaces (or
/// be empty); otherwise they are whitespace-separated words.
pub fn split_fields(args: &str) -> Vec<String> {
    let args = args.trim();
    if args.is_empty() {
        return Vec::new();
    }
    if args.contains('|') {
        args.split('|').map(|field| field.trim().to_string()).collect()
    } else {
        args.split_whitespace().map(str::to_string).collect()
    }
}

/// Scripted answers, for tests and for feeding prompts from a list.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    /// Labels asked so far, in order
    pub asked: Vec<String>,
}

impl ScriptedPrompter {
    /// Answer prompts with `answers`, in order
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&mut self, label: &str) -> Result<Option<String>> {
        self.asked.push(label.to_string());
        Ok(self.answers.pop_front())
    }
}
