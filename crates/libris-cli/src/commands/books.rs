//! Catalog commands.

use super::count_or_default;
use crate::error::{CliError, Result};
use crate::prompt::Fields;
use crate::session::Session;
use libris_domain::{Book, BookField, BookUpdate, Clock};

/// Execute the add-book command.
pub fn add_book<C: Clock>(fields: &mut Fields<'_>, session: &mut Session<C>) -> Result<String> {
    let title = fields.text("Title")?;
    let author = fields.text("Author")?;
    let isbn = fields.required("ISBN")?;
    let genre = fields.text("Genre")?;
    let default_quantity = session.lending.default_quantity;
    let (quantity, note) = count_or_default(
        fields.optional(&format!("Quantity (default {})", default_quantity))?,
        default_quantity,
        "quantity",
    );

    let outcome = session
        .library
        .add_book(Book::new(title, author, isbn, genre, quantity));

    let mut lines = Vec::new();
    if let Some(note) = note {
        lines.push(session.formatter.warning(&note));
    }
    lines.push(session.formatter.success(&format!("{}.", outcome)));
    Ok(lines.join("\n"))
}

/// Execute the update-book command.
pub fn update_book<C: Clock>(fields: &mut Fields<'_>, session: &mut Session<C>) -> Result<String> {
    let isbn = fields.required("ISBN")?;
    if session.library.book(&isbn).is_none() {
        // Fail before prompting for the rest
        return Err(libris_domain::LibraryError::BookNotFound(isbn).into());
    }

    let update = BookUpdate {
        title: fields.optional("New title (blank to keep)")?,
        author: fields.optional("New author (blank to keep)")?,
        genre: fields.optional("New genre (blank to keep)")?,
        quantity: fields.optional("New quantity (blank to keep)")?,
    };
    if update.is_empty() {
        return Ok(session.formatter.info("Nothing to update."));
    }

    let change = session.library.update_book_details(&isbn, update)?;
    let mut lines = Vec::new();
    if let Some(change) = change {
        lines.push(session.formatter.info(&format!("{}.", change)));
    }
    lines.push(session.formatter.success("Book updated."));
    Ok(lines.join("\n"))
}

/// Execute the remove-book command.
pub fn remove_book<C: Clock>(fields: &mut Fields<'_>, session: &mut Session<C>) -> Result<String> {
    let isbn = fields.required("ISBN")?;
    let book = session.library.remove_book(&isbn)?;
    Ok(session.formatter.success(&format!("Book removed: {}", book.title())))
}

/// Execute the search command.
pub fn search<C: Clock>(fields: &mut Fields<'_>, session: &mut Session<C>) -> Result<String> {
    let field = match fields.optional("Search by (title/author/genre/isbn) [title]")? {
        Some(name) => name.parse::<BookField>().map_err(CliError::InvalidInput)?,
        None => BookField::Title,
    };
    let query = fields.rest("Query")?;

    let hits = session.library.search_books(Some(query.as_str()), field);
    session.formatter.format_books(&hits)
}

/// Execute the books command.
pub fn list_books<C: Clock>(session: &mut Session<C>) -> Result<String> {
    session.formatter.format_books(&session.library.list_all_books())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LendingSettings, OutputFormat};
    use crate::output::Formatter;
    use crate::prompt::{NoPrompt, ScriptedPrompter};
    use libris_domain::Library;

    fn session() -> Session {
        Session::new(
            Library::new(),
            Formatter::new(OutputFormat::Quiet, false),
            LendingSettings::default(),
        )
    }

    fn args(line: &str) -> Vec<String> {
        crate::prompt::split_fields(line)
    }

    #[test]
    fn test_add_book_from_prompts() {
        let mut session = session();
        let mut prompter = ScriptedPrompter::new(["Dune", "Herbert", "111", "SciFi", "2"]);
        let mut fields = Fields::new(Vec::new(), &mut prompter);

        let output = add_book(&mut fields, &mut session).unwrap();
        assert_eq!(output, "✓ Book added.");
        assert_eq!(session.library.book("111").unwrap().quantity(), 2);
    }

    #[test]
    fn test_add_book_bad_quantity_uses_default() {
        let mut session = session();
        let mut prompter = NoPrompt;
        let mut fields = Fields::new(args("Dune|Herbert|111|SciFi|two"), &mut prompter);

        let output = add_book(&mut fields, &mut session).unwrap();
        assert!(output.starts_with("⚠ Invalid quantity 'two'. Using 1."));
        assert_eq!(session.library.book("111").unwrap().quantity(), 1);
    }

    #[test]
    fn test_add_book_merges() {
        let mut session = session();
        let mut prompter = NoPrompt;
        add_book(&mut Fields::new(args("Dune|Herbert|111|SciFi|2"), &mut prompter), &mut session).unwrap();
        let output = add_book(&mut Fields::new(args("Other|Other|111|Other|3"), &mut prompter), &mut session).unwrap();

        assert_eq!(output, "✓ Existing book found. Increased quantity to 5.");
        assert_eq!(session.library.book("111").unwrap().title(), "Dune");
    }

    #[test]
    fn test_add_book_requires_isbn() {
        let mut session = session();
        let mut prompter = NoPrompt;
        let result = add_book(&mut Fields::new(args("Dune|Herbert"), &mut prompter), &mut session);
        assert!(matches!(result, Err(CliError::InvalidInput(_))));
        assert_eq!(session.library.book_count(), 0);
    }

    #[test]
    fn test_update_book_keeps_blank_fields() {
        let mut session = session();
        session.library.add_book(Book::new("Dune", "Herbert", "111", "SciFi", 2));
        let mut prompter = NoPrompt;

        let output = update_book(&mut Fields::new(args("111||Frank Herbert||4"), &mut prompter), &mut session).unwrap();
        assert_eq!(output, "ℹ Quantity updated from 2 to 4.\n✓ Book updated.");

        let book = session.library.book("111").unwrap();
        assert_eq!(book.title(), "Dune");
        assert_eq!(book.author(), "Frank Herbert");
    }

    #[test]
    fn test_update_unknown_book_does_not_prompt() {
        let mut session = session();
        let mut prompter = ScriptedPrompter::new(["999", "Title"]);
        let result = update_book(&mut Fields::new(Vec::new(), &mut prompter), &mut session);

        assert!(matches!(result, Err(CliError::Library(_))));
        assert_eq!(prompter.asked, vec!["ISBN"]);
    }

    #[test]
    fn test_search_fields() {
        let mut session = session();
        session.library.add_book(Book::new("Dune", "Frank Herbert", "111", "SciFi", 2));
        session.library.add_book(Book::new("Emma", "Jane Austen", "222", "Classic", 1));
        let mut prompter = NoPrompt;

        let output = search(&mut Fields::new(args("author frank herbert"), &mut prompter), &mut session).unwrap();
        assert_eq!(output, "111");

        let output = search(&mut Fields::new(Vec::new(), &mut prompter), &mut session).unwrap();
        assert_eq!(output, "111\n222");

        let result = search(&mut Fields::new(args("publisher x"), &mut prompter), &mut session);
        assert!(matches!(result, Err(CliError::InvalidInput(_))));
    }
}
