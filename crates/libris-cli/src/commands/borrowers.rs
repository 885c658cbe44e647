//! Membership commands.

use crate::error::Result;
use crate::prompt::Fields;
use crate::session::Session;
use libris_domain::{Borrower, Clock};

/// Execute the add-borrower command.
pub fn add_borrower<C: Clock>(fields: &mut Fields<'_>, session: &mut Session<C>) -> Result<String> {
    let name = fields.text("Name")?;
    let contact = fields.text("Contact")?;
    let membership_id = fields.required("Membership ID")?;

    session
        .library
        .add_borrower(Borrower::new(name, contact, membership_id))?;
    Ok(session.formatter.success("Borrower added."))
}

/// Execute the update-contact command.
pub fn update_contact<C: Clock>(fields: &mut Fields<'_>, session: &mut Session<C>) -> Result<String> {
    let membership_id = fields.required("Membership ID")?;
    let contact = fields.rest("New contact")?;

    session.library.update_borrower_contact(&membership_id, &contact)?;
    Ok(session.formatter.success("Contact updated."))
}

/// Execute the remove-borrower command.
pub fn remove_borrower<C: Clock>(fields: &mut Fields<'_>, session: &mut Session<C>) -> Result<String> {
    let membership_id = fields.required("Membership ID")?;
    let borrower = session.library.remove_borrower(&membership_id)?;
    Ok(session.formatter.success(&format!("Borrower removed: {}", borrower)))
}

/// Execute the borrowers command.
pub fn list_borrowers<C: Clock>(session: &mut Session<C>) -> Result<String> {
    session.formatter.format_borrowers(&session.library.list_all_borrowers())
}

/// Execute the status command.
pub fn status<C: Clock>(fields: &mut Fields<'_>, session: &mut Session<C>) -> Result<String> {
    let membership_id = fields.required("Membership ID")?;
    let loans = session.library.borrower_status(&membership_id)?;
    session.formatter.format_loans(&loans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LendingSettings, OutputFormat};
    use crate::error::CliError;
    use crate::output::Formatter;
    use crate::prompt::{split_fields, NoPrompt};
    use libris_domain::{Book, ErrorKind, Library};

    fn session() -> Session {
        let mut library = Library::new();
        library.add_book(Book::new("Dune", "Herbert", "111", "SciFi", 2));
        Session::new(
            library,
            Formatter::new(OutputFormat::Table, false),
            LendingSettings::default(),
        )
    }

    fn run(
        command: fn(&mut Fields<'_>, &mut Session) -> Result<String>,
        line: &str,
        session: &mut Session,
    ) -> Result<String> {
        let mut prompter = NoPrompt;
        command(&mut Fields::new(split_fields(line), &mut prompter), session)
    }

    #[test]
    fn test_add_and_list() {
        let mut session = session();
        let output = run(add_borrower, "Alice Liddell|alice@example.org|M1", &mut session).unwrap();
        assert_eq!(output, "✓ Borrower added.");

        let output = list_borrowers(&mut session).unwrap();
        assert!(output.contains("Alice Liddell"));
        assert!(output.contains("alice@example.org"));
    }

    #[test]
    fn test_duplicate_membership_id() {
        let mut session = session();
        run(add_borrower, "Alice|a@x|M1", &mut session).unwrap();

        match run(add_borrower, "Alicia|b@x|M1", &mut session) {
            Err(CliError::Library(e)) => assert_eq!(e.kind(), ErrorKind::AlreadyExists),
            other => panic!("Expected AlreadyExists, got {:?}", other),
        }
    }

    #[test]
    fn test_update_contact_takes_rest_of_line() {
        let mut session = session();
        run(add_borrower, "Alice|a@x|M1", &mut session).unwrap();
        run(update_contact, "M1 12 Cherry Lane", &mut session).unwrap();

        assert_eq!(session.library.borrower("M1").unwrap().contact(), "12 Cherry Lane");
    }

    #[test]
    fn test_remove_blocked_by_loan() {
        let mut session = session();
        run(add_borrower, "Alice|a@x|M1", &mut session).unwrap();
        session.library.borrow_book("M1", "111", 14).unwrap();

        let result = run(remove_borrower, "M1", &mut session);
        assert!(matches!(result, Err(CliError::Library(_))));

        let output = run(status, "M1", &mut session).unwrap();
        assert!(output.contains("111"));
    }

    #[test]
    fn test_status_without_loans() {
        let mut session = session();
        run(add_borrower, "Alice|a@x|M1", &mut session).unwrap();
        assert_eq!(run(status, "M1", &mut session).unwrap(), "No borrowed books.");

        let output = run(remove_borrower, "M1", &mut session).unwrap();
        assert_eq!(output, "✓ Borrower removed: Alice (ID: M1, Contact: a@x)");
    }
}
