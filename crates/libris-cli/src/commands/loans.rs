//! Lending commands.

use super::count_or_default;
use crate::error::Result;
use crate::prompt::Fields;
use crate::session::Session;
use libris_domain::Clock;

/// Execute the borrow command.
pub fn borrow<C: Clock>(fields: &mut Fields<'_>, session: &mut Session<C>) -> Result<String> {
    let membership_id = fields.required("Membership ID")?;
    let isbn = fields.required("ISBN")?;
    let default_days = session.lending.default_loan_days;
    let (days, note) = count_or_default(
        fields.optional(&format!("Days to borrow (default {})", default_days))?,
        default_days,
        "loan period",
    );

    let due = session.library.borrow_book(&membership_id, &isbn, days)?;

    let mut lines = Vec::new();
    if let Some(note) = note {
        lines.push(session.formatter.warning(&note));
    }
    lines.push(
        session
            .formatter
            .success(&format!("Book borrowed. Due date: {}.", session.formatter.due_date(&due))),
    );
    Ok(lines.join("\n"))
}

/// Execute the return command.
pub fn return_book<C: Clock>(fields: &mut Fields<'_>, session: &mut Session<C>) -> Result<String> {
    let membership_id = fields.required("Membership ID")?;
    let isbn = fields.required("ISBN")?;

    session.library.return_book(&membership_id, &isbn)?;
    Ok(session.formatter.success("Book returned successfully."))
}

/// Execute the overdue command.
pub fn overdue<C: Clock>(session: &mut Session<C>) -> Result<String> {
    session.formatter.format_overdue(&session.library.list_overdue())
}
