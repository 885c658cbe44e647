//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use chrono::{DateTime, Local, Utc};
use colored::*;
use libris_domain::{Book, Borrower, Loan, OverdueLoan};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Timestamp layout for due dates
const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Day-only layout used in the overdue report
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format a book listing.
    pub fn format_books(&self, books: &[Book]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(books)?),
            OutputFormat::Quiet => Ok(join_lines(books.iter().map(Book::isbn))),
            OutputFormat::Table => {
                if books.is_empty() {
                    return Ok(self.colorize("No results found.", "yellow"));
                }
                let rows = books.iter().map(|b| {
                    vec![
                        b.isbn().to_string(),
                        b.title().to_string(),
                        b.author().to_string(),
                        b.genre().to_string(),
                        b.quantity().to_string(),
                        b.availability().to_string(),
                    ]
                });
                Ok(render_table(["ISBN", "Title", "Author", "Genre", "Qty", "Status"], rows))
            }
        }
    }

    /// Format a borrower listing.
    pub fn format_borrowers(&self, borrowers: &[Borrower]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(borrowers)?),
            OutputFormat::Quiet => Ok(join_lines(borrowers.iter().map(Borrower::membership_id))),
            OutputFormat::Table => {
                if borrowers.is_empty() {
                    return Ok(self.colorize("No borrowers registered.", "yellow"));
                }
                let rows = borrowers.iter().map(|b| {
                    vec![
                        b.membership_id().to_string(),
                        b.name().to_string(),
                        b.contact().to_string(),
                        b.loans().len().to_string(),
                    ]
                });
                Ok(render_table(["ID", "Name", "Contact", "Loans"], rows))
            }
        }
    }

    /// Format one borrower's loans.
    pub fn format_loans(&self, loans: &[Loan]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(loans)?),
            OutputFormat::Quiet => Ok(join_lines(loans.iter().map(|l| l.isbn.as_str()))),
            OutputFormat::Table => {
                if loans.is_empty() {
                    return Ok(self.colorize("No borrowed books.", "yellow"));
                }
                let rows = loans
                    .iter()
                    .map(|l| vec![l.isbn.clone(), format_due(&l.due_date, DATE_TIME_FORMAT)]);
                Ok(render_table(["ISBN", "Due"], rows))
            }
        }
    }

    /// Format the overdue report.
    pub fn format_overdue(&self, overdue: &[OverdueLoan]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(overdue)?),
            OutputFormat::Quiet => Ok(overdue
                .iter()
                .map(|o| format!("{}\t{}", o.borrower.membership_id(), o.isbn))
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if overdue.is_empty() {
                    return Ok(self.colorize("No overdue items.", "green"));
                }
                let rows = overdue.iter().map(|o| {
                    vec![
                        o.borrower.name().to_string(),
                        o.borrower.membership_id().to_string(),
                        o.isbn.clone(),
                        format_due(&o.due_date, DATE_FORMAT),
                        o.days_overdue.to_string(),
                    ]
                });
                Ok(render_table(["Borrower", "ID", "ISBN", "Due", "Days overdue"], rows))
            }
        }
    }

    /// Format a due date for a confirmation message.
    pub fn due_date(&self, due: &DateTime<Utc>) -> String {
        format_due(due, DATE_TIME_FORMAT)
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

fn format_due(due: &DateTime<Utc>, layout: &str) -> String {
    due.with_timezone(&Local).format(layout).to_string()
}

fn join_lines<'a>(keys: impl Iterator<Item = &'a str>) -> String {
    keys.collect::<Vec<_>>().join("\n")
}

fn render_table<const N: usize>(header: [&str; N], rows: impl Iterator<Item = Vec<String>>) -> String {
    let mut builder = Builder::default();
    builder.push_record(header);
    for row in rows {
        builder.push_record(row);
    }

    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}
