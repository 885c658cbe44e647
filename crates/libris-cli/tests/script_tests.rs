//! Integration tests for libris-cli
//!
//! Drive a whole session through script files, the same path `libris run` uses.

use chrono::{Duration, TimeZone, Utc};
use libris_cli::commands::Action;
use libris_cli::config::{LendingSettings, OutputFormat};
use libris_cli::prompt::ScriptedPrompter;
use libris_cli::repl::run_action;
use libris_cli::script::{run_lines, run_script, ScriptSummary};
use libris_cli::{Formatter, Session};
use libris_domain::{Clock, Library, ManualClock};
use std::io::Write;
use tempfile::NamedTempFile;

fn session(format: OutputFormat) -> (Session<ManualClock>, ManualClock) {
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2026, 10, 1, 12, 0, 0).unwrap());
    let session = Session::new(
        Library::with_clock(clock.clone()),
        Formatter::new(format, false),
        LendingSettings::default(),
    );
    (session, clock)
}

#[test]
fn test_script_file_lending_cycle() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "# catalog").unwrap();
    writeln!(file, "add-book Dune|Herbert|111|SciFi|2").unwrap();
    writeln!(file, "add-borrower Alice|a@x|M1").unwrap();
    writeln!(file, "borrow M1 111 14").unwrap();
    writeln!(file, "borrow M1 111").unwrap();
    writeln!(file, "borrow M1 111 1").unwrap();
    writeln!(file, "return M1 111").unwrap();

    let (mut session, _) = session(OutputFormat::Table);
    let mut out = Vec::new();
    let summary = run_script(file.path(), &mut session, &mut out).unwrap();

    assert_eq!(summary, ScriptSummary { succeeded: 5, failed: 1 });
    let output = String::from_utf8(out).unwrap();
    assert!(output.contains("✗ Book is out of stock."));
    assert!(output.contains("✓ Book returned successfully."));
    assert_eq!(session.library.book("111").unwrap().quantity(), 1);
    assert_eq!(session.library.borrower_status("M1").unwrap().len(), 1);
}

#[test]
fn test_search_output_as_json() {
    let (mut session, _) = session(OutputFormat::Json);
    let mut out = Vec::new();
    let script = [
        "add-book Dune|Herbert|111|SciFi|2",
        "add-book Emma|Austen|222|Classic|1",
        "search title DUNE",
    ];

    run_lines(script, &mut session, &mut out).unwrap();

    let output = String::from_utf8(out).unwrap();
    let json_start = output.find('[').unwrap();
    let hits: serde_json::Value = serde_json::from_str(&output[json_start..]).unwrap();
    assert_eq!(hits.as_array().unwrap().len(), 1);
    assert_eq!(hits[0]["title"], "Dune");
}

#[test]
fn test_overdue_report_after_time_passes() {
    let (mut session, clock) = session(OutputFormat::Quiet);
    let mut out = Vec::new();
    let setup = [
        "add-book Dune|Herbert|111|SciFi|2",
        "add-borrower Alice|a@x|M1",
        "add-borrower Bob|b@x|M2",
        "borrow M1 111 1",
        "borrow M2 111 30",
    ];
    run_lines(setup, &mut session, &mut out).unwrap();

    clock.advance(Duration::days(3));
    let mut report = Vec::new();
    run_lines(["overdue"], &mut session, &mut report).unwrap();

    assert_eq!(String::from_utf8(report).unwrap(), "M1\t111\n");
}

#[test]
fn test_member_removal_rules() {
    let (mut session, _) = session(OutputFormat::Quiet);
    let mut out = Vec::new();
    let script = [
        "add-book Dune|Herbert|111|SciFi|1",
        "add-borrower Alice|a@x|M1",
        "borrow M1 111",
        "remove-borrower M1",
        "return M1 111",
        "remove-borrower M1",
        "add-borrower Alice|new@x|M1",
    ];

    let summary = run_lines(script, &mut session, &mut out).unwrap();
    assert_eq!(summary, ScriptSummary { succeeded: 6, failed: 1 });
    assert_eq!(session.library.borrower("M1").unwrap().contact(), "new@x");
}

#[test]
fn test_missing_required_field_aborts() {
    let (mut session, _) = session(OutputFormat::Quiet);
    let mut out = Vec::new();

    let result = run_lines(["add-borrower Alice|a@x", "books"], &mut session, &mut out);
    assert!(matches!(result, Err(libris_cli::CliError::Script { line: 1, .. })));
}

#[test]
fn test_missing_fields_are_prompted_for() {
    let (mut session, clock) = session(OutputFormat::Quiet);
    let mut out = Vec::new();
    run_lines(
        ["add-book Dune|Herbert|111|SciFi|2", "add-borrower Alice|a@x|M1"],
        &mut session,
        &mut out,
    )
    .unwrap();

    let mut prompter = ScriptedPrompter::new(["111", ""]);
    let output = run_action(Action::Borrow, vec!["M1".to_string()], &mut prompter, &mut session).unwrap();

    assert_eq!(prompter.asked, vec!["ISBN", "Days to borrow (default 14)"]);
    assert!(output.starts_with("✓ Book borrowed."));
    let loans = session.library.borrower_status("M1").unwrap();
    assert_eq!(loans[0].due_date, clock.now() + Duration::days(14));
}

#[test]
fn test_prompted_return_of_uncataloged_isbn() {
    let (mut session, _) = session(OutputFormat::Quiet);
    let mut out = Vec::new();
    run_lines(["add-borrower Alice|a@x|M1"], &mut session, &mut out).unwrap();

    let mut prompter = ScriptedPrompter::new(["M1", "999"]);
    let err = run_action(Action::Return, Vec::new(), &mut prompter, &mut session).unwrap_err();

    assert_eq!(err.to_string(), "Book not found in library records.");
}
