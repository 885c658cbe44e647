//! Libris CLI - Command-line front-end for the Libris library catalog.

use clap::Parser;
use libris_cli::{repl, script};
use libris_cli::{Cli, Command, Config, Formatter, Session};
use libris_domain::Library;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> libris_cli::Result<()> {
    // Load or create config
    let config_path = match cli.config {
        Some(path) => path,
        None => Config::path()?,
    };
    let config = if config_path.exists() {
        Config::load_from(&config_path)?
    } else {
        let cfg = Config::default();
        cfg.save_to(&config_path).ok();
        cfg
    };

    // Command-line overrides
    let format = cli.format.map(Into::into).unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let mut lending = config.lending;
    if let Some(days) = cli.loan_days {
        lending.default_loan_days = days;
    }

    let formatter = Formatter::new(format, color_enabled);
    let mut session = Session::new(Library::new(), formatter, lending);

    match cli.command {
        None | Some(Command::Repl) => {
            repl::run_repl(&mut session, config.settings.history_size)?;
        }
        Some(Command::Menu) => {
            repl::run_menu(&mut session, config.settings.history_size)?;
        }
        Some(Command::Run(args)) => {
            let summary = {
                let mut stdout = std::io::stdout().lock();
                script::run_script(&args.file, &mut session, &mut stdout)?
            };
            println!(
                "{}",
                session.formatter.info(&format!(
                    "{} command(s) succeeded, {} rejected",
                    summary.succeeded, summary.failed
                ))
            );
        }
    }

    Ok(())
}

/// Log to stderr. `LIBRIS_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_env("LIBRIS_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}
