use std::io;
use std::path::PathBuf;
use std::process;

use clap::{CommandFactory, Parser};
use clap_complete::Shell;

use neartest::config::Settings;
use neartest::error::NeartestError;
use neartest::terminal::TerminalSelector;
use neartest::types::{Convention, Granularity, SourceLocation};

/// neartest — run the Python test nearest the cursor.
/// Resolves the enclosing test method/class/suite at FILE:LINE and builds
/// the runner command for django, nose, or setup.py conventions.
#[derive(Parser)]
#[command(name = "neartest", version, about)]
struct Cli {
    /// Python source file the cursor is in.
    file: Option<PathBuf>,

    /// 1-based cursor line.
    #[arg(long)]
    line: Option<usize>,

    /// 1-based cursor column.
    #[arg(long, default_value_t = 1)]
    col: usize,

    /// Byte offset of the cursor (alternative to --line/--col).
    #[arg(long, conflicts_with_all = ["line", "col"])]
    offset: Option<usize>,

    /// Scope of the run: the single method, its class, or the suite.
    #[arg(long, value_enum, default_value_t = Granularity::Method)]
    granularity: Granularity,

    /// Test framework convention. Defaults to the settings file, then django.
    #[arg(long, value_enum)]
    convention: Option<Convention>,

    /// Project root override (otherwise discovered via setup.py/settings.py).
    #[arg(long)]
    project_root: Option<PathBuf>,

    /// virtualenvwrapper environment to activate before running.
    #[arg(long)]
    virtualenv: Option<String>,

    /// Terminal emulator to launch in (overrides detection, never cached).
    #[arg(long)]
    terminal: Option<String>,

    /// Explicit settings file (otherwise the nearest .neartest.toml).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Machine-readable JSON output.
    #[arg(long)]
    json: bool,

    /// Launch the command instead of printing it.
    #[arg(long)]
    run: bool,

    /// Print shell completions for the given shell.
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

fn main() {
    let mut cli = Cli::parse();

    // Shell completions
    if let Some(shell) = cli.completions {
        clap_complete::generate(shell, &mut Cli::command(), "neartest", &mut io::stdout());
        return;
    }

    let Some(file) = cli.file.take() else {
        eprintln!("usage: neartest <FILE> --line N [--granularity method|class|suite]");
        process::exit(neartest::error::EXIT_USAGE);
    };

    if let Err(e) = run(&cli, file) {
        eprintln!("{e}");
        process::exit(e.exit_code());
    }
}

fn run(cli: &Cli, file: PathBuf) -> Result<(), NeartestError> {
    let file = file.canonicalize().unwrap_or(file);

    // Settings file first, CLI flags on top.
    let mut settings = Settings::load(cli.config.as_deref(), &file)?;
    if cli.project_root.is_some() {
        settings.project_root.clone_from(&cli.project_root);
    }
    if cli.virtualenv.is_some() {
        settings.virtualenv.clone_from(&cli.virtualenv);
    }

    let convention = cli
        .convention
        .or(settings.convention)
        .unwrap_or(Convention::Django);

    let location = match (cli.offset, cli.line) {
        (Some(offset), _) => SourceLocation::new(file, offset),
        (None, Some(line)) => SourceLocation::at_line(file, line, cli.col)?,
        (None, None) => {
            eprintln!("usage: neartest <FILE> --line N (or --offset BYTES)");
            process::exit(neartest::error::EXIT_USAGE);
        }
    };

    let selector = TerminalSelector::new();
    let prepared = neartest::prepare(
        &location,
        convention,
        cli.granularity,
        &settings,
        &selector,
        cli.terminal.as_deref(),
    )?;

    // No test above the cursor, or no project boundary: a quiet no-op.
    let Some(test_run) = prepared else {
        return Ok(());
    };

    if cli.run {
        let output = neartest::command::spawn(&test_run.command)?;
        print!("{output}");
        return Ok(());
    }

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&test_run).expect("TestRun is always serializable")
        );
    } else {
        println!("{}", test_run.command);
    }

    Ok(())
}
