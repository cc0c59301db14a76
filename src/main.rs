use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use pretty_diff::{DiffOptions, Granularity, PrettyDiffError, Style};
use std::fs;
use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "pretty-diff")]
#[command(about = "Character, word and line diffs with readable markers")]
#[command(version)]
struct Cli {
    /// When to colour output instead of using bracket markers
    #[arg(long, value_enum, global = true, default_value_t = ColorChoice::Never)]
    color: ColorChoice,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ColorChoice {
    Never,
    Auto,
    Always,
}

#[derive(Subcommand)]
enum Commands {
    /// Diff two files character by character
    Chars {
        old: PathBuf,
        new: PathBuf,
        /// Mark whitespace-only changes with [~ ~] and {~ ~}
        #[arg(short = 'w', long)]
        highlight_whitespace: bool,
    },
    /// Diff two files word by word
    Words {
        old: PathBuf,
        new: PathBuf,
        /// Mark whitespace-only changes with [~ ~] and {~ ~}
        #[arg(short = 'w', long)]
        highlight_whitespace: bool,
    },
    /// Diff two files line by line
    Lines {
        old: PathBuf,
        new: PathBuf,
        /// Prefix rows with old and new line numbers
        #[arg(short = 'n', long)]
        line_numbers: bool,
        /// Show only this many unchanged lines around changes
        #[arg(short = 'U', long, value_name = "N")]
        context: Option<usize>,
        /// Mark blank line changes with [~ ~] and {~ ~}
        #[arg(short = 'w', long)]
        highlight_whitespace: bool,
    },
    /// Print shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Print the man page
    Man,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), PrettyDiffError> {
    let colour = match cli.color {
        ColorChoice::Never => false,
        ColorChoice::Always => true,
        ColorChoice::Auto => {
            std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
        }
    };
    let style = if colour { Style::Ansi } else { Style::Markup };

    let (granularity, old, new, options) = match cli.command {
        Commands::Chars {
            old,
            new,
            highlight_whitespace,
        } => (
            Granularity::Char,
            old,
            new,
            DiffOptions {
                highlight_whitespace,
                style,
                ..DiffOptions::default()
            },
        ),
        Commands::Words {
            old,
            new,
            highlight_whitespace,
        } => (
            Granularity::Word,
            old,
            new,
            DiffOptions {
                highlight_whitespace,
                style,
                ..DiffOptions::default()
            },
        ),
        Commands::Lines {
            old,
            new,
            line_numbers,
            context,
            highlight_whitespace,
        } => (
            Granularity::Line,
            old,
            new,
            DiffOptions {
                highlight_whitespace,
                show_line_numbers: line_numbers,
                context,
                style,
            },
        ),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "pretty-diff", &mut std::io::stdout());
            return Ok(());
        }
        Commands::Man => {
            let mut page = Vec::new();
            clap_mangen::Man::new(Cli::command())
                .render(&mut page)
                .map_err(|e| PrettyDiffError::WriteFailed {
                    message: e.to_string(),
                })?;
            return write_stdout(&page);
        }
    };

    log::debug!("{} diff of {} and {}", granularity, old.display(), new.display());

    let mut out = pretty_diff::diff_bytes(&read(&old)?, &read(&new)?, granularity, &options)?;
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    write_stdout(out.as_bytes())
}

fn read(path: &Path) -> Result<Vec<u8>, PrettyDiffError> {
    fs::read(path).map_err(|e| PrettyDiffError::ReadFailed {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

fn write_stdout(bytes: &[u8]) -> Result<(), PrettyDiffError> {
    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(bytes)
        .and_then(|()| stdout.flush())
        .map_err(|e| PrettyDiffError::WriteFailed {
            message: e.to_string(),
        })
}
