use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use codespan_reporting::term::termcolor::ColorChoice;
use colored::Colorize;
use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

use relang::emitter::{self, OutputFormat};
use relang::lexer::{ScanMode, Scanner};
use relang::{SourceState, TokenizePipeline};

const PROMPT: &str = ">> ";
const CONTINUATION_PROMPT: &str = ".. ";

#[derive(Parser)]
#[command(name = "relang")]
#[command(author, version, about = "The Re language tokenizer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Tokenize a Re source file and write the tokens out
    Tokenize {
        /// The source file to tokenize
        input: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Token output format
        #[arg(long, value_enum, default_value = "yaml")]
        format: OutputFormat,

        /// Exit with an error when any diagnostic was reported
        #[arg(long)]
        strict: bool,
    },

    /// Check a Re source file for lexical errors
    Check {
        /// The source file to check
        input: PathBuf,
    },

    /// Start an interactive REPL that prints tokens line by line
    Repl,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger_builder(cli.verbose).init();

    let result = match cli.command {
        Commands::Tokenize {
            input,
            output,
            format,
            strict,
        } => tokenize(input, output, format, strict),
        Commands::Check { input } => check(input),
        Commands::Repl => {
            let stdin = io::stdin();
            repl(stdin.lock(), io::stdout())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {:#}", "error".red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}

/// `RUST_LOG` wins over the `info` default; `--verbose` raises it to debug
fn logger_builder(verbose: bool) -> env_logger::Builder {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder
}

fn tokenize(
    input: PathBuf,
    output: Option<PathBuf>,
    format: OutputFormat,
    strict: bool,
) -> Result<()> {
    let start = Instant::now();

    let state = SourceState::new(&input)
        .with_context(|| format!("Failed to load {:?}", input))?;
    let mut pipeline = TokenizePipeline::new(state);
    let tokens = pipeline.run();

    match &output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file {:?}", path))?;
            let mut writer = BufWriter::new(file);
            emitter::emit(&tokens, format, &mut writer)?;
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            emitter::emit(&tokens, format, &mut writer)?;
        }
    }

    pipeline.report_errors(ColorChoice::Auto)?;

    let elapsed = start.elapsed();
    if let Some(path) = &output {
        println!(
            "{}: wrote {} tokens to {:?}",
            "success".green().bold(),
            tokens.len(),
            path
        );
    }
    eprintln!("{}: tokenized in {:?}", "info".blue().bold(), elapsed);

    if strict && pipeline.state().has_errors() {
        anyhow::bail!(
            "{} lexical error(s) in {:?}",
            pipeline.state().error_count(),
            input
        );
    }

    Ok(())
}

fn check(input: PathBuf) -> Result<()> {
    log::info!("Checking {:?}", input);

    let state = SourceState::new(&input)
        .with_context(|| format!("Failed to load {:?}", input))?;
    let mut pipeline = TokenizePipeline::new(state);
    pipeline.run();
    pipeline.report_errors(ColorChoice::Auto)?;

    if pipeline.state().has_errors() {
        anyhow::bail!("Lexical analysis failed");
    }

    println!("{}: No errors found", "success".green().bold());
    Ok(())
}

/// Read lines from `input` into one long-lived scanner so backtick strings
/// and block comments can continue across prompts.
fn repl<R: BufRead, W: Write>(input: R, mut out: W) -> Result<()> {
    let mut scanner = Scanner::new();
    let mut reported = 0;
    let mut lines = input.lines();

    loop {
        let prompt = match scanner.mode() {
            ScanMode::Normal => PROMPT,
            _ => CONTINUATION_PROMPT,
        };
        write!(out, "{}", prompt)?;
        out.flush()?;

        let Some(line) = lines.next() else {
            writeln!(out)?;
            break;
        };
        let line = line.context("Failed to read from stdin")?;

        if matches!(line.trim(), ":quit" | ":q") && *scanner.mode() == ScanMode::Normal {
            break;
        }

        for token in scanner.scan_line(&line) {
            writeln!(out, "{:?}", token)?;
        }
        reported = print_new_diagnostics(&scanner, reported, &mut out)?;
    }

    scanner.finish();
    print_new_diagnostics(&scanner, reported, &mut out)?;
    Ok(())
}

fn print_new_diagnostics<W: Write>(scanner: &Scanner, reported: usize, out: &mut W) -> Result<usize> {
    let messages = scanner.messages();
    for message in &messages[reported..] {
        writeln!(out, "{}", message.red())?;
    }
    Ok(messages.len())
}
