//! `tokenforge` command-line front end.
//!
//! Reads local files, hands their text to the `tokenforge` library and prints
//! the result. All filesystem access lives here.

mod output;

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use console::{style, Term};
use tokenforge::{
    detect_format, import_sources, parse_token_json, to_simple_tokens, Classifier,
    ColorKeywords, ImportOptions, ImportReport, Source, SourceKind,
};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::output::{render, Classification, OutputFormat};

#[derive(Debug, Parser)]
#[command(name = "tokenforge", version, about = "Extract and normalize design tokens")]
struct Cli {
    /// Log debug output to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Extract tokens from Tailwind configs, CSS and token JSON files
    Extract(ExtractArgs),
    /// Parse pasted token JSON and print an import report
    Parse {
        /// File to read, or `-` for stdin
        input: String,
    },
    /// Print the category each key is assigned to
    Classify {
        #[arg(required = true)]
        keys: Vec<String>,
        /// Treat primary/secondary/accent/... as color keys
        #[arg(long)]
        semantic_roles: bool,
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Print the detected source kind and export format of a file
    Detect { file: PathBuf },
}

#[derive(Debug, Args)]
struct ExtractArgs {
    #[arg(required = true)]
    files: Vec<PathBuf>,
    /// Print the flat `key -> value` form
    #[arg(long)]
    simple: bool,
    #[arg(short, long, value_enum, default_value_t)]
    format: OutputFormat,
    /// YAML file with import options
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(status) => ExitCode::from(status),
        Err(err) => {
            let _ = Term::stderr().write_line(&format!("{} {:#}", style("error:").red().bold(), err));
            ExitCode::from(2)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .try_init();
}

/// Runs the selected command and returns the process exit status.
fn run(cli: Cli) -> Result<u8> {
    match cli.command {
        Command::Extract(args) => extract(&args),
        Command::Parse { input } => parse(&input),
        Command::Classify {
            keys,
            semantic_roles,
            format,
        } => classify(&keys, semantic_roles, format),
        Command::Detect { file } => detect(&file),
    }
}

fn extract(args: &ExtractArgs) -> Result<u8> {
    let options = match &args.config {
        Some(path) => load_options(path)?,
        None => ImportOptions::default(),
    };

    let inputs = args
        .files
        .iter()
        .map(|path| read_file(path).map(|text| (path.display().to_string(), text)))
        .collect::<Result<Vec<(String, String)>>>()?;
    let sources: Vec<Source<'_>> = inputs
        .iter()
        .map(|(name, text)| Source::new(name, text))
        .collect();

    let tokens = import_sources(&sources, &options);
    let count = tokens.token_count();

    let rendered = if args.simple {
        render(&to_simple_tokens(&tokens), args.format)?
    } else {
        render(&tokens, args.format)?
    };
    print_output(&rendered);

    let stderr = Term::stderr();
    if count == 0 {
        let _ = stderr.write_line(&format!(
            "{} no design tokens found in {} file(s)",
            style("warning:").yellow().bold(),
            sources.len()
        ));
        return Ok(1);
    }
    let _ = stderr.write_line(&format!(
        "{} {} token(s) from {} file(s)",
        style("extracted").green().bold(),
        count,
        sources.len()
    ));
    Ok(0)
}

fn parse(input: &str) -> Result<u8> {
    let text = if input == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        text
    } else {
        read_file(Path::new(input))?
    };

    let report = ImportReport::from(parse_token_json(&text));
    print_output(&serde_json::to_string_pretty(&report)?);
    Ok(if report.success { 0 } else { 1 })
}

fn classify(keys: &[String], semantic_roles: bool, format: OutputFormat) -> Result<u8> {
    let color_keywords = if semantic_roles {
        ColorKeywords::SemanticRoles
    } else {
        ColorKeywords::Legacy
    };
    let classifier = Classifier::new().with_color_keywords(color_keywords);
    let rows: Vec<Classification> = keys
        .iter()
        .map(|key| Classification::new(key, classifier.classify(key)))
        .collect();
    print_output(&render(&rows, format)?);
    Ok(0)
}

fn detect(file: &Path) -> Result<u8> {
    let text = read_file(file)?;
    let name = file.display().to_string();
    let Some(kind) = SourceKind::detect(&name, &text) else {
        println!("unknown");
        return Ok(1);
    };
    match kind {
        SourceKind::TokenJson | SourceKind::ExportJson => {
            let value: serde_json::Value = serde_json::from_str(&text)
                .with_context(|| format!("{} is not valid JSON", name))?;
            let format = detect_format(&value)
                .map(|f| f.to_string())
                .unwrap_or_else(|| "none".to_string());
            println!("{kind} ({format})");
        }
        _ => println!("{kind}"),
    }
    Ok(0)
}

fn load_options(path: &Path) -> Result<ImportOptions> {
    let text = read_file(path)?;
    let options = ImportOptions::from_yaml(&text)
        .with_context(|| format!("failed to load config {}", path.display()))?;
    debug!(?options, "loaded import options");
    Ok(options)
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn print_output(text: &str) {
    if text.ends_with('\n') {
        print!("{text}");
    } else {
        println!("{text}");
    }
}
