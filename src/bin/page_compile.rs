//! Page Compile CLI
//!
//! Compiles a composition document (YAML) into a published page.
//!
//! # Usage
//!
//! ```bash
//! # Compile a document and pretty-print the result
//! page_compile --file offer.yaml
//!
//! # Read from stdin, emit JSON
//! cat offer.yaml | page_compile -o json
//!
//! # Only print the compiled HTML
//! page_compile --file offer.yaml --html-only
//! ```

use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;

use crm_pages::{telemetry, CompositionDocument, CompositionResult, ConfigLoader};

#[derive(Parser)]
#[command(name = "page_compile")]
#[command(version = "0.1.0")]
#[command(about = "Compile master + content pages from a YAML composition document")]
#[command(long_about = None)]
struct Cli {
    /// Composition document (reads stdin if not provided)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Composer config file (overrides CRM_PAGES_CONFIG)
    #[arg(short, long, env = "CRM_PAGES_CONFIG")]
    config: Option<PathBuf>,

    /// Output format: json, text, or pretty (default)
    #[arg(long, short = 'o', default_value = "pretty", value_enum)]
    format: OutputFormat,

    /// Print only the compiled HTML
    #[arg(long)]
    html_only: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
    Pretty,
}

// =============================================================================
// MAIN
// =============================================================================

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    telemetry::init_tracing();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.format == OutputFormat::Json {
                let output = serde_json::json!({ "error": format!("{:#}", e) });
                println!("{}", output);
            } else {
                eprintln!("{}: {:#}", "error".red().bold(), e);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let loader = match &cli.config {
        Some(path) => ConfigLoader::new(path),
        None => ConfigLoader::from_env(),
    };
    let config = loader.load().context("loading composer config")?;

    let source = read_input(cli.file.as_ref())?;
    let document =
        CompositionDocument::from_yaml(&source).context("parsing composition document")?;
    let options = document.into_options(&config.recipient_key);

    let composer = config.build_composer().context("building composer")?;
    let result = composer.compile(&options).context("compiling page")?;

    if cli.html_only {
        println!("{}", result.compiled_page.html());
        return Ok(());
    }

    match cli.format {
        OutputFormat::Json => print_json(&result)?,
        OutputFormat::Text | OutputFormat::Pretty => print_pretty(&result, cli.format),
    }
    Ok(())
}

// =============================================================================
// OUTPUT
// =============================================================================

fn print_json(result: &CompositionResult) -> Result<()> {
    let output = serde_json::json!({
        "success": true,
        "master_page": result.master_page.as_ref().map(|p| &p.uri),
        "content_page": result.content_page.uri,
        "compiled_page": result.compiled_page,
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&output).context("serializing result")?
    );
    Ok(())
}

fn print_pretty(result: &CompositionResult, format: OutputFormat) {
    let page = &result.compiled_page;
    let heading = |s: &str| {
        if format == OutputFormat::Pretty {
            s.bold().to_string()
        } else {
            s.to_string()
        }
    };

    println!("{} {}", "OK".green(), page.uri);
    if let Some(master) = &result.master_page {
        println!("  master: {}", master.uri);
    }
    if let Some(name) = &page.name {
        println!("  name: {}", name);
    }
    if let Some(description) = &page.description {
        println!("  description: {}", description);
    }
    if !page.references.is_empty() {
        println!("{}", heading("references:"));
        for reference in &page.references {
            println!("  {:?} {}", reference.kind, reference.uri);
        }
    }
    println!("{}", heading("html:"));
    println!("{}", page.html());
    if !page.style().is_empty() {
        println!("{}", heading("css:"));
        println!("{}", page.style());
    }
}

fn read_input(file: Option<&PathBuf>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display())),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("reading stdin")?;
            Ok(buffer)
        }
    }
}
