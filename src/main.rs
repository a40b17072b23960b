use anyhow::{Context, Result};
use bookid::config::{find_config_file, load_config, Config};
use bookid::models::BookResult;
use bookid::search::{BookFinder, SearchOutcome};
use bookid::sources::GoogleBooksSource;
use clap::{Parser, ValueEnum};
use serde::Serialize;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// bookid - Identify a book from an ISBN, a title or "title by author"
#[derive(Parser, Debug)]
#[command(name = "bookid")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Identify a book from an ISBN, a title or \"title by author\"", long_about = None)]
struct Cli {
    /// Search query; multiple words are joined with spaces
    #[arg(required = true, num_args = 1..)]
    query: Vec<String>,

    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress everything but errors on stderr
    #[arg(long, short)]
    quiet: bool,

    /// Output format
    #[arg(long, short, value_enum, default_value_t = OutputFormat::Auto)]
    output: OutputFormat,

    /// Print every candidate instead of only the top one
    #[arg(long)]
    all: bool,

    /// Keep the raw Google Books record in JSON output
    #[arg(long)]
    raw: bool,

    /// Configuration file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Search timeout in seconds (overrides configuration)
    #[arg(long)]
    timeout: Option<u64>,

    /// Google Books API key (overrides configuration)
    #[arg(long)]
    api_key: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Automatic based on terminal (table if TTY, JSON otherwise)
    Auto,
    /// Table format (human-readable)
    Table,
    /// JSON format (machine-readable)
    Json,
    /// Plain text format
    Plain,
}

impl OutputFormat {
    /// Pick a concrete format; `Auto` means table on a terminal, JSON otherwise
    fn resolve(self, is_terminal: bool) -> OutputFormat {
        match self {
            OutputFormat::Auto if is_terminal => OutputFormat::Table,
            OutputFormat::Auto => OutputFormat::Json,
            other => other,
        }
    }
}

#[derive(Serialize)]
struct TopResultOutput<'a> {
    query: &'a str,
    result: Option<&'a BookResult>,
}

#[derive(Serialize)]
struct AllResultsOutput<'a> {
    query: &'a str,
    results: &'a [BookResult],
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("error: {:#}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    let query = cli.query.join(" ");
    let config = resolve_config(&cli)?;

    let source = GoogleBooksSource::new(&config.google_books)
        .context("creating Google Books client")?;
    let finder = BookFinder::new(Arc::new(source), config.timeout());

    let mut outcome = finder
        .search_detailed(&query)
        .await
        .context("searching for books")?;

    if !cli.raw {
        outcome.results = outcome
            .results
            .into_iter()
            .map(BookResult::without_raw)
            .collect();
    }

    output_results(&query, &outcome, &cli)
}

fn init_tracing(cli: &Cli) {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let env_filter = if cli.quiet { "error" } else { log_level };

    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| format!("bookid={}", env_filter)),
    );

    let registry = tracing_subscriber::registry().with(filter);
    if cli.log_json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn resolve_config(cli: &Cli) -> Result<Config> {
    let config_path = match &cli.config {
        Some(path) => Some(path.clone()),
        None => find_config_file(),
    };
    if let Some(path) = &config_path {
        tracing::info!("Using config file: {}", path.display());
    }

    let mut config = load_config(config_path.as_deref()).context("loading configuration")?;

    if let Some(secs) = cli.timeout {
        config.timeout_secs = secs as f64;
    }
    if let Some(key) = &cli.api_key {
        config.google_books.api_key = Some(key.clone());
    }

    Ok(config)
}

fn output_results(query: &str, outcome: &SearchOutcome, cli: &Cli) -> Result<()> {
    let format = cli.output.resolve(std::io::stdout().is_terminal());

    let results: &[BookResult] = if cli.all {
        &outcome.results
    } else {
        &outcome.results[..outcome.results.len().min(1)]
    };

    match format {
        OutputFormat::Json | OutputFormat::Auto => {
            // serde_json leaves '<', '>' and '&' unescaped
            let json = if cli.all {
                serde_json::to_string_pretty(&AllResultsOutput { query, results })
            } else {
                serde_json::to_string_pretty(&TopResultOutput {
                    query,
                    result: results.first(),
                })
            }
            .context("encoding JSON output")?;
            println!("{}", json);
        }
        OutputFormat::Plain => {
            if results.is_empty() {
                println!("No results for \"{}\"", query);
            }
            for result in results {
                println!("{} - {}", result.title, result.author_line());
                if let Some(isbn) = result.primary_isbn() {
                    println!("  ISBN: {}", isbn);
                }
                if let Some(publisher) = &result.publisher {
                    println!("  Publisher: {}", publisher);
                }
                if let Some(year) = result.published_year {
                    println!("  Year: {}", year);
                }
                println!(
                    "  Confidence: {:.2} ({})",
                    result.confidence, result.search_type
                );
                println!();
            }
        }
        OutputFormat::Table => {
            use comfy_table::{Attribute, Cell, Table};
            let mut table = Table::new();
            table.load_preset(comfy_table::presets::UTF8_FULL);
            table.set_header(vec!["Title", "Authors", "ISBN", "Year", "Confidence"]);

            for result in results {
                table.add_row(vec![
                    Cell::new(truncate(&result.title, 50)).add_attribute(Attribute::Bold),
                    Cell::new(truncate(&result.author_line(), 30)),
                    Cell::new(result.primary_isbn().unwrap_or("")),
                    Cell::new(
                        result
                            .published_year
                            .map(|y| y.to_string())
                            .unwrap_or_default(),
                    ),
                    Cell::new(format!("{:.2}", result.confidence)),
                ]);
            }
            println!("{table}");
            println!(
                "Search mode: {} ({})",
                outcome.classified.mode, outcome.classified.query
            );
        }
    }

    Ok(())
}

/// Shorten `text` to at most `max` characters, marking the cut with "..."
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let kept: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_query_words_are_collected() {
        let cli = Cli::parse_from(["bookid", "The", "Great", "Gatsby"]);
        assert_eq!(cli.query.join(" "), "The Great Gatsby");
        assert_eq!(cli.verbose, 0);
        assert!(!cli.quiet);
        assert!(!cli.all);
        assert!(!cli.raw);
        assert_eq!(cli.output, OutputFormat::Auto);
        assert_eq!(cli.timeout, None);
    }

    #[test]
    fn test_cli_requires_query() {
        assert!(Cli::try_parse_from(["bookid"]).is_err());
    }

    #[test]
    fn test_cli_options() {
        let cli = Cli::parse_from([
            "bookid",
            "-vv",
            "--output",
            "json",
            "--all",
            "--raw",
            "--timeout",
            "5",
            "--api-key",
            "k",
            "9780743273565",
        ]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.output, OutputFormat::Json);
        assert!(cli.all);
        assert!(cli.raw);
        assert_eq!(cli.timeout, Some(5));
        assert_eq!(cli.api_key.as_deref(), Some("k"));
        assert_eq!(cli.query, vec!["9780743273565"]);
    }

    #[test]
    fn test_cli_config_flag() {
        let cli = Cli::parse_from(["bookid", "--config", "/path/to/bookid.toml", "Dune"]);
        assert_eq!(cli.config, Some(PathBuf::from("/path/to/bookid.toml")));
    }

    #[test]
    fn test_top_result_output_shape() {
        let output = TopResultOutput {
            query: "nothing",
            result: None,
        };
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["query"], "nothing");
        assert!(json["result"].is_null());
    }

    #[test]
    fn test_auto_format_resolution() {
        assert_eq!(OutputFormat::Auto.resolve(true), OutputFormat::Table);
        assert_eq!(OutputFormat::Auto.resolve(false), OutputFormat::Json);
        assert_eq!(OutputFormat::Plain.resolve(true), OutputFormat::Plain);
        assert_eq!(OutputFormat::Table.resolve(false), OutputFormat::Table);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghijkl", 8), "abcde...");
        assert_eq!(truncate("ñññññ", 4), "ñ...");
    }
}
