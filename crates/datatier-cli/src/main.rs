//! Datatier CLI - classify the sensitivity of tabular data columns

mod csv_source;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use datatier_ai::{ClassificationEngine, RemoteConfig};
use datatier_core::{ClassificationRequest, ClassificationResult, Label, UPLOADED_FILE};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "datatier")]
#[command(about = "Column sensitivity classification - Public, Restricted, Confidential, Top Secret")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Never call the remote classification service
    #[arg(long, global = true)]
    heuristic_only: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify every column of a CSV file
    Classify {
        /// Path to the CSV file
        path: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,

        /// Source type recorded on each result
        #[arg(long, default_value = UPLOADED_FILE)]
        source_type: String,
    },

    /// Classify a single column from sample values given on the command line
    Column {
        /// Column name
        #[arg(short, long)]
        name: String,

        /// Sample value (repeatable, first five are used)
        #[arg(short, long = "sample")]
        samples: Vec<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Print the sensitivity tiers
    Taxonomy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Classify {
            path,
            format,
            source_type,
        } => {
            let engine = build_engine(cli.heuristic_only)?;
            info!("Sampling columns from {:?}", path);
            let requests = csv_source::read_requests(&path, &source_type)?;
            let results = engine.classify_all(&requests).await;
            print_results(&results, format)?;
        }
        Commands::Column {
            name,
            samples,
            format,
        } => {
            let engine = build_engine(cli.heuristic_only)?;
            let request = ClassificationRequest::new(name, samples)?;
            let result = engine.classify(&request).await;
            print_results(&[result], format)?;
        }
        Commands::Taxonomy => {
            print!("{}", render_taxonomy());
        }
    }

    Ok(())
}

fn build_engine(heuristic_only: bool) -> Result<ClassificationEngine> {
    let config = if heuristic_only {
        RemoteConfig::disabled()
    } else {
        RemoteConfig::from_env()?
    };
    Ok(ClassificationEngine::new(config))
}

fn print_results(results: &[ClassificationResult], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(results)?),
        OutputFormat::Table => print!("{}", render_table(results)),
    }
    Ok(())
}

fn render_table(results: &[ClassificationResult]) -> String {
    let width = results
        .iter()
        .map(|r| r.column_name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Column".len());

    let mut out = format!("{:<width$}  {:<12}  {}\n", "Column", "Label", "Justification");
    for r in results {
        out.push_str(&format!(
            "{:<width$}  {:<12}  {}\n",
            r.column_name,
            r.label.as_str(),
            r.justification
        ));
    }
    out
}

fn render_taxonomy() -> String {
    Label::ALL
        .iter()
        .rev()
        .map(|label| format!("{:<12}  {}\n", label.as_str(), label.description()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_classify_command() {
        let cli = Cli::try_parse_from(["datatier", "classify", "data.csv", "--format", "json"]).unwrap();
        match cli.command {
            Commands::Classify {
                path,
                format,
                source_type,
            } => {
                assert_eq!(path, PathBuf::from("data.csv"));
                assert_eq!(format, OutputFormat::Json);
                assert_eq!(source_type, "uploaded file");
            }
            _ => panic!("expected classify"),
        }
    }

    #[test]
    fn parses_repeated_samples() {
        let cli = Cli::try_parse_from([
            "datatier",
            "--heuristic-only",
            "column",
            "--name",
            "contact",
            "-s",
            "a@b.com",
            "--sample",
            "0555",
        ])
        .unwrap();
        assert!(cli.heuristic_only);
        match cli.command {
            Commands::Column { name, samples, .. } => {
                assert_eq!(name, "contact");
                assert_eq!(samples, vec!["a@b.com", "0555"]);
            }
            _ => panic!("expected column"),
        }
    }

    #[test]
    fn table_lists_each_column() {
        let req = ClassificationRequest::new("passport_no", vec![]).unwrap();
        let results = vec![ClassificationResult::for_request(
            &req,
            Label::TopSecret,
            "Matched pattern 'passport'",
        )];
        let table = render_table(&results);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Column"));
        assert!(lines[1].starts_with("passport_no  Top Secret"));
        assert!(lines[1].ends_with("Matched pattern 'passport'"));
    }

    #[test]
    fn taxonomy_lists_most_sensitive_first() {
        let taxonomy = render_taxonomy();
        let lines: Vec<&str> = taxonomy.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Top Secret"));
        assert!(lines[3].starts_with("Public"));
    }

    #[tokio::test]
    async fn heuristic_engine_classifies_column() {
        let engine = build_engine(true).unwrap();
        let request = ClassificationRequest::new("c", vec!["bank iban".to_string()]).unwrap();
        assert_eq!(engine.classify(&request).await.label, Label::Confidential);
    }
}
