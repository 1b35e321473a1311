//! GeoQA command line
//!
//! # Usage
//!
//! ```bash
//! # Answer one question (classifier, linker and SPARQL endpoint from config)
//! geoqa ask "Which parks are in Walle?"
//!
//! # Answer every benchmark question and report coverage
//! geoqa benchmark data/geoqa_benchmark.json
//!
//! # Print generated queries for an offline linking result, no execution
//! geoqa queries "Are there any driving schools in Blumenthal?" \
//!     --operator Containment --linking linking.json
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use geoqa::benchmark::BenchmarkDataset;
use geoqa::generator::QueryGenerator;
use geoqa::nlp::{LexiconParser, QuestionParser};
use geoqa::{clean_question, GeoOperator, LinkingResult, Orchestrator, Settings, TemplateCatalog};
use geoqa_types::LinkingResponse;

#[derive(Parser)]
#[command(name = "geoqa")]
#[command(version = "0.1.0")]
#[command(about = "Geographic question answering over GeoSPARQL")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, short = 'o', global = true, default_value = "pretty", value_enum)]
    format: OutputFormat,

    /// Settings file (overrides GEOQA_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a single question
    Ask {
        question: String,

        #[arg(long, default_value = "en")]
        lang: String,
    },

    /// Answer every question of a QALD-style benchmark file
    Benchmark {
        file: PathBuf,
    },

    /// Generate queries for a question from a saved linking result
    Queries {
        question: String,

        /// Geo-operator: Borders, Containment, Crossing or Proximity
        #[arg(long)]
        operator: String,

        /// Linker response JSON
        #[arg(long)]
        linking: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Ask { question, lang } => cmd_ask(cli.config, &question, &lang, cli.format).await,
        Commands::Benchmark { file } => cmd_benchmark(cli.config, file, cli.format).await,
        Commands::Queries {
            question,
            operator,
            linking,
        } => cmd_queries(cli.config, &question, &operator, linking, cli.format),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_settings(path: Option<PathBuf>) -> Result<Settings> {
    let settings = match path {
        Some(path) => {
            let mut settings = Settings::load(&path)?;
            settings.apply_overrides(|key| std::env::var(key).ok());
            settings
        }
        None => Settings::from_env()?,
    };
    Ok(settings)
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

async fn cmd_ask(
    config: Option<PathBuf>,
    question: &str,
    lang: &str,
    format: OutputFormat,
) -> Result<()> {
    let settings = load_settings(config)?;
    let orchestrator = Orchestrator::from_settings(&settings)?;
    let answer = orchestrator.answer(question, lang).await;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&answer.result())?);
        }
        OutputFormat::Pretty => {
            println!("Question: {}", answer.question);
            if let Some(op) = answer.geo_operator {
                println!("Operator: {}", op);
            }
            match answer.selected() {
                Some(top) => {
                    println!("Candidates: {}", answer.ranked.len());
                    println!("Score: {:.1}", top.ranking_score);
                    println!("Query:\n{}\n", top.query.query);
                    println!("{}", serde_json::to_string_pretty(&top.result)?);
                }
                None => println!("No answer"),
            }
        }
    }
    Ok(())
}

async fn cmd_benchmark(config: Option<PathBuf>, file: PathBuf, format: OutputFormat) -> Result<()> {
    let settings = load_settings(config)?;
    let orchestrator = Orchestrator::from_settings(&settings)?;
    let dataset = BenchmarkDataset::load(&file)?;

    let questions = dataset.question_texts();
    let mut answered = 0;
    let mut rows = Vec::with_capacity(questions.len());
    for question in &questions {
        let answer = orchestrator.answer(question, "en").await;
        if answer.is_answered() {
            answered += 1;
        }
        if format == OutputFormat::Pretty {
            println!(
                "[{}] {}",
                if answer.is_answered() { "+" } else { "-" },
                answer.question
            );
        }
        rows.push(serde_json::json!({
            "question": answer.question,
            "answered": answer.is_answered(),
            "query": answer.selected().map(|s| s.query.query.clone()),
        }));
    }

    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "total": questions.len(),
                "answered": answered,
                "questions": rows,
            }))?
        ),
        OutputFormat::Pretty => {
            println!("\nAnswered {} of {} questions", answered, questions.len())
        }
    }
    Ok(())
}

fn cmd_queries(
    config: Option<PathBuf>,
    question: &str,
    operator: &str,
    linking: PathBuf,
    format: OutputFormat,
) -> Result<()> {
    let settings = load_settings(config)?;
    let operator: GeoOperator = operator.parse()?;

    let content = std::fs::read_to_string(&linking)
        .with_context(|| format!("Failed to read {}", linking.display()))?;
    let response: LinkingResponse =
        serde_json::from_str(&content).context("Failed to parse linking result")?;
    let linking = LinkingResult::from(response);

    let catalog = Arc::new(TemplateCatalog::from_settings(&settings.templates)?);
    let generator = QueryGenerator::new(catalog);
    let parsed = LexiconParser::new().parse(&clean_question(question));
    let queries = generator.generate(operator, &parsed, &linking);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&queries)?),
        OutputFormat::Pretty => {
            for (i, q) in queries.iter().enumerate() {
                println!("-- [{}] {} ({} candidates)", i, q.form.keyword(), q.used.len());
                println!("{}\n", q.query);
            }
            println!("{} queries", queries.len());
        }
    }
    Ok(())
}
