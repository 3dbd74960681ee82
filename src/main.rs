use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use topicboard::bundle::metadata::Method;
use topicboard::bundle::{self, BundleOptions, NamingOverride};
use topicboard::config::Config;
use topicboard::output::{chart, temporal, terminal};
use topicboard::store::source::source_for;
use topicboard::store::{TopicDataStore, DEFAULT_DOCUMENT_LIMIT, DEFAULT_WORD_LIMIT};

/// Topicboard: explore precomputed topic-modeling results.
///
/// Reads a dashboard bundle (coherence scores, top words, representative
/// documents, diversity metrics) and prints normalized views of it, or
/// assembles bundles from raw analysis folders.
#[derive(Parser)]
#[command(name = "topicboard", version, about)]
struct Cli {
    /// Bundle directory or http(s) base URL (overrides TOPICBOARD_SOURCE)
    #[arg(long, global = true)]
    source: Option<String>,

    /// Print JSON instead of formatted text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Query(QueryCommand),

    /// Print the temporal topic distribution as line-chart JSON
    Temporal {
        /// Read this CSV instead of the bundle's temporal distribution
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Assemble a dashboard bundle from one analysis folder
    Bundle {
        /// Analysis folder (e.g. to_generate_from/heart_failure_with_pagerank_nmtf_bpe_34)
        folder: PathBuf,

        /// Output directory (default: derived from the folder name)
        #[arg(long)]
        output: Option<PathBuf>,

        /// File prefix, for folders that don't follow the naming pattern
        #[arg(long, requires_all = ["method", "dataset"])]
        prefix: Option<String>,

        /// Method (nmtf or pnmf), used with --prefix
        #[arg(long)]
        method: Option<String>,

        /// Dataset name, used with --prefix
        #[arg(long)]
        dataset: Option<String>,
    },

    /// Assemble bundles for every analysis folder in a directory
    BundleAll {
        /// Directory of analysis folders (default: TOPICBOARD_GENERATE_FROM)
        dir: Option<PathBuf>,
    },
}

/// Subcommands that query a loaded dashboard bundle.
#[derive(Subcommand)]
enum QueryCommand {
    /// Show topic count, average coherence, and diversity
    Overview,

    /// List every topic with its coherence and top words
    Topics,

    /// Show one topic's coherence and word relevance table
    Topic {
        /// Topic number (1-based)
        topic: u32,

        /// Number of words to show (default: 30)
        #[arg(long, default_value_t = DEFAULT_WORD_LIMIT)]
        limit: usize,
    },

    /// List a topic's top words
    Words {
        /// Topic number (1-based)
        topic: u32,

        /// Number of words to show (default: 30)
        #[arg(long, default_value_t = DEFAULT_WORD_LIMIT)]
        limit: usize,
    },

    /// Show a topic's representative documents
    Docs {
        /// Topic number (1-based)
        topic: u32,

        /// Number of documents to show (default: 10)
        #[arg(long, default_value_t = DEFAULT_DOCUMENT_LIMIT)]
        limit: usize,
    },

    /// Print the coherence bar chart dataset as JSON
    Chart,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("topicboard=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;
    config.validate()?;

    match cli.command {
        Commands::Bundle {
            folder,
            output,
            prefix,
            method,
            dataset,
        } => {
            let naming = match (prefix, method, dataset) {
                (Some(prefix), Some(method), Some(dataset)) => Some(NamingOverride {
                    prefix,
                    method: Method::parse(&method)
                        .with_context(|| format!("Unknown method {method}, expected nmtf or pnmf"))?,
                    dataset,
                }),
                _ => None,
            };
            let options = BundleOptions {
                output_dir: output,
                naming,
            };
            let base_dir = std::env::current_dir()?;
            let report = bundle::assemble(&folder, &base_dir, &options)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report.manifest)?);
            } else {
                terminal::display_bundle_report(&report);
            }
        }

        Commands::BundleAll { dir } => {
            let dir = dir.unwrap_or_else(|| config.generate_from.clone());
            let base_dir = std::env::current_dir()?;
            let reports = bundle::assemble_all(&dir, &base_dir)?;
            if cli.json {
                let manifests: Vec<_> = reports.iter().map(|r| &r.manifest).collect();
                println!("{}", serde_json::to_string_pretty(&manifests)?);
            } else {
                for report in &reports {
                    terminal::display_bundle_report(report);
                }
                println!("\n{} {} bundles generated", "Done:".bold(), reports.len());
            }
        }

        Commands::Temporal { file } => {
            let chart = match file {
                Some(path) => {
                    let file = std::fs::File::open(&path)
                        .with_context(|| format!("Failed to open {}", path.display()))?;
                    temporal::temporal_chart(file)?
                }
                None => {
                    let location = cli.source.unwrap_or_else(|| config.source.clone());
                    let body = source_for(&location)?.fetch(temporal::TEMPORAL_PATH).await?;
                    temporal::temporal_chart(body.as_bytes())?
                }
            };
            println!("{}", serde_json::to_string_pretty(&chart)?);
        }

        Commands::Query(command) => {
            let location = cli.source.unwrap_or_else(|| config.source.clone());
            let mut store = TopicDataStore::new(source_for(&location)?);
            store
                .load_all()
                .await
                .context("Failed to load data. Check the bundle location and try again")?;
            info!(topics = store.topic_count(), "Ready");
            show(&store, command, cli.json, &config)?;
        }
    }

    Ok(())
}

/// Run a query subcommand against a loaded store.
fn show(store: &TopicDataStore, command: QueryCommand, json: bool, config: &Config) -> Result<()> {
    match command {
        QueryCommand::Overview => {
            if json {
                let overview = serde_json::json!({
                    "topic_count": store.topic_count(),
                    "average_coherence": store.average_coherence(),
                    "diversity": store.diversity_metrics(),
                });
                println!("{}", serde_json::to_string_pretty(&overview)?);
            } else {
                terminal::display_overview(store);
                terminal::display_topic_index(store);
            }
        }
        QueryCommand::Topics => {
            if json {
                println!("{}", serde_json::to_string_pretty(&store.topic_summaries())?);
            } else {
                terminal::display_topic_grid(store, config.low_coherence);
            }
        }
        QueryCommand::Topic { topic, limit } => {
            if json {
                let detail = serde_json::json!({
                    "topic_num": topic,
                    "coherence": store.coherence_for(topic),
                    "wordcloud_path": topicboard::store::keys::wordcloud_path(topic),
                    "top_words": store.top_words(topic, limit),
                });
                println!("{}", serde_json::to_string_pretty(&detail)?);
            } else {
                terminal::display_topic_detail(store, topic, limit, config.low_coherence);
            }
        }
        QueryCommand::Words { topic, limit } => {
            let words = store.top_words(topic, limit);
            if json {
                println!("{}", serde_json::to_string_pretty(&words)?);
            } else {
                for word in &words {
                    println!("{:<32} {:.4}", word.word, word.score);
                }
            }
        }
        QueryCommand::Docs { topic, limit } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&store.top_documents(topic, limit))?);
            } else {
                terminal::display_documents(store, topic, limit);
            }
        }
        QueryCommand::Chart => {
            println!("{}", serde_json::to_string_pretty(&chart::coherence_chart(store))?);
        }
    }
    Ok(())
}
