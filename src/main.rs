use anyhow::Result;
use chrono::Local;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use topicscope::config::Config;
use topicscope::output::terminal;
use topicscope::text::Preprocessor;

/// Topicscope: topic modeling for free-text survey responses.
///
/// Fetches responses, fits an LDA topic model, and renders word clouds,
/// a topic distribution chart, a t-SNE document map and a topic explorer.
#[derive(Parser)]
#[command(name = "topicscope", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the topic modeling API and the generated visualizations
    Serve {
        /// Port to listen on (default: 5000)
        #[arg(long, default_value = "5000")]
        port: u16,

        /// Address to bind (default: 127.0.0.1)
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,
    },

    /// Run one analysis and print the summary
    Analyze {
        /// Print the JSON summary instead of the formatted report
        #[arg(long)]
        json: bool,
    },

    /// Show fetched responses and the tokens that survive preprocessing
    Documents {
        /// Max documents to show (default: 25)
        #[arg(long, default_value = "25")]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    dotenvy::dotenv().ok();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("topicscope=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Serve { port, bind } => {
            let source = topicscope::store::open_source(&config).await?;
            info!(
                static_dir = %config.static_dir.display(),
                topics = config.num_topics,
                "Starting server"
            );
            topicscope::web::run_server(config, source, port, &bind).await?;
        }

        Commands::Analyze { json } => {
            let source = topicscope::store::open_source(&config).await?;
            let settings = config.analysis_settings();
            let outcome =
                topicscope::pipeline::run(source.as_ref(), &settings, &config.static_dir).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&outcome.report)?);
            } else {
                terminal::display_outcome(&outcome);
                println!(
                    "\n{}",
                    format!("Finished at {}", Local::now().format("%Y-%m-%d %H:%M:%S")).dimmed()
                );
            }
        }

        Commands::Documents { limit } => {
            let source = topicscope::store::open_source(&config).await?;
            let documents = source.fetch_all().await?;
            let preprocessor =
                Preprocessor::new(&config.stopword_language, &config.extra_stopwords)?;

            let tokens = preprocessor.preprocess(&documents);
            let shown = documents.len().min(limit);

            println!(
                "{}",
                format!(
                    "=== {} of {} documents from {} ===",
                    shown,
                    documents.len(),
                    source.describe()
                )
                .bold()
            );
            terminal::display_tokens(&documents[..shown], &tokens[..shown]);

            let empty = tokens.iter().filter(|t| t.is_empty()).count();
            if empty > 0 {
                println!(
                    "\n{}",
                    format!("{empty} documents have no tokens after filtering.").yellow()
                );
            }
        }
    }

    Ok(())
}
