use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::pipeline::AnalysisSettings;

/// Where survey responses are read from.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceBackend {
    /// DynamoDB table scan (default)
    DynamoDb,
    /// Local JSON file, for development without AWS credentials
    File,
}

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. AWS
/// credentials and region come from the standard AWS environment/profile
/// chain, not from here.
#[derive(Debug, Clone)]
pub struct Config {
    pub source_backend: SourceBackend,
    /// DynamoDB table holding the survey log items
    pub table_name: String,
    /// Item attribute that carries the free-text response
    pub text_attribute: String,
    /// JSON document file used by the file backend
    pub documents_file: Option<PathBuf>,
    /// Directory that visualizations are written to and served from
    pub static_dir: PathBuf,
    pub num_topics: usize,
    /// Gibbs sweeps over the whole corpus
    pub iterations: usize,
    pub seed: u64,
    /// Language of the stop-word list (e.g. "spanish", "english")
    pub stopword_language: String,
    /// Extra stop words on top of the language list and built-in custom set
    pub extra_stopwords: Vec<String>,
    /// Cap on documents projected by t-SNE, which is quadratic in this number
    pub map_max_documents: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Everything has a default, so `load` only fails on values that
    /// are present but malformed.
    pub fn load() -> Result<Self> {
        let source_backend = match env::var("SURVEY_SOURCE").as_deref() {
            Ok("file") => SourceBackend::File,
            Ok("dynamodb") | Err(_) => SourceBackend::DynamoDb,
            Ok(other) => anyhow::bail!(
                "Unknown SURVEY_SOURCE '{other}'. Expected 'dynamodb' or 'file'."
            ),
        };

        let extra_stopwords = env::var("SURVEY_EXTRA_STOPWORDS")
            .map(|raw| parse_word_list(&raw))
            .unwrap_or_default();

        let map_max_documents = parse_var("SURVEY_MAP_MAX_DOCUMENTS", 1000)?;
        if map_max_documents == 0 {
            anyhow::bail!("SURVEY_MAP_MAX_DOCUMENTS must be at least 1");
        }

        Ok(Self {
            source_backend,
            table_name: env::var("SURVEY_TABLE").unwrap_or_else(|_| "user_logs_prod".to_string()),
            text_attribute: env::var("SURVEY_TEXT_ATTRIBUTE")
                .unwrap_or_else(|_| "question".to_string()),
            documents_file: env::var("SURVEY_FILE").ok().map(PathBuf::from),
            static_dir: env::var("SURVEY_STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./static")),
            num_topics: parse_var("SURVEY_NUM_TOPICS", 10)?,
            iterations: parse_var("SURVEY_ITERATIONS", 200)?,
            seed: parse_var("SURVEY_SEED", 42)?,
            stopword_language: env::var("SURVEY_STOPWORD_LANGUAGE")
                .unwrap_or_else(|_| "spanish".to_string()),
            extra_stopwords,
            map_max_documents,
        })
    }

    /// Check that the file backend has a file to read.
    /// Call this before building a FileSource.
    pub fn require_file_source(&self) -> Result<&PathBuf> {
        match &self.documents_file {
            Some(path) => Ok(path),
            None => anyhow::bail!(
                "SURVEY_SOURCE=file but SURVEY_FILE is not set.\n\
                 Point it at a JSON array of response strings, or of objects\n\
                 carrying SURVEY_TEXT_ATTRIBUTE."
            ),
        }
    }

    /// The subset of configuration the analysis pipeline needs.
    pub fn analysis_settings(&self) -> AnalysisSettings {
        AnalysisSettings {
            num_topics: self.num_topics,
            iterations: self.iterations,
            seed: self.seed,
            stopword_language: self.stopword_language.clone(),
            extra_stopwords: self.extra_stopwords.clone(),
            max_mapped_documents: self.map_max_documents,
            ..AnalysisSettings::default()
        }
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{name} must be a number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

/// Split a comma-separated word list, lowercasing and dropping blanks.
pub fn parse_word_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|w| w.trim().to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}
