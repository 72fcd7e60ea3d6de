// Analysis pipeline: fetch documents, model them, write the visualizations.
//
// Fetching is async (network I/O); everything after that is CPU-bound and
// runs on the blocking pool so the web server's workers stay responsive.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::model::{Corpus, EmptyCorpus, GibbsLda, LdaModel, LdaParams, TopicModeler};
use crate::projection::{sample_points, Tsne, TsneParams};
use crate::render;
use crate::store::traits::DocumentSource;
use crate::text::Preprocessor;

/// Knobs for one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisSettings {
    pub num_topics: usize,
    pub iterations: usize,
    pub seed: u64,
    pub stopword_language: String,
    pub extra_stopwords: Vec<String>,
    /// Keywords reported per topic in the JSON summary
    pub keywords_per_topic: usize,
    /// How many documents the JSON summary lists
    pub document_preview: usize,
    /// Most documents placed on the t-SNE map; larger corpora are sampled
    pub max_mapped_documents: usize,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            num_topics: 10,
            iterations: 200,
            seed: 42,
            stopword_language: "spanish".to_string(),
            extra_stopwords: Vec::new(),
            keywords_per_topic: 5,
            document_preview: 20,
            max_mapped_documents: 1000,
        }
    }
}

impl AnalysisSettings {
    pub fn lda_params(&self) -> LdaParams {
        LdaParams {
            num_topics: self.num_topics,
            iterations: self.iterations,
            seed: self.seed,
            ..LdaParams::default()
        }
    }
}

/// JSON body of `GET /api/topic_modeling`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicReport {
    pub topics: Vec<TopicSummary>,
    pub documents: Vec<DocumentSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicSummary {
    pub id: usize,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub id: usize,
    /// Original, unprocessed response text
    pub text: String,
    /// Dominant topic id
    pub topic: usize,
}

/// Everything a run produced: the report plus what it was built from.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub report: TopicReport,
    pub document_count: usize,
    pub vocabulary_size: usize,
    pub token_count: u64,
    /// Documents placed on the t-SNE map
    pub mapped_documents: usize,
    pub files: Vec<PathBuf>,
}

/// Fetch every document from `source` and analyze it.
pub async fn run(
    source: &dyn DocumentSource,
    settings: &AnalysisSettings,
    static_dir: &Path,
) -> Result<AnalysisOutcome> {
    let started = Instant::now();
    let documents = source.fetch_all().await?;
    info!(
        source = %source.describe(),
        documents = documents.len(),
        "Fetched documents"
    );

    let settings = settings.clone();
    let static_dir = static_dir.to_path_buf();
    let outcome = tokio::task::spawn_blocking(move || analyze(&documents, &settings, &static_dir))
        .await
        .context("Analysis task failed to complete")??;

    info!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        topics = outcome.report.topics.len(),
        "Analysis complete"
    );
    Ok(outcome)
}

/// Synchronous core of the pipeline, for already-fetched documents.
pub fn analyze(
    documents: &[String],
    settings: &AnalysisSettings,
    static_dir: &Path,
) -> Result<AnalysisOutcome> {
    if documents.is_empty() {
        return Err(EmptyCorpus { documents: 0 }.into());
    }

    let preprocessor = Preprocessor::new(&settings.stopword_language, &settings.extra_stopwords)?;
    let texts = preprocessor.preprocess(documents);
    let corpus = Corpus::from_texts(&texts);

    let model = GibbsLda::new(settings.lda_params()).fit(&corpus)?;

    let tsne = Tsne::new(TsneParams {
        seed: settings.seed,
        ..TsneParams::default()
    });
    let doc_topics = model.document_topic_matrix();
    let mapped = sample_points(doc_topics.len(), settings.max_mapped_documents, settings.seed);
    if mapped.len() < doc_topics.len() {
        warn!(
            documents = doc_topics.len(),
            mapped = mapped.len(),
            "Too many documents for the t-SNE map, projecting a sample"
        );
    }
    let rows: Vec<Vec<f64>> = mapped.iter().map(|&d| doc_topics[d].clone()).collect();
    let document_map = tsne.fit_transform(&rows);

    let files = render::render_all(&model, &corpus, &document_map, &mapped, static_dir)?;

    Ok(AnalysisOutcome {
        report: summarize(&model, documents, settings),
        document_count: documents.len(),
        vocabulary_size: corpus.dictionary.len(),
        token_count: corpus.num_tokens(),
        mapped_documents: mapped.len(),
        files,
    })
}

/// Build the JSON summary: every topic's top keywords, and the first
/// `document_preview` documents with their dominant topic.
pub fn summarize(model: &LdaModel, documents: &[String], settings: &AnalysisSettings) -> TopicReport {
    let topics = (0..model.num_topics())
        .map(|id| TopicSummary {
            id,
            keywords: model
                .show_topic(id, settings.keywords_per_topic)
                .into_iter()
                .map(|(word, _)| word)
                .collect(),
        })
        .collect();

    let documents = documents
        .iter()
        .enumerate()
        .take(settings.document_preview)
        .map(|(id, text)| DocumentSummary {
            id,
            text: text.clone(),
            topic: model.dominant_topic(id).map(|(t, _)| t).unwrap_or(0),
        })
        .collect();

    TopicReport { topics, documents }
}
