// Static visualizations: everything the dashboard shows besides the JSON.
//
// All renderers are pure (model in, markup out); `render_all` is the only
// place that touches the filesystem.

pub mod distribution;
pub mod ldavis;
pub mod scatter;
pub mod svg;
pub mod wordcloud;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::model::{Corpus, LdaModel};

pub const TOPIC_EXPLORER_FILE: &str = "lda_visualization.html";
pub const DISTRIBUTION_FILE: &str = "distribucion_temas.svg";
pub const DOCUMENT_MAP_FILE: &str = "tsne_visualization.svg";

/// File name of a topic's word cloud.
pub fn word_cloud_file(topic: usize) -> String {
    format!("nube_tema_{topic}.svg")
}

/// The SVG written for a chart the dashboard requests by its `.png` name
/// (`distribucion_temas.png`, `tsne_visualization.png`, `nube_tema_{t}.png`).
/// Any other name maps to nothing.
pub fn chart_alias(file_name: &str) -> Option<String> {
    let stem = file_name.strip_suffix(".png")?;
    let svg = format!("{stem}.svg");
    let is_cloud = stem
        .strip_prefix("nube_tema_")
        .is_some_and(|t| !t.is_empty() && t.bytes().all(|b| b.is_ascii_digit()));
    (is_cloud || svg == DISTRIBUTION_FILE || svg == DOCUMENT_MAP_FILE).then_some(svg)
}

/// Write every visualization into `out_dir` (created if missing) and return
/// the paths written, explorer first.
///
/// `document_map[i]` is the 2-D position of document `mapped_documents[i]`.
/// Large corpora only map a sample, so the two may be shorter than the corpus.
pub fn render_all(
    model: &LdaModel,
    corpus: &Corpus,
    document_map: &[[f64; 2]],
    mapped_documents: &[usize],
    out_dir: &Path,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;

    let mut written = Vec::new();
    let mut write = |name: &str, contents: String| -> Result<()> {
        let path = out_dir.join(name);
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        written.push(path);
        Ok(())
    };

    write(
        TOPIC_EXPLORER_FILE,
        ldavis::render_topic_explorer(model, corpus),
    )?;

    for topic in 0..model.num_topics() {
        let words = model.show_topic(topic, wordcloud::MAX_WORDS);
        write(
            &word_cloud_file(topic),
            wordcloud::render_word_cloud(topic, &words),
        )?;
    }

    write(
        DISTRIBUTION_FILE,
        distribution::render_topic_distribution(
            model.document_topic_matrix(),
            model.num_topics(),
        ),
    )?;

    let dominant: Vec<usize> = mapped_documents
        .iter()
        .map(|&d| model.dominant_topic(d).map(|(t, _)| t).unwrap_or(0))
        .collect();
    write(
        DOCUMENT_MAP_FILE,
        scatter::render_document_map(document_map, &dominant),
    )?;

    info!(
        files = written.len(),
        dir = %out_dir.display(),
        "Visualizations written"
    );
    Ok(written)
}
