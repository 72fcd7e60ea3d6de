// Colored terminal output for the `analyze` and `documents` commands.

use colored::Colorize;

use crate::pipeline::AnalysisOutcome;

use super::truncate_chars;

/// Display a finished analysis: corpus stats, topics, sample documents, files.
pub fn display_outcome(outcome: &AnalysisOutcome) {
    println!(
        "\n{}",
        format!(
            "=== Topic Model ({} documents, {} terms, {} tokens) ===",
            outcome.document_count, outcome.vocabulary_size, outcome.token_count
        )
        .bold()
    );
    println!();

    for topic in &outcome.report.topics {
        println!(
            "  {:>2}. {}",
            topic.id,
            topic.keywords.join(", ").bright_green()
        );
    }

    if !outcome.report.documents.is_empty() {
        println!("\n{}", "Sample documents".bold());
        for doc in &outcome.report.documents {
            println!(
                "  {:>3}  {}  {}",
                doc.id,
                format!("[topic {}]", doc.topic).bright_blue(),
                truncate_chars(&doc.text, 90).dimmed()
            );
        }
    }

    println!("\n{}", "Visualizations".bold());
    for path in &outcome.files {
        println!("  {}", path.display());
    }
}

/// Show raw responses next to the tokens that survive preprocessing.
/// Useful when tuning SURVEY_EXTRA_STOPWORDS.
pub fn display_tokens(documents: &[String], tokens: &[Vec<String>]) {
    for (i, (doc, toks)) in documents.iter().zip(tokens).enumerate() {
        println!("  {:>4}. {}", i, truncate_chars(doc, 100));
        if toks.is_empty() {
            println!("        {}", "(no tokens)".yellow());
        } else {
            println!("        {}", toks.join(" ").dimmed());
        }
    }
}
