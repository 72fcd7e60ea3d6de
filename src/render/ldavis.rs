// Static topic explorer page.
//
// Left: intertopic distance map. Topics are placed by classical MDS over
// Jensen-Shannon distances between their word distributions, circle area
// proportional to topic prevalence, each circle linking to the topic's
// section. Right: for every topic, the 30 most relevant terms, where
//
//   relevance(w, t) = λ·log φ(t, w) + (1 − λ)·log(φ(t, w) / p(w))
//
// with λ = 0.6 and p(w) the corpus-wide term share. Bars compare a term's
// overall frequency (grey) with its estimated frequency inside the topic (red).

use std::fmt::Write;

use crate::model::{Corpus, LdaModel};
use crate::projection::{classical_mds, jensen_shannon};

use super::svg::{escape, Anchor, SvgDocument};

pub const RELEVANCE_LAMBDA: f64 = 0.6;
pub const TERMS_PER_TOPIC: usize = 30;

const MAP_SIZE: f64 = 520.0;
const BAR_CHART_W: f64 = 520.0;
const BAR_ROW_H: f64 = 16.0;
const LABEL_W: f64 = 130.0;

/// A term as shown in a topic's bar chart.
#[derive(Debug, Clone, PartialEq)]
pub struct RelevantTerm {
    pub term: String,
    pub relevance: f64,
    /// Corpus-wide count
    pub overall: f64,
    /// Estimated count attributed to the topic
    pub in_topic: f64,
    /// Documents the term appears in
    pub documents: usize,
}

/// Terms of `topic` ranked by relevance, highest first.
pub fn relevant_terms(
    model: &LdaModel,
    corpus: &Corpus,
    topic: usize,
    lambda: f64,
    topn: usize,
) -> Vec<RelevantTerm> {
    let Some(phi) = model.topic_word().get(topic) else {
        return Vec::new();
    };
    let freqs = corpus.term_frequencies();
    let total_tokens: f64 = freqs.iter().sum::<u64>() as f64;
    if total_tokens <= 0.0 {
        return Vec::new();
    }
    let topic_tokens = model.topic_prevalence()[topic] * total_tokens;

    let mut terms: Vec<RelevantTerm> = phi
        .iter()
        .zip(&freqs)
        .zip(model.vocabulary())
        .enumerate()
        .filter(|(_, ((_, freq), _))| **freq > 0)
        .map(|(id, ((&p, &freq), term))| {
            let share = freq as f64 / total_tokens;
            RelevantTerm {
                term: term.clone(),
                relevance: lambda * p.ln() + (1.0 - lambda) * (p / share).ln(),
                overall: freq as f64,
                in_topic: (p * topic_tokens).min(freq as f64),
                documents: corpus.dictionary.doc_frequency(id),
            }
        })
        .collect();
    terms.sort_by(|a, b| b.relevance.total_cmp(&a.relevance));
    terms.truncate(topn);
    terms
}

/// Topic coordinates on the intertopic map (unscaled MDS output).
pub fn intertopic_coordinates(model: &LdaModel) -> Vec<[f64; 2]> {
    let phi = model.topic_word();
    let k = phi.len();
    let mut distances = vec![vec![0.0f64; k]; k];
    for i in 0..k {
        for j in (i + 1)..k {
            let d = jensen_shannon(&phi[i], &phi[j]).sqrt();
            distances[i][j] = d;
            distances[j][i] = d;
        }
    }
    classical_mds(&distances)
}

fn render_intertopic_map(model: &LdaModel) -> String {
    let coords = intertopic_coordinates(model);
    let prevalence = model.topic_prevalence();

    let mut doc = SvgDocument::new(MAP_SIZE, MAP_SIZE);
    doc.rect(0.0, 0.0, MAP_SIZE, MAP_SIZE, "white");
    doc.line(MAP_SIZE / 2.0, 0.0, MAP_SIZE / 2.0, MAP_SIZE, "#cccccc");
    doc.line(0.0, MAP_SIZE / 2.0, MAP_SIZE, MAP_SIZE / 2.0, "#cccccc");
    doc.text(MAP_SIZE - 8.0, MAP_SIZE / 2.0 - 6.0, 11.0, Anchor::End, "#666666", "PC1");
    doc.text(MAP_SIZE / 2.0 + 6.0, 14.0, 11.0, Anchor::Start, "#666666", "PC2");

    let extent = coords
        .iter()
        .flat_map(|c| [c[0].abs(), c[1].abs()])
        .fold(0.0f64, f64::max)
        .max(1e-9);
    let max_radius = MAP_SIZE / 8.0;
    let usable = MAP_SIZE / 2.0 - max_radius;

    // Biggest topics first so small circles stay clickable on top.
    let mut order: Vec<usize> = (0..coords.len()).collect();
    order.sort_by(|&a, &b| prevalence[b].total_cmp(&prevalence[a]));

    for t in order {
        let cx = MAP_SIZE / 2.0 + coords[t][0] / extent * usable;
        let cy = MAP_SIZE / 2.0 - coords[t][1] / extent * usable;
        let r = (prevalence[t].sqrt() * max_radius).max(6.0);
        doc.raw(&format!(r##"<a href="#topic-{t}">"##));
        doc.circle(cx, cy, r, "#1f77b4", 0.45);
        doc.text(cx, cy + 4.0, 12.0, Anchor::Middle, "black", &t.to_string());
        doc.raw("</a>");
    }
    doc.finish()
}

fn render_term_bars(terms: &[RelevantTerm]) -> String {
    let height = terms.len() as f64 * BAR_ROW_H + 10.0;
    let mut doc = SvgDocument::new(BAR_CHART_W, height);
    let max = terms.iter().map(|t| t.overall).fold(0.0f64, f64::max).max(1.0);
    let bar_space = BAR_CHART_W - LABEL_W - 10.0;

    for (row, term) in terms.iter().enumerate() {
        let y = 5.0 + row as f64 * BAR_ROW_H;
        doc.raw(&format!(
            "<g><title>{}: {} occurrences in {} documents</title>",
            escape(&term.term),
            term.overall,
            term.documents
        ));
        doc.text(LABEL_W - 6.0, y + 11.0, 11.0, Anchor::End, "black", &term.term);
        doc.rect(LABEL_W, y + 2.0, term.overall / max * bar_space, BAR_ROW_H - 4.0, "#b4c8dc");
        doc.rect(LABEL_W, y + 2.0, term.in_topic / max * bar_space, BAR_ROW_H - 4.0, "#d62728");
        doc.raw("</g>");
    }
    doc.finish()
}

/// Build the complete HTML page.
pub fn render_topic_explorer(model: &LdaModel, corpus: &Corpus) -> String {
    let prevalence = model.topic_prevalence();
    let mut html = String::new();

    html.push_str(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>LDA Topic Explorer</title>\n<style>\n\
         body { font-family: sans-serif; margin: 24px; color: #222; }\n\
         .layout { display: flex; gap: 32px; align-items: flex-start; }\n\
         .map { position: sticky; top: 24px; }\n\
         section { margin-bottom: 28px; }\n\
         h2 { font-size: 16px; margin: 0 0 6px 0; }\n\
         .legend span { display: inline-block; width: 12px; height: 12px; margin: 0 4px 0 12px; }\n\
         </style>\n</head>\n<body>\n",
    );
    let _ = writeln!(
        html,
        "<h1>Topic Explorer</h1>\n<p>{} documents, {} terms, {} topics. Relevance λ = {}.</p>",
        corpus.num_documents(),
        corpus.dictionary.len(),
        model.num_topics(),
        RELEVANCE_LAMBDA
    );
    html.push_str(
        "<p class=\"legend\"><span style=\"background:#b4c8dc\"></span>Overall term frequency\
         <span style=\"background:#d62728\"></span>Estimated term frequency within the topic</p>\n",
    );

    html.push_str("<div class=\"layout\">\n<div class=\"map\">\n<h2>Intertopic Distance Map</h2>\n");
    html.push_str(&render_intertopic_map(model));
    html.push_str("</div>\n<div class=\"topics\">\n");

    for t in 0..model.num_topics() {
        let terms = relevant_terms(model, corpus, t, RELEVANCE_LAMBDA, TERMS_PER_TOPIC);
        let _ = writeln!(
            html,
            "<section id=\"topic-{t}\">\n<h2>Topic {t} ({:.1}% of tokens)</h2>",
            prevalence[t] * 100.0
        );
        html.push_str(&render_term_bars(&terms));
        html.push_str("</section>\n");
    }

    let _ = writeln!(
        html,
        "</div>\n</div>\n<p><small>{} tokens in corpus.</small></p>\n</body>\n</html>",
        corpus.num_tokens()
    );
    html
}
