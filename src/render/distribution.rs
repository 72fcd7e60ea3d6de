// Stacked bar chart of per-document topic probabilities.

use super::svg::{Anchor, SvgDocument, TAB20};

const WIDTH: f64 = 1200.0;
const HEIGHT: f64 = 600.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 150.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 60.0;

/// One bar per document, one segment per topic, bottom to top in topic order.
pub fn render_topic_distribution(doc_topics: &[Vec<f64>], num_topics: usize) -> String {
    let mut doc = SvgDocument::new(WIDTH, HEIGHT);
    doc.rect(0.0, 0.0, WIDTH, HEIGHT, "white");

    let plot_w = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let baseline = MARGIN_TOP + plot_h;

    doc.text(
        WIDTH / 2.0,
        MARGIN_TOP / 2.0 + 6.0,
        16.0,
        Anchor::Middle,
        "black",
        "Topic Distribution in Documents",
    );

    // Y axis with ticks at 0.0, 0.2, ..., 1.0
    doc.line(MARGIN_LEFT, MARGIN_TOP, MARGIN_LEFT, baseline, "black");
    doc.line(MARGIN_LEFT, baseline, MARGIN_LEFT + plot_w, baseline, "black");
    for tick in 0..=5 {
        let value = tick as f64 * 0.2;
        let y = baseline - value * plot_h;
        doc.line(MARGIN_LEFT - 4.0, y, MARGIN_LEFT, y, "black");
        doc.text(MARGIN_LEFT - 8.0, y + 4.0, 11.0, Anchor::End, "black", &format!("{value:.1}"));
    }
    doc.vertical_text(18.0, MARGIN_TOP + plot_h / 2.0, 13.0, "Topic Probability");
    doc.text(
        MARGIN_LEFT + plot_w / 2.0,
        HEIGHT - 15.0,
        13.0,
        Anchor::Middle,
        "black",
        "Documents",
    );

    if !doc_topics.is_empty() {
        let slot = plot_w / doc_topics.len() as f64;
        let bar_w = (slot * 0.8).max(0.5);
        for (d, row) in doc_topics.iter().enumerate() {
            let x = MARGIN_LEFT + d as f64 * slot + (slot - bar_w) / 2.0;
            let mut top = baseline;
            for (t, p) in row.iter().enumerate().take(num_topics) {
                let h = p.clamp(0.0, 1.0) * plot_h;
                top -= h;
                doc.rect(x, top, bar_w, h, TAB20[t % TAB20.len()]);
            }
        }
    }

    // Legend, upper right outside the plot
    let legend_x = MARGIN_LEFT + plot_w + 15.0;
    for t in 0..num_topics {
        let y = MARGIN_TOP + t as f64 * 20.0;
        doc.rect(legend_x, y, 12.0, 12.0, TAB20[t % TAB20.len()]);
        doc.text(legend_x + 18.0, y + 10.0, 12.0, Anchor::Start, "black", &format!("Topic {t}"));
    }

    doc.finish()
}
