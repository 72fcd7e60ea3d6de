// t-SNE document map, coloured by each document's dominant topic.

use std::collections::BTreeSet;

use super::svg::{Anchor, SvgDocument, TAB10};

const WIDTH: f64 = 1000.0;
const HEIGHT: f64 = 800.0;
const MARGIN: f64 = 60.0;
const LEGEND_W: f64 = 140.0;

/// `points[i]` is document i's 2-D position; `dominant[i]` its topic.
pub fn render_document_map(points: &[[f64; 2]], dominant: &[usize]) -> String {
    let mut doc = SvgDocument::new(WIDTH, HEIGHT);
    doc.rect(0.0, 0.0, WIDTH, HEIGHT, "white");
    doc.text(
        (WIDTH - LEGEND_W) / 2.0,
        MARGIN / 2.0 + 6.0,
        16.0,
        Anchor::Middle,
        "black",
        "t-SNE Visualization of Documents",
    );

    let plot_w = WIDTH - 2.0 * MARGIN - LEGEND_W;
    let plot_h = HEIGHT - 2.0 * MARGIN;
    doc.line(MARGIN, HEIGHT - MARGIN, MARGIN + plot_w, HEIGHT - MARGIN, "black");
    doc.line(MARGIN, MARGIN, MARGIN, HEIGHT - MARGIN, "black");
    doc.text(
        MARGIN + plot_w / 2.0,
        HEIGHT - 20.0,
        13.0,
        Anchor::Middle,
        "black",
        "Dimension 1",
    );
    doc.vertical_text(20.0, MARGIN + plot_h / 2.0, 13.0, "Dimension 2");

    let (min_x, max_x) = bounds(points.iter().map(|p| p[0]));
    let (min_y, max_y) = bounds(points.iter().map(|p| p[1]));
    let scale = |v: f64, lo: f64, hi: f64, span: f64| {
        if hi - lo < 1e-12 {
            span / 2.0
        } else {
            (v - lo) / (hi - lo) * span
        }
    };

    for (point, &topic) in points.iter().zip(dominant) {
        let x = MARGIN + 10.0 + scale(point[0], min_x, max_x, plot_w - 20.0);
        let y = HEIGHT - MARGIN - 10.0 - scale(point[1], min_y, max_y, plot_h - 20.0);
        doc.circle(x, y, 4.0, TAB10[topic % TAB10.len()], 0.7);
    }

    // Legend lists only topics that actually dominate some document.
    let present: BTreeSet<usize> = dominant.iter().copied().collect();
    let legend_x = WIDTH - LEGEND_W - MARGIN / 2.0 + 20.0;
    doc.text(legend_x, MARGIN + 4.0, 13.0, Anchor::Start, "black", "Dominant Topic");
    for (row, topic) in present.iter().enumerate() {
        let y = MARGIN + 24.0 + row as f64 * 20.0;
        doc.circle(legend_x + 6.0, y - 4.0, 5.0, TAB10[topic % TAB10.len()], 0.7);
        doc.text(legend_x + 18.0, y, 12.0, Anchor::Start, "black", &format!("Topic {topic}"));
    }

    doc.finish()
}

fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_and_legend() {
        let points = [[0.0, 0.0], [1.0, 2.0], [-3.0, 1.0]];
        let svg = render_document_map(&points, &[2, 0, 2]);
        // 3 points + 2 legend markers
        assert_eq!(svg.matches("<circle").count(), 5);
        assert!(svg.contains(">Topic 0</text>"));
        assert!(svg.contains(">Topic 2</text>"));
        assert!(!svg.contains(">Topic 1</text>"));
    }

    #[test]
    fn test_single_point_is_centered_without_nan() {
        let svg = render_document_map(&[[5.0, 5.0]], &[0]);
        assert!(!svg.contains("NaN"));
    }
}
