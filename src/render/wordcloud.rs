// Word clouds, one per topic.
//
// Words are placed largest first along an Archimedean spiral from the
// centre of the canvas; a word takes the first spot where its bounding box
// fits inside the canvas without touching an already placed word. Words
// that don't fit are retried smaller and dropped below the minimum size.
// Glyph widths are estimated, since there is no font rasterizer here.

use super::svg::{Anchor, SvgDocument, VIRIDIS};

pub const CLOUD_WIDTH: f64 = 800.0;
pub const CLOUD_HEIGHT: f64 = 400.0;
pub const MAX_WORDS: usize = 50;

const MAX_FONT: f64 = 72.0;
const MIN_FONT: f64 = 10.0;
const TITLE_BAND: f64 = 40.0;
/// Average glyph advance as a fraction of font size
const GLYPH_WIDTH: f64 = 0.58;

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedWord {
    pub word: String,
    /// Centre of the word's box
    pub x: f64,
    pub y: f64,
    pub font_size: f64,
    pub width: f64,
    pub height: f64,
}

impl PlacedWord {
    fn overlaps(&self, other: &PlacedWord) -> bool {
        (self.x - other.x).abs() * 2.0 < self.width + other.width
            && (self.y - other.y).abs() * 2.0 < self.height + other.height
    }
}

/// Lay out `(word, weight)` pairs on a `width` x `height` canvas.
///
/// Font size is proportional to weight relative to the heaviest word.
/// Placed words come out heaviest first.
pub fn layout_words(words: &[(String, f64)], width: f64, height: f64) -> Vec<PlacedWord> {
    let mut ranked: Vec<&(String, f64)> = words
        .iter()
        .filter(|(w, weight)| !w.is_empty() && *weight > 0.0 && weight.is_finite())
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.truncate(MAX_WORDS);

    let Some(max_weight) = ranked.first().map(|(_, w)| *w) else {
        return Vec::new();
    };

    let mut placed: Vec<PlacedWord> = Vec::with_capacity(ranked.len());
    for (word, weight) in ranked {
        let mut font_size = (MIN_FONT + (MAX_FONT - MIN_FONT) * (weight / max_weight)).round();
        while font_size >= MIN_FONT {
            if let Some(spot) = find_spot(word, font_size, width, height, &placed) {
                placed.push(spot);
                break;
            }
            font_size = (font_size * 0.85).floor();
        }
    }
    placed
}

fn find_spot(
    word: &str,
    font_size: f64,
    width: f64,
    height: f64,
    placed: &[PlacedWord],
) -> Option<PlacedWord> {
    let box_w = word.chars().count() as f64 * font_size * GLYPH_WIDTH;
    let box_h = font_size * 1.1;
    if box_w > width || box_h > height {
        return None;
    }

    let (cx, cy) = (width / 2.0, height / 2.0);
    // Canvas is wider than tall; stretch the spiral to match.
    let aspect = width / height;
    let mut theta = 0.0f64;
    while theta < 400.0 {
        let r = 2.0 * theta;
        let x = cx + r * theta.cos() * aspect.sqrt();
        let y = cy + r * theta.sin() / aspect.sqrt();
        let candidate = PlacedWord {
            word: word.to_string(),
            x,
            y,
            font_size,
            width: box_w,
            height: box_h,
        };
        let inside = x - box_w / 2.0 >= 0.0
            && x + box_w / 2.0 <= width
            && y - box_h / 2.0 >= 0.0
            && y + box_h / 2.0 <= height;
        if inside && !placed.iter().any(|p| p.overlaps(&candidate)) {
            return Some(candidate);
        }
        theta += 0.1;
    }
    None
}

/// Render a topic's word cloud as SVG: title band above an 800x400 cloud.
pub fn render_word_cloud(topic_id: usize, words: &[(String, f64)]) -> String {
    let mut doc = SvgDocument::new(CLOUD_WIDTH, CLOUD_HEIGHT + TITLE_BAND);
    doc.rect(0.0, 0.0, CLOUD_WIDTH, CLOUD_HEIGHT + TITLE_BAND, "white");
    doc.text(
        CLOUD_WIDTH / 2.0,
        TITLE_BAND * 0.7,
        16.0,
        Anchor::Middle,
        "black",
        &format!("Topic {topic_id}"),
    );

    let placed = layout_words(words, CLOUD_WIDTH, CLOUD_HEIGHT);
    for (i, word) in placed.iter().enumerate() {
        let color = VIRIDIS[(i * 3 + topic_id) % VIRIDIS.len()];
        // Baseline sits roughly a third of the box below the centre.
        let baseline = TITLE_BAND + word.y + word.font_size * 0.35;
        doc.text(word.x, baseline, word.font_size, Anchor::Middle, color, &word.word);
    }
    doc.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(pairs: &[(&str, f64)]) -> Vec<(String, f64)> {
        pairs.iter().map(|(w, p)| (w.to_string(), *p)).collect()
    }

    #[test]
    fn test_layout_has_no_overlaps_and_stays_inside() {
        let input: Vec<(String, f64)> = (0..40)
            .map(|i| (format!("palabra{i}"), 1.0 / (i + 1) as f64))
            .collect();
        let placed = layout_words(&input, CLOUD_WIDTH, CLOUD_HEIGHT);
        assert!(!placed.is_empty());

        for (i, a) in placed.iter().enumerate() {
            assert!(a.x - a.width / 2.0 >= 0.0 && a.x + a.width / 2.0 <= CLOUD_WIDTH);
            assert!(a.y - a.height / 2.0 >= 0.0 && a.y + a.height / 2.0 <= CLOUD_HEIGHT);
            for b in &placed[i + 1..] {
                assert!(!a.overlaps(b), "{} overlaps {}", a.word, b.word);
            }
        }
    }

    #[test]
    fn test_heaviest_word_is_largest_and_centered() {
        let placed = layout_words(
            &words(&[("menor", 0.1), ("python", 0.5), ("datos", 0.25)]),
            CLOUD_WIDTH,
            CLOUD_HEIGHT,
        );
        assert_eq!(placed[0].word, "python");
        assert_eq!(placed[0].font_size, MAX_FONT);
        assert!((placed[0].x - CLOUD_WIDTH / 2.0).abs() < 1e-9);
        assert!(placed.iter().all(|w| w.font_size <= placed[0].font_size));
    }

    #[test]
    fn test_empty_and_degenerate_weights() {
        assert!(layout_words(&[], CLOUD_WIDTH, CLOUD_HEIGHT).is_empty());
        let placed = layout_words(
            &words(&[("cero", 0.0), ("", 0.4), ("nan", f64::NAN)]),
            CLOUD_WIDTH,
            CLOUD_HEIGHT,
        );
        assert!(placed.is_empty());
    }

    #[test]
    fn test_render_contains_title_and_words() {
        let svg = render_word_cloud(3, &words(&[("función", 0.4), ("lista", 0.2)]));
        assert!(svg.contains(">Topic 3</text>"));
        assert!(svg.contains(">función</text>"));
        assert!(svg.contains(">lista</text>"));
    }
}
