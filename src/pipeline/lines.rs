//! Line and paragraph reconstruction from positioned text runs.
//!
//! PDF pages carry no notion of lines: text is a bag of runs, each drawn at
//! some `(x, y)`. Runs whose baselines round to the same integer `y` are
//! treated as one line; lines run top to bottom (descending `y`, since PDF
//! user space grows upwards) and runs within a line left to right.
//!
//! ```text
//! (72,700,"Hello") (140,700,"world")        "Hello world"
//! (72,686,"second line")            ──▶     "second line"
//! (72,640,"New paragraph")                  ""            ← gap > ratio × median
//!                                           "New paragraph"
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A positioned piece of page text. Coordinates are PDF user space
/// (origin bottom-left), `y` being the baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextItem {
    pub x: f32,
    pub y: f32,
    pub text: String,
}

impl TextItem {
    pub fn new(x: f32, y: f32, text: impl Into<String>) -> Self {
        Self {
            x,
            y,
            text: text.into(),
        }
    }
}

/// Rebuild a page's text from its runs.
///
/// Lines are separated by `\n`. With `paragraph_gap_ratio = Some(r)`, a
/// vertical gap wider than `r` times the page's median line gap is written
/// as `\n\n` instead, marking a paragraph boundary.
pub fn reconstruct_page(items: &[TextItem], paragraph_gap_ratio: Option<f32>) -> String {
    let lines = group_lines(items);
    if lines.is_empty() {
        return String::new();
    }

    let gaps: Vec<f32> = lines.windows(2).map(|w| (w[0].0 - w[1].0) as f32).collect();
    let threshold = paragraph_gap_ratio
        .zip(median(&gaps))
        .map(|(ratio, median)| ratio * median);

    let mut out = String::new();
    for (i, (_, text)) in lines.iter().enumerate() {
        if i > 0 {
            match threshold {
                Some(t) if gaps[i - 1] > t => out.push_str("\n\n"),
                _ => out.push('\n'),
            }
        }
        out.push_str(text);
    }
    out
}

/// `(rounded y, line text)` for every non-empty line, top line first.
fn group_lines(items: &[TextItem]) -> Vec<(i64, String)> {
    let mut rows: BTreeMap<i64, Vec<&TextItem>> = BTreeMap::new();
    for item in items {
        rows.entry(item.y.round() as i64).or_default().push(item);
    }

    rows.into_iter()
        .rev()
        .filter_map(|(y, mut row)| {
            // stable: equal x keeps extraction order
            row.sort_by(|a, b| a.x.total_cmp(&b.x));
            let line = row
                .iter()
                .map(|item| item.text.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            let line = line.trim();
            (!line.is_empty()).then(|| (y, line.to_string()))
        })
        .collect()
}

fn median(values: &[f32]) -> Option<f32> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f32::total_cmp);
    let mid = sorted.len() / 2;
    Some(if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    })
}

static RE_PARAGRAPH_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\n+").unwrap());

/// Split page text into paragraphs. Lines inside a paragraph are trimmed
/// and joined with single spaces; empty paragraphs are dropped.
pub fn split_paragraphs(page_text: &str) -> Vec<String> {
    RE_PARAGRAPH_BREAK
        .split(page_text)
        .map(|para| {
            para.split('\n')
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|p| !p.is_empty())
        .collect()
}
