use serde::Serialize;
use tracing::warn;

use crate::models::HeatmapEntry;
use crate::presentation::bands::HighlightIntensity;

/// One run of resume text, either plain or highlighted by a heatmap entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Segment {
    Plain {
        text: String,
    },
    Highlight {
        text: String,
        score: f64,
        reasoning: String,
        intensity: HighlightIntensity,
    },
}

#[cfg(test)]
impl Segment {
    pub fn text(&self) -> &str {
        match self {
            Segment::Plain { text } | Segment::Highlight { text, .. } => text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HighlightedText {
    pub segments: Vec<Segment>,
    /// Indices of heatmap entries whose snippet was not found after the previous match.
    pub dropped: Vec<usize>,
}

#[cfg(test)]
impl HighlightedText {
    /// Concatenation of every segment; equal to the source text.
    pub fn text(&self) -> String {
        self.segments.iter().map(Segment::text).collect()
    }
}

/// Splits `text` into plain and highlighted segments.
///
/// Entries are matched in list order, each searched only after the end of the
/// previous match. Entries that are not found (including ones listed out of text
/// order) are skipped and reported in `dropped`. Empty snippets are skipped too.
pub fn highlight(text: &str, heatmap: &[HeatmapEntry]) -> HighlightedText {
    let mut segments = Vec::new();
    let mut dropped = Vec::new();
    let mut cursor = 0;

    for (index, entry) in heatmap.iter().enumerate() {
        if entry.snippet.is_empty() {
            dropped.push(index);
            continue;
        }
        let Some(offset) = text[cursor..].find(&entry.snippet) else {
            dropped.push(index);
            continue;
        };
        let start = cursor + offset;
        if start > cursor {
            segments.push(Segment::Plain {
                text: text[cursor..start].to_string(),
            });
        }
        let end = start + entry.snippet.len();
        segments.push(Segment::Highlight {
            text: text[start..end].to_string(),
            score: entry.score,
            reasoning: entry.reasoning.clone(),
            intensity: HighlightIntensity::for_score(entry.score),
        });
        cursor = end;
    }

    if cursor < text.len() || segments.is_empty() {
        segments.push(Segment::Plain {
            text: text[cursor..].to_string(),
        });
    }

    if !dropped.is_empty() {
        warn!(
            "{} of {} heatmap snippets could not be placed in the resume text",
            dropped.len(),
            heatmap.len()
        );
    }

    HighlightedText { segments, dropped }
}
