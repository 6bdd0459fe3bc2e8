//! Score banding. Every view maps scores to bands through these functions so the
//! same score always renders the same way.

use serde::Serialize;

/// Match quality band for an overall or sub-score (higher is better).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchBand {
    Good,
    Warning,
    Poor,
    Unknown,
}

impl MatchBand {
    /// Text shown next to the colored badge.
    pub fn label(&self) -> &'static str {
        match self {
            MatchBand::Good => "strong match",
            MatchBand::Warning => "partial match",
            MatchBand::Poor => "weak match",
            MatchBand::Unknown => "not analyzed",
        }
    }
}

/// Bias risk band (lower score is better).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BiasBand {
    Low,
    Medium,
    High,
}

impl BiasBand {
    pub fn label(&self) -> &'static str {
        match self {
            BiasBand::Low => "low risk",
            BiasBand::Medium => "medium risk",
            BiasBand::High => "high risk",
        }
    }
}

pub fn match_band(score: Option<f64>) -> MatchBand {
    match score {
        None => MatchBand::Unknown,
        Some(s) if s >= 80.0 => MatchBand::Good,
        Some(s) if s >= 60.0 => MatchBand::Warning,
        Some(_) => MatchBand::Poor,
    }
}

pub fn bias_band(score: f64) -> BiasBand {
    if score <= 20.0 {
        BiasBand::Low
    } else if score <= 50.0 {
        BiasBand::Medium
    } else {
        BiasBand::High
    }
}

/// Background intensity of a highlighted resume snippet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightIntensity {
    Strong,
    Moderate,
    Mild,
    Faint,
    None,
}

impl HighlightIntensity {
    pub fn for_score(score: f64) -> Self {
        if score > 85.0 {
            HighlightIntensity::Strong
        } else if score > 70.0 {
            HighlightIntensity::Moderate
        } else if score > 50.0 {
            HighlightIntensity::Mild
        } else if score > 30.0 {
            HighlightIntensity::Faint
        } else {
            HighlightIntensity::None
        }
    }
}

/// "90%", "72.5%", or "N/A" when there is no score.
pub fn format_percent(score: Option<f64>) -> String {
    match score {
        Some(s) => format!("{s}%"),
        None => "N/A".to_string(),
    }
}

/// A score paired with its band, as every view displays it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandedScore {
    pub score: f64,
    pub display: String,
    pub band: MatchBand,
    pub band_label: &'static str,
}

impl BandedScore {
    pub fn new(score: f64) -> Self {
        let band = match_band(Some(score));
        Self {
            score,
            display: format_percent(Some(score)),
            band,
            band_label: band.label(),
        }
    }
}
