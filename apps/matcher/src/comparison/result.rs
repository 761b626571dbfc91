use serde::{Deserialize, Serialize};

/// Outcome of one successful comparison, as published to the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub score: f64,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub summary_notes: Vec<String>,
}

impl ComparisonResult {
    /// Builds a result, dropping repeated skill labels while keeping first-seen order.
    pub fn new(
        score: f64,
        matched_skills: Vec<String>,
        missing_skills: Vec<String>,
        summary_notes: Vec<String>,
    ) -> Self {
        Self {
            score,
            matched_skills: dedup_preserving_order(matched_skills),
            missing_skills: dedup_preserving_order(missing_skills),
            summary_notes,
        }
    }
}

fn dedup_preserving_order(labels: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    labels
        .into_iter()
        .filter(|label| seen.insert(label.clone()))
        .collect()
}

/// Render-ready view of a result: score gauge plus skill chips.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchScoreView {
    pub score: f64,
    /// The scoring service scores on 0–10; the gauge shows 0–100.
    pub percent: f64,
    pub summary: Option<String>,
    pub matched_skills: Vec<String>,
    pub matched_count: usize,
    pub missing_skills: Vec<String>,
    pub missing_count: usize,
}

impl From<&ComparisonResult> for MatchScoreView {
    fn from(result: &ComparisonResult) -> Self {
        Self {
            score: result.score,
            percent: (result.score * 10.0).clamp(0.0, 100.0),
            summary: result.summary_notes.first().cloned(),
            matched_skills: result.matched_skills.clone(),
            matched_count: result.matched_skills.len(),
            missing_skills: result.missing_skills.clone(),
            missing_count: result.missing_skills.len(),
        }
    }
}
