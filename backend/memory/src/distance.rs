/// Distance functions for nearest-neighbour search.
///
/// All metrics return a non-negative dissimilarity: 0 for identical vectors,
/// growing as they diverge.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    /// Squared euclidean distance.
    #[default]
    L2,
    /// `1 - cosine similarity`, clamped at 0.
    Cosine,
}

impl DistanceMetric {
    /// Distance between two equal-length vectors. Mismatched or empty vectors
    /// are maximally distant.
    pub fn distance(self, a: &[f32], b: &[f32]) -> f32 {
        if a.len() != b.len() || a.is_empty() {
            return f32::INFINITY;
        }
        match self {
            DistanceMetric::L2 => a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum(),
            DistanceMetric::Cosine => (1.0 - cosine_similarity(a, b)).max(0.0),
        }
    }
}

/// Calculate cosine similarity between two equal-length slices.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let na: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let nb: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if na == 0.0 || nb == 0.0 { 0.0 } else { dot / (na * nb) }
}
