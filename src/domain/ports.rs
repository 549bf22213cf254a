use crate::utils::error::Result;
use async_trait::async_trait;

/// External embedding collaborator.
///
/// Implementations return a pairwise cosine-similarity matrix with one row per
/// entry of `a` and one column per entry of `b`, values in `[-1, 1]`. Calls may
/// fail; the caller treats the signal as advisory and degrades without it.
#[async_trait]
pub trait EmbeddingClient: Send + Sync {
    async fn compare(&self, a: &[String], b: &[String]) -> Result<Vec<Vec<f64>>>;
}

/// Composite fit of one participant against a team's leadership, taking the
/// best score per metric across leaders. Semantic similarity is deliberately
/// not part of this composite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TeamFit {
    pub tz_score: f64,
    pub cat_score: f64,
}
