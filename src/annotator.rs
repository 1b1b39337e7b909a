//! # Annotation pipeline
//!
//! Pure, testable logic that maps `(query, weights)` → `Annotation`.
//! No I/O, no shared state: aggregates, token scores and description
//! stats are rebuilt from scratch on every call, so the same engine is
//! safely re-invoked for each weight vector an external tuning loop
//! proposes, and callers may run any number of queries in parallel.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::description_score::{select_best, DescriptionStats, ScoredDescription};
use crate::query::Query;
use crate::token_score::{TokenAggregates, TokenScores};
use crate::weights::ScoringWeights;

/// Result of annotating one query: the selected description (if any
/// candidate had a surviving token) plus the full per-token score map
/// for diagnostic reporting.
#[derive(Debug, Clone, Serialize)]
pub struct Annotation {
    pub accession: String,
    /// `None` means "no description available", a valid outcome rather
    /// than an error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best: Option<ScoredDescription>,
    /// Final (post-demotion) token scores, sorted for stable output.
    pub token_scores: BTreeMap<String, f64>,
}

impl Annotation {
    /// The assigned description, when one exists.
    pub fn description(&self) -> Option<&str> {
        self.best.as_ref().map(|b| b.description.as_str())
    }
}

/// Run the full two-pass scoring pipeline for one query:
/// aggregation → token scoring → non-informative demotion →
/// maxima/frequency measurement → description scoring → selection.
///
/// Fails on a malformed query (zero sequence length) or an invalid
/// weight configuration; both abort before any candidate is scored.
pub fn annotate_query(query: &Query, weights: &ScoringWeights) -> anyhow::Result<Annotation> {
    let aggregates = TokenAggregates::measure(query, weights)?;
    let token_scores = TokenScores::compute(&aggregates, weights)?.demote_non_informative();
    let stats = DescriptionStats::measure(query);
    let best = select_best(query, &token_scores, &stats, weights);

    debug!(
        accession = %query.accession,
        candidates = query.candidate_count(),
        tokens = token_scores.len(),
        description = best.as_ref().map(|b| b.description.as_str()).unwrap_or("<none>"),
        "annotated query"
    );

    Ok(Annotation {
        accession: query.accession.clone(),
        best,
        token_scores: token_scores
            .iter()
            .map(|(t, s)| (t.to_string(), s))
            .collect(),
    })
}

/// Annotate a whole query set under one weight vector.
pub fn annotate_all(queries: &[Query], weights: &ScoringWeights) -> anyhow::Result<Vec<Annotation>> {
    queries.iter().map(|q| annotate_query(q, weights)).collect()
}
