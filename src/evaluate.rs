//! # Evaluation against reference descriptions
//!
//! The repeatable, side-effect-free scoring function an external
//! weight-search loop drives: re-run the engine over a query set under
//! one weight vector and compare each assigned description with its
//! ground-truth reference via token-overlap precision/recall (F1).
//! Nothing is cached between invocations, so every proposed weight
//! vector is evaluated from scratch.

use std::collections::{HashMap, HashSet};

use crate::annotator::annotate_query;
use crate::query::Query;
use crate::weights::ScoringWeights;

/// Token-overlap F1 of an assigned description versus its reference.
///
/// Edge rules: both token sets empty → 1.0 (a correct "no
/// description"); exactly one empty → 0.0.
pub fn token_f_score(assigned: &[String], reference: &[String]) -> f64 {
    if assigned.is_empty() && reference.is_empty() {
        return 1.0;
    }
    if assigned.is_empty() || reference.is_empty() {
        return 0.0;
    }
    let assigned_set: HashSet<&str> = assigned.iter().map(String::as_str).collect();
    let reference_set: HashSet<&str> = reference.iter().map(String::as_str).collect();
    let shared = assigned_set.intersection(&reference_set).count() as f64;
    let precision = shared / assigned_set.len() as f64;
    let recall = shared / reference_set.len() as f64;
    if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    }
}

/// Aggregate quality of one weight vector over a query set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluationSummary {
    /// Mean F1 over all queries that have a reference.
    pub average_f_score: f64,
    /// Number of queries evaluated (those with a reference).
    pub evaluated: usize,
    /// How many evaluated queries ended with "no description".
    pub without_description: usize,
}

/// Re-run the full engine over `queries` under `weights` and average
/// the per-query F1 against `references` (reference token sets keyed
/// by accession). Queries without a reference are skipped.
pub fn evaluate_weights(
    queries: &[Query],
    references: &HashMap<String, Vec<String>>,
    weights: &ScoringWeights,
) -> anyhow::Result<EvaluationSummary> {
    let mut total = 0.0;
    let mut evaluated = 0usize;
    let mut without_description = 0usize;

    for query in queries {
        let Some(reference) = references.get(&query.accession) else {
            continue;
        };
        let annotation = annotate_query(query, weights)?;
        let assigned: &[String] = annotation
            .best
            .as_ref()
            .map(|b| b.tokens.as_slice())
            .unwrap_or(&[]);
        if annotation.best.is_none() {
            without_description += 1;
        }
        total += token_f_score(assigned, reference);
        evaluated += 1;
    }

    let average_f_score = if evaluated > 0 {
        total / evaluated as f64
    } else {
        0.0
    };
    Ok(EvaluationSummary {
        average_f_score,
        evaluated,
        without_description,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn perfect_match_scores_one() {
        let t = toks(&["receptor", "kinase"]);
        assert!((token_f_score(&t, &t) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn disjoint_sets_score_zero() {
        assert_eq!(
            token_f_score(&toks(&["transporter"]), &toks(&["kinase"])),
            0.0
        );
    }

    #[test]
    fn partial_overlap_is_harmonic_mean() {
        // precision 1/2, recall 1/1 → F1 = 2/3
        let f = token_f_score(&toks(&["kinase", "receptor"]), &toks(&["kinase"]));
        assert!((f - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn empty_edges() {
        assert_eq!(token_f_score(&[], &[]), 1.0);
        assert_eq!(token_f_score(&[], &toks(&["kinase"])), 0.0);
        assert_eq!(token_f_score(&toks(&["kinase"]), &[]), 0.0);
    }
}
