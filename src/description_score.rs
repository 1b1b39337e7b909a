//! # Description scoring and selection
//!
//! Second half of the scoring engine. Two explicitly ordered phases:
//!
//! 1. [`DescriptionStats::measure`] observes every candidate of every
//!    database and records the dataset maxima (bit score, domain
//!    similarity) and the description-pattern frequencies.
//! 2. [`score_candidates`] / [`select_best`] combine the per-token
//!    lexical evidence with the candidate-level factors into one total
//!    per candidate and pick the winner.
//!
//! Phase 2 takes phase 1's result by reference, so scoring before
//! measuring is impossible by construction. Candidates without a
//! single surviving token are measured in phase 1 but excluded from
//! scoring and selection; a query where no candidate survives yields
//! `None` ("no description available"), which is a valid outcome.

use std::collections::HashMap;

use serde::Serialize;

use crate::candidate::Candidate;
use crate::query::Query;
use crate::token_score::TokenScores;
use crate::weights::ScoringWeights;

/// Dataset maxima and pattern frequencies for one query (phase 1).
#[derive(Debug, Default)]
pub struct DescriptionStats {
    max_bit_score: f64,
    max_domain_similarity_score: f64,
    pattern_frequencies: HashMap<String, u32>,
    max_description_line_frequency: u32,
}

impl DescriptionStats {
    /// Measure every candidate: maxima over bit scores and present
    /// domain-similarity scores, plus how often each canonical
    /// description pattern occurs.
    pub fn measure(query: &Query) -> Self {
        let mut stats = Self::default();
        for candidate in query.iter_candidates() {
            if candidate.bit_score > stats.max_bit_score {
                stats.max_bit_score = candidate.bit_score;
            }
            if let Some(dss) = candidate.domain_similarity {
                if dss > stats.max_domain_similarity_score {
                    stats.max_domain_similarity_score = dss;
                }
            }
            let frequency = stats
                .pattern_frequencies
                .entry(candidate.patternize())
                .or_insert(0);
            *frequency += 1;
            if *frequency > stats.max_description_line_frequency {
                stats.max_description_line_frequency = *frequency;
            }
        }
        stats
    }

    pub fn max_bit_score(&self) -> f64 {
        self.max_bit_score
    }

    pub fn max_domain_similarity_score(&self) -> f64 {
        self.max_domain_similarity_score
    }

    pub fn pattern_frequency(&self, pattern: &str) -> u32 {
        self.pattern_frequencies.get(pattern).copied().unwrap_or(0)
    }

    pub fn max_description_line_frequency(&self) -> u32 {
        self.max_description_line_frequency
    }
}

/// One scored candidate with its per-component breakdown, ready for
/// reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredDescription {
    pub database: String,
    pub description: String,
    pub tokens: Vec<String>,
    pub total: f64,
    pub lexical_score: f64,
    pub relative_bit_score: f64,
    pub pattern_factor: f64,
    pub domain_similarity_factor: f64,
}

fn score_one(
    candidate: &Candidate,
    token_scores: &TokenScores,
    stats: &DescriptionStats,
    weights: &ScoringWeights,
) -> ScoredDescription {
    let lexical_score = token_scores.summed_token_score(&candidate.tokens);

    let relative_bit_score = if stats.max_bit_score() > 0.0 {
        weights.description_bit_score_weight(&candidate.database) * candidate.bit_score
            / stats.max_bit_score()
    } else {
        0.0
    };

    let pattern_factor = if stats.max_description_line_frequency() > 0 {
        weights.description_score.pattern_factor_weight
            * f64::from(stats.pattern_frequency(&candidate.patternize()))
            / f64::from(stats.max_description_line_frequency())
    } else {
        0.0
    };

    let domain_similarity_factor = match candidate.domain_similarity {
        Some(dss) if stats.max_domain_similarity_score() > 0.0 => {
            weights.description_score.domain_similarity_weight * dss
                / stats.max_domain_similarity_score()
        }
        _ => 0.0,
    };

    ScoredDescription {
        database: candidate.database.clone(),
        description: candidate.description.clone(),
        tokens: candidate.tokens.clone(),
        total: lexical_score + relative_bit_score + pattern_factor + domain_similarity_factor,
        lexical_score,
        relative_bit_score,
        pattern_factor,
        domain_similarity_factor,
    }
}

/// Phase 2 over the whole candidate set: every candidate with at least
/// one surviving token gets a total score. Order matches
/// `Query::iter_candidates`.
pub fn score_candidates(
    query: &Query,
    token_scores: &TokenScores,
    stats: &DescriptionStats,
    weights: &ScoringWeights,
) -> Vec<ScoredDescription> {
    query
        .iter_candidates()
        .filter(|c| !c.tokens.is_empty())
        .map(|c| score_one(c, token_scores, stats, weights))
        .collect()
}

/// Select the best-scoring eligible candidate. The running best is
/// replaced only on a strictly greater total, so on ties the first
/// candidate in database-sorted-then-insertion order wins, giving the
/// same winner on every run.
pub fn select_best(
    query: &Query,
    token_scores: &TokenScores,
    stats: &DescriptionStats,
    weights: &ScoringWeights,
) -> Option<ScoredDescription> {
    let mut best: Option<ScoredDescription> = None;
    for candidate in query.iter_candidates() {
        if candidate.tokens.is_empty() {
            continue;
        }
        let scored = score_one(candidate, token_scores, stats, weights);
        let replace = match &best {
            Some(current) => scored.total > current.total,
            None => true,
        };
        if replace {
            best = Some(scored);
        }
    }
    best
}
