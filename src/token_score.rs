//! # Token scoring
//!
//! First half of the scoring engine: turns raw per-candidate alignment
//! evidence into one normalized score per distinct token.
//!
//! Two passes per query, both over fresh state:
//!
//! 1. [`TokenAggregates::measure`] walks every candidate and
//!    accumulates cumulative per-token sums plus dataset-wide totals
//!    for the four evidence channels (bit score, database weight,
//!    overlap, domain similarity).
//! 2. [`TokenScores::compute`] validates the weight configuration,
//!    then derives each token's normalized score and the token high
//!    score; [`TokenScores::demote_non_informative`] afterwards
//!    penalizes tokens at or below half the high score.
//!
//! Aggregates are a per-query value object that is dropped once the
//! query is scored. Nothing is shared between queries or between
//! weight vectors.

use std::collections::HashMap;

use anyhow::bail;

use crate::query::Query;
use crate::weights::ScoringWeights;

/// Fraction of the query sequence covered by the local alignment.
/// Positions are 1-based inclusive; `query_length` must be positive,
/// otherwise the upstream hit data is malformed.
pub fn overlap_score(query_start: u32, query_end: u32, query_length: u32) -> anyhow::Result<f64> {
    if query_length == 0 {
        bail!("query length must be positive to compute an overlap score");
    }
    Ok((f64::from(query_end) - f64::from(query_start) + 1.0) / f64::from(query_length))
}

/// A normalized ratio with the guarded-zero rule: a zero denominator
/// contributes nothing instead of propagating NaN/inf.
fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Per-query evidence accumulator, rebuilt from scratch for every
/// query and every weight vector.
#[derive(Debug, Default)]
pub struct TokenAggregates {
    cumulative_bit: HashMap<String, f64>,
    cumulative_database: HashMap<String, f64>,
    cumulative_overlap: HashMap<String, f64>,
    cumulative_domain: HashMap<String, f64>,
    total_bit: f64,
    total_database: f64,
    total_overlap: f64,
    total_domain: f64,
}

impl TokenAggregates {
    /// The aggregation pass. For every candidate and every one of its
    /// tokens, the candidate's bit score, its database's integer
    /// weight, and its overlap score are added to the token's
    /// cumulative sums and to the dataset-wide totals. A present
    /// domain-similarity score > 0 is added to each token's cumulative
    /// domain sum; the dataset-wide domain total accumulates once per
    /// candidate with a present score.
    pub fn measure(query: &Query, weights: &ScoringWeights) -> anyhow::Result<Self> {
        let mut agg = Self::default();
        for candidate in query.iter_candidates() {
            let overlap =
                overlap_score(candidate.query_start, candidate.query_end, query.sequence_length)?;
            let database_weight = f64::from(weights.database_weight(&candidate.database));
            for token in &candidate.tokens {
                *agg.cumulative_bit.entry(token.clone()).or_default() += candidate.bit_score;
                *agg.cumulative_database.entry(token.clone()).or_default() += database_weight;
                *agg.cumulative_overlap.entry(token.clone()).or_default() += overlap;
                agg.total_bit += candidate.bit_score;
                agg.total_database += database_weight;
                agg.total_overlap += overlap;
            }
            if let Some(dss) = candidate.domain_similarity {
                if dss > 0.0 {
                    for token in &candidate.tokens {
                        *agg.cumulative_domain.entry(token.clone()).or_default() += dss;
                    }
                }
                agg.total_domain += dss;
            }
        }
        Ok(agg)
    }

    pub fn distinct_token_count(&self) -> usize {
        self.cumulative_bit.len()
    }

    pub fn total_bit(&self) -> f64 {
        self.total_bit
    }

    pub fn total_database(&self) -> f64 {
        self.total_database
    }

    pub fn total_overlap(&self) -> f64 {
        self.total_overlap
    }

    pub fn total_domain(&self) -> f64 {
        self.total_domain
    }
}

/// Final per-token scores and the token high score for one query.
#[derive(Debug, Clone)]
pub struct TokenScores {
    scores: HashMap<String, f64>,
    high_score: f64,
}

impl TokenScores {
    /// The scoring pass. Fails with a configuration error before
    /// scoring any token when the four token-score weights do not sum
    /// to 1.0 within tolerance.
    ///
    /// Each token scores
    /// `w_bit*cum_bit/total_bit + w_db*cum_db/total_db +
    /// w_overlap*cum_overlap/total_overlap + domain_fraction`, every
    /// ratio guarded to zero on a zero denominator. The domain
    /// fraction applies only when the dataset has a positive domain
    /// total and the token itself carries domain evidence.
    pub fn compute(aggregates: &TokenAggregates, weights: &ScoringWeights) -> anyhow::Result<Self> {
        weights.validate()?;
        let w = &weights.token_score;
        let mut scores = HashMap::with_capacity(aggregates.cumulative_bit.len());
        let mut high_score = 0.0_f64;
        for (token, cumulative_bit) in &aggregates.cumulative_bit {
            let cumulative_database = aggregates
                .cumulative_database
                .get(token)
                .copied()
                .unwrap_or(0.0);
            let cumulative_overlap = aggregates
                .cumulative_overlap
                .get(token)
                .copied()
                .unwrap_or(0.0);
            let domain_fraction = match aggregates.cumulative_domain.get(token) {
                Some(cumulative_domain) if aggregates.total_domain > 0.0 => {
                    w.domain_similarity_weight * cumulative_domain / aggregates.total_domain
                }
                _ => 0.0,
            };
            let score = w.bit_score_weight * ratio(*cumulative_bit, aggregates.total_bit)
                + w.database_score_weight * ratio(cumulative_database, aggregates.total_database)
                + w.overlap_score_weight * ratio(cumulative_overlap, aggregates.total_overlap)
                + domain_fraction;
            if score > high_score {
                high_score = score;
            }
            scores.insert(token.clone(), score);
        }
        Ok(Self { scores, high_score })
    }

    /// A token is informative iff its score is strictly greater than
    /// half the token high score. Evaluated against the current score
    /// map, so call it before [`Self::demote_non_informative`].
    pub fn is_informative(&self, token: &str) -> bool {
        self.score(token) > self.high_score / 2.0
    }

    /// Replace every non-informative token's score with
    /// `score - high_score/2`. Deliberately not idempotent: the
    /// pipeline invokes it exactly once per pass, and so must any
    /// other caller.
    pub fn demote_non_informative(mut self) -> Self {
        let half_high = self.high_score / 2.0;
        for score in self.scores.values_mut() {
            if *score <= half_high {
                *score -= half_high;
            }
        }
        self
    }

    /// Score of a token; unknown tokens contribute nothing.
    pub fn score(&self, token: &str) -> f64 {
        self.scores.get(token).copied().unwrap_or(0.0)
    }

    /// Sum of the scores of a candidate's tokens (its lexical score).
    pub fn summed_token_score(&self, tokens: &[String]) -> f64 {
        tokens.iter().map(|t| self.score(t)).sum()
    }

    pub fn high_score(&self) -> f64 {
        self.high_score
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.scores.iter().map(|(t, s)| (t.as_str(), *s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::Candidate;

    fn test_weights() -> ScoringWeights {
        let mut w = ScoringWeights::default_seed();
        w.token_score = crate::weights::TokenScoreWeights {
            bit_score_weight: 0.5,
            database_score_weight: 0.3,
            overlap_score_weight: 0.2,
            domain_similarity_weight: 0.0,
        };
        w
    }

    #[test]
    fn overlap_score_full_and_half_coverage() {
        assert!((overlap_score(1, 100, 100).unwrap() - 1.0).abs() < 1e-12);
        assert!((overlap_score(1, 50, 100).unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn overlap_score_rejects_zero_length() {
        assert!(overlap_score(1, 50, 0).is_err());
    }

    #[test]
    fn single_candidate_scores_sum_to_one_per_token_share() {
        // One candidate, one token: every cumulative sum equals its
        // total, so the token scores exactly the weight sum = 1.0.
        let query = Query::new("P1", 100)
            .with_candidate(Candidate::from_description("swissprot", "Kinase", 50.0, 1, 100));
        let agg = TokenAggregates::measure(&query, &test_weights()).unwrap();
        let scores = TokenScores::compute(&agg, &test_weights()).unwrap();
        assert_eq!(scores.len(), 1);
        assert!((scores.score("kinase") - 1.0).abs() < 1e-9);
        assert!((scores.high_score() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn scores_are_finite_with_evidence() {
        let query = Query::new("P1", 200)
            .with_candidate(Candidate::from_description(
                "swissprot",
                "Receptor kinase CLAVATA1",
                120.5,
                1,
                180,
            ))
            .with_candidate(Candidate::from_description(
                "trembl",
                "Serine threonine kinase",
                90.0,
                10,
                150,
            ));
        let agg = TokenAggregates::measure(&query, &test_weights()).unwrap();
        let scores = TokenScores::compute(&agg, &test_weights()).unwrap();
        assert!(scores.len() >= 4);
        for (_, s) in scores.iter() {
            assert!(s.is_finite());
        }
    }

    #[test]
    fn zero_bit_scores_are_guarded_not_nan() {
        // All bit scores zero: the bit ratio denominator is 0 and must
        // contribute 0, not NaN.
        let query = Query::new("P1", 100)
            .with_candidate(Candidate::from_description("swissprot", "Kinase", 0.0, 1, 100));
        let agg = TokenAggregates::measure(&query, &test_weights()).unwrap();
        assert_eq!(agg.total_bit(), 0.0);
        let scores = TokenScores::compute(&agg, &test_weights()).unwrap();
        let s = scores.score("kinase");
        assert!(s.is_finite());
        // database + overlap shares are both 1.0 here
        assert!((s - 0.5).abs() < 1e-9);
    }

    #[test]
    fn domain_fraction_zero_without_domain_total() {
        let mut weights = test_weights();
        weights.token_score = crate::weights::TokenScoreWeights {
            bit_score_weight: 0.4,
            database_score_weight: 0.3,
            overlap_score_weight: 0.2,
            domain_similarity_weight: 0.1,
        };
        let query = Query::new("P1", 100)
            .with_candidate(Candidate::from_description("swissprot", "Kinase", 50.0, 1, 100));
        let agg = TokenAggregates::measure(&query, &weights).unwrap();
        assert_eq!(agg.total_domain(), 0.0);
        let scores = TokenScores::compute(&agg, &weights).unwrap();
        // Without domain evidence only 0.9 of the weight mass applies.
        assert!((scores.score("kinase") - 0.9).abs() < 1e-9);
    }

    #[test]
    fn domain_evidence_contributes_when_present() {
        let mut weights = test_weights();
        weights.token_score = crate::weights::TokenScoreWeights {
            bit_score_weight: 0.4,
            database_score_weight: 0.3,
            overlap_score_weight: 0.2,
            domain_similarity_weight: 0.1,
        };
        let query = Query::new("P1", 100).with_candidate(
            Candidate::from_description("swissprot", "Kinase", 50.0, 1, 100)
                .with_domain_similarity(0.75),
        );
        let agg = TokenAggregates::measure(&query, &weights).unwrap();
        assert!((agg.total_domain() - 0.75).abs() < 1e-12);
        let scores = TokenScores::compute(&agg, &weights).unwrap();
        assert!((scores.score("kinase") - 1.0).abs() < 1e-9);
    }

    #[test]
    fn zero_domain_similarity_feeds_no_cumulative_sum() {
        // dss = 0.0 is present but not > 0: no per-token domain sum,
        // and a zero total keeps every domain fraction at 0.
        let mut weights = test_weights();
        weights.token_score.domain_similarity_weight = 0.1;
        weights.token_score.bit_score_weight = 0.4;
        let query = Query::new("P1", 100).with_candidate(
            Candidate::from_description("swissprot", "Kinase", 50.0, 1, 100)
                .with_domain_similarity(0.0),
        );
        let agg = TokenAggregates::measure(&query, &weights).unwrap();
        assert_eq!(agg.total_domain(), 0.0);
        let scores = TokenScores::compute(&agg, &weights).unwrap();
        assert!((scores.score("kinase") - 0.9).abs() < 1e-9);
    }

    #[test]
    fn invalid_weight_sum_fails_before_scoring() {
        let mut weights = test_weights();
        weights.token_score.bit_score_weight = 0.9; // sum = 1.4
        let query = Query::new("P1", 100)
            .with_candidate(Candidate::from_description("swissprot", "Kinase", 50.0, 1, 100));
        let agg = TokenAggregates::measure(&query, &weights).unwrap();
        let err = TokenScores::compute(&agg, &weights).unwrap_err();
        assert!(err.to_string().contains("sum up to 1.0"));
    }

    #[test]
    fn demotion_boundary_is_strict() {
        // high = 10: a token at exactly 5 is non-informative and drops
        // to 0; a token at 5.01 stays untouched.
        let scores = TokenScores {
            scores: HashMap::from([
                ("top".to_string(), 10.0),
                ("boundary".to_string(), 5.0),
                ("above".to_string(), 5.01),
                ("weak".to_string(), 2.0),
            ]),
            high_score: 10.0,
        };
        assert!(!scores.is_informative("boundary"));
        assert!(scores.is_informative("above"));

        let demoted = scores.demote_non_informative();
        assert!((demoted.score("top") - 10.0).abs() < 1e-12);
        assert!(demoted.score("boundary").abs() < 1e-12);
        assert!((demoted.score("above") - 5.01).abs() < 1e-12);
        assert!((demoted.score("weak") + 3.0).abs() < 1e-12);
    }

    #[test]
    fn totals_accumulate_per_candidate_token_pair() {
        // Two tokens on one candidate: bit total counts the candidate
        // once per token, so each channel's shares sum to 1 across the
        // token set.
        let query = Query::new("P1", 100).with_candidate(Candidate::from_description(
            "swissprot",
            "Receptor kinase",
            40.0,
            1,
            50,
        ));
        let agg = TokenAggregates::measure(&query, &test_weights()).unwrap();
        assert_eq!(agg.distinct_token_count(), 2);
        assert!((agg.total_bit() - 80.0).abs() < 1e-12);
        let scores = TokenScores::compute(&agg, &test_weights()).unwrap();
        let sum: f64 = scores.iter().map(|(_, s)| s).sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }
}
