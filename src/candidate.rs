//! # Candidate description line
//!
//! One candidate human-readable description, produced by a single
//! homology-search hit. Carries the raw evidence the scoring engine
//! consumes: bit score, alignment span on the query, the distinct
//! blacklist-filtered token set, and an optional domain-similarity
//! score. The domain score is an explicit `Option` so every consumer
//! handles the no-evidence branch.

use serde::{Deserialize, Serialize};

use crate::tokenize;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Source database identifier (e.g. "swissprot").
    pub database: String,
    /// The description line as reported by the hit.
    pub description: String,
    /// Alignment significance score from the homology search (>= 0).
    pub bit_score: f64,
    /// Alignment start on the query, 1-based inclusive.
    pub query_start: u32,
    /// Alignment end on the query, 1-based inclusive.
    pub query_end: u32,
    /// Distinct, normalized, blacklist-filtered tokens. May be empty.
    pub tokens: Vec<String>,
    /// Agreement between query and hit domain annotations, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_similarity: Option<f64>,
}

impl Candidate {
    /// Build a candidate from an already-tokenized description, as
    /// supplied by the hit-parsing collaborator.
    pub fn new(
        database: impl Into<String>,
        description: impl Into<String>,
        bit_score: f64,
        query_start: u32,
        query_end: u32,
        tokens: Vec<String>,
    ) -> Self {
        Self {
            database: database.into(),
            description: description.into(),
            bit_score,
            query_start,
            query_end,
            tokens,
            domain_similarity: None,
        }
    }

    /// Convenience constructor that tokenizes the description with the
    /// built-in blacklist.
    pub fn from_description(
        database: impl Into<String>,
        description: impl Into<String>,
        bit_score: f64,
        query_start: u32,
        query_end: u32,
    ) -> Self {
        let description = description.into();
        let tokens = tokenize::tokenize(&description);
        Self::new(
            database,
            description,
            bit_score,
            query_start,
            query_end,
            tokens,
        )
    }

    /// Attach a domain-similarity score (builder style).
    pub fn with_domain_similarity(mut self, score: f64) -> Self {
        self.domain_similarity = Some(score);
        self
    }

    /// Canonical repetition pattern of the description: the distinct
    /// tokens sorted and joined by a single space. Candidates whose
    /// descriptions differ only in word order, casing or punctuation
    /// share a pattern; an empty token set canonicalizes to "".
    pub fn patternize(&self) -> String {
        let mut sorted: Vec<&str> = self.tokens.iter().map(String::as_str).collect();
        sorted.sort_unstable();
        sorted.join(" ")
    }
}
