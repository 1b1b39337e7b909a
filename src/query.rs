//! # Query sequence
//!
//! A query protein sequence together with its candidate description
//! lines, grouped per source database. The `BTreeMap` grouping fixes
//! the iteration order (database name ascending, then insertion order
//! within a database), which is what makes best-candidate selection
//! deterministic on score ties.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::candidate::Candidate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Query {
    /// Sequence accession / identifier.
    pub accession: String,
    /// Length of the query sequence in residues. Must be positive for
    /// overlap scoring.
    pub sequence_length: u32,
    /// Candidate description lines keyed by source database.
    #[serde(default)]
    pub candidates: BTreeMap<String, Vec<Candidate>>,
}

impl Query {
    pub fn new(accession: impl Into<String>, sequence_length: u32) -> Self {
        Self {
            accession: accession.into(),
            sequence_length,
            candidates: BTreeMap::new(),
        }
    }

    /// Add a candidate under its own database group (builder style).
    pub fn with_candidate(mut self, candidate: Candidate) -> Self {
        self.add_candidate(candidate);
        self
    }

    /// Add a candidate under its own database group.
    pub fn add_candidate(&mut self, candidate: Candidate) {
        self.candidates
            .entry(candidate.database.clone())
            .or_default()
            .push(candidate);
    }

    /// All candidates in deterministic order: database name ascending,
    /// insertion order within each database.
    pub fn iter_candidates(&self) -> impl Iterator<Item = &Candidate> {
        self.candidates.values().flat_map(|group| group.iter())
    }

    pub fn candidate_count(&self) -> usize {
        self.candidates.values().map(Vec::len).sum()
    }
}
