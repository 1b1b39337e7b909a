// src/lib.rs
// Public library surface for integration tests (and potential reuse).
//
// Scores BLAST candidate description lines for a query protein with a
// weighted multi-criteria formula and selects the best human-readable
// description. The weights are plain data, so an external optimization
// loop can re-run the whole engine per proposed weight vector.

pub mod annotator;
pub mod candidate;
pub mod description_score;
pub mod evaluate;
pub mod query;
pub mod report;
pub mod token_score;
pub mod tokenize;
pub mod weights;

// ---- Re-exports for stable public API ----
pub use crate::annotator::{annotate_all, annotate_query, Annotation};
pub use crate::candidate::Candidate;
pub use crate::description_score::{
    score_candidates, select_best, DescriptionStats, ScoredDescription,
};
pub use crate::evaluate::{evaluate_weights, token_f_score, EvaluationSummary};
pub use crate::query::Query;
pub use crate::report::TrainerReportWriter;
pub use crate::token_score::{overlap_score, TokenAggregates, TokenScores};
pub use crate::weights::{DatabaseWeights, ScoringWeights};
