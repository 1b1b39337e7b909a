//! # Trainer settings report
//!
//! Tab-separated record of the weight vectors an external optimization
//! loop evaluates: one row per vector with its evaluation quality and
//! every tunable weight: the three token-score weights and, per
//! database in sorted order, the database weight and the
//! description-score bit-score weight. The tuning loop appends one
//! generation row per iteration and a final row for the winning
//! vector.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::Context;

use crate::weights::ScoringWeights;

/// Writes settings rows for an optimization run. The database column
/// order is fixed at creation so every row lines up with the header.
#[derive(Debug)]
pub struct TrainerReportWriter {
    writer: BufWriter<File>,
    sorted_databases: Vec<String>,
}

impl TrainerReportWriter {
    /// Create the report file; the column layout is taken from the
    /// databases configured in `weights`.
    pub fn create(path: impl AsRef<Path>, weights: &ScoringWeights) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("Failed to create trainer report at {}", path.display()))?;
        Ok(Self {
            writer: BufWriter::new(file),
            sorted_databases: weights.sorted_databases(),
        })
    }

    /// Header row. The final-output variant carries the average
    /// maximum evaluation score instead of the per-generation
    /// diff/origin columns.
    pub fn write_header(&mut self, is_final: bool) -> anyhow::Result<()> {
        let mut header = String::from("generation\t");
        if is_final {
            header.push_str("avg_max_evaluation_score\t");
        }
        header.push_str("avg_evaluation_score");
        if !is_final {
            header.push_str("\tdiff_to_last_generation\torigin");
        }
        header.push_str(
            "\ttoken_bit_score_weight\ttoken_database_score_weight\ttoken_overlap_score_weight",
        );
        for database in &self.sorted_databases {
            header.push_str(&format!(
                "\t{database}_weight\t{database}_description_bit_score_weight"
            ));
        }
        header.push('\n');
        self.writer.write_all(header.as_bytes())?;
        Ok(())
    }

    /// One row for the best vector of a generation.
    pub fn write_generation_row(
        &mut self,
        generation: u32,
        weights: &ScoringWeights,
        avg_evaluation_score: f64,
        diff_to_last_generation: f64,
        origin: &str,
    ) -> anyhow::Result<()> {
        let row = format!(
            "{generation}\t{avg_evaluation_score:.6}\t{diff_to_last_generation:.6}\t{origin}{}\n",
            self.settings_columns(weights)
        );
        self.writer.write_all(row.as_bytes())?;
        Ok(())
    }

    /// The final row for the overall winning vector.
    pub fn write_final_row(
        &mut self,
        weights: &ScoringWeights,
        found_in_generation: u32,
        avg_max_evaluation_score: f64,
        avg_evaluation_score: f64,
    ) -> anyhow::Result<()> {
        let row = format!(
            "{found_in_generation}\t{avg_max_evaluation_score:.6}\t{avg_evaluation_score:.6}{}\n",
            self.settings_columns(weights)
        );
        self.writer.write_all(row.as_bytes())?;
        Ok(())
    }

    pub fn flush(&mut self) -> anyhow::Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// The weight columns shared by generation and final rows, leading
    /// tab included.
    fn settings_columns(&self, weights: &ScoringWeights) -> String {
        let t = &weights.token_score;
        let mut columns = format!(
            "\t{:.6}\t{:.6}\t{:.6}",
            t.bit_score_weight, t.database_score_weight, t.overlap_score_weight
        );
        for database in &self.sorted_databases {
            columns.push_str(&format!(
                "\t{}\t{:.6}",
                weights.database_weight(database),
                weights.description_bit_score_weight(database)
            ));
        }
        columns
    }
}
