//! # Scoring weights
//!
//! The complete weight configuration for one scoring pass:
//!
//! - four token-score weights (bit, database, overlap, domain
//!   similarity) that must sum to 1.0 within a tolerance of 0.001;
//! - per source database: an integer database weight and the
//!   description-score bit-score weight;
//! - global description-score pattern-factor and domain-similarity
//!   weights.
//!
//! Loaded from TOML (path overridable via `HRD_WEIGHTS_CONFIG_PATH`),
//! with a built-in `default_seed()` fallback. A configuration is
//! immutable for the duration of a scoring pass and is threaded
//! explicitly through every scoring function, so concurrent passes
//! with different weight vectors never interfere.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::bail;
use serde::Deserialize;
use tracing::info;

// --- env defaults & names ---
pub const DEFAULT_WEIGHTS_CONFIG_PATH: &str = "config/weights.toml";
pub const ENV_WEIGHTS_CONFIG_PATH: &str = "HRD_WEIGHTS_CONFIG_PATH";

/// Tolerated deviation of the token-score weight sum from 1.0.
pub const TOKEN_WEIGHT_SUM_TOLERANCE: f64 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct TokenScoreWeights {
    pub bit_score_weight: f64,
    pub database_score_weight: f64,
    pub overlap_score_weight: f64,
    #[serde(default)]
    pub domain_similarity_weight: f64,
}

impl Default for TokenScoreWeights {
    fn default() -> Self {
        // Trained defaults for a three-database setup; domain evidence
        // off until an annotation source is configured.
        Self {
            bit_score_weight: 0.468,
            database_score_weight: 0.2098,
            overlap_score_weight: 0.3221,
            domain_similarity_weight: 0.0,
        }
    }
}

impl TokenScoreWeights {
    pub fn sum(&self) -> f64 {
        self.bit_score_weight
            + self.database_score_weight
            + self.overlap_score_weight
            + self.domain_similarity_weight
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct DescriptionScoreWeights {
    #[serde(default = "default_pattern_factor_weight")]
    pub pattern_factor_weight: f64,
    #[serde(default)]
    pub domain_similarity_weight: f64,
}

fn default_pattern_factor_weight() -> f64 {
    0.4
}

impl Default for DescriptionScoreWeights {
    fn default() -> Self {
        Self {
            pattern_factor_weight: default_pattern_factor_weight(),
            domain_similarity_weight: 0.0,
        }
    }
}

/// Per-database weights.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct DatabaseWeights {
    /// Integer trust weight of the database.
    pub weight: u32,
    /// Weight of the relative bit score in the description score.
    pub description_bit_score_weight: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScoringWeights {
    #[serde(default)]
    pub token_score: TokenScoreWeights,
    #[serde(default)]
    pub description_score: DescriptionScoreWeights,
    /// Known databases; sorted map so report columns have a stable
    /// order.
    #[serde(default)]
    pub databases: BTreeMap<String, DatabaseWeights>,
    /// Fallbacks for databases that appear in the hit data but not in
    /// the configuration.
    #[serde(default = "default_database_weight")]
    pub default_database_weight: u32,
    #[serde(default = "default_description_bit_score_weight")]
    pub default_description_bit_score_weight: f64,
}

fn default_database_weight() -> u32 {
    100
}

fn default_description_bit_score_weight() -> f64 {
    1.0
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            token_score: TokenScoreWeights::default(),
            description_score: DescriptionScoreWeights::default(),
            databases: BTreeMap::new(),
            default_database_weight: default_database_weight(),
            default_description_bit_score_weight: default_description_bit_score_weight(),
        }
    }
}

impl ScoringWeights {
    /// Parse from a TOML string and validate the token-score weights.
    pub fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        let weights: ScoringWeights = toml::from_str(toml_str)?;
        weights.validate()?;
        Ok(weights)
    }

    /// Load and validate from a TOML file.
    pub fn from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("Failed to read weights config at {}: {}", path.display(), e)
        })?;
        Self::from_toml_str(&content)
    }

    /// Load from `HRD_WEIGHTS_CONFIG_PATH` (or the default path). A
    /// missing file falls back to `default_seed()`; a present but
    /// invalid file is an error so a broken configuration never scores
    /// silently.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var(ENV_WEIGHTS_CONFIG_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_WEIGHTS_CONFIG_PATH));
        if !path.exists() {
            info!(path = %path.display(), "weights config not found, using built-in seed");
            return Ok(Self::default_seed());
        }
        Self::from_path(&path)
    }

    /// Configuration check: the four token-score weights must sum to
    /// 1.0 within ±0.001. The sum is rounded to 9 decimal places first
    /// so float noise does not fail an exactly-configured vector.
    pub fn validate(&self) -> anyhow::Result<()> {
        let sum = self.token_score.sum();
        let rounded = (sum * 1e9).round() / 1e9;
        if !(1.0 - TOKEN_WEIGHT_SUM_TOLERANCE..=1.0 + TOKEN_WEIGHT_SUM_TOLERANCE)
            .contains(&rounded)
        {
            bail!(
                "token-score weights (bit, database, overlap, domain similarity) \
                 must sum up to 1.0 +/- {}, but sum up to: {}",
                TOKEN_WEIGHT_SUM_TOLERANCE,
                sum
            );
        }
        Ok(())
    }

    /// Integer weight of a database, falling back to the configured
    /// default for unknown names.
    pub fn database_weight(&self, database: &str) -> u32 {
        self.databases
            .get(database)
            .map(|d| d.weight)
            .unwrap_or(self.default_database_weight)
    }

    /// Description-score bit-score weight of a database, with the same
    /// fallback rule.
    pub fn description_bit_score_weight(&self, database: &str) -> f64 {
        self.databases
            .get(database)
            .map(|d| d.description_bit_score_weight)
            .unwrap_or(self.default_description_bit_score_weight)
    }

    /// Database names in their stable (sorted) order, for report
    /// columns.
    pub fn sorted_databases(&self) -> Vec<String> {
        self.databases.keys().cloned().collect()
    }

    /// Built-in seed for a common three-database setup. Used as the
    /// fallback when no config file is present.
    pub fn default_seed() -> Self {
        let mut databases = BTreeMap::new();
        databases.insert(
            "swissprot".to_string(),
            DatabaseWeights {
                weight: 653,
                description_bit_score_weight: 2.717061,
            },
        );
        databases.insert(
            "tair".to_string(),
            DatabaseWeights {
                weight: 854,
                description_bit_score_weight: 2.590211,
            },
        );
        databases.insert(
            "trembl".to_string(),
            DatabaseWeights {
                weight: 904,
                description_bit_score_weight: 2.917405,
            },
        );
        Self {
            databases,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_TOML: &str = r#"
[token_score]
bit_score_weight = 0.5
database_score_weight = 0.3
overlap_score_weight = 0.2
domain_similarity_weight = 0.0

[description_score]
pattern_factor_weight = 0.3
domain_similarity_weight = 0.1

[databases.swissprot]
weight = 653
description_bit_score_weight = 2.7

[databases.trembl]
weight = 904
description_bit_score_weight = 2.9
"#;

    #[test]
    fn parses_and_validates_toml() {
        let w = ScoringWeights::from_toml_str(TEST_TOML).expect("valid config");
        assert_eq!(w.database_weight("swissprot"), 653);
        assert!((w.description_bit_score_weight("trembl") - 2.9).abs() < 1e-9);
        assert!((w.description_score.pattern_factor_weight - 0.3).abs() < 1e-9);
        assert_eq!(w.sorted_databases(), vec!["swissprot", "trembl"]);
    }

    #[test]
    fn unknown_database_falls_back_to_defaults() {
        let w = ScoringWeights::from_toml_str(TEST_TOML).expect("valid config");
        assert_eq!(w.database_weight("pdb"), w.default_database_weight);
        assert!(
            (w.description_bit_score_weight("pdb") - w.default_description_bit_score_weight).abs()
                < 1e-9
        );
    }

    #[test]
    fn rejects_weights_not_summing_to_one() {
        let bad = TEST_TOML.replace("bit_score_weight = 0.5", "bit_score_weight = 0.7");
        let err = ScoringWeights::from_toml_str(&bad).unwrap_err();
        assert!(err.to_string().contains("sum up to 1.0"));
    }

    #[test]
    fn tolerates_sum_within_one_thousandth() {
        let nearly = TEST_TOML.replace("bit_score_weight = 0.5", "bit_score_weight = 0.5009");
        assert!(ScoringWeights::from_toml_str(&nearly).is_ok());
        let over = TEST_TOML.replace("bit_score_weight = 0.5", "bit_score_weight = 0.502");
        assert!(ScoringWeights::from_toml_str(&over).is_err());
    }

    #[test]
    fn default_seed_is_valid() {
        let seed = ScoringWeights::default_seed();
        assert!(seed.validate().is_ok());
        assert_eq!(seed.sorted_databases(), vec!["swissprot", "tair", "trembl"]);
    }
}
