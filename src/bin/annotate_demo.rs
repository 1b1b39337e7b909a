//! Demo that annotates one hand-built query with the seed weights and
//! prints the winner plus the token-score diagnostics.

use hrd_annotator::{annotate_query, Candidate, Query, ScoringWeights};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let weights = ScoringWeights::load()?;

    let query = Query::new("P04637", 393)
        .with_candidate(Candidate::from_description(
            "swissprot",
            "Cellular tumor antigen p53",
            420.0,
            1,
            390,
        ))
        .with_candidate(Candidate::from_description(
            "trembl",
            "Tumor suppressor p53",
            380.0,
            5,
            360,
        ))
        .with_candidate(Candidate::from_description(
            "trembl",
            "Uncharacterized protein",
            510.0,
            1,
            393,
        ));

    let annotation = annotate_query(&query, &weights)?;

    match &annotation.best {
        Some(best) => {
            println!(
                "{}: \"{}\" [{}] (total {:.4} = lexical {:.4} + bit {:.4} + pattern {:.4} + domain {:.4})",
                annotation.accession,
                best.description,
                best.database,
                best.total,
                best.lexical_score,
                best.relative_bit_score,
                best.pattern_factor,
                best.domain_similarity_factor,
            );
        }
        None => println!("{}: no description available", annotation.accession),
    }

    // Full diagnostics, the same shape a reporting collaborator gets.
    println!("{}", serde_json::to_string_pretty(&annotation)?);

    println!("annotate-demo done");
    Ok(())
}
