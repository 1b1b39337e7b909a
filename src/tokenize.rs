//! # Description tokenization
//!
//! Turns a raw BLAST-hit description line into the distinct, lowercased
//! token set the scoring engine works with. Tokens matching any blacklist
//! regex are dropped; the blacklist keeps boilerplate words ("putative",
//! "predicted", bare numbers, ...) from dominating the lexical evidence.
//!
//! - `tokenize` splits on non-alphanumerics and lowercases.
//! - `passes_blacklist` rejects a token on the first matching pattern.
//! - `default_blacklist()` is a built-in seed used when no custom
//!   blacklist is configured.

use once_cell::sync::Lazy;
use regex::Regex;

/// Built-in token blacklist seed: boilerplate annotation vocabulary and
/// bare numbers. Patterns are matched with `Regex::is_match`, so a hit
/// anywhere in the token rejects it.
static DEFAULT_BLACKLIST: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"^\d+$",
        r"^protein$",
        r"^proteins$",
        r"^putative$",
        r"^predicted$",
        r"^probable$",
        r"^possible$",
        r"^unknown$",
        r"^uncharacterized$",
        r"^uncharacterised$",
        r"^hypothetical$",
        r"^unnamed$",
        r"^expressed$",
        r"^fragment$",
        r"^partial$",
        r"^homolog$",
        r"^homologue$",
        r"^isoform$",
        r"^like$",
        r"^related$",
        r"^similar$",
        r"^cdna$",
        r"^contains$",
        r"^os$",
        r"^sv$",
        r"^pe$",
        r"^gn$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid blacklist regex"))
    .collect()
});

/// The built-in blacklist. Callers with their own curated list pass it
/// to [`tokenize_with_blacklist`] instead.
pub fn default_blacklist() -> &'static [Regex] {
    &DEFAULT_BLACKLIST
}

/// A token passes unless it is empty or matches any blacklist pattern.
pub fn passes_blacklist(token: &str, blacklist: &[Regex]) -> bool {
    if token.is_empty() {
        return false;
    }
    !blacklist.iter().any(|re| re.is_match(token))
}

/// Tokenize a description line with the built-in blacklist.
pub fn tokenize(description: &str) -> Vec<String> {
    tokenize_with_blacklist(description, default_blacklist())
}

/// Split on non-alphanumerics, lowercase, drop blacklisted tokens, and
/// dedup while keeping first-occurrence order.
pub fn tokenize_with_blacklist(description: &str, blacklist: &[Regex]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for raw in description.split(|c: char| !c.is_alphanumeric()) {
        if raw.is_empty() {
            continue;
        }
        let token = raw.to_ascii_lowercase();
        if !passes_blacklist(&token, blacklist) {
            continue;
        }
        if !out.iter().any(|t| t == &token) {
            out.push(token);
        }
    }
    out
}
