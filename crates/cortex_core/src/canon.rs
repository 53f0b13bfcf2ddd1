//! Label canonicalization and fuzzy node matching.
//!
//! # Responsibility
//! - Turn free text into a stable node identifier.
//! - Decide whether a sibling node and a path step denote the same concept.
//!
//! # Invariants
//! - `canonicalize` output only contains `[a-z0-9-]`.
//! - Matching is pure: no side effects, no allocation kept across calls.

use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum case-insensitive edit distance at which two labels are treated as
/// the same node. Tolerates pluralization, typos and minor rewording from the
/// generation step. Aggressive for very short labels, which is covered by an
/// explicit boundary test.
pub const FUZZY_DISTANCE_MAX: usize = 2;

static NON_ALNUM: Lazy<Regex> =
    Lazy::new(|| Regex::new("[^a-z0-9]").expect("canonicalization pattern is valid"));

/// Lowercases, trims, and replaces every character outside `[a-z0-9]` with `-`.
///
/// The result doubles as the default node identifier and as one half of the
/// node equivalence test.
pub fn canonicalize(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    NON_ALNUM.replace_all(&lowered, "-").into_owned()
}

/// Case-insensitive Levenshtein distance between two labels.
pub fn label_distance(a: &str, b: &str) -> usize {
    levenshtein(&a.to_lowercase(), &b.to_lowercase())
}

/// True when a sibling node should be treated as the same concept as a step.
///
/// Matches on exact canonical id equality, or on label edit distance within
/// [`FUZZY_DISTANCE_MAX`].
pub fn is_same_node(
    node_label: &str,
    step_name: &str,
    node_id: &str,
    step_canonical_id: &str,
) -> bool {
    if node_id == step_canonical_id {
        return true;
    }
    label_distance(node_label, step_name) <= FUZZY_DISTANCE_MAX
}

/// Iterative two-row edit distance.
fn levenshtein(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    if a_chars.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a_chars.len();
    }

    let mut prev: Vec<usize> = (0..=b_chars.len()).collect();
    let mut curr: Vec<usize> = vec![0; b_chars.len() + 1];

    for (i, &ca) in a_chars.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b_chars.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b_chars.len()]
}
