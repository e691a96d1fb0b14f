//! Fuzzy set-name comparison, used only as a last resort when exact set-key
//! equality fails during a price lookup.

use std::collections::HashSet;

use crate::set_name::normalize_set;

/// Acceptance threshold for a fuzzy set match, chosen to avoid false
/// positives between similarly-worded but distinct sets.
pub const SET_MATCH_THRESHOLD: f64 = 0.72;

/// Blend of token-set Jaccard (0.6) and a character-level LCS ratio (0.4).
/// Inputs may be raw set names or existing keys; both are run through
/// `normalize_set`, which is idempotent.
pub fn set_similarity(a: &str, b: &str) -> f64 {
    let a = normalize_set(a);
    let b = normalize_set(b);

    let tokens_a: HashSet<&str> = a.split_whitespace().collect();
    let tokens_b: HashSet<&str> = b.split_whitespace().collect();

    let jaccard = if tokens_a.is_empty() || tokens_b.is_empty() {
        0.0
    } else {
        let intersection = tokens_a.intersection(&tokens_b).count() as f64;
        let union = tokens_a.union(&tokens_b).count() as f64;
        intersection / union
    };

    0.6 * jaccard + 0.4 * lcs_ratio(&a, &b)
}

/// Normalized longest-common-subsequence ratio over characters:
/// 2 * LCS(a, b) / (|a| + |b|).
fn lcs_ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for ch_a in &a {
        for (j, ch_b) in b.iter().enumerate() {
            curr[j + 1] = if ch_a == ch_b {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        prev.copy_from_slice(&curr);
    }

    2.0 * prev[b.len()] as f64 / (a.len() + b.len()) as f64
}
