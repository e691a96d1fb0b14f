//! Printing/variant descriptors. A priced row saying "Pikachu [Reverse
//! Holo]" and a catalog entry saying "Pikachu" are the same identity for
//! pricing purposes; these helpers strip the descriptors before the name is
//! normalized. The raw, unstripped key is kept in parallel as a fallback.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use common::utils::collapse_whitespace;

/// Fixed vocabulary of printing descriptors that must not be part of a name
/// key. Policy lives in the data, not in control flow.
pub const VARIANT_WORDS: &[&str] = &[
    "reverse",
    "rev",
    "reverse holo",
    "rev holo",
    "reverse-holo",
    "holo",
    "holofoil",
    "foil",
    "rainbow foil",
    "galaxy",
    "cosmos",
    "non-holo",
    "non holo",
    "unlimited",
    "first edition",
    "1st edition",
    "1st",
    "shadowless",
    "staff",
    "prerelease",
    "pre-release",
    "promo",
    "jumbo",
    "oversize",
    "shattered glass",
    "cracked ice",
    "e-reader",
    "mini",
    "gold star",
    "gold-star",
    "goldstar",
];

static BRACKET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]*)\]").expect("bracket pattern to compile"));

// One pattern per vocabulary word, matching it as a leading/trailing token
// delimited by whitespace or a dash.
static LOOSE_WORD_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    VARIANT_WORDS
        .iter()
        .map(|word| {
            let pattern = format!(r"(?i)(?:^|\s|[-–—]){}(?:$|\b)", regex::escape(word));
            Regex::new(&pattern).expect("variant word pattern to compile")
        })
        .collect()
});

// Some sources tag the old "Gold Star" rarity inside the name field itself,
// in any spacing, rather than as a bracketed variant.
static GOLD_STAR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bgold\s*-\s*star\b|\bgold\s*star\b|\bgoldstar\b")
        .expect("gold star pattern to compile")
});

/// Remove bracketed segments whose contents mention a variant word, then
/// loose variant words sitting at a token edge.
pub fn strip_variant_descriptors(name: &str) -> String {
    let without_brackets = BRACKET_RE.replace_all(name, |caps: &Captures| {
        let inside = caps[1].to_lowercase();
        if VARIANT_WORDS.iter().any(|word| inside.contains(word)) {
            String::new()
        } else {
            caps[0].to_string()
        }
    });

    let mut cleaned = without_brackets.into_owned();
    for pattern in LOOSE_WORD_RES.iter() {
        cleaned = pattern.replace_all(&cleaned, " ").into_owned();
    }

    collapse_whitespace(&cleaned)
}

/// Whether a raw title looks variant-tagged at all. Rows that are not are
/// assumed to represent the default printing most lookups want.
pub fn is_variant_tagged(name: &str) -> bool {
    let lower = name.to_lowercase();
    if lower.contains('[') && lower.contains(']') {
        return true;
    }

    VARIANT_WORDS.iter().any(|word| lower.contains(word))
}

/// Remove the gold-star marker from an already-normalized name key.
pub fn strip_gold_star(name_key: &str) -> String {
    collapse_whitespace(&GOLD_STAR_RE.replace_all(name_key, " "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize_text;

    #[test]
    fn bracketed_variants_do_not_change_identity() {
        let tagged = normalize_text(&strip_variant_descriptors("Pikachu [Reverse Holo]"));
        let plain = normalize_text(&strip_variant_descriptors("Pikachu"));
        assert_eq!(tagged, plain);
    }

    #[test]
    fn non_variant_brackets_survive() {
        assert_eq!(
            strip_variant_descriptors("Pikachu [Japanese Import]"),
            "Pikachu [Japanese Import]"
        );
    }

    #[test]
    fn loose_edge_words_are_stripped() {
        assert_eq!(strip_variant_descriptors("Holo Charizard"), "Charizard");
        assert_eq!(strip_variant_descriptors("Charizard 1st Edition"), "Charizard");
        assert_eq!(strip_variant_descriptors("Umbreon Gold Star"), "Umbreon");
        // a leftover dash is cosmetic and disappears in the key
        assert_eq!(
            normalize_text(&strip_variant_descriptors("Charizard - 1st Edition")),
            "charizard"
        );
    }

    #[test]
    fn inner_words_are_left_alone() {
        // "holo" only counts at a token edge; substring hits inside a word
        // must not mangle the name.
        assert_eq!(strip_variant_descriptors("Revavroom"), "Revavroom");
    }

    #[test]
    fn variant_tag_detection() {
        assert!(is_variant_tagged("Pikachu [Reverse Holo]"));
        assert!(is_variant_tagged("Shadowless Charizard"));
        assert!(!is_variant_tagged("Charizard"));
    }

    #[test]
    fn gold_star_spacing_variants_collapse() {
        assert_eq!(strip_gold_star("espeon gold star"), "espeon");
        assert_eq!(strip_gold_star("espeon gold-star"), "espeon");
        assert_eq!(strip_gold_star("espeon goldstar"), "espeon");
        assert_eq!(strip_gold_star("espeon"), "espeon");
    }
}
