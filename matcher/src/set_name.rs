//! Set-name keys. Spreadsheet exports, scraped titles, and the local catalog
//! all spell set names differently ("Pokemon Sword & Shield Vivid Voltage"
//! vs "Vivid Voltage"), so the key strips filler until only the
//! distinguishing tokens remain.

use std::sync::LazyLock;

use regex::Regex;

use common::utils::collapse_whitespace;

use crate::normalize::normalize_text;

/// Known-alias overrides, checked before the generic pipeline. These exist
/// because generic stripping would delete every distinguishing token from
/// certain short set names ("Pokemon GO" is nothing but filler words).
/// Ordered; first containment hit wins.
struct SetAlias {
    needle: &'static str,
    key: &'static str,
}

const SET_ALIASES: &[SetAlias] = &[
    SetAlias {
        needle: "pokemon go",
        key: "go",
    },
    SetAlias {
        needle: "black star promo",
        key: "black star promo",
    },
];

static EXPEDITION_BASE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bexpedition base(?: set)?\b").expect("expedition pattern to compile")
});
static POKEMON_EXPEDITION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bpokemon expedition\b").expect("expedition pattern to compile")
});

static FILLER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(1st|first|edition|shadowless)\b").expect("filler pattern to compile")
});
static MARKETING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(pokemon|tcg|the|trading|card|game|series)\b")
        .expect("marketing pattern to compile")
});
static SERIES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(diamond\s*(?:&|and)?\s*pearl|black\s*(?:&|and)?\s*white|sun\s*(?:&|and)?\s*moon|sword\s*(?:&|and)?\s*shield|scarlet\s*(?:&|and)?\s*violet|heartgold\s*(?:&|and)?\s*soulsilver)\b",
    )
    .expect("series pattern to compile")
});
static ERA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(dp|bw|xy|sm|swsh|sv|hgss)\b").expect("era pattern to compile")
});
static PUBLISHER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(wizards|wotc)\b").expect("publisher pattern to compile"));

/// Canonical set key. Alias overrides short-circuit; otherwise edition
/// filler, marketing words, series names, era abbreviations, and publisher
/// tags are stripped and "promos" collapses to "promo". If stripping would
/// empty the key entirely, the plain normalized text is kept instead so the
/// set stays distinguishable.
pub fn normalize_set(input: &str) -> String {
    let text = normalize_text(input);

    for alias in SET_ALIASES {
        if text.contains(alias.needle) {
            return alias.key.to_string();
        }
    }

    let mut stripped = EXPEDITION_BASE_RE.replace_all(&text, "expedition").into_owned();
    stripped = POKEMON_EXPEDITION_RE
        .replace_all(&stripped, "expedition")
        .into_owned();
    stripped = FILLER_RE.replace_all(&stripped, "").into_owned();
    stripped = MARKETING_RE.replace_all(&stripped, "").into_owned();
    stripped = SERIES_RE.replace_all(&stripped, "").into_owned();
    stripped = ERA_RE.replace_all(&stripped, "").into_owned();
    stripped = PUBLISHER_RE.replace_all(&stripped, "").into_owned();

    let rejoined: String = stripped
        .split_whitespace()
        .filter(|word| *word != "set")
        .map(|word| if word == "promos" { "promo" } else { word })
        .collect::<Vec<_>>()
        .join(" ");

    let key = collapse_whitespace(&rejoined);
    if key.is_empty() { text } else { key }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marketing_and_set_words_are_stripped() {
        assert_eq!(normalize_set("Pokemon TCG Base Set"), "base");
        assert_eq!(normalize_set("Base Set"), "base");
        assert_eq!(normalize_set("Jungle"), "jungle");
    }

    #[test]
    fn series_names_are_stripped_as_whole_words() {
        assert_eq!(normalize_set("Sword & Shield Vivid Voltage"), "vivid voltage");
        assert_eq!(normalize_set("Sun and Moon Burning Shadows"), "burning shadows");
        assert_eq!(normalize_set("SWSH Evolving Skies"), "evolving skies");
    }

    #[test]
    fn edition_filler_is_stripped() {
        assert_eq!(normalize_set("1st Edition Shadowless Base Set"), "base");
    }

    #[test]
    fn expedition_aliases_converge() {
        assert_eq!(normalize_set("Expedition Base Set"), "expedition");
        assert_eq!(normalize_set("Pokemon Expedition"), "expedition");
    }

    #[test]
    fn known_aliases_short_circuit_the_pipeline() {
        assert_eq!(normalize_set("Pokemon GO"), "go");
        assert_eq!(normalize_set("Wizards Black Star Promos"), "black star promo");
        assert_eq!(normalize_set("Black Star Promo"), "black star promo");
    }

    #[test]
    fn promos_collapses_to_promo() {
        assert_eq!(normalize_set("McDonald's Promos"), "mcdonald s promo");
    }

    #[test]
    fn stripping_never_empties_the_key() {
        // every token is filler; the plain normalized text wins over ""
        assert_eq!(normalize_set("Pokemon Trading Card Game"), "pokemon trading card game");
    }

    #[test]
    fn keys_are_idempotent() {
        for raw in ["Pokemon TCG Base Set", "Pokemon GO", "Sword & Shield Vivid Voltage"] {
            let once = normalize_set(raw);
            assert_eq!(normalize_set(&once), once);
        }
    }
}
