//! Free-text canonicalization. Every identity comparison in the engine goes
//! through these keys, so two spellings a human would call the same printing
//! must land on the same string.

use unicode_normalization::UnicodeNormalization;

/// Decode HTML entities and percent-encoding early, so `Champion%27s` and
/// `Champion&#39;s` converge before any other step sees them.
pub fn decode_escapes(input: &str) -> String {
    let unescaped = html_escape::decode_html_entities(input);

    match urlencoding::decode(&unescaped) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => unescaped.into_owned(),
    }
}

/// NFKD-decompose and keep only ASCII, which drops diacritics ("Pokémon"
/// becomes "Pokemon").
pub fn ascii_fold(input: &str) -> String {
    input.nfkd().filter(char::is_ascii).collect()
}

/// Canonical text key: decode, fold to ASCII, lowercase, then squash every
/// run of non-alphanumerics into a single space. Idempotent.
pub fn normalize_text(input: &str) -> String {
    let decoded = decode_escapes(input);
    let folded = ascii_fold(&decoded).to_lowercase();

    let mut key = String::with_capacity(folded.len());
    let mut gap = false;
    for ch in folded.chars() {
        if ch.is_ascii_alphanumeric() {
            if gap && !key.is_empty() {
                key.push(' ');
            }
            gap = false;
            key.push(ch);
        } else {
            gap = true;
        }
    }

    key
}

/// Card numbers are frequently written "6/102" or "#6"; the key is the part
/// before the slash with any leading '#' removed.
pub fn normalize_number(input: &str) -> String {
    let lowered = input.trim().to_lowercase();
    let before_slash = lowered.split('/').next().unwrap_or_default();

    before_slash.trim().trim_start_matches('#').trim().to_string()
}

/// Digits-only form of a number key, the weaker fallback that lets "H6" and
/// "6" cross-match when a source inconsistently includes a prefix letter.
pub fn digits_only(number_key: &str) -> String {
    number_key.chars().filter(char::is_ascii_digit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_is_idempotent() {
        for raw in [
            "Champion's Path",
            "  Farfetch'd  [Reverse Holo] ",
            "Pokémon — Ho-Oh!",
            "",
        ] {
            let once = normalize_text(raw);
            assert_eq!(normalize_text(&once), once, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn normalization_is_encoding_invariant() {
        let plain = normalize_text("Champion's Path");
        assert_eq!(normalize_text("Champion%27s Path"), plain);
        assert_eq!(normalize_text("Champion&#39;s Path"), plain);
        assert_eq!(plain, "champion s path");
    }

    #[test]
    fn diacritics_fold_to_ascii() {
        assert_eq!(normalize_text("Pokémon Flabébé"), "pokemon flabebe");
    }

    #[test]
    fn punctuation_runs_become_single_spaces() {
        assert_eq!(normalize_text("Mr. Mime --- GX!!"), "mr mime gx");
        assert_eq!(normalize_text("...leading and trailing..."), "leading and trailing");
    }

    #[test]
    fn number_keys_drop_totals_and_hashes() {
        assert_eq!(normalize_number("6/102"), "6");
        assert_eq!(normalize_number("#6"), "6");
        assert_eq!(normalize_number("6"), "6");
        assert_eq!(normalize_number(" H6/112 "), "h6");
    }

    #[test]
    fn digits_only_strips_prefix_letters() {
        assert_eq!(digits_only(&normalize_number("H6")), "6");
        assert_eq!(digits_only("swsh001"), "001");
        assert_eq!(digits_only("promo"), "");
    }
}
