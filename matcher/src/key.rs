use crate::normalize::{normalize_number, normalize_text};
use crate::set_name::normalize_set;
use crate::variant::strip_variant_descriptors;

/// Name key with variant descriptors stripped first. This is the primary
/// identity key for price matching.
pub fn name_key(name: &str) -> String {
    normalize_text(&strip_variant_descriptors(name))
}

/// Name key without variant stripping, kept in parallel as a fallback for
/// sources that bake the variant into the card's actual name.
pub fn name_key_raw(name: &str) -> String {
    normalize_text(name)
}

/// Identity of a priced catalog entry: normalized (name, set, number).
/// Two raw records a human would call the same printing produce equal keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalKey {
    pub name: String,
    pub set: String,
    pub number: String,
}

impl CanonicalKey {
    pub fn new(
        name_key: impl Into<String>,
        set_key: impl Into<String>,
        number_key: impl Into<String>,
    ) -> Self {
        Self {
            name: name_key.into(),
            set: set_key.into(),
            number: number_key.into(),
        }
    }

    /// Build the key from raw, unnormalized record fields.
    pub fn from_raw(name: &str, set_name: &str, number: &str) -> Self {
        Self {
            name: name_key(name),
            set: normalize_set(set_name),
            number: normalize_number(number),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cosmetic_differences_produce_equal_keys() {
        let a = CanonicalKey::from_raw("Charizard [Holo]", "Pokemon TCG Base Set", "4/102");
        let b = CanonicalKey::from_raw("charizard", "Base Set", "#4");
        assert_eq!(a, b);
        assert_eq!(a, CanonicalKey::new("charizard", "base", "4"));
    }

    #[test]
    fn different_numbers_stay_distinct() {
        let a = CanonicalKey::from_raw("Pikachu", "Jungle", "60/64");
        let b = CanonicalKey::from_raw("Pikachu", "Jungle", "25/64");
        assert_ne!(a, b);
    }
}
