use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use matcher::{digits_only, name_key, normalize_number, normalize_set};

/// One released set. Loaded once, referenced by cards by id.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CardSet {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub series: Option<String>,
    #[serde(default)]
    pub images: Option<Value>,
}

// Shape of a card record in the source JSON files; the set is attached
// afterwards from the file name.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawCard {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub rarity: Option<String>,
    #[serde(default)]
    pub hp: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub flavor_text: Option<String>,
    #[serde(default)]
    pub images: Option<Value>,
    #[serde(default)]
    pub attacks: Option<Value>,
    #[serde(default)]
    pub abilities: Option<Value>,
    #[serde(default)]
    pub types: Option<Value>,
}

/// Normalization keys cached at load time so search and price lookups never
/// re-derive them per query.
#[derive(Debug, Clone)]
pub struct CardKeys {
    pub name_key: String,
    pub set_key: String,
    pub number_key: String,
    pub number_digits: String,
}

/// One specific printing. Immutable after catalog load; display metadata is
/// opaque passthrough for the rendering layer.
#[derive(Debug, Clone)]
pub struct CatalogCard {
    pub id: String,
    pub name: String,
    pub number: String,
    pub rarity: Option<String>,
    pub hp: Option<String>,
    pub artist: Option<String>,
    pub flavor_text: Option<String>,
    pub images: Option<Value>,
    pub attacks: Option<Value>,
    pub abilities: Option<Value>,
    pub types: Option<Value>,
    pub set: Arc<CardSet>,
    pub keys: CardKeys,
}

impl CatalogCard {
    pub(crate) fn from_raw(raw: RawCard, set: Arc<CardSet>) -> Self {
        let number_key = normalize_number(&raw.number);
        let keys = CardKeys {
            name_key: name_key(&raw.name),
            set_key: normalize_set(&set.name),
            number_digits: digits_only(&number_key),
            number_key,
        };

        Self {
            id: raw.id,
            name: raw.name,
            number: raw.number,
            rarity: raw.rarity,
            hp: raw.hp,
            artist: raw.artist,
            flavor_text: raw.flavor_text,
            images: raw.images,
            attacks: raw.attacks,
            abilities: raw.abilities,
            types: raw.types,
            set,
            keys,
        }
    }
}
