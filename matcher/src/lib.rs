pub mod key;
pub mod normalize;
pub mod set_name;
pub mod similarity;
pub mod variant;

pub use key::{CanonicalKey, name_key, name_key_raw};
pub use normalize::{digits_only, normalize_number, normalize_text};
pub use set_name::normalize_set;
pub use similarity::{SET_MATCH_THRESHOLD, set_similarity};
pub use variant::{is_variant_tagged, strip_gold_star, strip_variant_descriptors};
