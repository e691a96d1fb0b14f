mod card;
mod loader;
mod search;

pub use card::{CardKeys, CardSet, CatalogCard};
pub use loader::Catalog;
