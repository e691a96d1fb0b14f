pub mod index;
mod rows;
pub mod service;

pub use index::{PriceIndex, PriceMatch};
pub use service::{PRICE_FILE_EXTENSIONS, PriceService};
