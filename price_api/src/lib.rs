//! Supplementary remote price lookups. Strictly best-effort: short
//! timeouts, one retry, a ten minute response cache, and None on any
//! failure so the engine never blocks on the remote side.

mod client;
mod errors;
mod extract;

pub use client::{CACHE_TTL_SECS, NoopPriceSource, RemotePriceSource, SupplementaryPriceSource};
pub use errors::PriceApiError;
pub use extract::SupplementaryPrice;
