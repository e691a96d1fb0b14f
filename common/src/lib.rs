pub mod price;
pub mod probes;
pub mod product;
pub mod row;
pub mod utils;
