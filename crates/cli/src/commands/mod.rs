pub mod map;
pub mod migrate;
