pub mod log;
pub mod migrate;
pub mod schema;
pub mod seed;
pub mod stats;
pub mod store;
pub mod table;

pub use store::Store;
