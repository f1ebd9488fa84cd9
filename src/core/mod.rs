pub mod backup;
pub mod config;
pub mod dailies;
pub mod log;
pub mod norms;
pub mod plans;
pub mod records;
pub mod welders;
