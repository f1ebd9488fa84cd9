pub mod backup;
pub mod config;
pub mod daily;
pub mod db;
pub mod init;
pub mod log;
pub mod norm;
pub mod plan;
pub mod record;
pub mod welder;
