pub mod config;
pub mod error;
pub mod generate;
pub mod storages;
