pub mod clients;
pub mod config;
pub mod repositories;
