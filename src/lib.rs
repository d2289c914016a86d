pub mod audit;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod errors;
pub mod export;
pub mod generator;
pub mod import;
pub mod vault;
