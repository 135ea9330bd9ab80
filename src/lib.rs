pub mod config;
pub mod errors;
pub mod generator;
pub mod ingestor;
pub mod models;
pub mod pipeline;
pub mod utils;
