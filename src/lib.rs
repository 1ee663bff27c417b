pub mod config;
pub mod errors;
pub mod filter;
pub mod logger;
pub mod patterns;
pub mod store;
pub mod style;
pub mod types;
pub mod usage;
pub mod usagegraph;
