//! Configuration management for the resolver

pub mod config;
pub mod resolver;


// Re-export main types for convenience
pub use config::Config;
pub use resolver::ResolverConfig;
