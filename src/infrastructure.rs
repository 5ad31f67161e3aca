//! Infrastructure layer for HTML parsing, configuration and logging
//!
//! This module provides the document wrapper, parsing rules, the rule
//! dispatcher and the ambient configuration/logging setup.

pub mod config; // Configuration loading and defaults
pub mod logging; // Logging infrastructure
pub mod parsing; // Parsing rules and dispatcher
pub mod parsing_error; // Parsing error types

// Re-export commonly used items
pub use config::{AppConfig, ConfigError, LoggingConfig};
pub use logging::{get_log_directory, init_logging, init_logging_with_config};
pub use parsing::{
    MapRule, MapSelectors, ParsingConfig, ParsingError, ParsingResult, ParsingRule, RuleDispatcher, RuleMatch,
    SerpDocument,
};
