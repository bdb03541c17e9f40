//! Shared types, error model, and configuration for qatidy.
//!
//! This crate is the foundation depended on by all other qatidy crates.
//! It provides:
//! - [`QaTidyError`], the unified error type
//! - Domain types ([`QaDocument`], [`QaPair`], [`Summary`] and the cleaning policies)
//! - Configuration ([`AppConfig`], [`CleanConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CleanConfig, DefaultsConfig, FluffConfig, config_dir, config_file_path,
    init_config, init_config_at, load_config, load_config_from,
};
pub use error::{QaTidyError, Result};
pub use types::{Block, FluffProfile, Numbering, QaDocument, QaPair, Summary, UnansweredPolicy};
