//! # FuzzyDx Common Library
//!
//! Shared code for the FuzzyDx workspace:
//! - Error types
//! - Configuration loading and root folder resolution
//! - SQLite rule store (symptoms, diseases, disease rules)
//! - Reference catalogue seeding

pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
