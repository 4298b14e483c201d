//! Shared utilities used across the migrator

pub mod glob;

pub use glob::NameMatcher;
