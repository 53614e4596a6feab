//! Core evaluation logic.

pub mod archive;
pub mod config;
pub mod digest;
pub mod error;
pub mod evaluator;
pub mod types;
pub mod validate;
