//! webfence Configuration Compiler
//!
//! This crate turns raw configuration text into the immutable model used by
//! the matching engine: one [`wf_core::Filter`] per rule line and one
//! [`wf_core::Asset`] per asset record. Individual bad entries are counted
//! and dropped; a configuration load never aborts because of them.

pub mod assets;
pub mod error;
pub mod parser;

pub use assets::{parse_asset_list, ParsedAssets};
pub use error::CompileError;
pub use parser::{parse_filter, parse_filter_list, ParsedList};
