//! webfence Core Library
//!
//! This crate provides the matching engine for the webfence request
//! firewall: compiled filters, redirect assets, and the per-request
//! decision walk.
//!
//! # Architecture
//!
//! Filter and asset lists are compiled once (see `wf-compiler`), held
//! immutable, and replaced wholesale on reconfiguration. The hot path -
//! [`RuleSet::decide`] - is synchronous, allocation-light, and evaluates
//! filters in declaration order with first-match-wins semantics.
//!
//! # Modules
//!
//! - `types`: resource-type tags, domain tokens, verdicts
//! - `url`: origin extraction and same-origin comparison
//! - `filter`: compiled filters and their gate evaluation
//! - `asset`: named data-URI redirect substitutes
//! - `matcher`: the ordered decision walk

pub mod asset;
pub mod filter;
pub mod matcher;
pub mod types;
pub mod url;

// Re-export commonly used types
pub use asset::Asset;
pub use filter::Filter;
pub use matcher::{RuleSet, FRAME_BLOCKED_ASSET};
pub use types::{DomainToken, ResourceType, Verdict};
pub use url::{extract_origin, is_web_url, same_origin};
