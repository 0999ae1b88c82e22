//! Compiled filters and their gate evaluation
//!
//! This is the hot path - every request is walked through the filter list
//! once. Evaluation proceeds through four independent gates and
//! short-circuits on the first failing one:
//!
//! 1. party gate - first-party/third-party sentinel against the
//!    requester/destination origin pair
//! 2. origin-list gate - literal `$domain=` entries against the requester
//! 3. type gate - resource-type include/exclude sets
//! 4. pattern gate - the compiled pattern against the destination URL

use regex::Regex;

use crate::types::{DomainToken, ResourceType};
use crate::url::{extract_origin, host_within_domain, same_origin};

/// One compiled block-or-redirect directive.
///
/// Immutable after construction; the whole filter list is replaced
/// wholesale on every (re)initialization.
#[derive(Debug, Clone)]
pub struct Filter {
    /// Matcher over the destination URL, compiled case-insensitively.
    pub pattern: Regex,
    /// Ordered origin restrictions; a `SameOrigin` sentinel never coexists
    /// with literals in the same list.
    pub domain_include: Vec<DomainToken>,
    pub domain_exclude: Vec<DomainToken>,
    /// Resource-type restrictions.
    pub type_include: ResourceType,
    pub type_exclude: ResourceType,
    /// Asset name to substitute on match; `None` blocks outright.
    pub redirect: Option<String>,
}

impl Filter {
    /// Decide whether this filter applies to a request.
    pub fn matches(&self, requester: &str, destination: &str, rtype: ResourceType) -> bool {
        // Party gate. A request without recognizable origins on both sides
        // can never match.
        let Some(requester_origin) = extract_origin(requester) else {
            return false;
        };
        let Some(destination_origin) = extract_origin(destination) else {
            return false;
        };

        if self.domain_include.contains(&DomainToken::SameOrigin)
            && !same_origin(requester_origin, destination_origin)
        {
            return false;
        }
        if self.domain_exclude.contains(&DomainToken::SameOrigin)
            && same_origin(requester_origin, destination_origin)
        {
            return false;
        }

        // Origin-list gate. Literal entries compare directionally: the
        // requester origin is always the host side, the declared domain the
        // suffix side.
        let mut include_literals = self
            .domain_include
            .iter()
            .filter_map(DomainToken::as_literal)
            .peekable();
        if include_literals.peek().is_some()
            && !include_literals.any(|domain| host_within_domain(requester_origin, domain))
        {
            return false;
        }

        if self
            .domain_exclude
            .iter()
            .filter_map(DomainToken::as_literal)
            .any(|domain| host_within_domain(requester_origin, domain))
        {
            return false;
        }

        // Type gate.
        if !self.type_include.is_empty() && !self.type_include.intersects(rtype) {
            return false;
        }
        if self.type_exclude.intersects(rtype) {
            return false;
        }

        // Pattern gate.
        self.pattern.is_match(destination)
    }
}
