//! Request decision engine
//!
//! Walks the filter list in declaration order; the first matching filter
//! decides the verdict. Redirect targets that cannot be resolved to an
//! asset degrade to a hard block, never to an allow.

use crate::asset::Asset;
use crate::filter::Filter;
use crate::types::{ResourceType, Verdict};

/// Asset name forced onto matched document loads when the host browser
/// cannot cancel them. The embedding application is expected to ship an
/// asset under this name.
pub const FRAME_BLOCKED_ASSET: &str = "webfence-frame-blocked";

/// An immutable, atomically-replaceable filter and asset list pair.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    pub filters: Vec<Filter>,
    pub assets: Vec<Asset>,
}

impl RuleSet {
    pub fn new(filters: Vec<Filter>, assets: Vec<Asset>) -> Self {
        Self { filters, assets }
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Evaluate a request against the filter list, first match wins.
    ///
    /// `force_frame_placeholder` is the workaround for hosts that cannot
    /// cancel document loads: a matched document request has its redirect
    /// target replaced with [`FRAME_BLOCKED_ASSET`] regardless of what the
    /// filter declared.
    pub fn decide(
        &self,
        requester: &str,
        destination: &str,
        rtype: ResourceType,
        force_frame_placeholder: bool,
    ) -> Verdict {
        for filter in &self.filters {
            if !filter.matches(requester, destination, rtype) {
                continue;
            }

            let mut redirect = filter.redirect.as_deref();
            if force_frame_placeholder && rtype.intersects(ResourceType::DOCUMENT) {
                redirect = Some(FRAME_BLOCKED_ASSET);
            }

            if let Some(name) = redirect {
                if let Some(asset) = Asset::find(&self.assets, name) {
                    log::debug!("redirecting '{destination}' to asset '{name}'");
                    return Verdict::Redirect(asset.payload.clone());
                }
                log::debug!("no asset named '{name}', blocking '{destination}'");
            }

            log::debug!("canceling request to '{destination}'");
            return Verdict::Block;
        }

        Verdict::Allow
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DomainToken;
    use regex::RegexBuilder;

    fn filter(pattern: &str, redirect: Option<&str>) -> Filter {
        Filter {
            pattern: RegexBuilder::new(pattern).case_insensitive(true).build().unwrap(),
            domain_include: Vec::new(),
            domain_exclude: Vec::new(),
            type_include: ResourceType::empty(),
            type_exclude: ResourceType::empty(),
            redirect: redirect.map(str::to_string),
        }
    }

    const REQUESTER: &str = "http://example.com/page";

    #[test]
    fn no_match_allows() {
        let rules = RuleSet::new(vec![filter("doubleclick", None)], Vec::new());
        let verdict = rules.decide(REQUESTER, "http://example.com/app.js", ResourceType::SCRIPT, false);
        assert_eq!(verdict, Verdict::Allow);
    }

    #[test]
    fn match_without_redirect_blocks() {
        let rules = RuleSet::new(vec![filter("ad\\.js", None)], Vec::new());
        let verdict = rules.decide(REQUESTER, "http://ads.net/ad.js", ResourceType::SCRIPT, false);
        assert_eq!(verdict, Verdict::Block);
    }

    #[test]
    fn redirect_resolves_to_asset_payload() {
        let assets = vec![Asset::new("noop.js", "application/javascript", ";", false)];
        let rules = RuleSet::new(vec![filter("ad\\.js", Some("noop.js"))], assets);
        let verdict = rules.decide(REQUESTER, "http://ads.net/ad.js", ResourceType::SCRIPT, false);
        match verdict {
            Verdict::Redirect(payload) => assert!(payload.starts_with("data:")),
            other => panic!("expected redirect, got {other:?}"),
        }
    }

    #[test]
    fn unresolved_redirect_degrades_to_block() {
        let rules = RuleSet::new(vec![filter("ad\\.js", Some("noop.js"))], Vec::new());
        let verdict = rules.decide(REQUESTER, "http://ads.net/ad.js", ResourceType::SCRIPT, false);
        assert_eq!(verdict, Verdict::Block);
    }

    #[test]
    fn first_match_wins() {
        let assets = vec![Asset::new("noop.js", "application/javascript", ";", false)];
        let rules = RuleSet::new(
            vec![filter("ad", Some("noop.js")), filter("ad\\.js", None)],
            assets,
        );
        let verdict = rules.decide(REQUESTER, "http://ads.net/ad.js", ResourceType::SCRIPT, false);
        assert!(matches!(verdict, Verdict::Redirect(_)));
    }

    #[test]
    fn document_placeholder_forced_when_host_cannot_cancel() {
        let assets = vec![Asset::new(FRAME_BLOCKED_ASSET, "text/html", "<p>blocked</p>", false)];
        let rules = RuleSet::new(vec![filter("tracker", Some("noop.js"))], assets);

        let verdict = rules.decide(REQUESTER, "http://tracker.net/", ResourceType::SUB_FRAME, true);
        match verdict {
            Verdict::Redirect(payload) => assert!(payload.starts_with("data:text/html")),
            other => panic!("expected placeholder redirect, got {other:?}"),
        }

        // non-document loads keep the declared target
        let verdict = rules.decide(REQUESTER, "http://tracker.net/t.js", ResourceType::SCRIPT, true);
        assert_eq!(verdict, Verdict::Block);
    }

    #[test]
    fn missing_placeholder_blocks_documents() {
        let rules = RuleSet::new(vec![filter("tracker", None)], Vec::new());
        let verdict = rules.decide(REQUESTER, "http://tracker.net/", ResourceType::MAIN_FRAME, true);
        assert_eq!(verdict, Verdict::Block);
    }

    #[test]
    fn party_restricted_filters_participate_in_the_walk() {
        let mut third_party_only = filter("[\\s\\S]", None);
        third_party_only.domain_exclude.push(DomainToken::SameOrigin);
        let rules = RuleSet::new(vec![third_party_only], Vec::new());

        assert_eq!(
            rules.decide(REQUESTER, "http://example.com/self.js", ResourceType::SCRIPT, false),
            Verdict::Allow
        );
        assert_eq!(
            rules.decide(REQUESTER, "http://ads.net/x.js", ResourceType::SCRIPT, false),
            Verdict::Block
        );
    }
}
