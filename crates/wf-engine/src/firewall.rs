//! Firewall lifecycle and request interception
//!
//! [`Firewall`] is the service object tying everything together: it loads
//! configuration through the host's storage, seeds the tab tracker from a
//! full enumeration snapshot, and then decides every intercepted request.
//!
//! Lifecycle invariants:
//!
//! - initialization awaits all configuration and enumeration I/O before
//!   installing listeners, so no request is ever evaluated against a
//!   partially-loaded rule set
//! - filter/asset state is swapped wholesale, never mutated in place
//! - teardown removes listeners before clearing state, and fails loudly
//!   when the firewall is not initialized
//! - re-initialization implicitly tears down first

use futures::future;

use wf_compiler::{parse_asset_list, parse_filter_list};
use wf_core::url::is_web_url;
use wf_core::{RuleSet, Verdict};

use crate::error::EngineError;
use crate::runtime::{BrowserRuntime, FrameId, RequestDetails, TabId, TOP_LEVEL_FRAME};
use crate::tabs::TabTracker;

/// Storage key of the raw filter text.
pub const FILTERS_KEY: &str = "webfence_filters";
/// Storage key of the raw asset text.
pub const ASSETS_KEY: &str = "webfence_assets";

/// The embeddable request firewall.
pub struct Firewall<R: BrowserRuntime> {
    runtime: R,
    rules: RuleSet,
    tabs: TabTracker,
    initialized: bool,
}

impl<R: BrowserRuntime> Firewall<R> {
    pub fn new(runtime: R) -> Self {
        Self {
            runtime,
            rules: RuleSet::default(),
            tabs: TabTracker::new(),
            initialized: false,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn filter_count(&self) -> usize {
        self.rules.filters.len()
    }

    pub fn asset_count(&self) -> usize {
        self.rules.assets.len()
    }

    /// Initialize or reinitialize the firewall.
    ///
    /// Reads the raw configuration from storage, compiles it, seeds the tab
    /// tracker from a full tab/frame snapshot, and only then installs the
    /// live event listeners.
    pub async fn init(&mut self) -> Result<(), EngineError> {
        if self.initialized {
            self.teardown()?;
        }

        let filter_text = self
            .runtime
            .storage_get(FILTERS_KEY)
            .await?
            .unwrap_or_default();
        let asset_text = self
            .runtime
            .storage_get(ASSETS_KEY)
            .await?
            .unwrap_or_default();

        let filters = parse_filter_list(&filter_text);
        let assets = parse_asset_list(&asset_text);
        let rules = RuleSet::new(filters.filters, assets.assets);

        // Seed the tracker from a full snapshot of open tabs; the per-tab
        // frame queries run as one structured join.
        let mut tabs = TabTracker::new();
        let open_tabs = self.runtime.query_tabs().await?;
        let frame_queries = open_tabs.iter().map(|tab| self.runtime.frames_of(tab.id));
        let frame_results = future::join_all(frame_queries).await;

        for (tab, frames) in open_tabs.iter().zip(frame_results) {
            tabs.seed(tab.id, TOP_LEVEL_FRAME, &tab.url);
            match frames {
                Ok(frames) => {
                    for frame in frames {
                        tabs.seed(tab.id, frame.frame_id, &frame.url);
                    }
                }
                // A failed frame query only loses that tab's nested frames.
                Err(err) => log::debug!("frame enumeration failed for tab {}: {err}", tab.id),
            }
        }

        // Swap state wholesale, then go live.
        self.rules = rules;
        self.tabs = tabs;
        self.runtime.install_listeners();
        self.initialized = true;

        log::info!(
            "firewall initialized with {} filters, {} assets, {} tabs",
            self.rules.filters.len(),
            self.rules.assets.len(),
            self.tabs.tab_count(),
        );

        Ok(())
    }

    /// Tear the firewall down: listeners first, state after.
    pub fn teardown(&mut self) -> Result<(), EngineError> {
        if !self.initialized {
            return Err(EngineError::NotInitialized);
        }
        self.initialized = false;

        self.runtime.remove_listeners();
        self.rules = RuleSet::default();
        self.tabs.clear();

        Ok(())
    }

    /// Persist new raw filter text; takes effect on the next [`Firewall::init`].
    pub async fn set_filters(&self, text: &str) -> Result<(), EngineError> {
        self.runtime.storage_set(FILTERS_KEY, text).await?;
        Ok(())
    }

    /// Persist new raw asset text; takes effect on the next [`Firewall::init`].
    pub async fn set_assets(&self, text: &str) -> Result<(), EngineError> {
        self.runtime.storage_set(ASSETS_KEY, text).await?;
        Ok(())
    }

    /// Navigation-commit event: a frame now displays `url`.
    pub fn on_committed(&mut self, tab: TabId, frame: FrameId, url: &str) {
        self.tabs.commit(tab, frame, url);
    }

    /// Tab-removal event: forget everything about the tab.
    pub fn on_tab_removed(&mut self, tab: TabId) {
        self.tabs.remove_tab(tab);
    }

    /// Decide an intercepted request.
    pub fn on_before_request(&self, details: &RequestDetails) -> Verdict {
        // Prefer the document URL supplied with the request, fall back to
        // the tracker, and treat both misses as an unknown requester.
        let requester = match details.document_url.as_deref() {
            Some(url) if !url.is_empty() => url,
            _ => self
                .tabs
                .frame_url(details.tab_id, details.frame_id)
                .unwrap_or(""),
        };

        // Requests initiated by non-web pages (extension pages, file
        // views, ...) are never filtered.
        if !requester.is_empty() && !is_web_url(requester) {
            return Verdict::Allow;
        }

        self.rules.decide(
            requester,
            &details.url,
            details.resource_type,
            !self.runtime.can_cancel_document_loads(),
        )
    }
}
