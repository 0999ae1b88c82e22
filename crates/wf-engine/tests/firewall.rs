//! End-to-end firewall tests against an in-memory mock runtime.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use wf_core::types::ResourceType;
use wf_core::{Verdict, FRAME_BLOCKED_ASSET};
use wf_engine::{
    BrowserRuntime, Firewall, FrameId, FrameInfo, RequestDetails, RuntimeError, TabId, TabInfo,
    ASSETS_KEY, FILTERS_KEY,
};

const PAGE: &str = "http://example.com/page.html";

#[derive(Clone, Default)]
struct MockRuntime {
    storage: Arc<Mutex<HashMap<String, String>>>,
    tabs: Arc<Vec<TabInfo>>,
    frames: Arc<HashMap<TabId, Vec<FrameInfo>>>,
    can_cancel: bool,
    listener_events: Arc<Mutex<Vec<&'static str>>>,
}

impl MockRuntime {
    fn new(filters: &str, assets: &str) -> Self {
        let mut storage = HashMap::new();
        storage.insert(FILTERS_KEY.to_string(), filters.to_string());
        storage.insert(ASSETS_KEY.to_string(), assets.to_string());
        Self {
            storage: Arc::new(Mutex::new(storage)),
            can_cancel: true,
            ..Default::default()
        }
    }

    fn with_tabs(mut self, tabs: Vec<TabInfo>, frames: HashMap<TabId, Vec<FrameInfo>>) -> Self {
        self.tabs = Arc::new(tabs);
        self.frames = Arc::new(frames);
        self
    }

    fn without_document_cancellation(mut self) -> Self {
        self.can_cancel = false;
        self
    }

    fn listener_events(&self) -> Vec<&'static str> {
        self.listener_events.lock().unwrap().clone()
    }
}

#[async_trait]
impl BrowserRuntime for MockRuntime {
    async fn storage_get(&self, key: &str) -> Result<Option<String>, RuntimeError> {
        Ok(self.storage.lock().unwrap().get(key).cloned())
    }

    async fn storage_set(&self, key: &str, value: &str) -> Result<(), RuntimeError> {
        self.storage
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn query_tabs(&self) -> Result<Vec<TabInfo>, RuntimeError> {
        Ok(self.tabs.as_ref().clone())
    }

    async fn frames_of(&self, tab: TabId) -> Result<Vec<FrameInfo>, RuntimeError> {
        Ok(self.frames.get(&tab).cloned().unwrap_or_default())
    }

    fn install_listeners(&self) {
        self.listener_events.lock().unwrap().push("install");
    }

    fn remove_listeners(&self) {
        self.listener_events.lock().unwrap().push("remove");
    }

    fn can_cancel_document_loads(&self) -> bool {
        self.can_cancel
    }
}

fn request(
    tab: TabId,
    frame: FrameId,
    document_url: Option<&str>,
    url: &str,
    rtype: ResourceType,
) -> RequestDetails {
    RequestDetails {
        tab_id: tab,
        frame_id: frame,
        document_url: document_url.map(str::to_string),
        url: url.to_string(),
        resource_type: rtype,
    }
}

#[tokio::test]
async fn init_loads_configuration_and_decides_requests() {
    let runtime = MockRuntime::new(
        "||ads.example.com^$script\n! comment\nad.js$redirect=noop.js\n@@invalid\n",
        "noop.js application/javascript\n(function() {})();\n",
    );
    let mut firewall = Firewall::new(runtime);
    firewall.init().await.unwrap();

    assert_eq!(firewall.filter_count(), 2);
    assert_eq!(firewall.asset_count(), 1);

    let blocked = request(
        1,
        0,
        Some(PAGE),
        "http://ads.example.com/x.js",
        ResourceType::SCRIPT,
    );
    assert_eq!(firewall.on_before_request(&blocked), Verdict::Block);

    let redirected = request(
        1,
        0,
        Some(PAGE),
        "http://cdn.example.com/ad.js",
        ResourceType::SCRIPT,
    );
    match firewall.on_before_request(&redirected) {
        Verdict::Redirect(payload) => {
            assert!(payload.starts_with("data:application/javascript;base64,"))
        }
        other => panic!("expected redirect, got {other:?}"),
    }

    let allowed = request(
        1,
        0,
        Some(PAGE),
        "http://cdn.example.com/app.js",
        ResourceType::SCRIPT,
    );
    assert_eq!(firewall.on_before_request(&allowed), Verdict::Allow);
}

#[tokio::test]
async fn requester_resolves_through_the_tab_tracker() {
    let runtime = MockRuntime::new("*$third-party\n", "");
    let mut firewall = Firewall::new(runtime);
    firewall.init().await.unwrap();

    firewall.on_committed(3, 0, PAGE);

    let third_party = request(3, 0, None, "http://tracker.net/t.js", ResourceType::SCRIPT);
    assert_eq!(firewall.on_before_request(&third_party), Verdict::Block);

    let first_party = request(
        3,
        0,
        None,
        "http://cdn.example.com/app.js",
        ResourceType::SCRIPT,
    );
    assert_eq!(firewall.on_before_request(&first_party), Verdict::Allow);

    // After the tab closes its requester is unknown again, and a filter
    // that needs an origin cannot match.
    firewall.on_tab_removed(3);
    assert_eq!(firewall.on_before_request(&third_party), Verdict::Allow);
}

#[tokio::test]
async fn startup_enumeration_seeds_the_tracker() {
    let mut frames = HashMap::new();
    frames.insert(
        7,
        vec![
            FrameInfo {
                frame_id: 0,
                url: "http://stale.example.com/".to_string(),
            },
            FrameInfo {
                frame_id: 4,
                url: "http://example.com/widget".to_string(),
            },
        ],
    );
    let runtime = MockRuntime::new("*$third-party\n", "").with_tabs(
        vec![TabInfo {
            id: 7,
            url: PAGE.to_string(),
        }],
        frames,
    );

    let mut firewall = Firewall::new(runtime);
    firewall.init().await.unwrap();

    // nested frame URL came from the enumeration snapshot
    let from_frame = request(7, 4, None, "http://tracker.net/t.js", ResourceType::SCRIPT);
    assert_eq!(firewall.on_before_request(&from_frame), Verdict::Block);

    // the tab's own URL wins over a later frame-0 enumeration entry
    let same_origin = request(
        7,
        0,
        None,
        "http://cdn.example.com/app.js",
        ResourceType::SCRIPT,
    );
    assert_eq!(firewall.on_before_request(&same_origin), Verdict::Allow);
}

#[tokio::test]
async fn non_web_requesters_are_never_filtered() {
    let runtime = MockRuntime::new("||ads.example.com^\n", "");
    let mut firewall = Firewall::new(runtime);
    firewall.init().await.unwrap();

    let from_extension_page = request(
        1,
        0,
        Some("moz-extension://abcdef/background.html"),
        "http://ads.example.com/x.js",
        ResourceType::SCRIPT,
    );
    assert_eq!(
        firewall.on_before_request(&from_extension_page),
        Verdict::Allow
    );
}

#[tokio::test]
async fn document_loads_get_the_placeholder_when_uncancelable() {
    let assets = format!("{FRAME_BLOCKED_ASSET} text/html\n<p>blocked</p>\n");
    let runtime =
        MockRuntime::new("||tracker.example.com^\n", &assets).without_document_cancellation();
    let mut firewall = Firewall::new(runtime);
    firewall.init().await.unwrap();

    let frame_load = request(
        1,
        0,
        Some(PAGE),
        "http://tracker.example.com/landing",
        ResourceType::MAIN_FRAME,
    );
    match firewall.on_before_request(&frame_load) {
        Verdict::Redirect(payload) => assert!(payload.starts_with("data:text/html;base64,")),
        other => panic!("expected placeholder redirect, got {other:?}"),
    }

    // non-document requests still cancel normally
    let script_load = request(
        1,
        0,
        Some(PAGE),
        "http://tracker.example.com/t.js",
        ResourceType::SCRIPT,
    );
    assert_eq!(firewall.on_before_request(&script_load), Verdict::Block);
}

#[tokio::test]
async fn cancelable_hosts_block_documents_outright() {
    let runtime = MockRuntime::new("||tracker.example.com^\n", "");
    let mut firewall = Firewall::new(runtime);
    firewall.init().await.unwrap();

    let frame_load = request(
        1,
        0,
        Some(PAGE),
        "http://tracker.example.com/landing",
        ResourceType::MAIN_FRAME,
    );
    assert_eq!(firewall.on_before_request(&frame_load), Verdict::Block);
}

#[tokio::test]
async fn teardown_is_loud_when_not_initialized() {
    let runtime = MockRuntime::new("", "");
    let mut firewall = Firewall::new(runtime.clone());

    assert!(firewall.teardown().is_err());

    firewall.init().await.unwrap();
    firewall.teardown().unwrap();
    assert!(!firewall.is_initialized());
    assert!(firewall.teardown().is_err());

    assert_eq!(runtime.listener_events(), vec!["install", "remove"]);
}

#[tokio::test]
async fn teardown_clears_the_rule_set() {
    let runtime = MockRuntime::new("||ads.example.com^\n", "");
    let mut firewall = Firewall::new(runtime);
    firewall.init().await.unwrap();
    firewall.teardown().unwrap();

    let req = request(
        1,
        0,
        Some(PAGE),
        "http://ads.example.com/x.js",
        ResourceType::SCRIPT,
    );
    assert_eq!(firewall.on_before_request(&req), Verdict::Allow);
}

#[tokio::test]
async fn reinit_is_idempotent_and_reorders_listeners() {
    let runtime = MockRuntime::new("||ads.example.com^$script\n", "");
    let mut firewall = Firewall::new(runtime.clone());

    firewall.init().await.unwrap();
    firewall.init().await.unwrap();

    // the second init tore down first: remove lands between the installs
    assert_eq!(runtime.listener_events(), vec!["install", "remove", "install"]);

    let req = request(
        1,
        0,
        Some(PAGE),
        "http://ads.example.com/x.js",
        ResourceType::SCRIPT,
    );
    assert_eq!(firewall.on_before_request(&req), Verdict::Block);
    assert_eq!(firewall.filter_count(), 1);
}

#[tokio::test]
async fn configuration_writes_take_effect_on_next_init() {
    let runtime = MockRuntime::new("", "");
    let mut firewall = Firewall::new(runtime);
    firewall.init().await.unwrap();

    let req = request(
        1,
        0,
        Some(PAGE),
        "http://ads.example.com/x.js",
        ResourceType::SCRIPT,
    );
    assert_eq!(firewall.on_before_request(&req), Verdict::Allow);

    firewall.set_filters("||ads.example.com^\n").await.unwrap();
    // not yet live
    assert_eq!(firewall.on_before_request(&req), Verdict::Allow);

    firewall.init().await.unwrap();
    assert_eq!(firewall.on_before_request(&req), Verdict::Block);
}
