//! Browser runtime capability interface
//!
//! The firewall core never touches browser APIs directly; it consumes this
//! narrow trait instead, which keeps the engine host-free for unit testing.
//! A production implementation wires these calls to the extension runtime
//! (key-value storage, tab/frame enumeration, listener registration).

use async_trait::async_trait;
use thiserror::Error;

use wf_core::types::ResourceType;

pub type TabId = i64;
pub type FrameId = i64;

/// Frame id of a tab's top-level document.
pub const TOP_LEVEL_FRAME: FrameId = 0;

/// One open tab in the startup enumeration snapshot.
#[derive(Debug, Clone)]
pub struct TabInfo {
    pub id: TabId,
    pub url: String,
}

/// One live frame inside a tab.
#[derive(Debug, Clone)]
pub struct FrameInfo {
    pub frame_id: FrameId,
    pub url: String,
}

/// A request intercepted from the live request stream.
#[derive(Debug, Clone)]
pub struct RequestDetails {
    pub tab_id: TabId,
    pub frame_id: FrameId,
    /// URL of the document that initiated the request, when the browser
    /// supplies it. Absent on platforms that only report tab/frame ids.
    pub document_url: Option<String>,
    /// Destination URL.
    pub url: String,
    pub resource_type: ResourceType,
}

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("storage operation failed: {0}")]
    Storage(String),

    #[error("tab query failed: {0}")]
    TabQuery(String),
}

/// Host capabilities required by the firewall.
#[async_trait]
pub trait BrowserRuntime: Send + Sync {
    /// Read a raw text blob from extension storage. Missing keys are `None`.
    async fn storage_get(&self, key: &str) -> Result<Option<String>, RuntimeError>;

    /// Persist a raw text blob to extension storage.
    async fn storage_set(&self, key: &str, value: &str) -> Result<(), RuntimeError>;

    /// Enumerate currently open tabs.
    async fn query_tabs(&self) -> Result<Vec<TabInfo>, RuntimeError>;

    /// Enumerate the live frames of one tab.
    async fn frames_of(&self, tab: TabId) -> Result<Vec<FrameInfo>, RuntimeError>;

    /// Go live: subscribe the firewall to request, navigation-commit and
    /// tab-removal events.
    fn install_listeners(&self);

    /// Unsubscribe from all events.
    fn remove_listeners(&self);

    /// Whether the host can cancel top-level and nested document loads.
    /// Hosts that cannot get the frame-blocked placeholder instead.
    fn can_cancel_document_loads(&self) -> bool;
}
