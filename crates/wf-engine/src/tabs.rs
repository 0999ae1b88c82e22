//! Per-tab frame URL tracking
//!
//! Supplies "what page made this request" when the browser's request event
//! does not carry that information. The map is the only mutable shared
//! state in the engine; every mutation is a last-writer-wins overwrite or a
//! whole-tab deletion, serialized by the host's event loop.

use std::collections::HashMap;

use crate::runtime::{FrameId, TabId};

/// Last committed URL of every frame of every live tab.
#[derive(Debug, Default)]
pub struct TabTracker {
    tabs: HashMap<TabId, HashMap<FrameId, String>>,
}

impl TabTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a navigation commit; overwrites any previous URL of the frame.
    pub fn commit(&mut self, tab: TabId, frame: FrameId, url: &str) {
        self.tabs
            .entry(tab)
            .or_default()
            .insert(frame, url.to_string());
    }

    /// Seed a frame URL from the startup enumeration snapshot. A URL already
    /// committed by a navigation event is not overwritten.
    pub fn seed(&mut self, tab: TabId, frame: FrameId, url: &str) {
        self.tabs
            .entry(tab)
            .or_default()
            .entry(frame)
            .or_insert_with(|| url.to_string());
    }

    /// Drop everything known about a closed tab.
    pub fn remove_tab(&mut self, tab: TabId) {
        self.tabs.remove(&tab);
    }

    /// Last committed URL of a frame, or `None` when the tab or frame is
    /// unknown.
    pub fn frame_url(&self, tab: TabId, frame: FrameId) -> Option<&str> {
        self.tabs.get(&tab)?.get(&frame).map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.tabs.clear();
    }

    pub fn tab_count(&self) -> usize {
        self.tabs.len()
    }
}
