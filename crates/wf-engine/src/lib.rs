//! webfence Engine
//!
//! The embeddable firewall service: lifecycle management, per-tab frame
//! tracking, and the per-request interception path. The engine talks to its
//! host exclusively through the [`runtime::BrowserRuntime`] capability
//! trait, so it can run against a real extension runtime or an in-memory
//! mock alike.

pub mod error;
pub mod firewall;
pub mod runtime;
pub mod tabs;

pub use error::EngineError;
pub use firewall::{Firewall, ASSETS_KEY, FILTERS_KEY};
pub use runtime::{
    BrowserRuntime, FrameId, FrameInfo, RequestDetails, RuntimeError, TabId, TabInfo,
    TOP_LEVEL_FRAME,
};
pub use tabs::TabTracker;
