//! Core type definitions for webfence
//!
//! These types are shared between the filter compiler and the matching
//! engine.

// =============================================================================
// Resource Types (bit mask for type filtering)
// =============================================================================

bitflags::bitflags! {
    /// Canonical resource-type tag set.
    ///
    /// A request carries exactly one bit; a filter's type restriction is a
    /// union of bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ResourceType: u16 {
        const OTHER = 1 << 0;
        const MAIN_FRAME = 1 << 1;
        const SUB_FRAME = 1 << 2;
        const STYLESHEET = 1 << 3;
        const SCRIPT = 1 << 4;
        const IMAGE = 1 << 5;
        const FONT = 1 << 6;
        const OBJECT = 1 << 7;
        const XMLHTTPREQUEST = 1 << 8;
        const PING = 1 << 9;
        const CSP_REPORT = 1 << 10;
        const MEDIA = 1 << 11;
        const WEBSOCKET = 1 << 12;

        /// Document loads (top-level and nested frames)
        const DOCUMENT = Self::MAIN_FRAME.bits() | Self::SUB_FRAME.bits();
    }
}

impl ResourceType {
    /// Normalize a filter option token into a canonical tag.
    ///
    /// Tokens are case-sensitive; anything not in the table is not a type
    /// and the caller falls through to its unsupported-option handling.
    pub fn from_option(token: &str) -> Option<Self> {
        match token {
            "main_frame" | "document" => Some(Self::MAIN_FRAME),
            "sub_frame" | "subdocument" => Some(Self::SUB_FRAME),
            "stylesheet" => Some(Self::STYLESHEET),
            "script" => Some(Self::SCRIPT),
            "image" => Some(Self::IMAGE),
            "font" => Some(Self::FONT),
            "object" | "object-subrequest" => Some(Self::OBJECT),
            "xmlhttprequest" => Some(Self::XMLHTTPREQUEST),
            "ping" => Some(Self::PING),
            "csp_report" | "csp-report" | "cspreport" => Some(Self::CSP_REPORT),
            "media" => Some(Self::MEDIA),
            "websocket" => Some(Self::WEBSOCKET),
            "other" | "beacon" => Some(Self::OTHER),
            _ => None,
        }
    }

    /// Parse the resource type string supplied with a browser request.
    /// Unknown types collapse to `OTHER`.
    pub fn from_request(s: &str) -> Self {
        Self::from_option(s).unwrap_or(Self::OTHER)
    }
}

// =============================================================================
// Domain Tokens
// =============================================================================

/// One entry of a filter's domain restriction list.
///
/// `SameOrigin` is the first-party/third-party sentinel; it never coexists
/// with literal entries in the same list (enforced at compile time).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainToken {
    /// Same origin as the requester ($first-party / $third-party)
    SameOrigin,
    /// A literal domain from $domain=
    Literal(String),
}

impl DomainToken {
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            DomainToken::Literal(domain) => Some(domain),
            DomainToken::SameOrigin => None,
        }
    }
}

// =============================================================================
// Verdicts
// =============================================================================

/// Per-request outcome of filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// No rule matched; the request proceeds untouched.
    Allow,
    /// A rule matched with no usable redirect; the request is aborted.
    Block,
    /// A rule matched with a resolvable redirect; the payload is the
    /// substitute data URI.
    Redirect(String),
}

impl Verdict {
    pub fn is_allow(&self) -> bool {
        matches!(self, Verdict::Allow)
    }
}
