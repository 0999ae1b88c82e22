//! Redirect assets
//!
//! An asset is a named data-URI payload that can stand in for a blocked
//! resource. Assets are parsed in bulk, replaced atomically, and never
//! mutated afterwards.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// A named redirect substitute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    /// Lookup key referenced by `$redirect=<name>` options.
    pub name: String,
    /// Complete `data:` URI, ready to hand to the request pipeline.
    pub payload: String,
}

impl Asset {
    /// Build an asset from its record header and body.
    ///
    /// When `already_encoded` is set the body is embedded verbatim (the MIME
    /// string is expected to carry the `;base64` marker itself); otherwise
    /// the body is base64-encoded here.
    pub fn new(name: impl Into<String>, mime: &str, body: &str, already_encoded: bool) -> Self {
        let payload = if already_encoded {
            format!("data:{mime},{body}")
        } else {
            format!("data:{mime};base64,{}", STANDARD.encode(body))
        };

        Self {
            name: name.into(),
            payload,
        }
    }

    /// Look an asset up by name.
    pub fn find<'a>(assets: &'a [Asset], name: &str) -> Option<&'a Asset> {
        assets.iter().find(|asset| asset.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_raw_bodies() {
        let asset = Asset::new("noop.js", "application/javascript", "abc", false);
        assert_eq!(asset.payload, "data:application/javascript;base64,YWJj");
    }

    #[test]
    fn passes_through_preencoded_bodies() {
        let asset = Asset::new("pixel.png", "image/png;base64", "iVBORw0KGgo=", true);
        assert_eq!(asset.payload, "data:image/png;base64,iVBORw0KGgo=");
    }

    #[test]
    fn find_by_name() {
        let assets = vec![
            Asset::new("a", "text/plain", "x", false),
            Asset::new("b", "text/plain", "y", false),
        ];
        assert_eq!(Asset::find(&assets, "b").map(|a| a.name.as_str()), Some("b"));
        assert!(Asset::find(&assets, "c").is_none());
    }
}
