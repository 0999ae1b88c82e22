//! Asset block parser
//!
//! Assets arrive as blank-line-delimited records: a `<name> <mimeType>`
//! header line followed by body lines that are concatenated without a
//! separator. `#`-prefixed lines anywhere in the stream are comments.

use wf_core::asset::Asset;

/// Result of parsing a whole asset text.
#[derive(Debug, Default)]
pub struct ParsedAssets {
    pub assets: Vec<Asset>,
    /// Records with an unusable header, counted and dropped.
    pub invalid: usize,
}

/// Parse blank-line-delimited asset records.
pub fn parse_asset_list(text: &str) -> ParsedAssets {
    let mut parsed = ParsedAssets::default();
    let mut buffer: Vec<&str> = Vec::new();

    // A synthetic trailing blank line flushes the final record.
    for line in text.lines().map(str::trim).chain(std::iter::once("")) {
        if line.starts_with('#') {
            continue;
        }

        if !line.is_empty() {
            buffer.push(line);
            continue;
        }

        if buffer.is_empty() {
            continue;
        }

        let header = buffer.remove(0);
        let mut header_parts = header.split(' ');
        let name = header_parts.next().unwrap_or_default();
        let mime = header_parts.next().unwrap_or_default();

        if name.is_empty() || mime.is_empty() {
            parsed.invalid += 1;
            log::debug!("dropping asset record with unusable header '{header}'");
        } else {
            let body = buffer.concat();
            parsed
                .assets
                .push(Asset::new(name, mime, &body, mime.contains(";base64")));
        }

        buffer.clear();
    }

    if parsed.invalid > 0 {
        log::warn!("could not parse {} asset records", parsed.invalid);
    }

    parsed
}
