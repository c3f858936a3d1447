// src/site/extract.rs
// =============================================================================
// This module pulls raw href values out of an HTML page.
//
// It is a pattern scan, not an HTML parser: we look for href="..." and
// href='...' anywhere in the text. That keeps working on pages with unclosed
// tags or stray quotes, but it can't see links that scripts build at runtime.
//
// The values come out untouched. Deciding what they point at is the job of
// resolve.rs.
// =============================================================================

use regex::Regex;
use std::sync::LazyLock;

// href = "value"  or  href = 'value'
// Group 1 holds a double-quoted value, group 2 a single-quoted one.
static HREF_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bhref\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("href pattern is valid")
});

// Extracts every href value from an HTML document, in document order
//
// The iterator is lazy and borrows from `html`, so nothing is copied until
// the caller decides to keep a value.
//
// Example:
//   html = r#"<a href="/docs/">Docs</a> <a href='#top'>Top</a>"#
//   result yields "/docs/", then "#top"
pub fn extract_hrefs(html: &str) -> impl Iterator<Item = &str> {
    HREF_PATTERN.captures_iter(html).filter_map(|caps| {
        caps.get(1)
            .or_else(|| caps.get(2))
            .map(|value| value.as_str())
    })
}
