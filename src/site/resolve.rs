// src/site/resolve.rs
// =============================================================================
// This module turns a raw href into a canonical document path.
//
// A canonical path is relative to the site root, uses '/' separators and
// always ends in ".html". For example, from the page "tutorials/intro.html":
//   "../guide.html"   -> Some("guide.html")
//   "/about/"         -> Some("about/index.html")
//   "setup#install"   -> Some("tutorials/setup/index.html")
//   "https://x.org/"  -> None (external)
//   "#top"            -> None (same page)
//   "../../etc.html"  -> None (escapes the site root)
//
// Everything here is a pure function over strings: no filesystem access.
// Whether the target actually exists is decided by the caller.
//
// Rust concepts:
// - Option<T>: "a path, or not applicable"
// - Vec as a stack: for resolving ".." segments
// - Cow<str>: percent-decoding only allocates when it has to
// =============================================================================

use percent_encoding::percent_decode_str;

// The document a directory request is served from
pub const INDEX_DOCUMENT: &str = "index.html";

// Prefixes of hrefs that never point at a document in the site
//
// Compared ASCII case-insensitively, so "HTTPS://" and "MailTo:" are caught too.
const EXTERNAL_PREFIXES: &[&str] = &[
    "http://",
    "https://",
    "mailto:",
    "javascript:",
    "tel:",
    "data:",
    "ftp://",
    "//",
];

// Resolves an href found in `from_doc` to the canonical path it points at
//
// Parameters:
//   href: the raw attribute value, exactly as written in the markup
//   from_doc: canonical path of the document containing the link
//
// Returns: Some(canonical_path) or None if the link is not applicable
pub fn resolve_href(href: &str, from_doc: &str) -> Option<String> {
    let href = href.trim();

    if is_external(href) {
        return None;
    }

    // Drop "#fragment" and "?query": a static server ignores both
    let path = href.split(|c: char| c == '#' || c == '?').next().unwrap_or_default();
    if path.is_empty() {
        return None;
    }

    let decoded = percent_decode_str(path).decode_utf8().ok()?;

    // Rooted links start from the site root, everything else from the
    // directory holding the referring document
    let (base, rest) = match decoded.strip_prefix('/') {
        Some(rest) => (Vec::new(), rest),
        None => (parent_segments(from_doc), &*decoded),
    };

    // "about.html/" names a directory even though its last segment doesn't
    let names_directory = rest.ends_with('/');
    let mut segments = normalize_segments(base, rest)?;

    let is_document = !names_directory
        && segments
            .last()
            .is_some_and(|last| last.ends_with(".html"));
    if !is_document {
        segments.push(INDEX_DOCUMENT);
    }

    Some(segments.join("/"))
}

// Checks whether an href points outside the site (or nowhere at all)
fn is_external(href: &str) -> bool {
    let lower = href.to_ascii_lowercase();
    EXTERNAL_PREFIXES
        .iter()
        .any(|prefix| lower.starts_with(prefix))
}

// Directory segments of a canonical document path
//
// "tutorials/intro.html" -> ["tutorials"], "index.html" -> []
fn parent_segments(doc: &str) -> Vec<&str> {
    let mut segments: Vec<&str> = doc.split('/').filter(|s| !s.is_empty()).collect();
    segments.pop();
    segments
}

// Applies "." and ".." segments of `path` on top of `base`
//
// Returns None if a ".." would climb above the site root.
fn normalize_segments<'a>(mut base: Vec<&'a str>, path: &'a str) -> Option<Vec<&'a str>> {
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                base.pop()?;
            }
            name => base.push(name),
        }
    }
    Some(base)
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why does base.pop()? return None for escapes?
//    - Vec::pop() returns None when the vector is already empty
//    - An empty stack means we're at the site root, so ".." would leave it
//    - The ? operator turns that None into an early `return None`
//
// 2. Why split with a closure?
//    - split accepts any char predicate as a pattern
//    - The first piece is everything before the first '#' or '?'
//
// 3. What does the lifetime 'a mean in normalize_segments?
//    - The returned Vec holds &str slices borrowed from both inputs
//    - 'a tells the compiler both inputs must outlive the result
// -----------------------------------------------------------------------------
