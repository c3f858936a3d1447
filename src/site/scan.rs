// src/site/scan.rs
// =============================================================================
// This module finds every HTML document under a site directory.
//
// How it works:
// 1. Walk the directory tree with `walkdir`, following symlinks
// 2. Before descending into a directory, canonicalize it
// 3. Skip links to directories inside the site: the real directory is walked
//    under its own path anyway (this also stops links back up the tree)
// 4. Skip any outside directory we've already seen through another link
// 5. Keep every file whose name ends in ".html"
// 6. Express each one relative to the root, with '/' separators
//
// A missing root is not an error, it just means there is nothing to check.
//
// Rust concepts:
// - HashSet: visited directories and found documents
// - Iterator adapters: filter_entry() prunes whole subtrees
// - Closures capturing &mut state
// =============================================================================

use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

// Returns the canonical paths of all HTML documents under `root`
//
// Parameters:
//   root: the site directory (ideally already canonicalized)
//
// Returns: a set like {"index.html", "docs/index.html", "blog/post.html"}
pub fn scan_site(root: &Path) -> HashSet<String> {
    let mut documents = HashSet::new();

    if !root.is_dir() {
        debug!(root = %root.display(), "site directory missing, nothing to scan");
        return documents;
    }

    let canonical_root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
    let mut visited: HashSet<PathBuf> = HashSet::new();

    // Sorting makes the walk order stable, so when two symlinks lead to the
    // same outside directory the same one wins on every run
    let walker = WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| should_enter(entry, root, &canonical_root, &mut visited));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                report_walk_error(&e);
                continue;
            }
        };

        if !entry.file_type().is_file() || !is_html(entry.file_name()) {
            continue;
        }

        if let Some(document) = canonical_path(root, entry.path()) {
            documents.insert(document);
        }
    }

    debug!(root = %root.display(), documents = documents.len(), "scanned site");
    documents
}

// Decides whether the walker should enter this entry
//
// Files always pass. A directory inside the site passes only under its real
// path. A directory outside the site passes the first time its canonical path
// is seen.
fn should_enter(
    entry: &DirEntry,
    root: &Path,
    canonical_root: &Path,
    visited: &mut HashSet<PathBuf>,
) -> bool {
    if !entry.file_type().is_dir() {
        return true;
    }

    let canonical = match entry.path().canonicalize() {
        Ok(canonical) => canonical,
        Err(e) => {
            warn!(path = %entry.path().display(), error = %e, "cannot resolve directory, skipping");
            return false;
        }
    };

    if is_alias_inside(entry.path(), &canonical, root, canonical_root) {
        debug!(
            path = %entry.path().display(),
            target = %canonical.display(),
            "link into the site, skipping"
        );
        return false;
    }

    let first = visited.insert(canonical);
    if !first {
        debug!(path = %entry.path().display(), "directory already visited, skipping");
    }
    first
}

// True when `path` reaches a directory of the site under some other name
//
// "alias" -> "real" and "docs/loop" -> "." are aliases, "real" itself is not.
fn is_alias_inside(path: &Path, canonical: &Path, root: &Path, canonical_root: &Path) -> bool {
    let Ok(real) = canonical.strip_prefix(canonical_root) else {
        return false;
    };

    path.strip_prefix(root).map_or(true, |walked| walked != real)
}

// Symlink loops are expected and harmless, anything else deserves a warning
fn report_walk_error(error: &walkdir::Error) {
    let path = error
        .path()
        .map(|p| p.display().to_string())
        .unwrap_or_default();

    if error.loop_ancestor().is_some() {
        debug!(path = %path, "symlink loop, skipping");
    } else {
        warn!(path = %path, error = %error, "cannot read directory entry, skipping");
    }
}

fn is_html(name: &OsStr) -> bool {
    name.to_str().is_some_and(|name| name.ends_with(".html"))
}

// "/srv/site/docs/intro.html" under "/srv/site" -> "docs/intro.html"
//
// Returns None for paths that aren't valid UTF-8, since no href could name them.
fn canonical_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;

    let segments = relative
        .components()
        .map(|component| component.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()?;

    Some(segments.join("/"))
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why canonicalize() directories?
//    - A symlink and its target are different paths to the same directory
//    - canonicalize() resolves symlinks, so both give the same PathBuf
//    - If that PathBuf is inside the site but isn't where we are walking,
//      we're looking at an alias and the real path wins
//    - Outside the site, a HashSet makes sure each directory is walked once
//
// 2. What does collect::<Option<Vec<_>>>() do?
//    - It turns an iterator of Option<T> into Option<Vec<T>>
//    - If any element is None, the whole result is None
//
// 3. Why is_some_and()?
//    - Shorthand for "is Some, and the value passes this check"
//    - Same as matches!(opt, Some(x) if check(x))
// -----------------------------------------------------------------------------
