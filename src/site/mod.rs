// src/site/mod.rs
// =============================================================================
// This module finds orphaned pages in a generated static site.
//
// Submodules:
// - scan: Lists every HTML document under the site directory
// - extract: Pulls raw href values out of a document
// - resolve: Turns an href into a canonical document path
// - orphans: Ties it together and builds the OrphanReport
// - error: Why a single document couldn't be read
// =============================================================================

mod error;
mod extract;
mod orphans;
mod resolve;
mod scan;

pub use orphans::{find_orphans, OrphanReport};
pub use resolve::INDEX_DOCUMENT;
