// src/checker/mod.rs
// =============================================================================
// This module checks whether a single external URL is reachable.
//
// Submodules:
// - http: Makes the HTTP request and classifies the outcome
//
// This file (mod.rs) is the module root - it exports the public API that
// other parts of our application can use.
// =============================================================================

mod http;

// Re-export public items from submodules
// This lets users write `checker::check_url()` instead of
// `checker::http::check_url()`
pub use http::{check_url, CheckOptions, LinkCheckResult, LinkStatus, DEFAULT_USER_AGENT};
