// src/site/orphans.rs
// =============================================================================
// This module finds the orphaned pages of a generated site.
//
// How it works:
// 1. Scan the site for every HTML document (scan.rs)
// 2. Read all documents concurrently, a bounded number at a time
// 3. For each one, extract its hrefs (extract.rs) and resolve them to
//    canonical paths (resolve.rs), keeping only targets that exist
// 4. Mark the entry point (index.html) as referenced, always
// 5. Anything that was scanned but never referenced is an orphan
//
// By default "referenced" means "some other page links to it directly".
// That is not full reachability: a page linked only from an orphan still
// counts as referenced. ReachabilityMode::Transitive walks the link graph
// from the entry point instead, for callers that want the stricter answer.
//
// A page's links to itself are ignored in both modes, so a page that only
// links to itself is still an orphan.
//
// Nothing in here returns an error. A document we can't read is logged and
// contributes no links; a missing site directory is an empty report.
//
// Rust concepts:
// - async/await + buffer_unordered: bounded concurrent file reads
// - spawn_blocking: running the synchronous directory walk off the runtime
// - VecDeque: breadth-first traversal for the transitive mode
// =============================================================================

use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};
use tokio::{fs, task, time};
use tracing::{debug, error, info, trace, warn};

use super::error::DocumentError;
use super::extract::extract_hrefs;
use super::resolve::resolve_href;
use super::scan::scan_site;
use crate::config::{AnalyzerConfig, ReachabilityMode};

/// The result of one orphan analysis
///
/// Serializes as:
/// `{"orphaned_files": [...], "count": 1, "site_directory": "/abs/path/_site"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrphanReport {
    /// Canonical paths of orphaned documents, sorted ascending
    pub orphaned_files: Vec<String>,
    pub count: usize,
    /// The resolved, absolute site directory that was analyzed
    pub site_directory: String,
}

impl OrphanReport {
    fn new(orphaned_files: Vec<String>, site_directory: &Path) -> Self {
        Self {
            count: orphaned_files.len(),
            orphaned_files,
            site_directory: site_directory.display().to_string(),
        }
    }

    /// True when no orphans were found
    pub fn is_clean(&self) -> bool {
        self.count == 0
    }
}

// Outgoing links of every document: page -> pages it links to
//
// Only targets that exist in the site are kept, and a page never links to
// itself here.
struct LinkGraph {
    edges: HashMap<String, HashSet<String>>,
}

impl LinkGraph {
    // Every page with at least one incoming link, plus the entry point
    fn direct_references<'a>(&'a self, entry_point: &'a str) -> HashSet<&'a str> {
        let mut referenced: HashSet<&str> = self
            .edges
            .values()
            .flatten()
            .map(String::as_str)
            .collect();
        referenced.insert(entry_point);
        referenced
    }

    // Every page reachable by following links from the entry point
    fn reachable_from<'a>(&'a self, entry_point: &'a str) -> HashSet<&'a str> {
        let mut reached = HashSet::from([entry_point]);
        let mut queue = VecDeque::from([entry_point]);

        while let Some(page) = queue.pop_front() {
            let Some(targets) = self.edges.get(page) else {
                continue;
            };
            for target in targets {
                if reached.insert(target.as_str()) {
                    queue.push_back(target.as_str());
                }
            }
        }

        reached
    }
}

// Finds every document under `root` that nothing links to
//
// Parameters:
//   root: the site directory; it doesn't have to exist
//   config: entry point, concurrency and read limits, reachability mode
//
// Returns: an OrphanReport (never fails)
pub async fn find_orphans(root: &Path, config: &AnalyzerConfig) -> OrphanReport {
    let root = resolve_root(root);
    let documents = scan_documents(root.clone()).await;

    if documents.is_empty() {
        info!(root = %root.display(), "no HTML documents found");
        return OrphanReport::new(Vec::new(), &root);
    }

    let graph = build_link_graph(&root, &documents, config).await;

    let reachable = match config.mode {
        ReachabilityMode::Direct => graph.direct_references(&config.entry_point),
        ReachabilityMode::Transitive => graph.reachable_from(&config.entry_point),
    };

    let mut orphans: Vec<String> = documents
        .iter()
        .filter(|doc| !reachable.contains(doc.as_str()))
        .cloned()
        .collect();
    orphans.sort();

    info!(
        root = %root.display(),
        documents = documents.len(),
        orphans = orphans.len(),
        mode = ?config.mode,
        "orphan analysis finished"
    );

    OrphanReport::new(orphans, &root)
}

// The absolute form of the site directory, with symlinks resolved when it exists
fn resolve_root(root: &Path) -> PathBuf {
    root.canonicalize()
        .or_else(|_| std::path::absolute(root))
        .unwrap_or_else(|_| root.to_path_buf())
}

// walkdir is synchronous, so keep it off the async worker threads
async fn scan_documents(root: PathBuf) -> HashSet<String> {
    match task::spawn_blocking(move || scan_site(&root)).await {
        Ok(documents) => documents,
        Err(e) => {
            error!(error = %e, "site scan did not complete");
            HashSet::new()
        }
    }
}

// Reads every document (at most config.workers at once) and records its links
async fn build_link_graph(
    root: &Path,
    documents: &HashSet<String>,
    config: &AnalyzerConfig,
) -> LinkGraph {
    let jobs = documents.iter().map(|doc| async move {
        let targets = outgoing_links(root, doc, documents, config).await;
        (doc.clone(), targets)
    });

    // Each document builds its own set; collect() merges them one at a time,
    // so no two tasks ever write to the same collection
    let edges: HashMap<String, HashSet<String>> = stream::iter(jobs)
        .buffer_unordered(config.concurrency())
        .collect()
        .await;

    LinkGraph { edges }
}

// The existing documents that `doc` links to, excluding itself
async fn outgoing_links(
    root: &Path,
    doc: &str,
    documents: &HashSet<String>,
    config: &AnalyzerConfig,
) -> HashSet<String> {
    let content = match read_document(&root.join(doc), config).await {
        Ok(content) => content,
        Err(e) => {
            warn!(document = doc, error = %e, "skipping unreadable document");
            return HashSet::new();
        }
    };

    let targets: HashSet<String> = extract_hrefs(&content)
        .filter_map(|href| {
            let target = resolve_href(href, doc);
            if target.is_none() {
                trace!(document = doc, href, "ignoring link");
            }
            target
        })
        .filter(|target| target != doc && documents.contains(target))
        .collect();

    debug!(document = doc, links = targets.len(), "scanned document");
    targets
}

// Reads a document as UTF-8, enforcing the size and time limits
async fn read_document(path: &Path, config: &AnalyzerConfig) -> Result<String, DocumentError> {
    let size = fs::metadata(path).await?.len();
    if size > config.max_file_size {
        return Err(DocumentError::TooLarge {
            size,
            max: config.max_file_size,
        });
    }

    let bytes = time::timeout(config.read_timeout, fs::read(path))
        .await
        .map_err(|_| DocumentError::Timeout {
            after: config.read_timeout,
        })??;

    Ok(String::from_utf8(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as std_fs;
    use tempfile::TempDir;

    // Builds a site from (path, contents) pairs
    fn site(pages: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (path, contents) in pages {
            let path = dir.path().join(path);
            std_fs::create_dir_all(path.parent().unwrap()).unwrap();
            std_fs::write(path, contents).unwrap();
        }
        dir
    }

    async fn orphans_of(dir: &TempDir) -> Vec<String> {
        find_orphans(dir.path(), &AnalyzerConfig::default())
            .await
            .orphaned_files
    }

    #[tokio::test]
    async fn test_unlinked_page_is_orphaned() {
        let dir = site(&[
            ("index.html", r#"<a href="a.html">A</a>"#),
            ("a.html", "<p>no links</p>"),
            ("b.html", "<p>no links</p>"),
        ]);

        let report = find_orphans(dir.path(), &AnalyzerConfig::default()).await;
        assert_eq!(report.orphaned_files, vec!["b.html"]);
        assert_eq!(report.count, 1);
    }

    #[tokio::test]
    async fn test_directory_link_reaches_index() {
        let dir = site(&[
            ("index.html", r#"<a href="/docs/">Docs</a>"#),
            ("docs/index.html", "<p>docs</p>"),
        ]);

        assert!(orphans_of(&dir).await.is_empty());
    }

    #[tokio::test]
    async fn test_tree_without_html_is_clean() {
        let dir = site(&[("style.css", "body {}"), ("notes/readme.txt", "hi")]);

        let report = find_orphans(dir.path(), &AnalyzerConfig::default()).await;
        assert_eq!(report.count, 0);
        assert!(report.orphaned_files.is_empty());
        assert!(report.is_clean());
    }

    #[tokio::test]
    async fn test_missing_root_is_clean() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("_site");

        let report = find_orphans(&missing, &AnalyzerConfig::default()).await;
        assert_eq!(report.count, 0);
        assert!(Path::new(&report.site_directory).is_absolute());
    }

    #[tokio::test]
    async fn test_entry_point_is_never_orphaned() {
        let dir = site(&[("index.html", "<p>home</p>"), ("about.html", "<p>about</p>")]);

        assert_eq!(orphans_of(&dir).await, vec!["about.html"]);
    }

    #[tokio::test]
    async fn test_escaping_link_does_not_count() {
        let dir = site(&[
            ("index.html", r#"<a href="../shared.html">Shared</a>"#),
            ("shared.html", "<p>shared</p>"),
        ]);

        assert_eq!(orphans_of(&dir).await, vec!["shared.html"]);
    }

    #[tokio::test]
    async fn test_self_link_does_not_count() {
        let dir = site(&[
            ("index.html", "<p>home</p>"),
            ("lonely.html", r##"<a href="lonely.html">me</a> <a href="#top">top</a>"##),
        ]);

        assert_eq!(orphans_of(&dir).await, vec!["lonely.html"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_link_to_real_path_behind_symlinked_directory() {
        let dir = site(&[
            ("index.html", r#"<a href="real/page.html">Page</a>"#),
            ("real/page.html", "<p>page</p>"),
        ]);
        std::os::unix::fs::symlink(dir.path().join("real"), dir.path().join("alias")).unwrap();

        assert!(orphans_of(&dir).await.is_empty());
    }

    #[tokio::test]
    async fn test_nested_relative_links() {
        let dir = site(&[
            ("index.html", r#"<a href="tutorials/intro.html">Start</a>"#),
            ("tutorials/intro.html", r#"<a href="../guide.html#step-1">Guide</a>"#),
            ("guide.html", r#"<a href="https://example.com/x">Elsewhere</a>"#),
        ]);

        assert!(orphans_of(&dir).await.is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_document_is_skipped_but_listed() {
        let dir = site(&[("index.html", "<p>home</p>"), ("a.html", "<p>a</p>")]);
        // Not UTF-8, so its link to a.html is never seen
        std_fs::write(
            dir.path().join("broken.html"),
            b"<a href=\"a.html\">\xff\xfe</a>",
        )
        .unwrap();

        assert_eq!(orphans_of(&dir).await, vec!["a.html", "broken.html"]);
    }

    #[tokio::test]
    async fn test_oversized_document_is_skipped() {
        let dir = site(&[
            ("index.html", r#"<a href="a.html">A</a>"#),
            ("a.html", "<p>a</p>"),
        ]);
        let config = AnalyzerConfig {
            max_file_size: 4,
            ..AnalyzerConfig::default()
        };

        let report = find_orphans(dir.path(), &config).await;
        assert_eq!(report.orphaned_files, vec!["a.html"]);
    }

    #[tokio::test]
    async fn test_direct_mode_counts_links_from_orphans() {
        let dir = site(&[
            ("index.html", r#"<a href="a.html">A</a>"#),
            ("a.html", "<p>a</p>"),
            ("b.html", r#"<a href="c.html">C</a>"#),
            ("c.html", "<p>c</p>"),
        ]);

        assert_eq!(orphans_of(&dir).await, vec!["b.html"]);
    }

    #[tokio::test]
    async fn test_transitive_mode_follows_chains_from_entry() {
        let dir = site(&[
            ("index.html", r#"<a href="a.html">A</a>"#),
            ("a.html", r#"<a href="deep/page.html">Deeper</a>"#),
            ("deep/page.html", "<p>deep</p>"),
            ("b.html", r#"<a href="c.html">C</a>"#),
            ("c.html", "<p>c</p>"),
        ]);
        let config = AnalyzerConfig {
            mode: ReachabilityMode::Transitive,
            ..AnalyzerConfig::default()
        };

        let report = find_orphans(dir.path(), &config).await;
        assert_eq!(report.orphaned_files, vec!["b.html", "c.html"]);
    }

    #[tokio::test]
    async fn test_repeated_runs_are_identical() {
        let dir = site(&[
            ("index.html", r#"<a href="/x/">X</a><a href='y.html'>Y</a>"#),
            ("x/index.html", "<p>x</p>"),
            ("y.html", "<p>y</p>"),
            ("z.html", "<p>z</p>"),
            ("w/v.html", "<p>v</p>"),
        ]);
        let single_worker = AnalyzerConfig {
            workers: 1,
            ..AnalyzerConfig::default()
        };

        let first = find_orphans(dir.path(), &AnalyzerConfig::default()).await;
        let second = find_orphans(dir.path(), &single_worker).await;

        assert_eq!(first.orphaned_files, vec!["w/v.html", "z.html"]);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_report_serialization_shape() {
        let report = OrphanReport::new(vec!["b.html".to_string()], Path::new("/srv/_site"));
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["orphaned_files"], serde_json::json!(["b.html"]));
        assert_eq!(json["count"], 1);
        assert_eq!(json["site_directory"], "/srv/_site");
    }
}
