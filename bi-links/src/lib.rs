//! bi-links library
//!
//! Generates a manifest of GitHub Pages links for every HTML file in a
//! repository, keeping the descriptions already written in it.

pub mod error;
pub mod manifest;
pub mod remote;
pub mod scanner;

pub use error::{LinkError, LinkResult};
pub use manifest::{
    build_entries, load_descriptions, page_url, pages_base_url, parse_descriptions,
    render_manifest, update_manifest, ManifestEntry, ManifestSummary,
};
pub use remote::{parse_remote_url, read_origin_url, repo_identity, RepoIdentity};
pub use scanner::HtmlScanner;

use std::path::Path;
use tracing::info;

/// Scan `root` and rewrite its manifest for a known repository identity
pub fn generate_manifest(
    root: &Path,
    manifest_name: &str,
    identity: &RepoIdentity,
) -> LinkResult<ManifestSummary> {
    let files = HtmlScanner::new().scan(root)?;
    if files.is_empty() {
        return Err(LinkError::NoHtmlFiles(root.to_path_buf()));
    }
    info!("Found {} HTML files in {}", files.len(), identity);

    update_manifest(&root.join(manifest_name), identity, &files)
}
