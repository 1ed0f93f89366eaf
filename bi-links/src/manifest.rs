//! GitHub Pages link manifest
//!
//! The manifest lists every HTML file with its Pages URL and a description.
//! Descriptions are authored by hand in the manifest itself, so a rewrite
//! reads them back first and keeps them for every file name still present.

use crate::error::{LinkError, LinkResult};
use crate::remote::RepoIdentity;
use bi_common::fs_utils::write_atomic;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{info, warn};

/// Everything except ASCII alphanumerics, `_ . - ~` and `/`
const PATH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~')
    .remove(b'/');

const TITLE: &str = "# GitHub Pages Links for HTML Files";
const DESCRIPTION_SEPARATOR: &str = " - ";

/// `https://<owner>.github.io/<repo>/`
pub fn pages_base_url(identity: &RepoIdentity) -> String {
    format!("https://{}.github.io/{}/", identity.owner, identity.repo)
}

/// Pages URL for a relative HTML path
pub fn page_url(identity: &RepoIdentity, relative_path: &str) -> String {
    format!(
        "{}{}",
        pages_base_url(identity),
        utf8_percent_encode(relative_path, PATH_ENCODE_SET)
    )
}

/// Last `/` segment of a path or URL
fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn placeholder_description(file_name: &str) -> String {
    format!("[Add description for {}]", file_name)
}

/// Descriptions keyed by decoded file name
///
/// Only lines of the form `<http url> - <description>` count.
pub fn parse_descriptions(text: &str) -> HashMap<String, String> {
    let mut descriptions = HashMap::new();

    for line in text.lines().map(str::trim) {
        if !line.starts_with("http") {
            continue;
        }
        let Some((url, description)) = line.split_once(DESCRIPTION_SEPARATOR) else {
            continue;
        };
        let url = url.trim();
        if !url.contains('/') {
            continue;
        }

        let decoded = percent_decode_str(url).decode_utf8_lossy();
        descriptions.insert(
            file_name(&decoded).to_string(),
            description.trim().to_string(),
        );
    }

    descriptions
}

/// Descriptions from an existing manifest
///
/// A missing manifest yields none; an unreadable one is logged and yields none.
pub fn load_descriptions(path: &Path) -> HashMap<String, String> {
    match fs::read_to_string(path) {
        Ok(text) => parse_descriptions(&text),
        Err(e) if e.kind() == io::ErrorKind::NotFound => HashMap::new(),
        Err(e) => {
            warn!("Could not read existing {}: {}", path.display(), e);
            HashMap::new()
        }
    }
}

/// One manifest entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub path: String,
    pub url: String,
    pub description: String,
}

/// Entries for `files`, keeping known descriptions
pub fn build_entries(
    identity: &RepoIdentity,
    files: &[String],
    descriptions: &HashMap<String, String>,
) -> Vec<ManifestEntry> {
    files
        .iter()
        .map(|path| {
            let name = file_name(path);
            ManifestEntry {
                path: path.clone(),
                url: page_url(identity, path),
                description: descriptions
                    .get(name)
                    .cloned()
                    .unwrap_or_else(|| placeholder_description(name)),
            }
        })
        .collect()
}

/// Render the manifest text
pub fn render_manifest(identity: &RepoIdentity, entries: &[ManifestEntry]) -> String {
    let rule_heavy = "=".repeat(50);
    let rule_light = "-".repeat(50);

    let mut lines = vec![
        TITLE.to_string(),
        rule_heavy,
        String::new(),
        format!("Repository: {}", identity),
        format!("Base URL: {}", pages_base_url(identity)),
        String::new(),
        "HTML Files:".to_string(),
        rule_light,
        String::new(),
    ];

    for (i, entry) in entries.iter().enumerate() {
        lines.push(format!("{}. {}", i + 1, entry.path));
        lines.push(format!(
            "   {}{}{}",
            entry.url, DESCRIPTION_SEPARATOR, entry.description
        ));
        lines.push(String::new());
    }

    lines.join("\n")
}

/// Outcome of a manifest update
#[derive(Debug, Clone)]
pub struct ManifestSummary {
    pub entries: Vec<ManifestEntry>,
    /// Entries that kept an authored description
    pub preserved: usize,
}

/// Rewrite the manifest at `manifest_path` for `files`
///
/// Fails with [`LinkError::NoHtmlFiles`] before touching the manifest when
/// `files` is empty.
pub fn update_manifest(
    manifest_path: &Path,
    identity: &RepoIdentity,
    files: &[String],
) -> LinkResult<ManifestSummary> {
    if files.is_empty() {
        let root = manifest_path.parent().unwrap_or(manifest_path);
        return Err(LinkError::NoHtmlFiles(root.to_path_buf()));
    }

    let descriptions = load_descriptions(manifest_path);
    let entries = build_entries(identity, files, &descriptions);
    let preserved = files
        .iter()
        .filter(|path| descriptions.contains_key(file_name(path)))
        .count();

    let text = render_manifest(identity, &entries);
    write_atomic(manifest_path, text.as_bytes()).map_err(|e| LinkError::Write {
        path: manifest_path.to_path_buf(),
        source: e,
    })?;

    info!(
        "Wrote {} links to {} ({} descriptions kept)",
        entries.len(),
        manifest_path.display(),
        preserved
    );
    Ok(ManifestSummary { entries, preserved })
}
