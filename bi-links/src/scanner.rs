//! HTML file discovery

use crate::error::{LinkError, LinkResult};
use bi_common::config::validate_directory;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

const HTML_EXTENSION: &str = "html";

/// Recursive `*.html` finder
pub struct HtmlScanner {
    ignore_patterns: Vec<String>,
}

impl HtmlScanner {
    /// Create a scanner that skips `.git` and `node_modules`
    pub fn new() -> Self {
        Self {
            ignore_patterns: vec![".git".to_string(), "node_modules".to_string()],
        }
    }

    /// Relative `/`-separated paths of every HTML file under `root`, sorted
    pub fn scan(&self, root: &Path) -> LinkResult<Vec<String>> {
        validate_directory(root).map_err(|e| LinkError::Scan {
            path: root.to_path_buf(),
            source: e,
        })?;

        let walker = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| self.should_process_entry(e));

        let mut files = Vec::new();
        for entry in walker {
            match entry {
                Ok(entry) => {
                    if entry.file_type().is_file() && is_html(entry.path()) {
                        if let Ok(relative) = entry.path().strip_prefix(root) {
                            files.push(to_slash_path(relative));
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!("Error accessing entry: {}", e);
                }
            }
        }

        files.sort();
        tracing::debug!("Found {} HTML files under {}", files.len(), root.display());
        Ok(files)
    }

    fn should_process_entry(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 {
            return true;
        }
        let file_name = entry.file_name().to_string_lossy();
        !self.ignore_patterns.iter().any(|p| file_name == p.as_str())
    }
}

impl Default for HtmlScanner {
    fn default() -> Self {
        Self::new()
    }
}

fn is_html(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext == HTML_EXTENSION)
        .unwrap_or(false)
}

fn to_slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
