//! Content retrieval for help resources.
//!
//! Resources are addressed by posix paths relative to the packages
//! directory. `LayeredSource` lets open editor buffers shadow disk content.

use crate::utils::normalize_resource;
use glob::{MatchOptions, Pattern};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

pub trait FileSource: Sync {
    /// Text of `resource`, or `None` when it cannot be obtained.
    fn get_content(&self, resource: &str) -> Option<String>;

    fn exists(&self, resource: &str) -> bool {
        self.get_content(resource).is_some()
    }

    /// Resources below `prefix` (recursively) whose file name matches
    /// `file_glob`, sorted.
    fn list_resources(&self, prefix: &str, file_glob: &str) -> Vec<String>;
}

/// Resources stored under a directory on disk.
#[derive(Debug, Clone)]
pub struct DiskSource {
    root: PathBuf,
}

impl DiskSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DiskSource { root: root.into() }
    }
}

impl FileSource for DiskSource {
    fn get_content(&self, resource: &str) -> Option<String> {
        let path = self.root.join(normalize_resource(resource));
        match fs::read_to_string(&path) {
            Ok(s) => Some(s),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "resource not readable");
                None
            }
        }
    }

    fn exists(&self, resource: &str) -> bool {
        self.root.join(normalize_resource(resource)).is_file()
    }

    fn list_resources(&self, prefix: &str, file_glob: &str) -> Vec<String> {
        let base = self.root.join(normalize_resource(prefix));
        // Only `file_glob` is a pattern; the directory part is literal.
        let literal = Pattern::escape(base.to_string_lossy().trim_end_matches(['/', '\\']));
        let pattern = format!("{}/**/{}", literal, file_glob);
        let Ok(entries) = glob::glob(&pattern) else {
            tracing::warn!(pattern = %pattern, "bad resource glob");
            return Vec::new();
        };
        let mut out: Vec<String> = entries
            .filter_map(Result::ok)
            .filter(|p| p.is_file())
            .filter_map(|p| {
                let rel = pathdiff::diff_paths(&p, &self.root)?;
                Some(normalize_resource(&rel.to_string_lossy()))
            })
            .collect();
        out.sort();
        out
    }
}

/// In-memory resources, used for open buffers and in tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: BTreeMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, resource: &str, text: impl Into<String>) {
        self.files.insert(normalize_resource(resource), text.into());
    }

    pub fn with(mut self, resource: &str, text: impl Into<String>) -> Self {
        self.insert(resource, text);
        self
    }
}

impl FileSource for MemorySource {
    fn get_content(&self, resource: &str) -> Option<String> {
        self.files.get(&normalize_resource(resource)).cloned()
    }

    fn exists(&self, resource: &str) -> bool {
        self.files.contains_key(&normalize_resource(resource))
    }

    fn list_resources(&self, prefix: &str, file_glob: &str) -> Vec<String> {
        let Ok(pattern) = Pattern::new(file_glob) else {
            return Vec::new();
        };
        let opts = MatchOptions {
            require_literal_separator: true,
            ..MatchOptions::new()
        };
        let prefix = normalize_resource(prefix);
        let dir = if prefix.is_empty() {
            String::new()
        } else {
            format!("{}/", prefix)
        };
        self.files
            .keys()
            .filter(|k| k.starts_with(&dir))
            .filter(|k| {
                let name = k.rsplit('/').next().unwrap_or_default();
                pattern.matches_with(name, opts)
            })
            .cloned()
            .collect()
    }
}

/// Prefers `front` (open buffers) and falls back to `back` (disk).
pub struct LayeredSource<F, B> {
    front: F,
    back: B,
}

impl<F: FileSource, B: FileSource> LayeredSource<F, B> {
    pub fn new(front: F, back: B) -> Self {
        LayeredSource { front, back }
    }
}

impl<F: FileSource, B: FileSource> FileSource for LayeredSource<F, B> {
    fn get_content(&self, resource: &str) -> Option<String> {
        self.front
            .get_content(resource)
            .or_else(|| self.back.get_content(resource))
    }

    fn exists(&self, resource: &str) -> bool {
        self.front.exists(resource) || self.back.exists(resource)
    }

    fn list_resources(&self, prefix: &str, file_glob: &str) -> Vec<String> {
        let mut all = self.front.list_resources(prefix, file_glob);
        all.extend(self.back.list_resources(prefix, file_glob));
        all.sort();
        all.dedup();
        all
    }
}
