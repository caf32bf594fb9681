//! Help index schema and the in-memory `PackageIndex` model.
//!
//! The on-disk form is a `hyperhelp.json` document:
//!
//! ```json
//! {
//!   "package": "Docs",
//!   "description": "Help for Docs",
//!   "doc_root": "help/",
//!   "help_files": {
//!     "index.txt": ["Index file", {"topic": "intro", "caption": "Intro", "aliases": []}]
//!   },
//!   "help_contents": ["index.txt", {"topic": "intro", "children": []}]
//! }
//! ```
//!
//! `PackageIndex` is built once per load and never mutated afterwards; a
//! reload produces a new value.

use crate::error::IndexError;
use crate::utils::{join_resource, normalize_resource};
use serde::Deserialize;
use serde_json::{Map, Value as Json};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

#[derive(Deserialize)]
/// Top-level index document as written by package authors.
struct RawIndex {
    package: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    doc_root: Option<String>,
    #[serde(default)]
    help_files: Map<String, Json>,
    #[serde(default)]
    help_contents: Vec<RawTocEntry>,
}

#[derive(Deserialize)]
/// A topic entry following the title in a `help_files` array.
struct RawTopic {
    topic: String,
    #[serde(default)]
    caption: Option<String>,
    #[serde(default)]
    aliases: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
/// A table of contents entry: a bare topic or a node with children.
enum RawTocEntry {
    Topic(String),
    Node {
        topic: String,
        #[serde(default)]
        caption: Option<String>,
        #[serde(default)]
        children: Vec<RawTocEntry>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A help file declared in the index with its declared title.
pub struct HelpFile {
    pub path: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A topic declared in the index. `file` is not guaranteed to be declared.
pub struct Topic {
    pub topic: String,
    pub file: String,
    pub caption: String,
    pub aliases: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocNode {
    pub topic: String,
    pub file: String,
    pub caption: Option<String>,
    pub children: Vec<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Table of contents stored as an arena. Nodes refer to children by index,
/// so malformed data can contain cycles and walkers must track visits.
pub struct Toc {
    nodes: Vec<TocNode>,
    roots: Vec<usize>,
}

impl Toc {
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    pub fn node(&self, id: usize) -> Option<&TocNode> {
        self.nodes.get(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[derive(Debug, Clone)]
/// Declared structure of one help package.
pub struct PackageIndex {
    pub package: String,
    pub description: String,
    /// Resource path prefix of the documentation files, e.g. `Docs/help`.
    pub doc_root: String,
    /// Resource path of the index file, e.g. `Docs/help/hyperhelp.json`.
    pub index_location: String,
    files: Vec<HelpFile>,
    file_slots: HashMap<String, usize>,
    topics: BTreeMap<String, Topic>,
    aliases: HashMap<String, String>,
    toc: Toc,
}

impl PackageIndex {
    pub fn builder(package: &str, doc_root: &str) -> PackageIndexBuilder {
        PackageIndexBuilder::new(package, doc_root)
    }

    /// Parse an index document located at `index_location` (a resource path).
    ///
    /// `doc_root` is resolved relative to the package folder (the first
    /// component of the location); when absent the directory holding the
    /// index is used.
    pub fn from_json(text: &str, index_location: &str) -> Result<Self, IndexError> {
        let location = normalize_resource(index_location);
        let raw: RawIndex = serde_json::from_str(text).map_err(|source| IndexError::Json {
            path: location.clone(),
            source,
        })?;
        let schema = |reason: String| IndexError::Schema {
            path: location.clone(),
            reason,
        };
        if raw.package.trim().is_empty() {
            return Err(schema("'package' must not be empty".into()));
        }

        let doc_root = match raw.doc_root.as_deref() {
            Some(root) => {
                let pkg_folder = location.split('/').next().unwrap_or_default();
                join_resource(pkg_folder, root)
            }
            None => Path::new(&location)
                .parent()
                .map(|p| p.to_string_lossy().replace('\\', "/"))
                .unwrap_or_default(),
        };

        let mut builder = PackageIndexBuilder::new(&raw.package, &doc_root)
            .description(&raw.description)
            .index_location(&location);

        for (file, entry) in raw.help_files.iter() {
            let items = entry
                .as_array()
                .ok_or_else(|| schema(format!("help_files entry '{}' must be an array", file)))?;
            let title = items
                .first()
                .and_then(Json::as_str)
                .ok_or_else(|| schema(format!("help_files entry '{}' must start with a title", file)))?;
            builder = builder.file(file, title);
            for item in items.iter().skip(1) {
                let t: RawTopic = serde_json::from_value(item.clone())
                    .map_err(|e| schema(format!("bad topic entry in '{}': {}", file, e)))?;
                let caption = t.caption.unwrap_or_else(|| t.topic.clone());
                builder = builder.topic_with(&t.topic, file, &caption, t.aliases);
            }
        }

        // TOC entries name topics; files come from the topic table, which
        // needs the implicit per-file topics in place first.
        let topics = builder.resolved_topics();
        for entry in raw.help_contents.iter() {
            add_toc_entry(&mut builder, &topics, None, entry);
        }

        Ok(builder.build())
    }

    pub fn files(&self) -> impl Iterator<Item = &HelpFile> {
        self.files.iter()
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn has_file(&self, path: &str) -> bool {
        self.file_slots.contains_key(path)
    }

    /// Declared title of `path`, if the file is in the index.
    pub fn title_of(&self, path: &str) -> Option<&str> {
        self.file_slots
            .get(path)
            .map(|&slot| self.files[slot].title.as_str())
    }

    /// Look up a topic by id, falling back to aliases.
    pub fn lookup(&self, topic: &str) -> Option<&Topic> {
        self.topics.get(topic).or_else(|| {
            self.aliases
                .get(topic)
                .and_then(|canonical| self.topics.get(canonical))
        })
    }

    /// Topics the index declares as living in `file`, in id order.
    pub fn topics_for_file<'a>(&'a self, file: &'a str) -> impl Iterator<Item = &'a Topic> + 'a {
        self.topics.values().filter(move |t| t.file == file)
    }

    pub fn toc(&self) -> &Toc {
        &self.toc
    }

    /// Index file path relative to the document root, as shown in reports.
    pub fn index_file(&self) -> String {
        pathdiff::diff_paths(&self.index_location, &self.doc_root)
            .map(|p| p.to_string_lossy().replace('\\', "/"))
            .unwrap_or_else(|| self.index_location.clone())
    }

    /// Resource path of a documentation file of this package.
    pub fn resource_path(&self, file: &str) -> String {
        join_resource(&self.doc_root, file)
    }
}

fn add_toc_entry(
    builder: &mut PackageIndexBuilder,
    topics: &HashMap<String, String>,
    parent: Option<usize>,
    entry: &RawTocEntry,
) {
    let (topic, caption, children) = match entry {
        RawTocEntry::Topic(t) => (t.as_str(), None, &[][..]),
        RawTocEntry::Node {
            topic,
            caption,
            children,
        } => (topic.as_str(), caption.as_ref(), children.as_slice()),
    };
    let attach_to = match topics.get(topic) {
        Some(file) => Some(builder.push_toc(parent, topic, file, caption.cloned())),
        None => {
            tracing::warn!(
                package = %builder.package,
                topic,
                "table of contents references an unknown topic; promoting its children"
            );
            parent
        }
    };
    for child in children {
        add_toc_entry(builder, topics, attach_to, child);
    }
}

/// Incremental constructor for `PackageIndex`, used by the JSON loader and
/// by tests that need hand-built indexes.
pub struct PackageIndexBuilder {
    package: String,
    description: String,
    doc_root: String,
    index_location: Option<String>,
    files: Vec<HelpFile>,
    topics: BTreeMap<String, Topic>,
    toc: Toc,
}

impl PackageIndexBuilder {
    pub fn new(package: &str, doc_root: &str) -> Self {
        PackageIndexBuilder {
            package: package.to_string(),
            description: String::new(),
            doc_root: normalize_resource(doc_root),
            index_location: None,
            files: Vec::new(),
            topics: BTreeMap::new(),
            toc: Toc::default(),
        }
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn index_location(mut self, location: &str) -> Self {
        self.index_location = Some(normalize_resource(location));
        self
    }

    /// Declare a help file. Re-declaring a path replaces its title.
    pub fn file(mut self, path: &str, title: &str) -> Self {
        match self.files.iter_mut().find(|f| f.path == path) {
            Some(existing) => existing.title = title.to_string(),
            None => self.files.push(HelpFile {
                path: path.to_string(),
                title: title.to_string(),
            }),
        }
        self
    }

    pub fn topic(self, topic: &str, file: &str) -> Self {
        self.topic_with(topic, file, topic, Vec::new())
    }

    /// Declare a topic. The first declaration of an id wins.
    pub fn topic_with(mut self, topic: &str, file: &str, caption: &str, aliases: Vec<String>) -> Self {
        if let Some(existing) = self.topics.get(topic) {
            tracing::warn!(
                package = %self.package,
                topic,
                first = %existing.file,
                duplicate = file,
                "topic declared more than once; keeping the first declaration"
            );
            return self;
        }
        self.topics.insert(
            topic.to_string(),
            Topic {
                topic: topic.to_string(),
                file: file.to_string(),
                caption: caption.to_string(),
                aliases,
            },
        );
        self
    }

    /// Append a TOC node under `parent` (or as a root) and return its id.
    pub fn push_toc(&mut self, parent: Option<usize>, topic: &str, file: &str, caption: Option<String>) -> usize {
        let id = self.toc.nodes.len();
        self.toc.nodes.push(TocNode {
            topic: topic.to_string(),
            file: file.to_string(),
            caption,
            children: Vec::new(),
        });
        match parent.and_then(|p| self.toc.nodes.get_mut(p)) {
            Some(node) => node.children.push(id),
            None => self.toc.roots.push(id),
        }
        id
    }

    /// Add an extra parent/child edge between existing TOC nodes.
    pub fn link_toc(&mut self, parent: usize, child: usize) {
        if child < self.toc.nodes.len() {
            if let Some(node) = self.toc.nodes.get_mut(parent) {
                node.children.push(child);
            }
        }
    }

    /// Topic id to file, including the implicit per-file topics.
    fn resolved_topics(&self) -> HashMap<String, String> {
        let mut out: HashMap<String, String> = self
            .topics
            .values()
            .map(|t| (t.topic.clone(), t.file.clone()))
            .collect();
        for f in &self.files {
            out.entry(f.path.clone()).or_insert_with(|| f.path.clone());
        }
        for t in self.topics.values() {
            for alias in &t.aliases {
                out.entry(alias.clone()).or_insert_with(|| t.file.clone());
            }
        }
        out
    }

    pub fn build(mut self) -> PackageIndex {
        for f in &self.files {
            self.topics.entry(f.path.clone()).or_insert_with(|| Topic {
                topic: f.path.clone(),
                file: f.path.clone(),
                caption: f.title.clone(),
                aliases: Vec::new(),
            });
        }
        let mut aliases = HashMap::new();
        for t in self.topics.values() {
            for alias in &t.aliases {
                aliases
                    .entry(alias.clone())
                    .or_insert_with(|| t.topic.clone());
            }
        }
        let file_slots = self
            .files
            .iter()
            .enumerate()
            .map(|(slot, f)| (f.path.clone(), slot))
            .collect();
        let index_location = self
            .index_location
            .unwrap_or_else(|| join_resource(&self.doc_root, "hyperhelp.json"));
        PackageIndex {
            package: self.package,
            description: self.description,
            doc_root: self.doc_root,
            index_location,
            files: self.files,
            file_slots,
            topics: self.topics,
            aliases,
            toc: self.toc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "package": "Docs",
        "description": "Help for Docs",
        "doc_root": "help/",
        "help_files": {
            "index.txt": ["Index file for Docs", {"topic": "index.txt", "caption": "Index file", "aliases": ["index file"]}],
            "other.txt": ["Other things", {"topic": "sec1", "caption": "Section 1"}]
        },
        "help_contents": [
            "index.txt",
            {"topic": "nope", "children": [{"topic": "sec1"}]}
        ]
    }"#;

    #[test]
    fn test_from_json_builds_model() {
        let ix = PackageIndex::from_json(SAMPLE, "Docs/help/hyperhelp.json").unwrap();
        assert_eq!(ix.package, "Docs");
        assert_eq!(ix.doc_root, "Docs/help");
        assert_eq!(ix.index_file(), "hyperhelp.json");
        let files: Vec<_> = ix.files().map(|f| f.path.as_str()).collect();
        assert_eq!(files, vec!["index.txt", "other.txt"]);
        assert_eq!(ix.title_of("other.txt"), Some("Other things"));
        assert_eq!(ix.lookup("sec1").map(|t| t.file.as_str()), Some("other.txt"));
        assert_eq!(ix.lookup("index file").map(|t| t.topic.as_str()), Some("index.txt"));
        // implicit topic for a file that did not declare itself
        assert_eq!(ix.lookup("other.txt").map(|t| t.caption.as_str()), Some("Other things"));
    }

    #[test]
    fn test_unknown_toc_topic_promotes_children() {
        let ix = PackageIndex::from_json(SAMPLE, "Docs/help/hyperhelp.json").unwrap();
        let toc = ix.toc();
        assert_eq!(toc.roots().len(), 2);
        let files: Vec<_> = toc
            .roots()
            .iter()
            .map(|&id| toc.node(id).unwrap().file.as_str())
            .collect();
        assert_eq!(files, vec!["index.txt", "other.txt"]);
    }

    #[test]
    fn test_missing_doc_root_uses_index_directory() {
        let text = r#"{"package": "P", "help_files": {"index.txt": ["Title"]}}"#;
        let ix = PackageIndex::from_json(text, "P/docs/hyperhelp.json").unwrap();
        assert_eq!(ix.doc_root, "P/docs");
        assert_eq!(ix.resource_path("index.txt"), "P/docs/index.txt");
    }

    #[test]
    fn test_schema_errors_are_reported() {
        let text = r#"{"package": "P", "help_files": {"index.txt": [42]}}"#;
        let err = PackageIndex::from_json(text, "P/hyperhelp.json").unwrap_err();
        assert!(matches!(err, IndexError::Schema { .. }));
        let err = PackageIndex::from_json("{", "P/hyperhelp.json").unwrap_err();
        assert!(matches!(err, IndexError::Json { .. }));
    }

    #[test]
    fn test_duplicate_topic_keeps_first() {
        let ix = PackageIndex::builder("P", "P")
            .file("a.txt", "A")
            .file("b.txt", "B")
            .topic("t", "a.txt")
            .topic("t", "b.txt")
            .build();
        assert_eq!(ix.lookup("t").unwrap().file, "a.txt");
    }
}
