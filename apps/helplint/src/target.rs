//! Resolving a requested path to the package and files it lints.

use crate::models::index::PackageIndex;
use crate::store::Catalog;
use crate::utils::normalize_resource;
use std::path::{Component, Path};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    SingleFile,
    WholePackage,
}

impl TargetKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TargetKind::SingleFile => "single",
            TargetKind::WholePackage => "package",
        }
    }
}

#[derive(Debug, Clone)]
pub struct LintTarget {
    pub kind: TargetKind,
    pub index: Arc<PackageIndex>,
    /// Paths relative to the document root, in scan order.
    pub files: Vec<String>,
}

impl LintTarget {
    pub fn whole_package(index: Arc<PackageIndex>) -> Self {
        let files = index.files().map(|f| f.path.clone()).collect();
        LintTarget {
            kind: TargetKind::WholePackage,
            index,
            files,
        }
    }

    pub fn single_file(index: Arc<PackageIndex>, file: &str) -> Self {
        LintTarget {
            kind: TargetKind::SingleFile,
            index,
            files: vec![normalize_resource(file)],
        }
    }
}

/// Express `path` as a resource path under `packages_root`.
///
/// Both paths are compared lexically; `None` when `path` lies outside.
pub fn resource_for_path(path: &Path, packages_root: &Path) -> Option<String> {
    let rel = pathdiff::diff_paths(path, packages_root)?;
    if rel.components().any(|c| matches!(c, Component::ParentDir)) || rel.is_absolute() {
        return None;
    }
    Some(normalize_resource(&rel.to_string_lossy()))
}

/// Pick the lint target for a resource path.
///
/// The package with the longest document root containing the resource
/// wins. The document root itself or the index file selects the whole
/// package; anything else below the root selects that single file.
pub fn resolve_target(resource: &str, catalog: &Catalog) -> Option<LintTarget> {
    let resource = normalize_resource(resource);
    let owner = catalog
        .values()
        .filter(|ix| contains(&ix.doc_root, &resource))
        .max_by_key(|ix| ix.doc_root.len())?;

    if resource == owner.doc_root || resource == owner.index_location {
        return Some(LintTarget::whole_package(owner.clone()));
    }
    let file = if owner.doc_root.is_empty() {
        resource.as_str()
    } else {
        &resource[owner.doc_root.len() + 1..]
    };
    Some(LintTarget::single_file(owner.clone(), file))
}

fn contains(doc_root: &str, resource: &str) -> bool {
    doc_root.is_empty()
        || resource == doc_root
        || resource
            .strip_prefix(doc_root)
            .is_some_and(|rest| rest.starts_with('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    fn catalog() -> Catalog {
        let docs = PackageIndex::builder("Docs", "Docs/help")
            .index_location("Docs/help/hyperhelp.json")
            .file("index.txt", "Index")
            .file("other.txt", "Other")
            .build();
        let nested = PackageIndex::builder("Nested", "Docs/help/nested")
            .file("index.txt", "Nested")
            .build();
        let mut map = BTreeMap::new();
        map.insert(docs.package.clone(), Arc::new(docs));
        map.insert(nested.package.clone(), Arc::new(nested));
        Arc::new(map)
    }

    #[test]
    fn test_doc_root_and_index_select_package() {
        let cat = catalog();
        let t = resolve_target("Docs/help", &cat).unwrap();
        assert_eq!(t.kind, TargetKind::WholePackage);
        assert_eq!(t.files, vec!["index.txt", "other.txt"]);
        let t = resolve_target("Docs/help/hyperhelp.json", &cat).unwrap();
        assert_eq!(t.kind, TargetKind::WholePackage);
        assert_eq!(t.index.package, "Docs");
    }

    #[test]
    fn test_file_selects_single_target_in_deepest_root() {
        let cat = catalog();
        let t = resolve_target("Docs/help/other.txt", &cat).unwrap();
        assert_eq!(t.kind, TargetKind::SingleFile);
        assert_eq!(t.files, vec!["other.txt"]);
        let t = resolve_target("Docs/help/nested/index.txt", &cat).unwrap();
        assert_eq!(t.index.package, "Nested");
        assert_eq!(t.files, vec!["index.txt"]);
    }

    #[test]
    fn test_outside_any_root_is_none() {
        let cat = catalog();
        assert!(resolve_target("Docs/helper/index.txt", &cat).is_none());
        assert!(resolve_target("Elsewhere/a.txt", &cat).is_none());
    }

    #[test]
    fn test_resource_for_path() {
        let root = PathBuf::from("/pkgs");
        assert_eq!(
            resource_for_path(Path::new("/pkgs/Docs/help/a.txt"), &root).as_deref(),
            Some("Docs/help/a.txt")
        );
        assert_eq!(resource_for_path(Path::new("/other/a.txt"), &root), None);
    }
}
