//! Documentation generator seam.
//!
//! Rendering API reference pages is the job of an external generator. The
//! docs pipeline only hands it the merged schema and writes whatever files it
//! returns. [`OutlineGenerator`] is the built-in implementation: an index page
//! per module plus the navigation tree, without per-resource pages.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use registrygen_core::PackageSpec;
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

/// Produces documentation artifacts from a package schema.
pub trait DocsGenerator {
    /// Returns generated files keyed by path relative to the docs directory.
    fn generate_package(&self, spec: &PackageSpec) -> Result<BTreeMap<String, Vec<u8>>>;

    /// Returns the navigation tree for the package.
    fn generate_package_tree(&self, spec: &PackageSpec) -> Result<Vec<PackageTreeItem>>;
}

/// Kind of a navigation tree entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Module,
    Resource,
    Function,
}

/// One node of the package navigation tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageTreeItem {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub link: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<PackageTreeItem>,
}

/// Built-in generator producing module index pages and the navigation tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutlineGenerator;

impl DocsGenerator for OutlineGenerator {
    fn generate_package(&self, spec: &PackageSpec) -> Result<BTreeMap<String, Vec<u8>>> {
        require_name(spec)?;
        let outline = Outline::from_spec(spec);
        let mut files = BTreeMap::new();

        let title = if spec.display_name.is_empty() {
            spec.name.as_str()
        } else {
            spec.display_name.as_str()
        };

        let mut index = front_matter(title);
        if !spec.description.is_empty() {
            let _ = writeln!(index, "{}\n", spec.description);
        }
        if !outline.modules.is_empty() {
            index.push_str("## Modules\n\n");
            for module in outline.modules.keys() {
                let _ = writeln!(index, "* [{module}]({module}/)");
            }
            index.push('\n');
        }
        outline.root.write_listing(&mut index, "");
        if !spec.types.is_empty() {
            let _ = writeln!(index, "This package defines {} object types.", spec.types.len());
        }
        files.insert("_index.md".to_string(), index.into_bytes());

        for (module, entries) in &outline.modules {
            let mut page = front_matter(module);
            entries.write_listing(&mut page, "");
            files.insert(format!("{module}/_index.md"), page.into_bytes());
        }

        Ok(files)
    }

    fn generate_package_tree(&self, spec: &PackageSpec) -> Result<Vec<PackageTreeItem>> {
        require_name(spec)?;
        let outline = Outline::from_spec(spec);

        let mut tree: Vec<PackageTreeItem> = outline
            .modules
            .iter()
            .map(|(module, entries)| PackageTreeItem {
                name: module.clone(),
                kind: EntryKind::Module,
                link: format!("{module}/"),
                children: entries.tree_items(&format!("{module}/")),
            })
            .collect();
        tree.extend(outline.root.tree_items(""));
        Ok(tree)
    }
}

fn require_name(spec: &PackageSpec) -> Result<()> {
    if spec.name.is_empty() {
        return Err(PipelineError::Generator("package schema has no name".to_string()));
    }
    Ok(())
}

fn front_matter(title: &str) -> String {
    format!("---\ntitle: {title}\nlayout: api\nno_edit_this_page: true\n---\n\n")
}

#[derive(Default)]
struct ModuleEntries<'a> {
    resources: Vec<&'a str>,
    functions: Vec<&'a str>,
}

impl ModuleEntries<'_> {
    fn write_listing(&self, out: &mut String, prefix: &str) {
        for (heading, names) in [("Resources", &self.resources), ("Functions", &self.functions)] {
            if names.is_empty() {
                continue;
            }
            let _ = writeln!(out, "## {heading}\n");
            for name in names {
                let _ = writeln!(out, "* [{name}]({prefix}{}/)", name.to_lowercase());
            }
            out.push('\n');
        }
    }

    fn tree_items(&self, prefix: &str) -> Vec<PackageTreeItem> {
        let item = |name: &&str, kind| PackageTreeItem {
            name: (*name).to_string(),
            kind,
            link: format!("{prefix}{}/", name.to_lowercase()),
            children: Vec::new(),
        };
        self.resources
            .iter()
            .map(|n| item(n, EntryKind::Resource))
            .chain(self.functions.iter().map(|n| item(n, EntryKind::Function)))
            .collect()
    }
}

/// Resources and functions grouped by module; `index` entries are top-level.
struct Outline<'a> {
    root: ModuleEntries<'a>,
    modules: BTreeMap<String, ModuleEntries<'a>>,
}

impl<'a> Outline<'a> {
    fn from_spec(spec: &'a PackageSpec) -> Self {
        let mut outline = Self {
            root: ModuleEntries::default(),
            modules: BTreeMap::new(),
        };

        for (token, is_resource) in spec
            .resources
            .keys()
            .map(|t| (t, true))
            .chain(spec.functions.keys().map(|t| (t, false)))
        {
            let Some((module, name)) = split_token(token) else {
                continue;
            };
            let entries = if module.is_empty() || module == "index" {
                &mut outline.root
            } else {
                outline.modules.entry(module.to_string()).or_default()
            };
            if is_resource {
                entries.resources.push(name);
            } else {
                entries.functions.push(name);
            }
        }

        for entries in std::iter::once(&mut outline.root).chain(outline.modules.values_mut()) {
            entries.resources.sort_unstable();
            entries.functions.sort_unstable();
        }
        outline
    }
}

/// Splits `pkg:module:Name` into its display module and member name.
///
/// A trailing module segment that repeats the member name in lower camel
/// case (`index/randomId`) is the per-file suffix and is dropped.
fn split_token(token: &str) -> Option<(&str, &str)> {
    let mut parts = token.splitn(3, ':');
    let _package = parts.next()?;
    let module = parts.next()?;
    let name = parts.next()?;

    let module = match module.rsplit_once('/') {
        Some((head, last)) if lower_first(name) == last => head,
        _ => module,
    };
    Some((module, name))
}

fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn spec() -> PackageSpec {
        let mut spec = PackageSpec::new("random");
        spec.description = "A Pulumi package to safely use randomness.".into();
        spec.resources.insert("random:index/randomId:RandomId".into(), json!({}));
        spec.resources.insert("random:index/randomPet:RandomPet".into(), json!({}));
        spec.resources.insert("random:core/v1:Pod".into(), json!({}));
        spec.functions.insert("random:core/v1:getPod".into(), json!({}));
        spec.types.insert("random:index/Keepers:Keepers".into(), json!({}));
        spec
    }

    #[test]
    fn test_split_token() {
        assert_eq!(split_token("random:index/randomId:RandomId"), Some(("index", "RandomId")));
        assert_eq!(split_token("kubernetes:core/v1:Pod"), Some(("core/v1", "Pod")));
        assert_eq!(split_token("kubernetes:yaml:ConfigFile"), Some(("yaml", "ConfigFile")));
        assert_eq!(split_token("broken"), None);
    }

    #[test]
    fn test_package_tree() {
        let tree = OutlineGenerator.generate_package_tree(&spec()).unwrap();
        assert_eq!(tree.len(), 3);

        assert_eq!(tree[0].name, "core/v1");
        assert_eq!(tree[0].kind, EntryKind::Module);
        assert_eq!(tree[0].children.len(), 2);
        assert_eq!(tree[0].children[0].link, "core/v1/pod/");
        assert_eq!(tree[0].children[1].kind, EntryKind::Function);

        assert_eq!(tree[1].name, "RandomId");
        assert_eq!(tree[1].link, "randomid/");
        assert_eq!(tree[2].name, "RandomPet");
    }

    #[test]
    fn test_package_tree_json_shape() {
        let tree = OutlineGenerator.generate_package_tree(&spec()).unwrap();
        let value = serde_json::to_value(&tree).unwrap();
        assert_eq!(value[0]["type"], "module");
        assert!(value[1].get("children").is_none());
    }

    #[test]
    fn test_generate_package_pages() {
        let files = OutlineGenerator.generate_package(&spec()).unwrap();
        assert_eq!(
            files.keys().cloned().collect::<Vec<_>>(),
            vec!["_index.md", "core/v1/_index.md"]
        );

        let index = String::from_utf8(files["_index.md"].clone()).unwrap();
        assert!(index.starts_with("---\ntitle: random\n"));
        assert!(index.contains("* [core/v1](core/v1/)"));
        assert!(index.contains("* [RandomId](randomid/)"));
        assert!(index.contains("1 object types"));

        let module = String::from_utf8(files["core/v1/_index.md"].clone()).unwrap();
        assert!(module.contains("## Functions"));
        assert!(module.contains("* [getPod](getpod/)"));
    }

    #[test]
    fn test_nameless_spec_is_rejected() {
        let err = OutlineGenerator.generate_package(&PackageSpec::default()).unwrap_err();
        assert!(matches!(err, PipelineError::Generator(_)));
    }
}
