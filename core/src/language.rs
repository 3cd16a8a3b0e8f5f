//! Typed views over per-language binding configuration.
//!
//! A schema's `language` map holds opaque blobs. Overlay merging only needs
//! the module mapping of three languages, so each view names that mapping
//! and keeps every other field in a flattened map.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A language configuration with a mergeable module mapping.
pub trait LanguageInfo: Serialize + DeserializeOwned + Default {
    /// Key of this language in a schema's `language` map.
    const LANGUAGE: &'static str;

    /// The module → package (or namespace) mapping.
    fn module_map(&self) -> &BTreeMap<String, String>;

    fn module_map_mut(&mut self) -> &mut BTreeMap<String, String>;
}

/// Go binding configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GoPackageInfo {
    #[serde(
        rename = "moduleToPackage",
        default,
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub module_to_package: BTreeMap<String, String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LanguageInfo for GoPackageInfo {
    const LANGUAGE: &'static str = "go";

    fn module_map(&self) -> &BTreeMap<String, String> {
        &self.module_to_package
    }

    fn module_map_mut(&mut self) -> &mut BTreeMap<String, String> {
        &mut self.module_to_package
    }
}

/// Node.js binding configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodePackageInfo {
    #[serde(
        rename = "moduleToPackage",
        default,
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub module_to_package: BTreeMap<String, String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LanguageInfo for NodePackageInfo {
    const LANGUAGE: &'static str = "nodejs";

    fn module_map(&self) -> &BTreeMap<String, String> {
        &self.module_to_package
    }

    fn module_map_mut(&mut self) -> &mut BTreeMap<String, String> {
        &mut self.module_to_package
    }
}

/// C# binding configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CSharpPackageInfo {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub namespaces: BTreeMap<String, String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LanguageInfo for CSharpPackageInfo {
    const LANGUAGE: &'static str = "csharp";

    fn module_map(&self) -> &BTreeMap<String, String> {
        &self.namespaces
    }

    fn module_map_mut(&mut self) -> &mut BTreeMap<String, String> {
        &mut self.namespaces
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_go_info_keeps_other_fields() {
        let raw = json!({
            "importBasePath": "github.com/pulumi/pulumi-foo/sdk/go/foo",
            "moduleToPackage": { "index": "foo" }
        });
        let info: GoPackageInfo = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(info.module_map().get("index").map(String::as_str), Some("foo"));
        assert_eq!(serde_json::to_value(&info).unwrap(), raw);
    }

    #[test]
    fn test_csharp_info_uses_namespaces() {
        let info: CSharpPackageInfo =
            serde_json::from_value(json!({ "namespaces": { "foo": "Foo" } })).unwrap();
        assert_eq!(info.module_map().len(), 1);
    }
}
