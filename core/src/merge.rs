//! Additive overlay merging.
//!
//! A hand-authored overlay schema can contribute types, resources, and
//! language module mappings that the generated schema lacks.
//! [`merge_overlay`] copies those entries into a new spec. The main schema
//! wins every key collision, so merging the same overlay twice is the same as
//! merging it once.
//!
//! # Example
//!
//! ```
//! use registrygen_core::*;
//! use serde_json::json;
//!
//! let mut main = PackageSpec::new("foo");
//! main.types.insert("a".into(), json!(1));
//!
//! let mut overlay = PackageSpec::new("foo");
//! overlay.types.insert("a".into(), json!(2));
//! overlay.types.insert("b".into(), json!(3));
//!
//! let merged = merge_overlay(&main, &overlay).unwrap();
//! assert_eq!(merged.types["a"], json!(1));
//! assert_eq!(merged.types["b"], json!(3));
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::language::{CSharpPackageInfo, GoPackageInfo, LanguageInfo, NodePackageInfo};
use crate::PackageSpec;

/// Which input of a merge a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaSide {
    Main,
    Overlay,
}

impl fmt::Display for SchemaSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Main => f.write_str("main"),
            Self::Overlay => f.write_str("overlay"),
        }
    }
}

/// Overlay merge failures.
#[derive(Debug, Error)]
pub enum MergeError {
    /// A language blob could not be decoded into (or encoded from) its typed
    /// configuration.
    #[error("malformed {language} package info in the {side} schema spec: {source}")]
    MalformedLanguageInfo {
        language: &'static str,
        side: SchemaSide,
        #[source]
        source: serde_json::Error,
    },
}

/// Merges `overlay` into a copy of `main`.
///
/// Types and resources missing from `main` are copied in. For `go`,
/// `nodejs`, and `csharp` language entries, only the module mapping is
/// merged; the result replaces main's entry. Other languages in the overlay
/// are ignored.
///
/// # Errors
///
/// Returns [`MergeError::MalformedLanguageInfo`] if either side's language
/// blob does not decode into the typed configuration.
pub fn merge_overlay(main: &PackageSpec, overlay: &PackageSpec) -> Result<PackageSpec, MergeError> {
    let mut merged = main.clone();

    let types_added = merge_missing(&mut merged.types, &overlay.types);
    let resources_added = merge_missing(&mut merged.resources, &overlay.resources);
    debug!(
        package = %main.name,
        types_added,
        resources_added,
        "merged overlay types and resources"
    );

    for (language, overlay_info) in &overlay.language {
        let main_info = main.language.get(language);
        let encoded = match language.as_str() {
            "go" => merge_language::<GoPackageInfo>(main_info, overlay_info)?,
            "nodejs" => merge_language::<NodePackageInfo>(main_info, overlay_info)?,
            "csharp" => merge_language::<CSharpPackageInfo>(main_info, overlay_info)?,
            other => {
                debug!(language = other, "skipping overlay language info");
                continue;
            }
        };
        merged.language.insert(language.clone(), encoded);
    }

    Ok(merged)
}

/// Inserts every entry of `source` whose key is absent from `target`.
/// Returns the number of entries added.
fn merge_missing<V: Clone>(target: &mut BTreeMap<String, V>, source: &BTreeMap<String, V>) -> usize {
    let mut added = 0;
    for (key, value) in source {
        if target.contains_key(key) {
            continue;
        }
        target.insert(key.clone(), value.clone());
        added += 1;
    }
    added
}

fn merge_language<T: LanguageInfo>(main: Option<&Value>, overlay: &Value) -> Result<Value, MergeError> {
    let mut main_info = match main {
        Some(raw) => decode::<T>(raw, SchemaSide::Main)?,
        None => T::default(),
    };
    let overlay_info = decode::<T>(overlay, SchemaSide::Overlay)?;

    let added = merge_missing(main_info.module_map_mut(), overlay_info.module_map());
    debug!(language = T::LANGUAGE, added, "merged overlay module mapping");

    serde_json::to_value(&main_info).map_err(|source| MergeError::MalformedLanguageInfo {
        language: T::LANGUAGE,
        side: SchemaSide::Main,
        source,
    })
}

fn decode<T: LanguageInfo>(raw: &Value, side: SchemaSide) -> Result<T, MergeError> {
    T::deserialize(raw).map_err(|source| MergeError::MalformedLanguageInfo {
        language: T::LANGUAGE,
        side,
        source,
    })
}
