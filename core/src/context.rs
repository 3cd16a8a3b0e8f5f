use crate::{
    Classification, ClassifyError, ClassifyOptions, MergeError, PackageSpec, classify,
    merge_overlay,
};

/// The schema being processed for one package, with its caller-assigned
/// version.
///
/// Each pipeline run builds one context and passes it by reference to the
/// classifier or merger, so several packages can be processed in the same
/// process without sharing state.
///
/// # Examples
///
/// ```
/// use registrygen_core::{PackageContext, PackageSpec};
///
/// let mut spec = PackageSpec::new("foo");
/// spec.version = "9.9.9".into();
///
/// let ctx = PackageContext::new(spec, "v1.0.0");
/// assert_eq!(ctx.version(), "v1.0.0");
/// assert_eq!(ctx.name(), "foo");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PackageContext {
    spec: PackageSpec,
}

impl PackageContext {
    /// Wraps `spec`, overwriting whatever version the document carried.
    pub fn new(mut spec: PackageSpec, version: impl Into<String>) -> Self {
        spec.version = version.into();
        Self { spec }
    }

    pub fn spec(&self) -> &PackageSpec {
        &self.spec
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn version(&self) -> &str {
        &self.spec.version
    }

    /// Returns a new context whose spec has `overlay` merged in.
    ///
    /// # Errors
    ///
    /// Propagates [`MergeError`] from [`merge_overlay`].
    pub fn apply_overlay(&self, overlay: &PackageSpec) -> Result<Self, MergeError> {
        let spec = merge_overlay(&self.spec, overlay)?;
        Ok(Self { spec })
    }

    /// Classifies the package into a registry metadata record.
    ///
    /// # Errors
    ///
    /// Propagates [`ClassifyError`] from [`classify`].
    pub fn classify(&self, options: &ClassifyOptions) -> Result<Classification, ClassifyError> {
        classify(&self.spec, options)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_apply_overlay_returns_new_context() {
        let mut main = PackageSpec::new("foo").with_repository("r");
        main.resources.insert("foo:index:A".into(), json!({}));
        let ctx = PackageContext::new(main, "1.0.0");

        let mut overlay = PackageSpec::new("foo");
        overlay.resources.insert("foo:index:B".into(), json!({}));

        let merged = ctx.apply_overlay(&overlay).unwrap();
        assert_eq!(ctx.spec().resources.len(), 1);
        assert_eq!(merged.spec().resources.len(), 2);
        assert_eq!(merged.version(), "1.0.0");
    }

    #[test]
    fn test_classify_uses_context_version() {
        let ctx = PackageContext::new(PackageSpec::new("foo").with_repository("r"), "v0.1.0");
        let result = ctx
            .classify(&ClassifyOptions::new("schema.json", Utc::now()))
            .unwrap();
        assert_eq!(result.meta.version, "v0.1.0");
    }
}
