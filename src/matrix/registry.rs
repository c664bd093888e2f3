//! Registry of product definitions keyed by product key

use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use tracing::debug;

use crate::config::LATEST_VERSION;
use crate::matrix::comparator::{SemverComparator, VersionComparator};
use crate::matrix::definition::{Declarations, ProductDefinition};
use crate::matrix::error::MatrixError;
use crate::matrix::property::{PropertyName, Value};

/// Product definitions in registration order
pub struct ProductRegistry {
    entries: IndexMap<String, ProductDefinition>,
    comparator: Arc<dyn VersionComparator>,
}

impl Default for ProductRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductRegistry {
    pub fn new() -> Self {
        Self::with_comparator(Arc::new(SemverComparator))
    }

    pub fn with_comparator(comparator: Arc<dyn VersionComparator>) -> Self {
        Self {
            entries: IndexMap::new(),
            comparator,
        }
    }

    /// Define a product and store it under `key`
    ///
    /// Replaces an existing product with the same key; the key keeps its
    /// original position in [`ProductRegistry::keys`].
    pub fn register(
        &mut self,
        key: impl Into<String>,
        declarations: Declarations,
    ) -> Result<(), MatrixError> {
        let definition = ProductDefinition::new(key, declarations)?;
        self.insert(definition);
        Ok(())
    }

    /// Store an already built definition under its own key
    pub fn insert(&mut self, definition: ProductDefinition) {
        let key = definition.key().to_string();
        if self.entries.insert(key.clone(), definition).is_some() {
            debug!("Replaced product '{}'", key);
        } else {
            debug!("Registered product '{}'", key);
        }
    }

    /// Registered product keys in registration order
    pub fn keys(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&ProductDefinition> {
        self.entries.get(key)
    }

    /// Bind a version onto a product
    ///
    /// `"latest"` (any case) is bound as [`LATEST_VERSION`]. The version is not
    /// parsed here; a malformed version fails on the first computed read.
    ///
    /// # Returns
    /// * `Ok(ProductView)` - The product bound to the normalized version
    /// * `Err(MatrixError::NotFound)` - If no product is registered under `key`
    pub fn lookup(&self, key: &str, version: &str) -> Result<ProductView<'_>, MatrixError> {
        let definition = self
            .entries
            .get(key)
            .ok_or_else(|| MatrixError::NotFound(key.to_string()))?;
        let version = normalize_version(version);
        debug!("Looked up product '{}' at version {}", key, version);

        Ok(ProductView {
            definition,
            version,
            comparator: self.comparator.as_ref(),
        })
    }

    /// Bind the latest version onto a product
    pub fn lookup_latest(&self, key: &str) -> Result<ProductView<'_>, MatrixError> {
        self.lookup(key, LATEST_VERSION)
    }

    /// Products that have a public download page
    ///
    /// The download page is evaluated at [`LATEST_VERSION`].
    pub fn available_on_downloads_site(
        &self,
    ) -> Result<IndexMap<&str, &ProductDefinition>, MatrixError> {
        let mut available = IndexMap::new();
        for (key, definition) in &self.entries {
            let page = definition.resolve(
                PropertyName::DownloadsProductPageUrl,
                LATEST_VERSION,
                self.comparator.as_ref(),
            )?;
            if page != Some(Value::NotAvailable) {
                available.insert(key.as_str(), definition);
            }
        }
        Ok(available)
    }
}

impl std::fmt::Debug for ProductRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductRegistry")
            .field("keys", &self.keys())
            .finish()
    }
}

/// Map the symbolic "latest" version onto the sentinel version
pub fn normalize_version(version: &str) -> String {
    if version.trim().eq_ignore_ascii_case("latest") {
        LATEST_VERSION.to_string()
    } else {
        version.to_string()
    }
}

/// A product definition bound to a version
///
/// Views borrow the registry and never mutate the stored definition, so any
/// number of views for different versions of the same product can coexist.
#[derive(Clone)]
pub struct ProductView<'a> {
    definition: &'a ProductDefinition,
    version: String,
    comparator: &'a dyn VersionComparator,
}

impl<'a> ProductView<'a> {
    pub fn key(&self) -> &'a str {
        self.definition.key()
    }

    /// Normalized bound version
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Resolve a property at the bound version
    pub fn get(&self, name: PropertyName) -> Result<Option<Value>, MatrixError> {
        self.definition.resolve(name, &self.version, self.comparator)
    }

    /// All properties at the bound version, in declaration order
    pub fn properties(&self) -> Result<Vec<(PropertyName, Option<Value>)>, MatrixError> {
        PropertyName::ALL
            .into_iter()
            .map(|name| Ok((name, self.get(name)?)))
            .collect()
    }

    pub fn known_omnibus_project_names(&self) -> Result<IndexSet<String>, MatrixError> {
        self.definition.known_omnibus_project_names(self.comparator)
    }
}

impl std::fmt::Debug for ProductView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductView")
            .field("key", &self.definition.key())
            .field("version", &self.version)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::comparator::MockVersionComparator;
    use rstest::rstest;
    use semver::Version;

    fn registry() -> ProductRegistry {
        let mut registry = ProductRegistry::new();
        registry
            .register(
                "widget",
                Declarations::new()
                    .constant(PropertyName::ProductName, "Widget")
                    .computed(PropertyName::PackageName, |version| {
                        let name = if *version < Version::new(2, 0, 0) {
                            "old-name"
                        } else {
                            "new-name"
                        };
                        Some(Value::from(name))
                    }),
            )
            .unwrap();
        registry
            .register(
                "gadget",
                Declarations::new()
                    .constant(PropertyName::PackageName, "gadget")
                    .not_available(PropertyName::DownloadsProductPageUrl),
            )
            .unwrap();
        registry
            .register(
                "gizmo",
                Declarations::new().constant(
                    PropertyName::DownloadsProductPageUrl,
                    "https://example.com/gizmo",
                ),
            )
            .unwrap();
        registry
    }

    #[test]
    fn keys_are_in_registration_order() {
        assert_eq!(registry().keys(), vec!["widget", "gadget", "gizmo"]);
    }

    #[test]
    fn register_replaces_existing_product_in_place() {
        let mut registry = registry();
        registry
            .register(
                "widget",
                Declarations::new().constant(PropertyName::PackageName, "widget-ng"),
            )
            .unwrap();

        assert_eq!(registry.keys(), vec!["widget", "gadget", "gizmo"]);
        let view = registry.lookup("widget", "1.0.0").unwrap();
        assert_eq!(
            view.get(PropertyName::PackageName).unwrap(),
            Some(Value::from("widget-ng"))
        );
        assert_eq!(view.get(PropertyName::ProductName).unwrap(), None);
        assert_eq!(registry.get("widget").map(ProductDefinition::key), Some("widget"));
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn registry_debug_lists_keys_in_order() {
        assert_eq!(
            format!("{:?}", registry()),
            r#"ProductRegistry { keys: ["widget", "gadget", "gizmo"] }"#
        );
    }

    #[test]
    fn register_with_conflicting_declarations_leaves_registry_untouched() {
        let mut registry = registry();
        let result = registry.register(
            "widget",
            Declarations::new()
                .constant(PropertyName::CtlCommand, "widget-ctl")
                .computed(PropertyName::CtlCommand, |_| None),
        );

        assert!(matches!(result, Err(MatrixError::Configuration { .. })));
        let view = registry.lookup("widget", "1.0.0").unwrap();
        assert_eq!(
            view.get(PropertyName::ProductName).unwrap(),
            Some(Value::from("Widget"))
        );
    }

    #[test]
    fn lookup_unknown_product_fails_with_not_found() {
        let err = registry().lookup("nonexistent", "1.0.0").unwrap_err();
        assert!(matches!(err, MatrixError::NotFound(key) if key == "nonexistent"));
    }

    #[rstest]
    #[case("1.9.0", "old-name")]
    #[case("2.0.0", "new-name")]
    #[case("latest", "new-name")]
    #[case("LATEST", "new-name")]
    fn lookup_binds_version_for_computed_properties(
        #[case] version: &str,
        #[case] expected: &str,
    ) {
        let registry = registry();
        let view = registry.lookup("widget", version).unwrap();

        assert_eq!(
            view.get(PropertyName::PackageName).unwrap(),
            Some(Value::from(expected))
        );
    }

    #[test]
    fn lookup_latest_binds_sentinel_version() {
        let registry = registry();
        let latest = registry.lookup("widget", "latest").unwrap();
        let sentinel = registry.lookup("widget", "1000.1000.1000").unwrap();

        assert_eq!(latest.version(), sentinel.version());
        assert_eq!(latest.version(), LATEST_VERSION);
        assert_eq!(
            latest.properties().unwrap(),
            sentinel.properties().unwrap()
        );
        assert_eq!(
            registry.lookup_latest("widget").unwrap().version(),
            LATEST_VERSION
        );
    }

    #[test]
    fn views_for_different_versions_do_not_interfere() {
        let registry = registry();
        let old = registry.lookup("widget", "1.0.0").unwrap();
        let new = registry.lookup("widget", "2.1.0").unwrap();

        assert_eq!(
            old.get(PropertyName::InstallPath).unwrap(),
            Some(Value::from("/opt/old-name"))
        );
        assert_eq!(
            new.get(PropertyName::InstallPath).unwrap(),
            Some(Value::from("/opt/new-name"))
        );
        assert_eq!(old.version(), "1.0.0");
    }

    #[test]
    fn malformed_version_fails_only_on_computed_read() {
        let registry = registry();
        let view = registry.lookup("widget", "not.a.version").unwrap();

        assert_eq!(
            view.get(PropertyName::ProductName).unwrap(),
            Some(Value::from("Widget"))
        );
        assert!(matches!(
            view.get(PropertyName::PackageName),
            Err(MatrixError::MalformedVersion { .. })
        ));
    }

    #[test]
    fn lookup_does_not_parse_version() {
        let mut comparator = MockVersionComparator::new();
        comparator.expect_parse().never();
        let mut registry = ProductRegistry::with_comparator(Arc::new(comparator));
        registry
            .register(
                "widget",
                Declarations::new().computed(PropertyName::PackageName, |_| None),
            )
            .unwrap();

        let view = registry.lookup("widget", "1.0.0").unwrap();
        assert_eq!(view.key(), "widget");
    }

    #[test]
    fn available_on_downloads_site_excludes_not_available_products() {
        let registry = registry();
        let available = registry.available_on_downloads_site().unwrap();

        assert_eq!(
            available.keys().copied().collect::<Vec<_>>(),
            vec!["widget", "gizmo"]
        );
    }

    #[test]
    fn available_on_downloads_site_honors_computed_pages() {
        let mut registry = ProductRegistry::new();
        registry
            .register(
                "retired",
                Declarations::new().computed(PropertyName::DownloadsProductPageUrl, |version| {
                    (*version < Version::new(5, 0, 0))
                        .then(|| Value::from("https://downloads.chef.io/retired"))
                        .or(Some(Value::NotAvailable))
                }),
            )
            .unwrap();

        assert!(registry.available_on_downloads_site().unwrap().is_empty());
    }

    #[rstest]
    #[case("latest", "1000.1000.1000")]
    #[case(" Latest ", "1000.1000.1000")]
    #[case("1.2.3", "1.2.3")]
    #[case("latest-ish", "latest-ish")]
    fn normalize_version_returns_expected(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_version(input), expected);
    }

    #[test]
    fn view_known_omnibus_project_names_uses_registry_comparator() {
        let registry = registry();
        let names = registry
            .lookup("widget", "1.0.0")
            .unwrap()
            .known_omnibus_project_names()
            .unwrap();

        assert_eq!(
            names.into_iter().collect::<Vec<_>>(),
            vec!["old-name", "new-name"]
        );
    }
}
