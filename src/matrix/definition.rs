//! Product definition and default property derivation

use std::collections::HashMap;

use indexmap::IndexSet;
use semver::Version;
use tracing::debug;

use crate::config::{
    DOWNLOADS_BASE_URL, GITHUB_ORG, INSTALL_ROOT, LATEST_VERSION, MINIMUM_VERSION,
};
use crate::matrix::comparator::VersionComparator;
use crate::matrix::error::MatrixError;
use crate::matrix::property::{PropertyName, PropertyValue, Resolver, Value, VersionRule};

/// Declaration slot for one property; both halves set is a configuration error
#[derive(Debug, Clone, Default)]
struct Declared {
    constant: Option<Value>,
    computed: Option<Resolver>,
}

/// Property declarations for a single product
///
/// ```
/// use product_matrix::matrix::{Declarations, PropertyName, Value};
///
/// let declarations = Declarations::new()
///     .constant(PropertyName::ProductName, "Chef Infra Client")
///     .computed(PropertyName::PackageName, |version| {
///         Some(Value::from(if version.major < 2 { "old-name" } else { "new-name" }))
///     });
/// ```
#[derive(Debug, Clone, Default)]
pub struct Declarations {
    declared: HashMap<PropertyName, Declared>,
}

impl Declarations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a constant value
    pub fn constant(mut self, name: PropertyName, value: impl Into<Value>) -> Self {
        self.declared.entry(name).or_default().constant = Some(value.into());
        self
    }

    /// Declare that the product has no value for this property
    pub fn not_available(self, name: PropertyName) -> Self {
        self.constant(name, Value::NotAvailable)
    }

    /// Declare a value computed from the bound version
    pub fn computed<F>(self, name: PropertyName, func: F) -> Self
    where
        F: Fn(&Version) -> Option<Value> + Send + Sync + 'static,
    {
        self.resolver(name, Resolver::from_fn(func))
    }

    /// Declare a value that changes at known versions
    pub fn rule(self, name: PropertyName, rule: VersionRule) -> Self {
        self.resolver(name, Resolver::Rule(rule))
    }

    pub fn resolver(mut self, name: PropertyName, resolver: Resolver) -> Self {
        self.declared.entry(name).or_default().computed = Some(resolver);
        self
    }
}

/// Metadata of one product, with properties that may depend on its version
#[derive(Debug, Clone)]
pub struct ProductDefinition {
    key: String,
    properties: HashMap<PropertyName, PropertyValue>,
}

impl ProductDefinition {
    /// Build a definition from declarations
    ///
    /// Fails with [`MatrixError::Configuration`] when a property is declared
    /// both as a constant and as a computed value.
    pub fn new(key: impl Into<String>, declarations: Declarations) -> Result<Self, MatrixError> {
        let key = key.into();

        let mut conflicting: Vec<PropertyName> = declarations
            .declared
            .iter()
            .filter(|(_, declared)| declared.constant.is_some() && declared.computed.is_some())
            .map(|(name, _)| *name)
            .collect();
        if !conflicting.is_empty() {
            conflicting.sort();
            let names: Vec<&str> = conflicting.iter().map(PropertyName::as_str).collect();
            return Err(MatrixError::Configuration {
                product: key,
                message: format!(
                    "both a constant and a computed value declared for: {}",
                    names.join(", ")
                ),
            });
        }

        let properties = declarations
            .declared
            .into_iter()
            .map(|(name, declared)| {
                let value = match (declared.constant, declared.computed) {
                    (Some(value), _) => PropertyValue::Constant(value),
                    (None, Some(resolver)) => PropertyValue::Computed(resolver),
                    (None, None) => PropertyValue::Unset,
                };
                (name, value)
            })
            .collect();

        debug!("Defined product '{}'", key);
        Ok(Self { key, properties })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Declared state of a property
    pub fn property(&self, name: PropertyName) -> &PropertyValue {
        const UNSET: &PropertyValue = &PropertyValue::Unset;
        self.properties.get(&name).unwrap_or(UNSET)
    }

    /// Resolve a property against an explicit version
    ///
    /// The version string is parsed only when a computed property needs it,
    /// so a malformed version surfaces here and not at lookup time.
    ///
    /// # Returns
    /// * `Ok(Some(value))` - The declared, computed or derived value
    /// * `Ok(None)` - The property has no value and no default
    /// * `Err(MatrixError::MalformedVersion)` - A computed property met an unparsable version
    pub fn resolve(
        &self,
        name: PropertyName,
        version: &str,
        comparator: &dyn VersionComparator,
    ) -> Result<Option<Value>, MatrixError> {
        match self.property(name) {
            PropertyValue::Constant(value) => Ok(Some(value.clone())),
            PropertyValue::Computed(resolver) => {
                let parsed = comparator.parse(version)?;
                Ok(resolver.resolve(&parsed))
            }
            PropertyValue::Unset => self.default_value(name, version, comparator),
        }
    }

    fn default_value(
        &self,
        name: PropertyName,
        version: &str,
        comparator: &dyn VersionComparator,
    ) -> Result<Option<Value>, MatrixError> {
        let value = match name {
            PropertyName::InstallPath => self
                .package_name_text(version, comparator)?
                .map(|package| Value::Text(format!("{INSTALL_ROOT}{package}"))),
            PropertyName::OmnibusProject => self
                .package_name_text(version, comparator)?
                .map(Value::Text),
            PropertyName::DownloadsProductPageUrl => {
                Some(Value::Text(format!("{DOWNLOADS_BASE_URL}{}", self.key)))
            }
            PropertyName::GithubRepo => Some(Value::Text(format!("{GITHUB_ORG}/{}", self.key))),
            _ => None,
        };
        Ok(value)
    }

    fn package_name_text(
        &self,
        version: &str,
        comparator: &dyn VersionComparator,
    ) -> Result<Option<String>, MatrixError> {
        Ok(self
            .resolve(PropertyName::PackageName, version, comparator)?
            .and_then(|value| value.as_text().map(str::to_string)))
    }

    /// Every omnibus project name this product has used
    ///
    /// Samples the lowest version, each change point declared by a
    /// [`VersionRule`] on `package_name` or `omnibus_project`, and the latest
    /// sentinel. Closure resolvers expose no change points, so a closure with
    /// more than two branches can hide intermediate names.
    pub fn known_omnibus_project_names(
        &self,
        comparator: &dyn VersionComparator,
    ) -> Result<IndexSet<String>, MatrixError> {
        let mut samples = vec![MINIMUM_VERSION.to_string()];
        let mut breakpoints: Vec<Version> =
            [PropertyName::PackageName, PropertyName::OmnibusProject]
                .into_iter()
                .filter_map(|name| match self.property(name) {
                    PropertyValue::Computed(resolver) => Some(resolver.breakpoints()),
                    _ => None,
                })
                .flatten()
                .collect();
        breakpoints.sort();
        breakpoints.dedup();
        samples.extend(breakpoints.iter().map(Version::to_string));
        samples.push(LATEST_VERSION.to_string());

        let mut names = IndexSet::new();
        for sample in &samples {
            if let Some(Value::Text(name)) =
                self.resolve(PropertyName::OmnibusProject, sample, comparator)?
            {
                names.insert(name);
            }
        }
        Ok(names)
    }
}
