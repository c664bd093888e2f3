//! Property names, values and version-dependent resolvers

use std::fmt;
use std::sync::Arc;

use semver::Version;
use serde::{Serialize, Serializer};

/// Name of a product property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PropertyName {
    ConfigFile,
    CtlCommand,
    ProductKey,
    PackageName,
    ProductName,
    InstallPath,
    OmnibusProject,
    GithubRepo,
    DownloadsProductPageUrl,
}

impl PropertyName {
    /// All property names in declaration order
    pub const ALL: [PropertyName; 9] = [
        PropertyName::ConfigFile,
        PropertyName::CtlCommand,
        PropertyName::ProductKey,
        PropertyName::PackageName,
        PropertyName::ProductName,
        PropertyName::InstallPath,
        PropertyName::OmnibusProject,
        PropertyName::GithubRepo,
        PropertyName::DownloadsProductPageUrl,
    ];

    /// Returns the string representation of the property name
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyName::ConfigFile => "config_file",
            PropertyName::CtlCommand => "ctl_command",
            PropertyName::ProductKey => "product_key",
            PropertyName::PackageName => "package_name",
            PropertyName::ProductName => "product_name",
            PropertyName::InstallPath => "install_path",
            PropertyName::OmnibusProject => "omnibus_project",
            PropertyName::GithubRepo => "github_repo",
            PropertyName::DownloadsProductPageUrl => "downloads_product_page_url",
        }
    }
}

impl fmt::Display for PropertyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PropertyName {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PropertyName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or(())
    }
}

/// A resolved property value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Text(String),
    /// The product has no public download page
    NotAvailable,
}

impl Value {
    /// Marker used for [`Value::NotAvailable`] in catalogs and output
    pub const NOT_AVAILABLE: &'static str = "not_available";

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            Value::NotAvailable => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(text) => f.write_str(text),
            Value::NotAvailable => f.write_str(Self::NOT_AVAILABLE),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Text(text) => serializer.serialize_str(text),
            Value::NotAvailable => serializer.serialize_str(Self::NOT_AVAILABLE),
        }
    }
}

/// Piecewise-constant value over version ranges
///
/// Starts with an initial value; each step replaces the value from its
/// version onwards.
///
/// ```
/// use product_matrix::matrix::{Value, VersionRule};
/// use semver::Version;
///
/// let rule = VersionRule::new("chef-server")
///     .starting_at(Version::new(12, 0, 0), "chef-server-core");
/// assert_eq!(rule.resolve(&Version::new(11, 1, 6)), Some(Value::from("chef-server")));
/// assert_eq!(rule.resolve(&Version::new(12, 0, 0)), Some(Value::from("chef-server-core")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRule {
    initial: Option<Value>,
    steps: Vec<(Version, Option<Value>)>,
}

impl VersionRule {
    pub fn new(initial: impl Into<Value>) -> Self {
        Self::with_initial(Some(initial.into()))
    }

    pub fn with_initial(initial: Option<Value>) -> Self {
        Self {
            initial,
            steps: Vec::new(),
        }
    }

    /// Value used from `version` (inclusive) onwards
    pub fn starting_at(self, version: Version, value: impl Into<Value>) -> Self {
        self.step(version, Some(value.into()))
    }

    pub fn step(mut self, version: Version, value: Option<Value>) -> Self {
        let position = self
            .steps
            .iter()
            .position(|(existing, _)| *existing >= version)
            .unwrap_or(self.steps.len());
        if self
            .steps
            .get(position)
            .is_some_and(|(existing, _)| *existing == version)
        {
            self.steps[position].1 = value;
        } else {
            self.steps.insert(position, (version, value));
        }
        self
    }

    /// Versions at which the value changes, ascending
    pub fn breakpoints(&self) -> impl Iterator<Item = &Version> {
        self.steps.iter().map(|(version, _)| version)
    }

    pub fn resolve(&self, version: &Version) -> Option<Value> {
        self.steps
            .iter()
            .take_while(|(from, _)| version >= from)
            .last()
            .map_or(&self.initial, |(_, value)| value)
            .clone()
    }
}

type ResolverFn = dyn Fn(&Version) -> Option<Value> + Send + Sync;

/// Computes a property value from a parsed version
#[derive(Clone)]
pub enum Resolver {
    Rule(VersionRule),
    Func(Arc<ResolverFn>),
}

impl Resolver {
    pub fn from_fn<F>(func: F) -> Self
    where
        F: Fn(&Version) -> Option<Value> + Send + Sync + 'static,
    {
        Resolver::Func(Arc::new(func))
    }

    pub fn resolve(&self, version: &Version) -> Option<Value> {
        match self {
            Resolver::Rule(rule) => rule.resolve(version),
            Resolver::Func(func) => func(version),
        }
    }

    /// Known change points; closures report none
    pub fn breakpoints(&self) -> Vec<Version> {
        match self {
            Resolver::Rule(rule) => rule.breakpoints().cloned().collect(),
            Resolver::Func(_) => Vec::new(),
        }
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolver::Rule(rule) => f.debug_tuple("Rule").field(rule).finish(),
            Resolver::Func(_) => f.write_str("Func(..)"),
        }
    }
}

/// Declared state of a single property
#[derive(Debug, Clone, Default)]
pub enum PropertyValue {
    Constant(Value),
    Computed(Resolver),
    #[default]
    Unset,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("config_file", Some(PropertyName::ConfigFile))]
    #[case("package_name", Some(PropertyName::PackageName))]
    #[case("downloads_product_page_url", Some(PropertyName::DownloadsProductPageUrl))]
    #[case("packageName", None)]
    #[case("", None)]
    fn property_name_from_str_returns_expected(
        #[case] input: &str,
        #[case] expected: Option<PropertyName>,
    ) {
        assert_eq!(input.parse::<PropertyName>().ok(), expected);
    }

    #[test]
    fn property_name_as_str_round_trips_for_all_names() {
        for name in PropertyName::ALL {
            assert_eq!(name.as_str().parse::<PropertyName>(), Ok(name));
        }
    }

    #[rstest]
    #[case(Version::new(0, 0, 0), Some("delivery"))]
    #[case(Version::new(0, 6, 9), Some("delivery"))]
    #[case(Version::new(0, 7, 0), Some("automate"))]
    #[case(Version::new(2, 0, 0), Some("automate"))]
    #[case(Version::new(3, 0, 0), None)]
    #[case(Version::new(1000, 1000, 1000), None)]
    fn version_rule_resolves_by_range(#[case] version: Version, #[case] expected: Option<&str>) {
        let rule = VersionRule::new("delivery")
            .starting_at(Version::new(0, 7, 0), "automate")
            .step(Version::new(3, 0, 0), None);

        assert_eq!(rule.resolve(&version), expected.map(Value::from));
    }

    #[test]
    fn version_rule_keeps_steps_sorted_and_replaces_duplicates() {
        let rule = VersionRule::new("a")
            .starting_at(Version::new(3, 0, 0), "c")
            .starting_at(Version::new(2, 0, 0), "b")
            .starting_at(Version::new(3, 0, 0), "d");

        let breakpoints: Vec<_> = rule.breakpoints().cloned().collect();
        assert_eq!(breakpoints, vec![Version::new(2, 0, 0), Version::new(3, 0, 0)]);
        assert_eq!(rule.resolve(&Version::new(3, 1, 0)), Some(Value::from("d")));
    }

    #[test]
    fn closure_resolver_has_no_breakpoints() {
        let resolver = Resolver::from_fn(|_| Some(Value::NotAvailable));
        assert!(resolver.breakpoints().is_empty());
        assert_eq!(
            resolver.resolve(&Version::new(1, 0, 0)),
            Some(Value::NotAvailable)
        );
    }

    #[test]
    fn value_serializes_as_plain_string() {
        assert_eq!(
            serde_json::to_string(&Value::from("chef")).unwrap(),
            "\"chef\""
        );
        assert_eq!(
            serde_json::to_string(&Value::NotAvailable).unwrap(),
            "\"not_available\""
        );
    }
}
