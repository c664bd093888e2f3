use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::{info, warn};

use crate::matrix::comparator::parse_version;
use crate::matrix::definition::Declarations;
use crate::matrix::error::{CatalogError, MatrixError};
use crate::matrix::property::{PropertyName, Value, VersionRule};
use crate::matrix::registry::ProductRegistry;

// =============================================================================
// Version-related constants
// =============================================================================

/// Version bound for "latest"; compares greater than any published release
pub const LATEST_VERSION: &str = "1000.1000.1000";

/// Lowest possible version
pub const MINIMUM_VERSION: &str = "0.0.0";

// =============================================================================
// Default derivation constants
// =============================================================================

/// Prefix of the default download page URL
pub const DOWNLOADS_BASE_URL: &str = "https://downloads.chef.io/";

/// Owner of the default source repository
pub const GITHUB_ORG: &str = "chef";

/// Prefix of the default install path
pub const INSTALL_ROOT: &str = "/opt/";

/// File name of the catalog overlay inside the config directory
pub const CATALOG_FILE_NAME: &str = "catalog.json";

/// Catalog overlay file
///
/// ```json
/// {
///   "products": {
///     "widget": {
///       "product_name": "Widget",
///       "package_name": {
///         "initial": "old-widget",
///         "changes": [{ "from": "2.0.0", "value": "widget" }]
///       },
///       "downloads_product_page_url": "not_available"
///     }
///   }
/// }
/// ```
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct CatalogConfig {
    pub products: IndexMap<String, IndexMap<String, PropertySpec>>,
}

/// Declaration of a single property in a catalog file
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum PropertySpec {
    /// Constant value
    Value(ValueSpec),
    /// Constant and/or version rule; declaring both is rejected
    Declared(DeclaredSpec),
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ValueSpec {
    Marker(Marker),
    Text(String),
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Marker {
    NotAvailable,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DeclaredSpec {
    pub value: Option<ValueSpec>,
    pub initial: Option<ValueSpec>,
    pub changes: Vec<ChangeSpec>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ChangeSpec {
    pub from: String,
    pub value: Option<ValueSpec>,
}

impl From<ValueSpec> for Value {
    fn from(spec: ValueSpec) -> Self {
        match spec {
            ValueSpec::Marker(Marker::NotAvailable) => Value::NotAvailable,
            ValueSpec::Text(text) => Value::Text(text),
        }
    }
}

impl CatalogConfig {
    /// Register every product of the catalog, replacing products with the same key
    pub fn apply(self, registry: &mut ProductRegistry) -> Result<(), MatrixError> {
        for (key, properties) in self.products {
            let declarations = product_declarations(&key, properties)?;
            registry.register(key, declarations)?;
        }
        Ok(())
    }
}

fn product_declarations(
    key: &str,
    properties: IndexMap<String, PropertySpec>,
) -> Result<Declarations, MatrixError> {
    let configuration_error = |message: String| MatrixError::Configuration {
        product: key.to_string(),
        message,
    };

    let mut declarations = Declarations::new();
    for (property, spec) in properties {
        let name: PropertyName = property
            .parse()
            .map_err(|_| configuration_error(format!("unknown property '{property}'")))?;

        declarations = match spec {
            PropertySpec::Value(value) => declarations.constant(name, value),
            PropertySpec::Declared(declared) => {
                let has_rule = declared.initial.is_some() || !declared.changes.is_empty();
                if let Some(value) = declared.value {
                    declarations = declarations.constant(name, value);
                }
                if has_rule {
                    let mut rule = VersionRule::with_initial(declared.initial.map(Value::from));
                    for change in declared.changes {
                        let from = parse_version(&change.from).map_err(|e| {
                            configuration_error(format!("invalid version in '{property}': {e}"))
                        })?;
                        rule = rule.step(from, change.value.map(Value::from));
                    }
                    declarations = declarations.rule(name, rule);
                }
                declarations
            }
        };
    }
    Ok(declarations)
}

/// Read a catalog file
pub fn load_catalog(path: &Path) -> Result<CatalogConfig, CatalogError> {
    let content = std::fs::read_to_string(path)?;
    let catalog: CatalogConfig = serde_json::from_str(&content)?;
    info!(
        "Loaded {} products from catalog {:?}",
        catalog.products.len(),
        path
    );
    Ok(catalog)
}

/// Load the catalog overlay
///
/// An explicit path must load. The default path is optional: a missing
/// file yields `None` and an unreadable one is logged and skipped.
pub fn load_overlay(explicit: Option<&Path>) -> Result<Option<CatalogConfig>, CatalogError> {
    if let Some(path) = explicit {
        return load_catalog(path).map(Some);
    }

    let path = catalog_path();
    if !path.exists() {
        return Ok(None);
    }
    match load_catalog(&path) {
        Ok(catalog) => Ok(Some(catalog)),
        Err(e) => {
            warn!("Ignoring catalog overlay {:?}: {}", path, e);
            Ok(None)
        }
    }
}

/// Returns the path to the config directory for product-matrix.
/// Uses $XDG_CONFIG_HOME/product-matrix if XDG_CONFIG_HOME is set,
/// otherwise falls back to ~/.config/product-matrix,
/// or ./product-matrix if neither is available.
pub fn config_dir() -> PathBuf {
    config_dir_with_env(std::env::var("XDG_CONFIG_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the default catalog overlay.
pub fn catalog_path() -> PathBuf {
    config_dir().join(CATALOG_FILE_NAME)
}

fn config_dir_with_env(xdg_config_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let config_dir = xdg_config_home
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".config")))
        .unwrap_or_else(|| PathBuf::from("."));

    config_dir.join("product-matrix")
}
