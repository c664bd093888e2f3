//! Property resolution engine for product metadata
//!
//! A product declares each of its properties either as a constant or as a
//! function of the product version. The registry binds a requested version
//! onto a definition and hands back a read-only view; every property read
//! resolves against that version.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐  lookup(key, version)  ┌─────────────┐
//! │  Registry   │───────────────────────▶│ ProductView │
//! │ (key → def) │                        │ (def, ver)  │
//! └─────────────┘                        └─────────────┘
//!        │                                      │ get(property)
//!        ▼                                      ▼
//! ┌─────────────┐                        ┌─────────────┐
//! │ Definition  │◀───────────────────────│ Comparator  │
//! │ (properties)│   parse bound version  │  (semver)   │
//! └─────────────┘                        └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`property`]: Property names, values and version rules
//! - [`definition`]: Single product definition and default derivation
//! - [`registry`]: Product registry and version-bound views
//! - [`comparator`]: Version parsing capability
//! - [`catalog`]: Built-in product catalog
//! - [`error`]: Error types for definitions and catalog loading

pub mod catalog;
pub mod comparator;
pub mod definition;
pub mod error;
pub mod property;
pub mod registry;

pub use comparator::{SemverComparator, VersionComparator};
pub use definition::{Declarations, ProductDefinition};
pub use error::{CatalogError, MatrixError};
pub use property::{PropertyName, PropertyValue, Resolver, Value, VersionRule};
pub use registry::{ProductRegistry, ProductView};
