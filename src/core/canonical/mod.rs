//! Canonical product shape shared by every supplier.

pub mod record;
pub mod schema;
pub mod validation;

pub use record::{
    CanonicalBasicInfo, CanonicalClassification, CanonicalIdentifiers, CanonicalInventory,
    CanonicalMedia, CanonicalPricing, CanonicalProduct, CanonicalVariant,
};
pub use schema::{Destination, FieldKind, Group, MAX_SEQUENCE_INDEX};
pub use validation::{CanonicalValidator, ValidationIssue, DEFAULT_REQUIRED_FIELDS};
