//! Catalog domain model.
//!
//! # Responsibility
//! - Define the typed shape of one catalog entry and its composite identity.
//! - Provide the lenient locator type used for every resource reference.
//!
//! # Invariants
//! - `(package_name, theme_id)` identifies exactly one record.
//! - Locator parsing never fails loudly; bad text becomes `None`.

pub mod locator;
pub mod theme;
