//! Lenient resource locators.
//!
//! # Responsibility
//! - Wrap parseable resource addresses (wallpapers, ringtones, themes).
//! - Build and recognize the catalog's own item/collection locators.
//!
//! # Invariants
//! - Parsing never errors: empty or invalid text yields `None`.
//! - Item locators always have the shape `<THEME_CONTENT_URI>/<package>/<themeId>`.

use crate::model::theme::{KeyValidationError, ThemeKey};
use crate::schema::{AUTHORITY, THEMES_PATH, THEME_CONTENT_URI, THEME_PATH};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use url::Url;

const CONTENT_SCHEME: &str = "content";

/// Parsed resource address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locator(Url);

impl Locator {
    /// Parses locator text, mapping empty or malformed input to `None`.
    pub fn parse(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        Url::parse(trimmed).ok().map(Self)
    }

    /// Same as [`Locator::parse`] for nullable stored text.
    pub fn parse_nullable(text: Option<&str>) -> Option<Self> {
        text.and_then(Self::parse)
    }

    /// Item locator for one theme. Pure construction, no I/O.
    pub fn for_theme(key: &ThemeKey) -> Result<Self, KeyValidationError> {
        key.validate()?;
        let text = format!(
            "{THEME_CONTENT_URI}/{}/{}",
            key.package_name, key.theme_id
        );
        // Validated components only use unreserved characters.
        Url::parse(&text)
            .map(Self)
            .map_err(|_| KeyValidationError::Malformed {
                field: "theme_id",
                value: key.theme_id.clone(),
            })
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }

    /// Classifies a catalog locator. Foreign locators return `None`.
    pub fn target(&self) -> Option<LocatorTarget> {
        if self.0.scheme() != CONTENT_SCHEME || self.0.host_str() != Some(AUTHORITY) {
            return None;
        }
        if self.0.query().is_some() || self.0.fragment().is_some() {
            return None;
        }
        let segments: Vec<&str> = self.0.path_segments()?.collect();
        match segments.as_slice() {
            [THEMES_PATH] => Some(LocatorTarget::Collection),
            [THEME_PATH, package_name, theme_id] => {
                ThemeKey::new(*package_name, *theme_id)
                    .ok()
                    .map(LocatorTarget::Item)
            }
            _ => None,
        }
    }
}

impl Display for Locator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0.as_str())
    }
}

/// What a catalog locator addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocatorTarget {
    Item(ThemeKey),
    Collection,
}
