//! Theme record and composite key.
//!
//! # Responsibility
//! - Define `ThemeRecord`, one row of the catalog.
//! - Validate key components before they reach SQL or locator construction.
//!
//! # Invariants
//! - Key components match `[A-Za-z0-9_-][A-Za-z0-9._-]*`; separators are
//!   rejected, never escaped.
//! - `is_system` records are never removed by catalog deletes.

use crate::model::locator::Locator;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

static KEY_COMPONENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_\-][A-Za-z0-9._\-]*$").expect("valid key component regex")
});

/// Composite identity of one catalog entry.
///
/// Also used for externally supplied descriptors such as the platform's
/// current or default theme.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ThemeKey {
    pub package_name: String,
    pub theme_id: String,
}

impl ThemeKey {
    /// Builds a validated key.
    pub fn new(
        package_name: impl Into<String>,
        theme_id: impl Into<String>,
    ) -> Result<Self, KeyValidationError> {
        let key = Self {
            package_name: package_name.into(),
            theme_id: theme_id.into(),
        };
        key.validate()?;
        Ok(key)
    }

    /// Checks both components against the key grammar.
    pub fn validate(&self) -> Result<(), KeyValidationError> {
        validate_key_component("package_name", &self.package_name)?;
        validate_key_component("theme_id", &self.theme_id)
    }
}

impl Display for ThemeKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.package_name, self.theme_id)
    }
}

/// Validates one key component (`package_name` or `theme_id`).
pub fn validate_key_component(
    field: &'static str,
    value: &str,
) -> Result<(), KeyValidationError> {
    if value.is_empty() {
        return Err(KeyValidationError::Empty(field));
    }
    if !KEY_COMPONENT_RE.is_match(value) {
        return Err(KeyValidationError::Malformed {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Key component validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyValidationError {
    Empty(&'static str),
    Malformed { field: &'static str, value: String },
}

impl Display for KeyValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty(field) => write!(f, "{field} must not be empty"),
            Self::Malformed { field, value } => {
                write!(f, "{field} contains unsupported characters: `{value}`")
            }
        }
    }
}

impl Error for KeyValidationError {}

/// One catalog entry per (package, theme) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeRecord {
    /// Storage row id. Ignored on insert.
    pub id: i64,
    pub package_name: String,
    pub theme_id: String,
    pub name: String,
    /// Name shown when the theme is presented without wallpaper/ringtones.
    pub style_name: String,
    pub author: String,
    pub is_drm: bool,
    /// Bitmap-store key. Not a usable path.
    pub wallpaper_name: Option<String>,
    pub wallpaper_uri: Option<Locator>,
    pub lock_wallpaper_name: Option<String>,
    pub lock_wallpaper_uri: Option<Locator>,
    pub ringtone_name: Option<String>,
    pub ringtone_uri: Option<Locator>,
    pub notification_ringtone_name: Option<String>,
    pub notification_ringtone_uri: Option<Locator>,
    pub thumbnail_uri: Option<Locator>,
    pub preview_uri: Option<Locator>,
    /// Bundled with the system image; cannot be uninstalled.
    pub is_system: bool,
    pub is_applied: bool,
}

impl ThemeRecord {
    /// Creates a record with the style name defaulted to `name` and every
    /// optional component unset.
    pub fn new(
        package_name: impl Into<String>,
        theme_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        let name = name.into();
        Self {
            id: 0,
            package_name: package_name.into(),
            theme_id: theme_id.into(),
            style_name: name.clone(),
            name,
            author: String::new(),
            is_drm: false,
            wallpaper_name: None,
            wallpaper_uri: None,
            lock_wallpaper_name: None,
            lock_wallpaper_uri: None,
            ringtone_name: None,
            ringtone_uri: None,
            notification_ringtone_name: None,
            notification_ringtone_uri: None,
            thumbnail_uri: None,
            preview_uri: None,
            is_system: false,
            is_applied: false,
        }
    }

    /// Composite identity of this record.
    pub fn key(&self) -> ThemeKey {
        ThemeKey {
            package_name: self.package_name.clone(),
            theme_id: self.theme_id.clone(),
        }
    }

    /// Whether the theme may be uninstalled.
    pub fn is_removable(&self) -> bool {
        !self.is_system
    }

    /// Validates fields that must hold before persistence.
    pub fn validate(&self) -> Result<(), KeyValidationError> {
        validate_key_component("package_name", &self.package_name)?;
        validate_key_component("theme_id", &self.theme_id)
    }
}
