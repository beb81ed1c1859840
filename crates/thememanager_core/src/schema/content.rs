//! Content kinds tagging catalog locators and change requests.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Directory kind for theme listings.
pub const THEME_CONTENT_TYPE: &str = "vnd.tmobile.cursor.dir/theme";
/// Item kind for a single full theme.
pub const THEME_CONTENT_ITEM_TYPE: &str = "vnd.tmobile.cursor.item/theme";
/// Directory kind for style listings.
pub const STYLE_CONTENT_TYPE: &str = "vnd.tmobile.cursor.dir/style";
/// Item kind for a theme narrowed to its style component.
pub const STYLE_CONTENT_ITEM_TYPE: &str = "vnd.tmobile.cursor.item/style";

/// Semantic kind of catalog content.
///
/// A style shares identity with its theme; only the tag differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    ThemeDir,
    ThemeItem,
    StyleDir,
    StyleItem,
}

impl ContentKind {
    /// Stable wire string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ThemeDir => THEME_CONTENT_TYPE,
            Self::ThemeItem => THEME_CONTENT_ITEM_TYPE,
            Self::StyleDir => STYLE_CONTENT_TYPE,
            Self::StyleItem => STYLE_CONTENT_ITEM_TYPE,
        }
    }

    /// Returns whether this kind narrows a theme to its style.
    pub fn is_style(self) -> bool {
        matches!(self, Self::StyleDir | Self::StyleItem)
    }

    /// Parses one kind from its wire string.
    pub fn parse(value: &str) -> Result<Self, ContentKindError> {
        match value.trim() {
            THEME_CONTENT_TYPE => Ok(Self::ThemeDir),
            THEME_CONTENT_ITEM_TYPE => Ok(Self::ThemeItem),
            STYLE_CONTENT_TYPE => Ok(Self::StyleDir),
            STYLE_CONTENT_ITEM_TYPE => Ok(Self::StyleItem),
            other => Err(ContentKindError(other.to_string())),
        }
    }
}

impl Display for ContentKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown content kind string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentKindError(pub String);

impl Display for ContentKindError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unsupported content kind: {}", self.0)
    }
}

impl Error for ContentKindError {}
