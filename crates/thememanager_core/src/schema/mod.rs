//! Static catalog contract shared by every other module.
//!
//! # Responsibility
//! - Name the authority, endpoints and content kinds exchanged with external
//!   collaborators.
//! - Name the stable column strings used by storage and external readers.
//!
//! # Invariants
//! - Values in this module are wire contract; never rename them in place.

pub mod columns;
pub mod content;

/// Provider authority that prefixes every catalog locator.
pub const AUTHORITY: &str = "com.tmobile.thememanager.themes";

/// Root locator of the catalog.
pub const CONTENT_URI: &str = "content://com.tmobile.thememanager.themes";

/// Item-level endpoint; append `<package>/<themeId>` to address one theme.
pub const THEME_CONTENT_URI: &str = "content://com.tmobile.thememanager.themes/theme";

/// Collection-level endpoint addressing the whole catalog.
pub const THEMES_CONTENT_URI: &str = "content://com.tmobile.thememanager.themes/themes";

/// Path segment of the item endpoint.
pub const THEME_PATH: &str = "theme";
/// Path segment of the collection endpoint.
pub const THEMES_PATH: &str = "themes";

/// Action identifier carried by every change request.
pub const ACTION_CHANGE_THEME: &str = "com.tmobile.intent.action.CHANGE_THEME";

/// Storage table backing the catalog.
pub const THEMES_TABLE: &str = "themes";

#[cfg(test)]
mod tests {
    use super::{AUTHORITY, CONTENT_URI, THEMES_CONTENT_URI, THEME_CONTENT_URI};

    #[test]
    fn endpoints_are_rooted_at_authority() {
        assert_eq!(CONTENT_URI, format!("content://{AUTHORITY}"));
        assert_eq!(THEME_CONTENT_URI, format!("{CONTENT_URI}/theme"));
        assert_eq!(THEMES_CONTENT_URI, format!("{CONTENT_URI}/themes"));
    }
}
