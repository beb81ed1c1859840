//! Change request payload.

use crate::model::locator::Locator;
use crate::schema::content::ContentKind;
use crate::schema::ACTION_CHANGE_THEME;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Request that the addressed theme (or just its style) become active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRequest {
    /// Correlates dispatch and delivery log lines.
    pub request_id: Uuid,
    pub action: String,
    pub locator: Locator,
    /// `None` means the full theme: wallpaper, ringtones and style.
    pub content_kind: Option<ContentKind>,
    /// Free-form directives, e.g. partial application hints. Handlers may
    /// rewrite them for lower-priority handlers.
    pub extras: BTreeMap<String, String>,
}

impl ChangeRequest {
    /// Full theme change.
    pub fn theme(locator: Locator) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            action: ACTION_CHANGE_THEME.to_string(),
            locator,
            content_kind: None,
            extras: BTreeMap::new(),
        }
    }

    /// Style-only change; same locator class, tagged as a style item.
    pub fn style(locator: Locator) -> Self {
        Self {
            content_kind: Some(ContentKind::StyleItem),
            ..Self::theme(locator)
        }
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extras.insert(key.into(), value.into());
        self
    }

    /// Whether only the style component should be applied.
    pub fn is_style_only(&self) -> bool {
        self.content_kind.is_some_and(ContentKind::is_style)
    }
}

#[cfg(test)]
mod tests {
    use super::ChangeRequest;
    use crate::model::locator::Locator;
    use crate::schema::content::ContentKind;
    use crate::schema::ACTION_CHANGE_THEME;

    fn locator() -> Locator {
        Locator::parse("content://com.tmobile.thememanager.themes/theme/pkgA/t1").unwrap()
    }

    #[test]
    fn theme_and_style_requests_differ_only_by_kind() {
        let theme = ChangeRequest::theme(locator());
        let style = ChangeRequest::style(locator());

        assert_eq!(theme.action, ACTION_CHANGE_THEME);
        assert_eq!(style.action, ACTION_CHANGE_THEME);
        assert_eq!(theme.locator, style.locator);
        assert_eq!(theme.content_kind, None);
        assert_eq!(style.content_kind, Some(ContentKind::StyleItem));
        assert!(style.is_style_only());
        assert!(!theme.is_style_only());
        assert_ne!(theme.request_id, style.request_id);
    }

    #[test]
    fn extras_are_kept_in_key_order() {
        let request = ChangeRequest::theme(locator())
            .with_extra("skip_ringtone", "true")
            .with_extra("skip_wallpaper", "false");
        let keys: Vec<&str> = request.extras.keys().map(String::as_str).collect();
        assert_eq!(keys, ["skip_ringtone", "skip_wallpaper"]);
    }
}
