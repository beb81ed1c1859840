//! Sender-side API for theme and style change requests.

use crate::broadcast::bus::NotificationBus;
use crate::broadcast::permission::{parse_permission, Permission, PermissionParseError};
use crate::broadcast::request::ChangeRequest;
use crate::error::{CatalogError, CatalogResult};
use crate::model::locator::Locator;
use crate::schema::ACTION_CHANGE_THEME;
use log::{debug, info, warn};
use std::collections::BTreeSet;
use uuid::Uuid;

const REQUIRED_PERMISSION: Permission = Permission::ChangeConfiguration;

/// Proof that a request was accepted for delivery. Says nothing about
/// whether any handler applied it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchReceipt {
    pub request_id: Uuid,
}

/// Sends change requests on behalf of one caller.
pub struct ThemeChangeDispatcher<'bus> {
    bus: &'bus NotificationBus,
    granted: BTreeSet<Permission>,
}

impl<'bus> ThemeChangeDispatcher<'bus> {
    /// Binds a bus to the permissions held by the calling sender.
    pub fn new(bus: &'bus NotificationBus, granted: impl IntoIterator<Item = Permission>) -> Self {
        Self {
            bus,
            granted: granted.into_iter().collect(),
        }
    }

    /// Binds a bus to permission strings reported by the host for the
    /// sender. Strings naming permissions this crate does not know are
    /// ignored.
    ///
    /// # Errors
    /// - `InvalidArgument` for a blank permission string.
    pub fn from_granted_strings(
        bus: &'bus NotificationBus,
        granted: &[&str],
    ) -> CatalogResult<Self> {
        let mut permissions = BTreeSet::new();
        for value in granted {
            match parse_permission(value) {
                Ok(permission) => {
                    permissions.insert(permission);
                }
                Err(PermissionParseError::UnsupportedPermission(other)) => {
                    debug!(
                        "event=permission_parse module=broadcast status=skipped permission={}",
                        other
                    );
                }
                Err(err @ PermissionParseError::EmptyPermission) => {
                    return Err(CatalogError::InvalidArgument(err.to_string()));
                }
            }
        }
        Ok(Self::new(bus, permissions))
    }

    /// Requests the full theme at `locator`: wallpaper, ringtones and style.
    pub fn request_theme_change(&self, locator: &Locator) -> CatalogResult<DispatchReceipt> {
        self.dispatch(ChangeRequest::theme(locator.clone()))
    }

    /// Requests only the style component of the theme at `locator`.
    pub fn request_style_change(&self, locator: &Locator) -> CatalogResult<DispatchReceipt> {
        self.dispatch(ChangeRequest::style(locator.clone()))
    }

    /// Sends a caller-built request, e.g. one carrying partial-application
    /// extras. The action must be the change-theme action.
    pub fn request_custom_change(&self, request: ChangeRequest) -> CatalogResult<DispatchReceipt> {
        if request.action != ACTION_CHANGE_THEME {
            return Err(CatalogError::InvalidArgument(format!(
                "unsupported change action: {}",
                request.action
            )));
        }
        self.dispatch(request)
    }

    fn dispatch(&self, request: ChangeRequest) -> CatalogResult<DispatchReceipt> {
        let request_id = request.request_id;
        let kind = request
            .content_kind
            .map_or("theme", |kind| kind.as_str());

        if !self.granted.contains(&REQUIRED_PERMISSION) {
            warn!(
                "event=change_request_dispatch module=broadcast status=error request_id={} error_code=permission_denied permission={}",
                request_id,
                REQUIRED_PERMISSION.as_str()
            );
            return Err(CatalogError::PermissionDenied {
                permission: REQUIRED_PERMISSION.as_str(),
            });
        }

        if let Err(err) = self.bus.enqueue(request) {
            warn!(
                "event=change_request_dispatch module=broadcast status=error request_id={} error_code=channel_unavailable",
                request_id
            );
            return Err(err);
        }

        info!(
            "event=change_request_dispatch module=broadcast status=ok request_id={} kind={}",
            request_id, kind
        );
        Ok(DispatchReceipt { request_id })
    }
}

#[cfg(test)]
mod tests {
    use super::ThemeChangeDispatcher;
    use crate::broadcast::bus::NotificationBus;
    use crate::broadcast::permission::{parse_permission, Permission, PermissionParseError};
    use crate::broadcast::request::ChangeRequest;
    use crate::error::CatalogError;
    use crate::model::locator::Locator;

    fn locator() -> Locator {
        Locator::parse("content://com.tmobile.thememanager.themes/theme/pkgA/t1").unwrap()
    }

    #[test]
    fn missing_permission_is_denied_and_nothing_is_queued() {
        let bus = NotificationBus::new();
        let dispatcher = ThemeChangeDispatcher::new(&bus, []);

        let err = dispatcher.request_theme_change(&locator()).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::PermissionDenied {
                permission: "android.permission.CHANGE_CONFIGURATION"
            }
        ));
        assert_eq!(bus.pending_count(), 0);
    }

    #[test]
    fn accepted_requests_are_queued_with_receipt_ids() {
        let bus = NotificationBus::new();
        let dispatcher = ThemeChangeDispatcher::new(&bus, [Permission::ChangeConfiguration]);

        let theme = dispatcher.request_theme_change(&locator()).unwrap();
        let style = dispatcher.request_style_change(&locator()).unwrap();
        assert_ne!(theme.request_id, style.request_id);
        assert_eq!(bus.pending_count(), 2);
    }

    #[test]
    fn custom_request_must_keep_change_action() {
        let bus = NotificationBus::new();
        let dispatcher = ThemeChangeDispatcher::new(&bus, [Permission::ChangeConfiguration]);

        let mut request = ChangeRequest::theme(locator());
        request.action = "com.example.OTHER".to_string();
        let err = dispatcher.request_custom_change(request).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidArgument(_)));
    }

    #[test]
    fn shut_down_bus_fails_immediately() {
        let bus = NotificationBus::new();
        bus.shutdown();
        let dispatcher = ThemeChangeDispatcher::new(&bus, [Permission::ChangeConfiguration]);

        let err = dispatcher.request_style_change(&locator()).unwrap_err();
        assert!(matches!(err, CatalogError::ChannelUnavailable));
    }
}
