//! Theme catalog core.
//! Owns the catalog schema, the single-applied-theme invariant, typed row
//! cursors and the change-request channel.

pub mod broadcast;
pub mod cursor;
pub mod db;
pub mod error;
pub mod logging;
pub mod model;
pub mod repo;
pub mod schema;
pub mod service;

pub use broadcast::bus::{ChangeRequestHandler, Delivery, DeliveryReport, NotificationBus};
pub use broadcast::dispatcher::{DispatchReceipt, ThemeChangeDispatcher};
pub use broadcast::permission::{parse_permission, Permission, PermissionParseError};
pub use broadcast::request::ChangeRequest;
pub use cursor::theme_item::ThemeItem;
pub use error::{CatalogError, CatalogResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::locator::{Locator, LocatorTarget};
pub use model::theme::{KeyValidationError, ThemeKey, ThemeRecord};
pub use repo::result_set::ResultSet;
pub use repo::theme_repo::{SqliteThemeRepository, ThemeRepository};
pub use schema::content::ContentKind;
pub use service::theme_service::{
    resolve_uri, DefaultThemeSource, StaticDefaultTheme, ThemeCatalog,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
