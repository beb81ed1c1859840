//! Column names of the `themes` table.

pub const ID: &str = "_id";
pub const THEME_ID: &str = "theme_id";
pub const THEME_PACKAGE: &str = "theme_package";
pub const IS_APPLIED: &str = "is_applied";
pub const NAME: &str = "name";
/// Display name used where the theme is shown without wallpaper/ringtone.
pub const STYLE_NAME: &str = "style_name";
pub const AUTHOR: &str = "author";
pub const IS_DRM: &str = "is_drm";
/// Bitmap-store key; looks like a filename but is not a path.
pub const WALLPAPER_NAME: &str = "wallpaper_name";
pub const WALLPAPER_URI: &str = "wallpaper_uri";
pub const LOCK_WALLPAPER_NAME: &str = "lock_wallpaper_name";
pub const LOCK_WALLPAPER_URI: &str = "lock_wallpaper_uri";
pub const RINGTONE_NAME: &str = "ringtone_name";
pub const RINGTONE_URI: &str = "ringtone_uri";
pub const NOTIFICATION_RINGTONE_NAME: &str = "notif_ringtone_name";
pub const NOTIFICATION_RINGTONE_URI: &str = "notif_ringtone_uri";
pub const THUMBNAIL_URI: &str = "thumbnail_uri";
pub const PREVIEW_URI: &str = "preview_uri";
/// Non-zero for themes bundled with the system image.
pub const IS_SYSTEM: &str = "system";

/// Every column in table order.
pub const ALL_COLUMNS: &[&str] = &[
    ID,
    THEME_ID,
    THEME_PACKAGE,
    IS_APPLIED,
    NAME,
    STYLE_NAME,
    AUTHOR,
    IS_DRM,
    WALLPAPER_NAME,
    WALLPAPER_URI,
    LOCK_WALLPAPER_NAME,
    LOCK_WALLPAPER_URI,
    RINGTONE_NAME,
    RINGTONE_URI,
    NOTIFICATION_RINGTONE_NAME,
    NOTIFICATION_RINGTONE_URI,
    THUMBNAIL_URI,
    PREVIEW_URI,
    IS_SYSTEM,
];

/// Returns whether `name` is one of the catalog columns.
pub fn is_known_column(name: &str) -> bool {
    ALL_COLUMNS.contains(&name)
}
