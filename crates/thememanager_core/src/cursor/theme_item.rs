//! Typed cursor over theme rows.

use crate::error::{CatalogError, CatalogResult};
use crate::model::locator::Locator;
use crate::model::theme::{ThemeKey, ThemeRecord};
use crate::repo::result_set::ResultSet;
use crate::schema::columns;
use log::debug;
use rusqlite::types::Value;

/// Column positions resolved once at construction.
///
/// Identity columns are mandatory; every other column may be projected away
/// and only fails when read.
#[derive(Debug, Clone, Copy)]
struct ColumnMap {
    theme_package: usize,
    theme_id: usize,
    id: Option<usize>,
    name: Option<usize>,
    style_name: Option<usize>,
    author: Option<usize>,
    is_drm: Option<usize>,
    wallpaper_name: Option<usize>,
    wallpaper_uri: Option<usize>,
    lock_wallpaper_name: Option<usize>,
    lock_wallpaper_uri: Option<usize>,
    ringtone_name: Option<usize>,
    ringtone_uri: Option<usize>,
    notification_ringtone_name: Option<usize>,
    notification_ringtone_uri: Option<usize>,
    thumbnail_uri: Option<usize>,
    preview_uri: Option<usize>,
    is_system: Option<usize>,
    is_applied: Option<usize>,
}

impl ColumnMap {
    fn resolve(result: &ResultSet) -> CatalogResult<Self> {
        let required = |column: &'static str| {
            result
                .column_index(column)
                .ok_or(CatalogError::SchemaMismatch { column })
        };
        let optional = |column: &'static str| result.column_index(column);

        Ok(Self {
            theme_package: required(columns::THEME_PACKAGE)?,
            theme_id: required(columns::THEME_ID)?,
            id: optional(columns::ID),
            name: optional(columns::NAME),
            style_name: optional(columns::STYLE_NAME),
            author: optional(columns::AUTHOR),
            is_drm: optional(columns::IS_DRM),
            wallpaper_name: optional(columns::WALLPAPER_NAME),
            wallpaper_uri: optional(columns::WALLPAPER_URI),
            lock_wallpaper_name: optional(columns::LOCK_WALLPAPER_NAME),
            lock_wallpaper_uri: optional(columns::LOCK_WALLPAPER_URI),
            ringtone_name: optional(columns::RINGTONE_NAME),
            ringtone_uri: optional(columns::RINGTONE_URI),
            notification_ringtone_name: optional(columns::NOTIFICATION_RINGTONE_NAME),
            notification_ringtone_uri: optional(columns::NOTIFICATION_RINGTONE_URI),
            thumbnail_uri: optional(columns::THUMBNAIL_URI),
            preview_uri: optional(columns::PREVIEW_URI),
            is_system: optional(columns::IS_SYSTEM),
            is_applied: optional(columns::IS_APPLIED),
        })
    }
}

/// Cursor wrapping one catalog result set.
///
/// Starts before the first row when built with [`ThemeItem::new`] and on row
/// 0 when built with [`ThemeItem::from_result`].
#[derive(Debug)]
pub struct ThemeItem {
    result: Option<ResultSet>,
    columns: ColumnMap,
    position: Option<usize>,
}

impl ThemeItem {
    /// Wraps a non-empty result set.
    ///
    /// # Errors
    /// - `InvalidArgument` when `result` has no rows.
    /// - `SchemaMismatch` when an identity column is absent.
    pub fn new(result: ResultSet) -> CatalogResult<Self> {
        if result.is_empty() {
            return Err(CatalogError::InvalidArgument(
                "result set cannot be empty".to_string(),
            ));
        }
        let columns = ColumnMap::resolve(&result)?;
        Ok(Self {
            result: Some(result),
            columns,
            position: None,
        })
    }

    /// Convenience form: `None` for an absent or empty result set, otherwise
    /// a cursor positioned on the first row.
    pub fn from_result(result: Option<ResultSet>) -> CatalogResult<Option<Self>> {
        match result {
            Some(result) if !result.is_empty() => {
                let mut item = Self::new(result)?;
                item.move_to(0)?;
                Ok(Some(item))
            }
            _ => Ok(None),
        }
    }

    /// Moves to an absolute row.
    ///
    /// Out-of-range positions leave the cursor off-row and fail with
    /// `NoCurrentRow`.
    pub fn move_to(&mut self, position: usize) -> CatalogResult<()> {
        let count = self.result()?.count();
        if position >= count {
            self.position = None;
            return Err(CatalogError::NoCurrentRow {
                position: Some(position),
            });
        }
        self.position = Some(position);
        Ok(())
    }

    /// Current row, or `None` before any successful `move_to`.
    pub fn position(&self) -> CatalogResult<Option<usize>> {
        self.result()?;
        Ok(self.position)
    }

    pub fn count(&self) -> CatalogResult<usize> {
        Ok(self.result()?.count())
    }

    pub fn row_id(&self) -> CatalogResult<i64> {
        match self.value(self.columns.id, columns::ID)? {
            Value::Integer(value) => Ok(*value),
            other => Err(invalid_value(columns::ID, other)),
        }
    }

    pub fn package_name(&self) -> CatalogResult<String> {
        self.string(Some(self.columns.theme_package), columns::THEME_PACKAGE)
    }

    pub fn theme_id(&self) -> CatalogResult<String> {
        self.string(Some(self.columns.theme_id), columns::THEME_ID)
    }

    pub fn name(&self) -> CatalogResult<String> {
        self.string(self.columns.name, columns::NAME)
    }

    /// Name to show when the theme is presented without wallpaper and
    /// ringtones.
    pub fn style_name(&self) -> CatalogResult<String> {
        self.string(self.columns.style_name, columns::STYLE_NAME)
    }

    pub fn author(&self) -> CatalogResult<String> {
        self.string(self.columns.author, columns::AUTHOR)
    }

    pub fn is_drm(&self) -> CatalogResult<bool> {
        self.flag(self.columns.is_drm, columns::IS_DRM)
    }

    /// Unique wallpaper key within the theme package.
    ///
    /// It looks like a filename but must only be used as a bitmap-store key.
    pub fn wallpaper_name(&self) -> CatalogResult<Option<String>> {
        self.nullable_string(self.columns.wallpaper_name, columns::WALLPAPER_NAME)
    }

    pub fn wallpaper_uri(&self) -> CatalogResult<Option<Locator>> {
        self.locator(self.columns.wallpaper_uri, columns::WALLPAPER_URI)
    }

    pub fn lock_wallpaper_name(&self) -> CatalogResult<Option<String>> {
        self.nullable_string(self.columns.lock_wallpaper_name, columns::LOCK_WALLPAPER_NAME)
    }

    pub fn lock_wallpaper_uri(&self) -> CatalogResult<Option<Locator>> {
        self.locator(self.columns.lock_wallpaper_uri, columns::LOCK_WALLPAPER_URI)
    }

    pub fn ringtone_name(&self) -> CatalogResult<Option<String>> {
        self.nullable_string(self.columns.ringtone_name, columns::RINGTONE_NAME)
    }

    pub fn ringtone_uri(&self) -> CatalogResult<Option<Locator>> {
        self.locator(self.columns.ringtone_uri, columns::RINGTONE_URI)
    }

    pub fn notification_ringtone_name(&self) -> CatalogResult<Option<String>> {
        self.nullable_string(
            self.columns.notification_ringtone_name,
            columns::NOTIFICATION_RINGTONE_NAME,
        )
    }

    pub fn notification_ringtone_uri(&self) -> CatalogResult<Option<Locator>> {
        self.locator(
            self.columns.notification_ringtone_uri,
            columns::NOTIFICATION_RINGTONE_URI,
        )
    }

    pub fn thumbnail_uri(&self) -> CatalogResult<Option<Locator>> {
        self.locator(self.columns.thumbnail_uri, columns::THUMBNAIL_URI)
    }

    pub fn preview_uri(&self) -> CatalogResult<Option<Locator>> {
        self.locator(self.columns.preview_uri, columns::PREVIEW_URI)
    }

    pub fn is_system(&self) -> CatalogResult<bool> {
        self.flag(self.columns.is_system, columns::IS_SYSTEM)
    }

    /// True for every theme not shipped in the system image.
    pub fn is_removable(&self) -> CatalogResult<bool> {
        Ok(!self.is_system()?)
    }

    pub fn is_applied(&self) -> CatalogResult<bool> {
        self.flag(self.columns.is_applied, columns::IS_APPLIED)
    }

    /// Composite key of the current row.
    pub fn identity(&self) -> CatalogResult<ThemeKey> {
        Ok(ThemeKey {
            package_name: self.package_name()?,
            theme_id: self.theme_id()?,
        })
    }

    /// Item locator of the current row.
    pub fn uri(&self) -> CatalogResult<Locator> {
        Ok(Locator::for_theme(&self.identity()?)?)
    }

    /// Compares the current row with an externally held descriptor.
    ///
    /// Independent of `is_applied`, which may disagree with a cached
    /// descriptor.
    pub fn equals_descriptor(&self, package_name: &str, theme_id: &str) -> CatalogResult<bool> {
        Ok(self.package_name()? == package_name && self.theme_id()? == theme_id)
    }

    /// Materializes the current row. Every column must be projected.
    pub fn record(&self) -> CatalogResult<ThemeRecord> {
        Ok(ThemeRecord {
            id: self.row_id()?,
            package_name: self.package_name()?,
            theme_id: self.theme_id()?,
            name: self.name()?,
            style_name: self.style_name()?,
            author: self.author()?,
            is_drm: self.is_drm()?,
            wallpaper_name: self.wallpaper_name()?,
            wallpaper_uri: self.wallpaper_uri()?,
            lock_wallpaper_name: self.lock_wallpaper_name()?,
            lock_wallpaper_uri: self.lock_wallpaper_uri()?,
            ringtone_name: self.ringtone_name()?,
            ringtone_uri: self.ringtone_uri()?,
            notification_ringtone_name: self.notification_ringtone_name()?,
            notification_ringtone_uri: self.notification_ringtone_uri()?,
            thumbnail_uri: self.thumbnail_uri()?,
            preview_uri: self.preview_uri()?,
            is_system: self.is_system()?,
            is_applied: self.is_applied()?,
        })
    }

    /// Log-only summary of the current row. Not a serialization format.
    pub fn format_debug(&self) -> CatalogResult<String> {
        Ok(format!(
            "{{pkg={}; themeId={}; name={}; drm={}}}",
            self.package_name()?,
            self.theme_id()?,
            self.name()?,
            self.is_drm()?
        ))
    }

    /// Releases the wrapped result set.
    ///
    /// # Errors
    /// - `Released` when called a second time.
    pub fn release(&mut self) -> CatalogResult<()> {
        let result = self.result.take().ok_or(CatalogError::Released)?;
        self.position = None;
        debug!(
            "event=cursor_release module=cursor status=ok rows={} reason=explicit",
            result.count()
        );
        Ok(())
    }

    pub fn is_released(&self) -> bool {
        self.result.is_none()
    }

    fn result(&self) -> CatalogResult<&ResultSet> {
        self.result.as_ref().ok_or(CatalogError::Released)
    }

    fn value(&self, index: Option<usize>, column: &'static str) -> CatalogResult<&Value> {
        let result = self.result()?;
        let row = self
            .position
            .ok_or(CatalogError::NoCurrentRow { position: None })?;
        let index = index.ok_or(CatalogError::SchemaMismatch { column })?;
        result
            .value(row, index)
            .ok_or(CatalogError::NoCurrentRow {
                position: Some(row),
            })
    }

    fn nullable_string(
        &self,
        index: Option<usize>,
        column: &'static str,
    ) -> CatalogResult<Option<String>> {
        match self.value(index, column)? {
            Value::Null => Ok(None),
            Value::Text(text) => Ok(Some(text.clone())),
            Value::Integer(value) => Ok(Some(value.to_string())),
            Value::Real(value) => Ok(Some(value.to_string())),
            other => Err(invalid_value(column, other)),
        }
    }

    fn string(&self, index: Option<usize>, column: &'static str) -> CatalogResult<String> {
        self.nullable_string(index, column)?
            .ok_or_else(|| CatalogError::InvalidData(format!("`{column}` is NULL")))
    }

    fn flag(&self, index: Option<usize>, column: &'static str) -> CatalogResult<bool> {
        match self.value(index, column)? {
            Value::Null => Ok(false),
            Value::Integer(value) => Ok(*value != 0),
            other => Err(invalid_value(column, other)),
        }
    }

    fn locator(&self, index: Option<usize>, column: &'static str) -> CatalogResult<Option<Locator>> {
        let text = self.nullable_string(index, column)?;
        Ok(Locator::parse_nullable(text.as_deref()))
    }
}

impl Drop for ThemeItem {
    fn drop(&mut self) {
        if let Some(result) = self.result.take() {
            debug!(
                "event=cursor_release module=cursor status=ok rows={} reason=drop",
                result.count()
            );
        }
    }
}

fn invalid_value(column: &'static str, value: &Value) -> CatalogError {
    CatalogError::InvalidData(format!(
        "unexpected {:?} value in `{column}`",
        value.data_type()
    ))
}
