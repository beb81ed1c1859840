//! Theme repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide declarative (filter + projection) queries over `themes`.
//! - Own the applied-theme switch with transactional semantics.
//!
//! # Invariants
//! - `mark_applied_theme` clears and sets inside one `IMMEDIATE` transaction,
//!   so readers on other connections never observe zero or two applied rows
//!   from a completing switch.
//! - Deletes carry `system = 0`; protected rows are counted and logged, never
//!   removed.
//! - Marking a missing key is not an error and leaves zero applied themes.

use crate::error::{CatalogError, CatalogResult};
use crate::model::locator::{Locator, LocatorTarget};
use crate::model::theme::{validate_key_component, ThemeRecord};
use crate::repo::result_set::ResultSet;
use crate::schema::columns::{is_known_column, ALL_COLUMNS};
use crate::schema::THEMES_TABLE;
use log::{debug, info, warn};
use rusqlite::{params, Connection, ErrorCode, Params, Transaction, TransactionBehavior};
use std::time::Instant;

/// Repository interface for catalog queries and mutations.
pub trait ThemeRepository {
    /// Full catalog scan with optional column subset.
    fn list_themes(&self, projection: Option<&[&str]>) -> CatalogResult<ResultSet>;
    /// Every theme shipped by `package_name`.
    fn list_themes_by_package(&self, package_name: &str) -> CatalogResult<ResultSet>;
    /// Currently applied theme; zero or one row.
    fn get_applied_theme(&self) -> CatalogResult<ResultSet>;
    /// One theme by composite key; zero or one row.
    fn get_theme(&self, package_name: &str, theme_id: &str) -> CatalogResult<ResultSet>;
    /// Resolves an item or collection locator to its query.
    fn query_locator(&self, locator: &Locator) -> CatalogResult<ResultSet>;
    /// Installer hook. Returns the assigned `_id`.
    fn insert_theme(&mut self, record: &ThemeRecord) -> CatalogResult<i64>;
    /// Removes one theme. Returns rows removed.
    fn delete_theme(&self, package_name: &str, theme_id: &str) -> CatalogResult<usize>;
    /// Removes every removable theme of a package. Returns rows removed.
    fn delete_themes_by_package(&self, package_name: &str) -> CatalogResult<usize>;
    /// Makes one theme the only applied theme.
    fn mark_applied_theme(&mut self, package_name: &str, theme_id: &str) -> CatalogResult<()>;
}

/// SQLite-backed theme repository.
pub struct SqliteThemeRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteThemeRepository<'conn> {
    /// Wraps a migrated connection (see [`crate::db::open_db`]).
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }

    fn query<P: Params>(
        &self,
        filter_name: &'static str,
        sql: &str,
        params: P,
    ) -> CatalogResult<ResultSet> {
        let started_at = Instant::now();
        let mut stmt = self.conn.prepare(sql)?;
        let result = ResultSet::collect(&mut stmt, params)?;
        debug!(
            "event=theme_query module=repo status=ok filter={} rows={} duration_ms={}",
            filter_name,
            result.count(),
            started_at.elapsed().as_millis()
        );
        Ok(result)
    }

    fn delete_where<P: Params + Copy>(
        &self,
        scope: &'static str,
        filter: &str,
        params: P,
    ) -> CatalogResult<usize> {
        // Delete and protected count run under one write lock.
        let tx = Transaction::new_unchecked(&*self.conn, TransactionBehavior::Immediate)?;
        let removed = tx.execute(
            &format!("DELETE FROM {THEMES_TABLE} WHERE {filter} AND system = 0;"),
            params,
        )?;
        let protected: i64 = tx.query_row(
            &format!("SELECT COUNT(*) FROM {THEMES_TABLE} WHERE {filter};"),
            params,
            |row| row.get(0),
        )?;
        tx.commit()?;

        if protected > 0 {
            warn!(
                "event=theme_delete module=repo status=skipped scope={} removed={} protected={}",
                scope, removed, protected
            );
        } else {
            info!(
                "event=theme_delete module=repo status=ok scope={} removed={}",
                scope, removed
            );
        }
        Ok(removed)
    }
}

impl ThemeRepository for SqliteThemeRepository<'_> {
    fn list_themes(&self, projection: Option<&[&str]>) -> CatalogResult<ResultSet> {
        let sql = format!("{} ORDER BY _id ASC;", select_sql(projection)?);
        self.query("all", &sql, params![])
    }

    fn list_themes_by_package(&self, package_name: &str) -> CatalogResult<ResultSet> {
        validate_key_component("package_name", package_name)?;
        let sql = format!(
            "{} WHERE theme_package = ?1 ORDER BY _id ASC;",
            select_sql(None)?
        );
        self.query("package", &sql, [package_name])
    }

    fn get_applied_theme(&self) -> CatalogResult<ResultSet> {
        let sql = format!("{} WHERE is_applied = 1 ORDER BY _id ASC;", select_sql(None)?);
        self.query("applied", &sql, params![])
    }

    fn get_theme(&self, package_name: &str, theme_id: &str) -> CatalogResult<ResultSet> {
        validate_key_component("package_name", package_name)?;
        validate_key_component("theme_id", theme_id)?;
        let sql = format!(
            "{} WHERE theme_package = ?1 AND theme_id = ?2;",
            select_sql(None)?
        );
        self.query("key", &sql, [package_name, theme_id])
    }

    fn query_locator(&self, locator: &Locator) -> CatalogResult<ResultSet> {
        match locator.target() {
            Some(LocatorTarget::Item(key)) => self.get_theme(&key.package_name, &key.theme_id),
            Some(LocatorTarget::Collection) => self.list_themes(None),
            None => Err(CatalogError::InvalidArgument(format!(
                "locator does not address the theme catalog: {locator}"
            ))),
        }
    }

    fn insert_theme(&mut self, record: &ThemeRecord) -> CatalogResult<i64> {
        record.validate()?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        if record.is_applied {
            tx.execute(
                "UPDATE themes SET is_applied = 0 WHERE is_applied <> 0;",
                [],
            )?;
        }

        let inserted = tx.execute(
            "INSERT INTO themes (
                theme_id,
                theme_package,
                is_applied,
                name,
                style_name,
                author,
                is_drm,
                wallpaper_name,
                wallpaper_uri,
                lock_wallpaper_name,
                lock_wallpaper_uri,
                ringtone_name,
                ringtone_uri,
                notif_ringtone_name,
                notif_ringtone_uri,
                thumbnail_uri,
                preview_uri,
                system
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18);",
            params![
                record.theme_id.as_str(),
                record.package_name.as_str(),
                bool_to_int(record.is_applied),
                record.name.as_str(),
                record.style_name.as_str(),
                record.author.as_str(),
                bool_to_int(record.is_drm),
                record.wallpaper_name.as_deref(),
                locator_text(&record.wallpaper_uri),
                record.lock_wallpaper_name.as_deref(),
                locator_text(&record.lock_wallpaper_uri),
                record.ringtone_name.as_deref(),
                locator_text(&record.ringtone_uri),
                record.notification_ringtone_name.as_deref(),
                locator_text(&record.notification_ringtone_uri),
                locator_text(&record.thumbnail_uri),
                locator_text(&record.preview_uri),
                bool_to_int(record.is_system),
            ],
        );

        match inserted {
            Ok(_) => {}
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::ConstraintViolation =>
            {
                return Err(CatalogError::InvalidArgument(format!(
                    "theme already exists: {}",
                    record.key()
                )));
            }
            Err(err) => return Err(err.into()),
        }

        let id = tx.last_insert_rowid();
        tx.commit()?;

        info!(
            "event=theme_insert module=repo status=ok package={} theme_id={} row_id={} system={} applied={}",
            record.package_name, record.theme_id, id, record.is_system, record.is_applied
        );
        Ok(id)
    }

    fn delete_theme(&self, package_name: &str, theme_id: &str) -> CatalogResult<usize> {
        validate_key_component("package_name", package_name)?;
        validate_key_component("theme_id", theme_id)?;
        self.delete_where(
            "theme",
            "theme_package = ?1 AND theme_id = ?2",
            [package_name, theme_id],
        )
    }

    fn delete_themes_by_package(&self, package_name: &str) -> CatalogResult<usize> {
        validate_key_component("package_name", package_name)?;
        self.delete_where("package", "theme_package = ?1", [package_name])
    }

    fn mark_applied_theme(&mut self, package_name: &str, theme_id: &str) -> CatalogResult<()> {
        validate_key_component("package_name", package_name)?;
        validate_key_component("theme_id", theme_id)?;

        let started_at = Instant::now();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let cleared = tx.execute(
            "UPDATE themes SET is_applied = 0 WHERE is_applied <> 0;",
            [],
        )?;
        let applied = tx.execute(
            "UPDATE themes
             SET is_applied = 1
             WHERE theme_package = ?1
               AND theme_id = ?2;",
            [package_name, theme_id],
        )?;
        tx.commit()?;

        if applied == 0 {
            warn!(
                "event=theme_mark_applied module=repo status=ok package={} theme_id={} cleared={} applied=0 duration_ms={}",
                package_name,
                theme_id,
                cleared,
                started_at.elapsed().as_millis()
            );
        } else {
            info!(
                "event=theme_mark_applied module=repo status=ok package={} theme_id={} cleared={} applied={} duration_ms={}",
                package_name,
                theme_id,
                cleared,
                applied,
                started_at.elapsed().as_millis()
            );
        }
        Ok(())
    }
}

fn select_sql(projection: Option<&[&str]>) -> CatalogResult<String> {
    let columns: &[&str] = match projection {
        None => ALL_COLUMNS,
        Some([]) => {
            return Err(CatalogError::InvalidArgument(
                "projection must name at least one column".to_string(),
            ));
        }
        Some(requested) => {
            // Column names are formatted into SQL, so only known names pass.
            if let Some(unknown) = requested.iter().find(|name| !is_known_column(name)) {
                return Err(CatalogError::InvalidArgument(format!(
                    "unknown column in projection: `{unknown}`"
                )));
            }
            requested
        }
    };
    Ok(format!("SELECT {} FROM {THEMES_TABLE}", columns.join(", ")))
}

fn locator_text(value: &Option<Locator>) -> Option<&str> {
    value.as_ref().map(Locator::as_str)
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
