//! Theme catalog service.
//!
//! # Responsibility
//! - Expose the façade operations through one handle.
//! - Resolve item and default-theme locators without touching storage.
//!
//! # Invariants
//! - Service APIs never bypass repository validation.
//! - `resolve_uri` is pure construction.

use crate::cursor::theme_item::ThemeItem;
use crate::error::CatalogResult;
use crate::model::locator::Locator;
use crate::model::theme::ThemeKey;
use crate::repo::result_set::ResultSet;
use crate::repo::theme_repo::ThemeRepository;

/// Source of the device's default theme descriptor.
pub trait DefaultThemeSource {
    fn default_theme(&self) -> ThemeKey;
}

/// Fixed default theme, e.g. read from device configuration at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticDefaultTheme(pub ThemeKey);

impl DefaultThemeSource for StaticDefaultTheme {
    fn default_theme(&self) -> ThemeKey {
        self.0.clone()
    }
}

/// Item locator `content://<authority>/theme/<package>/<themeId>`.
///
/// # Errors
/// - `InvalidArgument` when a component is empty or carries separators.
pub fn resolve_uri(package_name: &str, theme_id: &str) -> CatalogResult<Locator> {
    let key = ThemeKey::new(package_name, theme_id)?;
    Ok(Locator::for_theme(&key)?)
}

/// Use-case handle over a theme repository.
pub struct ThemeCatalog<R: ThemeRepository, D: DefaultThemeSource> {
    repo: R,
    defaults: D,
}

impl<R: ThemeRepository, D: DefaultThemeSource> ThemeCatalog<R, D> {
    pub fn new(repo: R, defaults: D) -> Self {
        Self { repo, defaults }
    }

    /// See [`resolve_uri`].
    pub fn resolve_uri(&self, package_name: &str, theme_id: &str) -> CatalogResult<Locator> {
        resolve_uri(package_name, theme_id)
    }

    /// Item locator of the device default theme.
    pub fn resolve_default_uri(&self) -> CatalogResult<Locator> {
        let key = self.defaults.default_theme();
        resolve_uri(&key.package_name, &key.theme_id)
    }

    pub fn list_themes(&self, projection: Option<&[&str]>) -> CatalogResult<ResultSet> {
        self.repo.list_themes(projection)
    }

    pub fn list_themes_by_package(&self, package_name: &str) -> CatalogResult<ResultSet> {
        self.repo.list_themes_by_package(package_name)
    }

    pub fn get_applied_theme(&self) -> CatalogResult<ResultSet> {
        self.repo.get_applied_theme()
    }

    pub fn delete_theme(&self, package_name: &str, theme_id: &str) -> CatalogResult<usize> {
        self.repo.delete_theme(package_name, theme_id)
    }

    pub fn delete_themes_by_package(&self, package_name: &str) -> CatalogResult<usize> {
        self.repo.delete_themes_by_package(package_name)
    }

    pub fn mark_applied_theme(&mut self, package_name: &str, theme_id: &str) -> CatalogResult<()> {
        self.repo.mark_applied_theme(package_name, theme_id)
    }

    /// Cursor over the theme addressed by `locator`, or `None` when nothing
    /// matches.
    pub fn open_item(&self, locator: &Locator) -> CatalogResult<Option<ThemeItem>> {
        ThemeItem::from_result(Some(self.repo.query_locator(locator)?))
    }

    /// Cursor over the applied theme, or `None` when no theme is applied.
    pub fn applied_item(&self) -> CatalogResult<Option<ThemeItem>> {
        ThemeItem::from_result(Some(self.repo.get_applied_theme()?))
    }

    /// Whether the stored applied theme matches the default descriptor.
    pub fn is_default_applied(&self) -> CatalogResult<bool> {
        let Some(mut item) = self.applied_item()? else {
            return Ok(false);
        };
        let key = self.defaults.default_theme();
        let matches = item.equals_descriptor(&key.package_name, &key.theme_id)?;
        item.release()?;
        Ok(matches)
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    pub fn repo_mut(&mut self) -> &mut R {
        &mut self.repo
    }
}
