//! Catalog smoke entry point.
//!
//! # Responsibility
//! - Verify `thememanager_core` linkage.
//! - With a database path argument, print one debug line per catalog entry
//!   and the applied theme.

use std::process::ExitCode;
use thememanager_core::db::open_db;
use thememanager_core::{CatalogResult, SqliteThemeRepository, ThemeItem, ThemeRepository};

fn main() -> ExitCode {
    println!("thememanager_core version={}", thememanager_core::core_version());

    let Some(db_path) = std::env::args().nth(1) else {
        return ExitCode::SUCCESS;
    };

    let mut conn = match open_db(&db_path) {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("cannot open catalog `{db_path}`: {err}");
            return ExitCode::FAILURE;
        }
    };

    match print_catalog(&SqliteThemeRepository::new(&mut conn)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("catalog listing failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn print_catalog(repo: &SqliteThemeRepository<'_>) -> CatalogResult<()> {
    let Some(mut item) = ThemeItem::from_result(Some(repo.list_themes(None)?))? else {
        println!("catalog is empty");
        return Ok(());
    };

    for position in 0..item.count()? {
        item.move_to(position)?;
        println!(
            "{} applied={} removable={}",
            item.format_debug()?,
            item.is_applied()?,
            item.is_removable()?
        );
    }
    item.release()?;

    match ThemeItem::from_result(Some(repo.get_applied_theme()?))? {
        Some(applied) => println!("applied={}", applied.identity()?),
        None => println!("applied=none"),
    }
    Ok(())
}
