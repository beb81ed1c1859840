//! Catalog use-case services.
//!
//! # Responsibility
//! - Combine repository queries with locator resolution and cursor wrapping.
//! - Keep callers decoupled from SQL and from where the default theme lives.

pub mod theme_service;
