//! Positionable, typed views over catalog result sets.
//!
//! # Responsibility
//! - Resolve column positions once per result set.
//! - Expose typed accessors for every `ThemeRecord` field.
//!
//! # Invariants
//! - The wrapped result set is released exactly once, by `release()` or on
//!   drop.
//! - Accessors never guess: missing rows, columns or released handles are
//!   errors; only locator text degrades to `None`.

pub mod theme_item;
