//! Record store façade over the catalog table.
//!
//! # Responsibility
//! - Define the query/mutation contract for catalog callers.
//! - Keep SQL details behind the repository boundary.
//!
//! # Invariants
//! - At most one row has `is_applied = 1` after any completed mutation.
//! - Key components are validated before they reach SQL.
//! - Rows with `system = 1` are never removed by catalog deletes.

pub mod result_set;
pub mod theme_repo;
