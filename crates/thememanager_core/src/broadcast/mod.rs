//! Ordered, permission-gated change requests.
//!
//! # Responsibility
//! - Carry "make this theme/style active" requests to external handlers.
//! - Deliver each request to registered handlers in descending priority,
//!   letting any handler modify it or abort further delivery.
//!
//! # Invariants
//! - Dispatch never touches the catalog store; activation is finalized by a
//!   handler calling back into `mark_applied_theme`.
//! - Dispatch without `CHANGE_CONFIGURATION` fails; it is never a no-op.
//! - A shut-down bus rejects requests immediately; there is no retry.

pub mod bus;
pub mod dispatcher;
pub mod permission;
pub mod request;
