//! Recomputation engine and edit session.

pub mod engine;
pub mod session;

pub use engine::{apply_edit, recompute, Field, LedgerEdit, TotalsEngine};
pub use session::{EditSession, Notification, NotificationKind, SessionMode};
