//! Drag-and-drop protocol for moving insights between collections.
//!
//! A drag carries a self-describing [`DragPayload`] from the widget where it
//! started to the collection where it ends:
//! - drag start captures the insight and its origin and encodes them
//! - drag over / leave arm and disarm a drop target (presentation only)
//! - drop decodes the payload and hands it to the store
//!
//! The payload is a message, not a reference into live state.

mod payload;
mod session;

pub use payload::{DragPayload, PAYLOAD_FORMAT};
pub use session::{DragSession, DropKind, DropOutcome};
