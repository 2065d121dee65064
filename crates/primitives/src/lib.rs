//! Core text types shared between the spellmark engine and its hosts.

/// Boxed future aliases.
pub mod future;
/// Document snapshots backed by a rope.
pub mod snapshot;
/// Line/column positions, ranges, spans and edits.
pub mod span;

pub use future::BoxFutureStatic;
pub use ropey::{Rope, RopeSlice};
pub use snapshot::DocumentSnapshot;
pub use span::{Position, Span, TextEdit, TextRange};
