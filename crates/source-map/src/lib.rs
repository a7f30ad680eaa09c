//! Source positions for countess.
//!
//! Analysis results are reported against the text the user wrote, so every
//! layer that points into source text speaks in [`Span`]s and converts them to
//! line/column pairs through a [`LineIndex`] only when printing.

mod line_index;
mod span;

pub use line_index::{Line, LineCol, LineIndex};
pub use span::{ByteOffset, Span};
