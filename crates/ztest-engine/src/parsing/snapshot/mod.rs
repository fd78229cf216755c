//! # Snapshot Testing Support
//!
//! Utilities for testing the parser via snapshot assertions and invariant checks.
//!
//! ## Modules
//!
//! - **`normalize`**: Converts a `ParsedFile` to a stable `Snap` that serializes
//!   for `insta` and renders as one line per case and item
//! - **`invariants`**: Runtime checks for parser correctness (line numbers never
//!   go backwards, no globals after the first case, no empty cases, items sit
//!   below their case header)

pub mod invariants;
pub mod normalize;

pub use invariants::check as invariants;
pub use normalize::{Snap, normalize};
