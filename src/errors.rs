//! Typed store errors.
//!
//! Most failures travel as anyhow errors with context, same as the rest
//! of the crate. The two conditions callers actually branch on (a document
//! that cannot fit a slot, and an id that addresses nothing) get a typed
//! enum so they can be matched with `downcast_ref` instead of string
//! comparison.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Content (new or updated) needs more room than a slot may hold.
    #[error("document is too large ({len} bytes, room cap {max})")]
    TooLarge { len: u64, max: u64 },

    /// No valid document lives at this id.
    #[error("document {id} does not exist in {name}")]
    NotFound { id: u64, name: String },
}
