//! # tlktool Core
//!
//! Shared foundation for the tlktool workspace: the error taxonomy and the
//! document model exchanged between the TLK codec and external renderers.
//!
//! The codec itself lives in `tlktool-tlk`; rendering layers (XML, plain
//! text) consume [`TlkDocument`] and produce [`TlkEntry`] lists without
//! ever touching the binary format.

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{TlkDocument, TlkEntry};
