//! Per-object metadata and multi-digest collection.
//!
//! [`collect`] turns one store path into an [`ObjectRecord`]: a single stat
//! for size and timestamps, a single chunked read pass feeding every
//! requested digest accumulator, and a best-effort content-type label from
//! a [`Classify`] capability.
//!
//! Classification never fails a collect call: any classifier failure
//! resolves to the [`UNCLASSIFIED`](brim_types::UNCLASSIFIED) sentinel.

pub mod classify;
pub mod collector;
pub mod error;

pub use classify::{Classify, FileCommand, Fixed, Unavailable};
pub use collector::{collect, fingerprint_file, CHUNK_BYTES};
pub use error::{CollectError, CollectResult};
