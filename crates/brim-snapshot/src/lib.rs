//! Snapshot archive codec for brim.
//!
//! A snapshot is persisted as one newline-terminated text record per object
//! in a fixed column order, wrapped in a zstd frame with its content
//! checksum enabled so long-term archives detect silent corruption and
//! truncation. The codec loads either compressed (`.zst`) or plain
//! archives, detected by extension, and always writes compressed.
//!
//! # Modules
//!
//! - [`record`] — the delimited record line format
//! - [`codec`] — [`load`], [`save`], the atomic write path
//! - [`archive`] — archive naming, timestamping, and auto-selection

pub mod archive;
pub mod codec;
pub mod error;
pub mod record;

pub use archive::{latest_proxy, ArchiveSet, TS_FORMAT};
pub use codec::{load, save, ZSTD_LEVEL};
pub use error::{SnapshotError, SnapshotResult};
pub use record::{decode_record, encode_record, FIELD_COUNT};
