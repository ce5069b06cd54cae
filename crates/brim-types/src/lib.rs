//! Foundation types for brim, the content-addressed store inventory tool.
//!
//! This crate provides the core vocabulary shared by every other brim crate.
//!
//! # Key Types
//!
//! - [`HashPolicy`] — Named digest policy in force for a store (length probe
//!   plus the set of algorithms minted for new records)
//! - [`DigestAlgorithm`] — A single content digest algorithm
//! - [`ObjectRecord`] — One inventoried object, keyed by its digest name
//! - [`Fingerprints`] — Order-stable set of `algorithm:hexdigest` pairs
//! - [`Snapshot`] — The complete recorded inventory of a store

pub mod error;
pub mod policy;
pub mod record;
pub mod snapshot;

pub use error::TypeError;
pub use policy::{DigestAlgorithm, HashPolicy};
pub use record::{Fingerprints, ObjectRecord, UNCLASSIFIED};
pub use snapshot::Snapshot;
