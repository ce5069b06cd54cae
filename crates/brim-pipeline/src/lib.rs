//! The scan-classify-persist pipeline.
//!
//! [`run`] sequences the whole of one inventory run: load the prior
//! snapshot, walk the store, collect records for new objects, reconcile,
//! and persist the three partition archives. All configuration arrives in
//! one explicit [`RunConfig`]; there is no ambient state.

pub mod config;
pub mod driver;
pub mod error;
pub mod report;

pub use config::{ProxySource, RunConfig};
pub use driver::run;
pub use error::{PipelineError, PipelineResult};
pub use report::RunReport;
