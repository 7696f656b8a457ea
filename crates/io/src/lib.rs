//! `pricebook-io` — file boundary for the import pipeline.
//!
//! Turns workbooks and snapshot CSVs into the engine's input types. Every
//! external fetch failure surfaces here, before the pure pipeline runs, so
//! an aborted load leaves nothing half-done.

pub mod error;
pub mod rows;
pub mod snapshot;

pub use error::IoError;
pub use rows::load_rows;
pub use snapshot::{load_catalog, load_rates};
