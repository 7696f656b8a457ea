//! `pricebook-recon` — material purchase-price reconciliation engine.
//!
//! Pure engine crate: receives pre-loaded rows and snapshots, returns a
//! validated import batch, per-row outcomes, and a replace plan for the
//! price master. No CLI or IO dependencies.

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod group;
pub mod model;
pub mod normalize;
pub mod price;
pub mod rates;
pub mod report;
pub mod select;
pub mod transform;
pub mod units;
pub mod validate;

pub use config::ImportConfig;
pub use engine::run;
pub use error::ImportError;
pub use model::{ImportInput, ImportResult, MaterialClass, RawMaterialRow};
