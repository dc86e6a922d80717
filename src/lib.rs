//! Folio - Annotated Document Compiler
//!
//! Core library converting long-form narrative text plus free-form
//! annotation records into a structured, paginated document with
//! deterministic annotation placement and progressive revelation.

pub mod classifier;
pub mod config;
pub mod error;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod position;
pub mod redaction;
pub mod revelation;
pub mod segmenter;

pub use config::FolioConfig;
pub use error::{FolioError, Result};
pub use pipeline::Pipeline;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
