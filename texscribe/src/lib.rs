//! texscribe - fluent LaTeX source writer
//!
//! Builds LaTeX documents as text while keeping the structure balanced:
//! sections track their nesting depth, and every environment, list and table
//! opened through the writer is closed, either by a scope guard or, as a last
//! resort, when the document is rendered.
//!
//! ```no_run
//! use texscribe::{DocumentBuilder, DocumentClass, TableOptions};
//!
//! let mut doc = DocumentBuilder::new()
//!     .class(DocumentClass::Article)
//!     .title("Results")
//!     .package("booktabs")
//!     .title_page(true)
//!     .build()?;
//!
//! {
//!     let mut results = doc.section("Results");
//!     let mut table = results.table(TableOptions::new("lr").caption("Timings"));
//!     table.top_rule().write_row(["case", "ms"]).mid_rule();
//!     table.write_row(["cold", "120"]).bottom_rule();
//! }
//!
//! doc.write_to_file("results.tex")?;
//! # Ok::<(), texscribe::Error>(())
//! ```

#![deny(unsafe_code)]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::all))]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::pedantic))]
// Allow some pedantic lints that are too strict for this project
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::return_self_not_must_use)]

pub mod builder;
pub mod config;
pub mod error;
pub mod format;
pub mod level;
pub mod scope;
pub mod sink;
pub mod writer;

pub use builder::{BuildError, DocumentBuilder, DocumentClass, DocumentDate};
pub use config::{DocumentConfig, DocumentConfigError};
pub use error::{Error, Result};
pub use format::TexStrExt;
pub use level::{LevelError, NestingLevel};
pub use scope::ScopeHandle;
pub use sink::{Bookmark, SinkError, TextSink};
pub use writer::{DocumentWriter, TableOptions, WriterError};

use std::path::Path;

/// Load a TOML configuration file and build a writer from it
///
/// # Parameters
/// * `path` - Path to the configuration file
///
/// # Returns
/// * `Ok(DocumentWriter)` - Writer with the configured preamble emitted
/// * `Err(Error)` - The file could not be read or parsed, or names an unknown class
pub fn writer_from_config<P: AsRef<Path>>(path: P) -> Result<DocumentWriter> {
    let config = DocumentConfig::load(&path)?;
    log::debug!("Loaded document config from {}", path.as_ref().display());
    Ok(config.into_builder().build()?)
}
