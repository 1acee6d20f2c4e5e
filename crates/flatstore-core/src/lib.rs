//! # flatstore
//!
//! Persistence for small services that keep each collection in one file
//! holding a JSON array of objects.
//!
//! - [`parser`] scans the array incrementally, one top-level object at a
//!   time, so lookups can stop reading at the first match.
//! - [`matcher`] evaluates flat filters with Exact and Contains modes.
//! - [`reader`] loads, looks up and filters documents.
//! - [`writer`] appends in place and publishes replace/remove through a temp
//!   file and an atomic rename.
//!
//! ```no_run
//! use flatstore::{Filter, JsonStore};
//!
//! # async fn demo() -> flatstore::Result<()> {
//! let store = JsonStore::default();
//! let rust_courses = store
//!     .find_all("bd/courses.json", &Filter::new().contains("title", "Rust"))
//!     .await?;
//! # Ok(())
//! # }
//! ```

#![warn(rust_2018_idioms)]

pub mod config;
pub mod document;
pub mod error;
pub mod matcher;
pub mod parser;
pub mod reader;
pub mod store;
pub mod writer;

pub use config::{ScanLimits, StoreConfig};
pub use document::{Document, ID_FIELD, to_document};
pub use error::{Result, StoreError};
pub use matcher::{FieldFilter, Filter, MatchMode, matches_all_exact};
pub use parser::{ObjectScanner, ObjectStream, ParseError, ParseEvent, ScannedObject};
pub use reader::StoreReader;
pub use store::JsonStore;
pub use writer::{StoreWriter, WriteLocks};
