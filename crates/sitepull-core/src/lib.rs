//! Content document transformation pipeline.
//!
//! Turns documents fetched from a headless content store into the files a
//! static site generator builds from:
//!
//! ```text
//! documents ─▶ overlay ─▶ assets / entries ─▶ transform ─▶ path ─▶ serialize ─▶ OutputFile
//! ```
//!
//! - [`overlay`]: draft/published resolution
//! - [`transform`]: typed field rewriting (slugs, assets, colors, references)
//! - [`path`]: output paths following [`Generator`] conventions
//! - [`serialize`]: YAML, TOML, JSON, Markdown front matter and HTML output
//! - [`pipeline`]: the whole run, computed before anything is written
//! - [`writer`]: writing the rendered files to disk
//!
//! # Example
//!
//! ```ignore
//! use sitepull_core::{Generator, PipelineOptions, run, write_files};
//!
//! let options = PipelineOptions { generator: Generator::Hugo, preview: false };
//! let files = run(documents, &options)?;
//! write_files(Path::new("site"), &files)?;
//! ```

pub mod deep_map;
pub mod document;
mod error;
pub mod overlay;
pub mod path;
pub mod pipeline;
pub mod serialize;
pub mod transform;
pub mod writer;

pub use document::{AssetKind, Document, Role};
pub use error::{PipelineError, SerializeError, TransformError, UnknownGenerator};
pub use path::Generator;
pub use pipeline::{OutputFile, PipelineOptions, run};
pub use writer::write_files;
