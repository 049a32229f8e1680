//! Domain layer - core types, configuration and errors.
//!
//! This layer contains the extraction data model and the parsed markup
//! tree without any IO.

pub mod config;
pub mod error;
pub mod markup;
pub mod models;

pub use config::{AppConfig, LoaderConfig};
pub use error::{AppError, Result};
pub use markup::{Document, Tag};
pub use models::{
    Entry, ExtractionResult, IssueDraft, Metadata, Priority, Section, Sections, Source, Team,
};
