//! Surveillance Data
//!
//! Loading and normalizing the monthly statutory infectious-disease report:
//!
//! - **types**: Core records (Record, DiseaseClass, MonthlyCount)
//! - **normalizer**: Wide CSV → long-format records (UTF-8 / CP949, header row 0 or 1)
//! - **mock**: Placeholder dataset served when normalization fails
//! - **dataset**: The loaded table plus provenance, and `load_or_fallback`
//! - **cache**: Memoization keyed by (path, year) with manual invalidation
//! - **error**: Error types
//!
//! # Example
//!
//! ```rust,no_run
//! use mediscope::surveillance::{load_or_fallback, DataSource};
//! use std::path::Path;
//!
//! let dataset = load_or_fallback(Path::new("surveillance.csv"), 2025);
//! if let DataSource::Fallback { reason } = &dataset.source {
//!     eprintln!("serving placeholder data: {}", reason);
//! }
//! for class in dataset.classes() {
//!     println!("{}: {:?}", class, dataset.diseases(Some(&class)));
//! }
//! ```

pub mod cache;
pub mod dataset;
pub mod error;
pub mod mock;
pub mod normalizer;
pub mod types;

pub use cache::DatasetCache;
pub use dataset::{load_or_fallback, DataSource, Dataset, FALLBACK_NOTICE};
pub use error::{LoadError, LoadResult};
pub use normalizer::{is_subtotal, parse_count, Normalized, Normalizer};
pub use types::{DiseaseClass, MonthlyCount, Record, SourceEncoding};
