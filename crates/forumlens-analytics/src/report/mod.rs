//! Output files of an analytics run.

pub mod markdown;
pub mod writer;

pub use markdown::{CategoryKeywords, TrendReport, REPORT_FILE};
pub use writer::{Manifest, ManifestEntry, ReportWriter, MANIFEST_FILE};
