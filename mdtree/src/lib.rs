//! Library side of the `mdtree` binary, exposed so the pipeline can be driven
//! and tested without going through the command line.
pub mod cli;
pub mod convert;
pub mod error;
pub mod render;
pub mod report;

pub use convert::{ConversionSummary, TreeConverter, convert};
pub use error::ConvertError;
pub use render::{DocumentRenderer, RenderedDocument, render_document};
pub use report::{Event, LogReporter, Reporter};
