use std::{fmt, io, path::PathBuf};

use mdtree_utils::PathError;
use thiserror::Error;

/// An external input a run cannot start without.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
  Source,
  Header,
  Footer,
}

impl fmt::Display for Resource {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Source => "source directory",
      Self::Header => "header",
      Self::Footer => "footer",
    })
  }
}

/// Errors raised while converting a tree.
///
/// [`ResourceUnavailable`](Self::ResourceUnavailable) and
/// [`DestinationCreate`](Self::DestinationCreate) abort the run before any file
/// is touched. The remaining variants are scoped to a single file and only
/// ever reach a [`Reporter`](crate::report::Reporter).
#[derive(Debug, Error)]
pub enum ConvertError {
  #[error("{resource} unavailable: {location}: {reason}")]
  ResourceUnavailable {
    resource: Resource,
    location: String,
    reason:   String,
  },

  #[error("Failed to create destination directory {}: {source}", path.display())]
  DestinationCreate { path: PathBuf, source: io::Error },

  #[error("Failed to read {}: {source}", path.display())]
  FileRead { path: PathBuf, source: io::Error },

  #[error("Failed to write {}: {source}", path.display())]
  FileWrite { path: PathBuf, source: io::Error },

  #[error("Failed to map path into the destination tree: {0}")]
  Remap(#[from] PathError),

  #[error("Failed to traverse source tree: {0}")]
  Traversal(#[from] walkdir::Error),
}

impl ConvertError {
  pub(crate) fn unavailable(
    resource: Resource,
    location: impl Into<String>,
    reason: impl fmt::Display,
  ) -> Self {
    Self::ResourceUnavailable {
      resource,
      location: location.into(),
      reason: reason.to_string(),
    }
  }

  /// Whether this error aborts the whole run.
  #[must_use]
  pub const fn is_fatal(&self) -> bool {
    matches!(
      self,
      Self::ResourceUnavailable { .. } | Self::DestinationCreate { .. }
    )
  }
}
