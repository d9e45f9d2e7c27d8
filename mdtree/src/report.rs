//! Progress reporting for a conversion run.
//!
//! The converter never logs directly. It hands every noteworthy event to a
//! [`Reporter`], so callers decide where events end up. The binary uses
//! [`LogReporter`]; tests collect events in memory.
use std::{fmt, path::Path};

use log::Level;

use crate::error::ConvertError;

/// Something that happened to one entry of the source tree.
#[derive(Debug)]
pub enum Event<'a> {
  /// A file was rendered and written.
  Converted {
    source:      &'a Path,
    destination: &'a Path,
  },

  /// A file was left out by the extension filter.
  Skipped {
    source:    &'a Path,
    extension: &'a str,
  },

  /// A file could not be converted. The run goes on.
  Failed {
    source: &'a Path,
    error:  &'a ConvertError,
  },

  /// Something worth a look that did not stop a file from converting.
  Warning {
    path:    Option<&'a Path>,
    message: String,
  },
}

impl Event<'_> {
  /// Log level this event deserves.
  #[must_use]
  pub const fn level(&self) -> Level {
    match self {
      Self::Converted { .. } => Level::Debug,
      Self::Skipped { .. } => Level::Info,
      Self::Failed { .. } | Self::Warning { .. } => Level::Warn,
    }
  }
}

impl fmt::Display for Event<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Converted {
        source,
        destination,
      } => {
        write!(
          f,
          "Converted {} -> {}",
          source.display(),
          destination.display()
        )
      },
      Self::Skipped { source, extension } => {
        write!(
          f,
          "Skipping {} (extension '{extension}' not allowed)",
          source.display()
        )
      },
      Self::Failed { source, error } => {
        write!(f, "Failed to convert {}: {error}", source.display())
      },
      Self::Warning {
        path: Some(path),
        message,
      } => write!(f, "{}: {message}", path.display()),
      Self::Warning {
        path: None,
        message,
      } => f.write_str(message),
    }
  }
}

/// Receiver of conversion events.
pub trait Reporter {
  fn report(&self, event: &Event<'_>);
}

/// Forwards events to the [`log`] facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
  fn report(&self, event: &Event<'_>) {
    log::log!(event.level(), "{event}");
  }
}
