use std::io;

use mdtree_commonmark::{EntityError, TemplateError};
use thiserror::Error;

/// Error type for mdtree-config operations
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("Configuration error: {0}")]
  Config(String),

  #[error("I/O error: {0}")]
  Io(#[from] io::Error),

  #[error("Invalid code block template: {0}")]
  Template(#[from] TemplateError),

  #[error("Invalid entity table: {0}")]
  Entity(#[from] EntityError),

  #[error("Unknown encoding: {0}")]
  UnknownEncoding(String),

  #[error("A source directory is required")]
  MissingSource,
}
