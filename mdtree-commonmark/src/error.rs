use thiserror::Error;

/// Problems found while parsing a code block template.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TemplateError {
  #[error("code block template has no %s slot")]
  NoSlots,

  #[error(
    "code block template references argument {0}, only 2 are available \
     (language, code)"
  )]
  MissingArgument(usize),

  #[error("unsupported conversion '%{0}' in code block template")]
  UnsupportedConversion(String),

  #[error("code block template ends with a dangling '%'")]
  Dangling,
}

/// Problems found while building an entity table.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EntityError {
  #[error("entity key must be exactly one character, got {0:?}")]
  NotSingleChar(String),
}
