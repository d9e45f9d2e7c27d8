//! The immutable description of one conversion run.
use std::{
  collections::BTreeSet,
  fmt,
  path::PathBuf,
};

use encoding_rs::{Encoding, UTF_8};
use mdtree_commonmark::{
  CodeBlockTemplate,
  EntityTable,
  MarkdownOptions,
  MarkdownOptionsBuilder,
};

/// Where header or footer text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
  /// Literal text, used as is.
  Text(String),

  /// A file on disk, read with the job's encoding.
  Path(PathBuf),

  /// A URL. Only `file://` URLs can be resolved.
  Url(String),
}

impl TemplateSource {
  /// Interpret a reference from the command line or a config file: anything
  /// with a scheme is a URL, everything else a path.
  #[must_use]
  pub fn from_reference(reference: &str) -> Self {
    if reference.contains("://") {
      Self::Url(reference.to_owned())
    } else {
      Self::Path(PathBuf::from(reference))
    }
  }
}

impl fmt::Display for TemplateSource {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Text(_) => f.write_str("<inline text>"),
      Self::Path(path) => write!(f, "{}", path.display()),
      Self::Url(url) => f.write_str(url),
    }
  }
}

/// Everything a run needs, fixed before traversal starts.
#[derive(Debug, Clone)]
pub struct ConversionJob {
  pub source_root:         PathBuf,
  pub destination_root:    PathBuf,
  pub header:              Option<TemplateSource>,
  pub footer:              Option<TemplateSource>,
  pub code_block_template: Option<CodeBlockTemplate>,
  pub entity_overrides:    Option<EntityTable>,

  /// Extensions (without dot) to convert. Empty means all of them.
  pub allowed_extensions: BTreeSet<String>,

  /// Encoding for every read and write.
  pub encoding: &'static Encoding,

  /// Enable GitHub Flavored Markdown extensions.
  pub gfm: bool,

  /// Visit directory entries sorted by file name instead of filesystem order.
  pub sort_entries: bool,
}

impl ConversionJob {
  /// A job with no header, footer, template or filter, reading and writing
  /// UTF-8.
  #[must_use]
  pub fn new(
    source_root: impl Into<PathBuf>,
    destination_root: impl Into<PathBuf>,
  ) -> Self {
    Self {
      source_root:         source_root.into(),
      destination_root:    destination_root.into(),
      header:              None,
      footer:              None,
      code_block_template: None,
      entity_overrides:    None,
      allowed_extensions:  BTreeSet::new(),
      encoding:            UTF_8,
      gfm:                 true,
      sort_entries:        true,
    }
  }

  #[must_use]
  pub fn with_header(mut self, header: TemplateSource) -> Self {
    self.header = Some(header);
    self
  }

  #[must_use]
  pub fn with_footer(mut self, footer: TemplateSource) -> Self {
    self.footer = Some(footer);
    self
  }

  #[must_use]
  pub fn with_code_block_template(mut self, template: CodeBlockTemplate) -> Self {
    self.code_block_template = Some(template);
    self
  }

  #[must_use]
  pub fn with_entity_overrides(mut self, entities: EntityTable) -> Self {
    self.entity_overrides = Some(entities);
    self
  }

  #[must_use]
  pub fn with_allowed_extensions<I, S>(mut self, extensions: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.allowed_extensions = extensions.into_iter().map(Into::into).collect();
    self
  }

  #[must_use]
  pub const fn with_encoding(mut self, encoding: &'static Encoding) -> Self {
    self.encoding = encoding;
    self
  }

  #[must_use]
  pub const fn with_sorted_entries(mut self, sort: bool) -> Self {
    self.sort_entries = sort;
    self
  }

  /// Whether a file with extension `ext` passes the filter.
  #[must_use]
  pub fn allows_extension(&self, ext: &str) -> bool {
    self.allowed_extensions.is_empty() || self.allowed_extensions.contains(ext)
  }

  /// Engine options derived from this job.
  #[must_use]
  pub fn markdown_options(&self) -> MarkdownOptions {
    MarkdownOptionsBuilder::new()
      .gfm(self.gfm)
      .code_block_template(self.code_block_template.clone())
      .entities(self.entity_overrides.clone())
      .build()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_filter_allows_everything() {
    let job = ConversionJob::new("/src", "/dst");
    assert!(job.allows_extension("md"));
    assert!(job.allows_extension(""));
  }

  #[test]
  fn filter_is_exact() {
    let job =
      ConversionJob::new("/src", "/dst").with_allowed_extensions(["markdown"]);
    assert!(job.allows_extension("markdown"));
    assert!(!job.allows_extension("md"));
    assert!(!job.allows_extension("Markdown"));
  }

  #[test]
  fn template_source_reference() {
    assert_eq!(
      TemplateSource::from_reference("templates/header.html"),
      TemplateSource::Path(PathBuf::from("templates/header.html"))
    );
    assert_eq!(
      TemplateSource::from_reference("file:///tmp/header.html"),
      TemplateSource::Url("file:///tmp/header.html".to_string())
    );
  }
}
