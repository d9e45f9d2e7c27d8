//! Type definitions for the Markdown processor.
//!
//! # Examples
//!
//! ```
//! use mdtree_commonmark::{MarkdownOptions, MarkdownProcessor};
//!
//! let options = MarkdownOptions {
//!   gfm: false,
//!   ..Default::default()
//! };
//!
//! let processor = MarkdownProcessor::new(options);
//! ```
use comrak::nodes::AstNode;

use crate::{entities::EntityTable, template::CodeBlockTemplate};

/// Options for configuring the Markdown processor.
#[derive(Debug, Clone)]
pub struct MarkdownOptions {
  /// Enable GitHub Flavored Markdown extensions (tables, strikethrough, task
  /// lists, autolinks, footnotes).
  pub gfm: bool,

  /// Template used for code blocks that name a language.
  pub code_block_template: Option<CodeBlockTemplate>,

  /// Replacement entity table. When set it replaces the default escaping of
  /// text and code entirely.
  pub entities: Option<EntityTable>,
}

impl Default for MarkdownOptions {
  fn default() -> Self {
    Self {
      gfm:                 true,
      code_block_template: None,
      entities:            None,
    }
  }
}

/// Builder for constructing `MarkdownOptions` with method chaining.
#[derive(Debug, Clone, Default)]
pub struct MarkdownOptionsBuilder {
  options: MarkdownOptions,
}

impl MarkdownOptionsBuilder {
  /// Create a new builder with default options.
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Enable or disable GitHub Flavored Markdown.
  #[must_use]
  pub const fn gfm(mut self, enabled: bool) -> Self {
    self.options.gfm = enabled;
    self
  }

  /// Set the code block template.
  #[must_use]
  pub fn code_block_template(
    mut self,
    template: Option<CodeBlockTemplate>,
  ) -> Self {
    self.options.code_block_template = template;
    self
  }

  /// Set the replacement entity table.
  #[must_use]
  pub fn entities(mut self, entities: Option<EntityTable>) -> Self {
    self.options.entities = entities;
    self
  }

  /// Build the final options.
  #[must_use]
  pub fn build(self) -> MarkdownOptions {
    self.options
  }
}

/// Main Markdown processor.
///
/// Holds no per-document state, so one instance renders any number of
/// documents.
#[derive(Debug, Clone)]
pub struct MarkdownProcessor {
  pub(crate) options: MarkdownOptions,
}

/// Trait for in-place AST rewrites.
pub trait AstTransformer {
  fn transform<'a>(&self, node: &'a AstNode<'a>);
}
