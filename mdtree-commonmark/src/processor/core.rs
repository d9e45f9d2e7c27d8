//! Core implementation of the Markdown processor.
use comrak::{Arena, options::Options, parse_document};
use log::{error, trace};

use super::{
  transform::{CodeBlockTransformer, EntityTransformer},
  types::{AstTransformer, MarkdownOptions, MarkdownProcessor},
};

impl MarkdownProcessor {
  /// Create a new `MarkdownProcessor` with the given options.
  #[must_use]
  pub const fn new(options: MarkdownOptions) -> Self {
    Self { options }
  }

  /// Access processor options.
  #[must_use]
  pub const fn options(&self) -> &MarkdownOptions {
    &self.options
  }

  /// Render Markdown to HTML.
  ///
  /// Rendering is total: any input produces some HTML.
  #[must_use]
  pub fn render(&self, markdown: &str) -> String {
    let arena = Arena::new();
    let options = self.comrak_options();
    let root = parse_document(&arena, markdown, &options);

    // Templated blocks become raw HTML first, so the entity pass only sees
    // code the template did not claim.
    if let Some(ref template) = self.options.code_block_template {
      CodeBlockTransformer::new(template, self.options.entities.as_ref())
        .transform(root);
    }
    if let Some(ref entities) = self.options.entities {
      EntityTransformer::new(entities).transform(root);
    }

    let mut html = String::with_capacity(markdown.len() * 2);
    if let Err(e) = comrak::format_html(root, &options, &mut html) {
      error!("Failed to format HTML: {e}");
    }

    trace!("Rendered {} bytes of markdown", markdown.len());
    html
  }

  fn comrak_options(&self) -> Options<'static> {
    let mut options = Options::default();
    if self.options.gfm {
      options.extension.table = true;
      options.extension.footnotes = true;
      options.extension.strikethrough = true;
      options.extension.tasklist = true;
      options.extension.autolink = true;
    }
    // Templates and entity tables emit raw HTML nodes
    options.render.r#unsafe = true;
    options.extension.header_ids = None;
    options
  }
}
