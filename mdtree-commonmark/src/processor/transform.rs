//! AST transformers applied between parsing and HTML formatting.
//!
//! Both transformers replace nodes with raw HTML nodes, which the formatter
//! writes verbatim.
use comrak::nodes::{AstNode, NodeHtmlBlock, NodeValue};
use log::trace;

use super::types::AstTransformer;
use crate::{
  codeblock::{info_language, split_lang_marker, trim_trailing_newlines},
  entities::EntityTable,
  template::CodeBlockTemplate,
};

/// Escape code with the entity table if there is one, default escaping
/// otherwise.
fn escape_code(code: &str, entities: Option<&EntityTable>) -> String {
  entities.map_or_else(
    || html_escape::encode_text(code).into_owned(),
    |table| table.escape(code),
  )
}

fn html_block(literal: String) -> NodeValue {
  NodeValue::HtmlBlock(NodeHtmlBlock {
    block_type: 0,
    literal,
  })
}

/// Renders code blocks through a [`CodeBlockTemplate`].
///
/// A block qualifies when its first line is a `lang:<name>` marker, or, for
/// fenced blocks, when the info string names a language. The marker line is
/// dropped and trailing newlines are trimmed before substitution.
pub struct CodeBlockTransformer<'t> {
  template: &'t CodeBlockTemplate,
  entities: Option<&'t EntityTable>,
}

impl<'t> CodeBlockTransformer<'t> {
  #[must_use]
  pub const fn new(
    template: &'t CodeBlockTemplate,
    entities: Option<&'t EntityTable>,
  ) -> Self {
    Self { template, entities }
  }

  /// Templated HTML for a block, or `None` if the block names no language.
  #[must_use]
  pub fn render_block(&self, info: &str, literal: &str) -> Option<String> {
    let (language, code) = split_lang_marker(literal)
      .or_else(|| info_language(info).map(|lang| (lang, literal)))?;

    let language = html_escape::encode_double_quoted_attribute(language);
    let code = escape_code(trim_trailing_newlines(code), self.entities);
    Some(self.template.format(&language, &code))
  }
}

impl AstTransformer for CodeBlockTransformer<'_> {
  fn transform<'a>(&self, node: &'a AstNode<'a>) {
    for descendant in node.descendants() {
      let mut data = descendant.data.borrow_mut();
      let NodeValue::CodeBlock(ref block) = data.value else {
        continue;
      };
      if let Some(html) = self.render_block(&block.info, &block.literal) {
        trace!("Applied code block template");
        data.value = html_block(html);
      }
    }
  }
}

/// Escapes text and code with a replacement [`EntityTable`].
///
/// Text inside image descriptions is left alone: it ends up in an `alt`
/// attribute, which the formatter escapes itself.
pub struct EntityTransformer<'t> {
  entities: &'t EntityTable,
}

impl<'t> EntityTransformer<'t> {
  #[must_use]
  pub const fn new(entities: &'t EntityTable) -> Self {
    Self { entities }
  }

  fn code_block_html(&self, info: &str, literal: &str) -> String {
    let class = info_language(info).map_or_else(String::new, |lang| {
      format!(
        " class=\"language-{}\"",
        html_escape::encode_double_quoted_attribute(lang)
      )
    });
    format!(
      "<pre><code{class}>{}</code></pre>",
      self.entities.escape(literal)
    )
  }
}

fn inside_image<'a>(node: &'a AstNode<'a>) -> bool {
  node
    .ancestors()
    .skip(1)
    .any(|a| matches!(a.data.borrow().value, NodeValue::Image(_)))
}

impl AstTransformer for EntityTransformer<'_> {
  fn transform<'a>(&self, node: &'a AstNode<'a>) {
    for descendant in node.descendants() {
      if inside_image(descendant) {
        continue;
      }

      let mut data = descendant.data.borrow_mut();
      let replacement = match data.value {
        NodeValue::Text(ref text) => {
          NodeValue::HtmlInline(self.entities.escape(text))
        },
        NodeValue::Code(ref code) => {
          NodeValue::HtmlInline(format!(
            "<code>{}</code>",
            self.entities.escape(&code.literal)
          ))
        },
        NodeValue::CodeBlock(ref block) => {
          html_block(self.code_block_html(&block.info, &block.literal))
        },
        _ => continue,
      };
      data.value = replacement;
    }
  }
}
