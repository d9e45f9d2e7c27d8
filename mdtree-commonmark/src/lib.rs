//! # mdtree-commonmark
//!
//! The Markdown engine behind mdtree. It turns CommonMark (optionally with GFM
//! extensions) into HTML using `comrak`, and adds two knobs on top:
//!
//! - a **code block template**, a two-slot format pattern (`%s` for the
//!   language, `%s` for the escaped code) applied to code blocks that carry a
//!   `lang:<name>` marker on their first line;
//! - an **entity table**, a character to replacement mapping that fully
//!   replaces the default HTML escaping when supplied.
//!
//! ## Quick Start
//!
//! ```rust
//! use mdtree_commonmark::{MarkdownOptions, MarkdownProcessor};
//!
//! let processor = MarkdownProcessor::new(MarkdownOptions::default());
//! assert_eq!(processor.render("# H1"), "<h1>H1</h1>\n");
//! ```
//!
//! ## Code block templates
//!
//! ```rust
//! use mdtree_commonmark::{CodeBlockTemplate, MarkdownOptionsBuilder, MarkdownProcessor};
//!
//! let template: CodeBlockTemplate = r#"<pre lang="%s">%s</pre>"#.parse().unwrap();
//! let options = MarkdownOptionsBuilder::new()
//!   .code_block_template(Some(template))
//!   .build();
//!
//! let html = MarkdownProcessor::new(options).render("\tlang:java\n\tpackage my;\n");
//! assert_eq!(html, "<pre lang=\"java\">package my;</pre>\n");
//! ```
mod codeblock;
mod entities;
mod error;
pub mod processor;
mod template;
mod utils;

pub use crate::{
  entities::EntityTable,
  error::{EntityError, TemplateError},
  processor::{
    AstTransformer,
    CodeBlockTransformer,
    EntityTransformer,
    MarkdownOptions,
    MarkdownOptionsBuilder,
    MarkdownProcessor,
  },
  template::CodeBlockTemplate,
};
