//! Markdown processing.
//!
//! - [`core`]: the `MarkdownProcessor` rendering pipeline
//! - [`transform`]: AST rewrites applied between parsing and rendering
//! - [`types`]: options, builder and the processor struct
pub mod core;
pub mod transform;
pub mod types;

pub use transform::{CodeBlockTransformer, EntityTransformer};
pub use types::{
  AstTransformer,
  MarkdownOptions,
  MarkdownOptionsBuilder,
  MarkdownProcessor,
};
