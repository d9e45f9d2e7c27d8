//! Document composition: header, rendered Markdown, footer.
use mdtree_commonmark::MarkdownProcessor;

/// Convert `\r\n` and lone `\r` line endings to `\n`.
///
/// ```
/// use mdtree::render::normalize_eol;
///
/// assert_eq!(normalize_eol("a\r\nb\rc\n"), "a\nb\nc\n");
/// ```
#[must_use]
pub fn normalize_eol(text: &str) -> String {
  text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Render `content` and wrap it in `header` and `footer`.
///
/// Only header and footer are EOL-normalized. `content` goes to the engine
/// untouched and the engine output is used as is. A missing header or footer
/// is the empty string.
#[must_use]
pub fn render_document(
  content: &str,
  header: Option<&str>,
  footer: Option<&str>,
  processor: &MarkdownProcessor,
) -> String {
  let header = header.map(normalize_eol).unwrap_or_default();
  let footer = footer.map(normalize_eol).unwrap_or_default();
  compose(&header, &processor.render(content), &footer)
}

fn compose(header: &str, body: &str, footer: &str) -> String {
  let mut html = String::with_capacity(header.len() + body.len() + footer.len());
  html.push_str(header);
  html.push_str(body);
  html.push_str(footer);
  html
}

/// HTML produced for a single source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
  pub html: String,
}

/// Renders every document of a run with the same header, footer and engine.
///
/// Header and footer are normalized once, when the renderer is built.
#[derive(Debug, Clone)]
pub struct DocumentRenderer {
  header:    String,
  footer:    String,
  processor: MarkdownProcessor,
}

impl DocumentRenderer {
  #[must_use]
  pub fn new(
    header: Option<&str>,
    footer: Option<&str>,
    processor: MarkdownProcessor,
  ) -> Self {
    Self {
      header: header.map(normalize_eol).unwrap_or_default(),
      footer: footer.map(normalize_eol).unwrap_or_default(),
      processor,
    }
  }

  #[must_use]
  pub fn render(&self, content: &str) -> RenderedDocument {
    RenderedDocument {
      html: compose(&self.header, &self.processor.render(content), &self.footer),
    }
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, reason = "Fine in tests")]
  use mdtree_commonmark::{
    CodeBlockTemplate,
    MarkdownOptions,
    MarkdownOptionsBuilder,
  };

  use super::*;

  fn default_processor() -> MarkdownProcessor {
    MarkdownProcessor::new(MarkdownOptions::default())
  }

  #[test]
  fn eol_normalization() {
    assert_eq!(normalize_eol("<html>\r\n"), "<html>\n");
    assert_eq!(normalize_eol("a\rb"), "a\nb");
    assert_eq!(normalize_eol("\r\r\n"), "\n\n");
    assert_eq!(normalize_eol(""), "");
  }

  #[test]
  fn no_header_or_footer() {
    let html = render_document("# H1", None, None, &default_processor());
    assert_eq!(html, "<h1>H1</h1>\n");

    let html = render_document("# H1", Some(""), Some(""), &default_processor());
    assert_eq!(html, "<h1>H1</h1>\n");
  }

  #[test]
  fn header_and_footer_wrap_the_body() {
    let html = render_document(
      "# H1",
      Some("<html>\n"),
      Some("</html>\n"),
      &default_processor(),
    );
    assert_eq!(html, "<html>\n<h1>H1</h1>\n</html>\n");
  }

  #[test]
  fn crlf_header_renders_like_lf_header() {
    let processor = default_processor();
    let crlf = render_document(
      "text",
      Some("<html>\r\n<body>\r\n"),
      Some("</body>\r</html>\r\n"),
      &processor,
    );
    let lf = render_document(
      "text",
      Some("<html>\n<body>\n"),
      Some("</body>\n</html>\n"),
      &processor,
    );
    assert_eq!(crlf, lf);
  }

  #[test]
  fn code_block_template() {
    let template = CodeBlockTemplate::parse(r#"<pre lang="%s">%s</pre>"#).unwrap();
    let processor = MarkdownProcessor::new(
      MarkdownOptionsBuilder::new()
        .code_block_template(Some(template))
        .build(),
    );

    let html =
      render_document("\tlang:java\n\tpackage my;\n", None, None, &processor);
    assert_eq!(html, "<pre lang=\"java\">package my;</pre>\n");
  }

  #[test]
  fn renderer_matches_free_function() {
    let renderer = DocumentRenderer::new(
      Some("<html>\r\n"),
      Some("</html>\r\n"),
      default_processor(),
    );
    let rendered = renderer.render("# This is an H1\n\nfile.markdown\n");

    assert_eq!(
      rendered.html,
      "<html>\n<h1>This is an H1</h1>\n<p>file.markdown</p>\n</html>\n"
    );
    assert_eq!(
      rendered.html,
      render_document(
        "# This is an H1\n\nfile.markdown\n",
        Some("<html>\n"),
        Some("</html>\n"),
        &default_processor(),
      )
    );
  }
}
