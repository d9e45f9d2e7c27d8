//! Two-slot format patterns for code block rendering.
//!
//! Supported syntax:
//!
//! | Pattern | Meaning |
//! |---|---|
//! | `%s` | next argument in order (language first, then code) |
//! | `%1$s`, `%2$s` | language, code |
//! | `%%` | a literal `%` |
//! | `%n` | a newline |
use std::{fmt, str::FromStr};

use crate::error::TemplateError;

/// Number of arguments a template can reference: language, then code.
const ARGUMENT_COUNT: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
  Literal(String),
  Slot(usize),
}

/// A parsed code block template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlockTemplate {
  source:   String,
  segments: Vec<Segment>,
}

impl CodeBlockTemplate {
  /// Parse a template string.
  ///
  /// # Errors
  ///
  /// Returns an error if the template has no slot, references an argument
  /// beyond the code, uses a conversion other than `s`, `n` or `%`, or ends
  /// in a lone `%`.
  pub fn parse(source: &str) -> Result<Self, TemplateError> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut next_ordinary = 0;
    let mut chars = source.chars().peekable();

    while let Some(c) = chars.next() {
      if c != '%' {
        literal.push(c);
        continue;
      }

      let index = match chars.next() {
        None => return Err(TemplateError::Dangling),
        Some('%') => {
          literal.push('%');
          continue;
        },
        Some('n') => {
          literal.push('\n');
          continue;
        },
        Some('s') => {
          next_ordinary += 1;
          next_ordinary - 1
        },
        Some(d) if d.is_ascii_digit() => {
          let mut digits = String::from(d);
          while let Some(&d) = chars.peek()
            && d.is_ascii_digit()
          {
            digits.push(d);
            chars.next();
          }
          if chars.next() != Some('$') || chars.next() != Some('s') {
            return Err(TemplateError::UnsupportedConversion(digits));
          }
          // digits is non-empty and all ASCII digits; overflow only for
          // absurd inputs, which are out of range anyway
          let position = digits.parse::<usize>().unwrap_or(usize::MAX);
          if position == 0 {
            return Err(TemplateError::UnsupportedConversion(format!(
              "{digits}$s"
            )));
          }
          position - 1
        },
        Some(other) => {
          return Err(TemplateError::UnsupportedConversion(other.to_string()));
        },
      };

      if index >= ARGUMENT_COUNT {
        return Err(TemplateError::MissingArgument(index + 1));
      }
      if !literal.is_empty() {
        segments.push(Segment::Literal(std::mem::take(&mut literal)));
      }
      segments.push(Segment::Slot(index));
    }

    if !literal.is_empty() {
      segments.push(Segment::Literal(literal));
    }

    if !segments.iter().any(|s| matches!(s, Segment::Slot(_))) {
      return Err(TemplateError::NoSlots);
    }

    Ok(Self {
      source: source.to_owned(),
      segments,
    })
  }

  /// Substitute `language` and the already escaped `code`.
  #[must_use]
  pub fn format(&self, language: &str, code: &str) -> String {
    let arguments = [language, code];
    let mut out = String::with_capacity(self.source.len() + code.len());
    for segment in &self.segments {
      match segment {
        Segment::Literal(text) => out.push_str(text),
        Segment::Slot(index) => out.push_str(arguments[*index]),
      }
    }
    out
  }

  /// The template as it was written.
  #[must_use]
  pub fn as_str(&self) -> &str {
    &self.source
  }
}

impl FromStr for CodeBlockTemplate {
  type Err = TemplateError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::parse(s)
  }
}

impl fmt::Display for CodeBlockTemplate {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.source)
  }
}
