//! Custom character to HTML entity tables.
use std::collections::{BTreeMap, HashMap};

use crate::error::EntityError;

/// Mapping from a character to the text emitted in its place.
///
/// When a table is handed to the processor it *replaces* the default escaping
/// instead of extending it: a character missing from the table is written
/// verbatim, even `<` or `&`. Start from [`EntityTable::html_default`] to
/// extend the usual set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityTable {
  entries: BTreeMap<char, String>,
}

impl EntityTable {
  /// An empty table. Escapes nothing.
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// The four characters HTML text always needs escaped.
  #[must_use]
  pub fn html_default() -> Self {
    [('&', "&amp;"), ('<', "&lt;"), ('>', "&gt;"), ('"', "&quot;")]
      .into_iter()
      .collect()
  }

  /// Add or replace the replacement for `c`.
  pub fn insert(&mut self, c: char, replacement: impl Into<String>) {
    self.entries.insert(c, replacement.into());
  }

  #[must_use]
  pub fn get(&self, c: char) -> Option<&str> {
    self.entries.get(&c).map(String::as_str)
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Escape `text` with this table only.
  #[must_use]
  pub fn escape(&self, text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
      match self.entries.get(&c) {
        Some(replacement) => out.push_str(replacement),
        None => out.push(c),
      }
    }
    out
  }

  /// Build a table from string keys, as found in configuration files.
  ///
  /// # Errors
  ///
  /// Returns an error if any key is not exactly one character long.
  pub fn from_string_keys<'a, I>(entries: I) -> Result<Self, EntityError>
  where
    I: IntoIterator<Item = (&'a String, &'a String)>,
  {
    let mut table = Self::new();
    for (key, value) in entries {
      let mut chars = key.chars();
      match (chars.next(), chars.next()) {
        (Some(c), None) => table.insert(c, value.clone()),
        _ => return Err(EntityError::NotSingleChar(key.clone())),
      }
    }
    Ok(table)
  }
}

impl<S: Into<String>> FromIterator<(char, S)> for EntityTable {
  fn from_iter<T: IntoIterator<Item = (char, S)>>(iter: T) -> Self {
    Self {
      entries: iter.into_iter().map(|(c, s)| (c, s.into())).collect(),
    }
  }
}

impl From<HashMap<char, String>> for EntityTable {
  fn from(map: HashMap<char, String>) -> Self {
    map.into_iter().collect()
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, reason = "Fine in tests")]
  use super::*;

  #[test]
  fn escape_only_touches_listed_chars() {
    let table: EntityTable = [('&', "&amp;"), ('ò', "&ograve;")]
      .into_iter()
      .collect();
    assert_eq!(table.escape("ò & <b>"), "&ograve; &amp; <b>");
  }

  #[test]
  fn empty_table_is_identity() {
    assert_eq!(EntityTable::new().escape("<&>"), "<&>");
  }

  #[test]
  fn html_default_matches_usual_escaping() {
    let table = EntityTable::html_default();
    assert_eq!(table.len(), 4);
    assert_eq!(table.get('\''), None);
    assert_eq!(
      EntityTable::html_default().escape(r#"a<b & "c">"#),
      "a&lt;b &amp; &quot;c&quot;&gt;"
    );
  }

  #[test]
  fn string_keys_must_be_single_chars() {
    let mut raw = BTreeMap::new();
    raw.insert("é".to_string(), "&eacute;".to_string());
    let table = EntityTable::from_string_keys(&raw).unwrap();
    assert_eq!(table.get('é'), Some("&eacute;"));

    raw.insert("ab".to_string(), "x".to_string());
    assert_eq!(
      EntityTable::from_string_keys(&raw),
      Err(EntityError::NotSingleChar("ab".to_string()))
    );
  }
}
