//! Helpers for picking apart code block literals.
use std::sync::LazyLock;

use regex::Regex;

/// Matches a `lang:<name>` marker occupying a whole line.
static LANG_MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^[ \t]*lang:(\S+)[ \t]*$").unwrap_or_else(|e| {
    log::error!(
      "Failed to compile LANG_MARKER_RE regex: {e}\n Falling back to never \
       matching regex."
    );
    crate::utils::never_matching_regex()
  })
});

/// Split a `lang:<name>` marker off the first line of a code block literal.
///
/// Returns the language and the remaining code, or `None` if the first line is
/// not a marker.
pub fn split_lang_marker(literal: &str) -> Option<(&str, &str)> {
  let (first, rest) = literal.split_once('\n').unwrap_or((literal, ""));
  let first = first.strip_suffix('\r').unwrap_or(first);
  let caps = LANG_MARKER_RE.captures(first)?;
  let language = caps.get(1)?.as_str();
  Some((language, rest))
}

/// Language named by a fenced block's info string (its first word).
pub fn info_language(info: &str) -> Option<&str> {
  info.split_whitespace().next()
}

/// Drop trailing line breaks from a code body.
pub fn trim_trailing_newlines(code: &str) -> &str {
  code.trim_end_matches(['\n', '\r'])
}
