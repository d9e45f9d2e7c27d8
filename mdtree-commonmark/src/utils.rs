/// Create a regex that never matches anything.
///
/// Used as a fallback when a static pattern fails to compile, which is safer
/// than a trivial pattern like `^$` that would match empty strings.
#[must_use]
pub fn never_matching_regex() -> regex::Regex {
  #[allow(
    clippy::expect_used,
    reason = "This pattern is guaranteed to be valid"
  )]
  regex::Regex::new(r"[^\s\S]")
    .expect("regex pattern [^\\s\\S] should always compile")
}
