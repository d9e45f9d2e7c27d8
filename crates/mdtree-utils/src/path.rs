//! Path helpers used to mirror a source tree into a destination tree.
//!
//! The string helpers ([`extension_of`], [`with_extension`]) work on a single
//! file name. Anything that touches whole paths goes through [`remap`], which
//! rewrites the root with path algebra instead of string substitution, so
//! trailing slashes or a root that merely shares a textual prefix can never
//! produce a wrong destination.
use std::{
  collections::BTreeSet,
  ffi::OsStr,
  path::{Component, Path, PathBuf},
};

use thiserror::Error;

/// Separator accepted in comma separated extension lists.
pub const EXTENSIONS_SEPARATOR: char = ',';

/// Errors produced while rewriting paths.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
  #[error("{} is not inside {}", path.display(), root.display())]
  OutsideRoot { path: PathBuf, root: PathBuf },

  #[error("{} has no file name", .0.display())]
  NoFileName(PathBuf),

  #[error("file name of {} is not valid UTF-8", .0.display())]
  NonUtf8(PathBuf),
}

/// Replace every backslash with a forward slash.
#[must_use]
pub fn normalize_separators(path: &str) -> String {
  path.replace('\\', "/")
}

/// Slash-normalized, lossy rendering of a path for messages.
#[must_use]
pub fn display_path(path: &Path) -> String {
  normalize_separators(&path.to_string_lossy())
}

/// Return the text after the last dot, or an empty string if there is none.
///
/// ```
/// use mdtree_utils::extension_of;
///
/// assert_eq!(extension_of("notes.markdown"), "markdown");
/// assert_eq!(extension_of("archive.tar.gz"), "gz");
/// assert_eq!(extension_of("README"), "");
/// ```
#[must_use]
pub fn extension_of(filename: &str) -> &str {
  filename
    .rfind('.')
    .map_or("", |dot| &filename[dot + 1..])
}

/// Replace everything from the last dot onward with `new_extension`, or append
/// it when there is no dot. `new_extension` carries its own leading dot.
///
/// ```
/// use mdtree_utils::with_extension;
///
/// assert_eq!(with_extension("index.md", ".html"), "index.html");
/// assert_eq!(with_extension("LICENSE", ".html"), "LICENSE.html");
/// ```
#[must_use]
pub fn with_extension(filename: &str, new_extension: &str) -> String {
  filename.rfind('.').map_or_else(
    || format!("{filename}{new_extension}"),
    |dot| format!("{}{new_extension}", &filename[..dot]),
  )
}

/// Extension of the final component of `path`, without the dot.
///
/// Dots in parent directories never count. Non UTF-8 names have no extension.
#[must_use]
pub fn file_extension(path: &Path) -> &str {
  path
    .file_name()
    .and_then(OsStr::to_str)
    .map_or("", extension_of)
}

/// Swap the extension of the final component of `path`.
///
/// # Errors
///
/// Returns an error if `path` has no file name or the name is not UTF-8.
pub fn swap_file_extension(
  path: &Path,
  new_extension: &str,
) -> Result<PathBuf, PathError> {
  let name = path
    .file_name()
    .ok_or_else(|| PathError::NoFileName(path.to_path_buf()))?
    .to_str()
    .ok_or_else(|| PathError::NonUtf8(path.to_path_buf()))?;

  Ok(path.with_file_name(with_extension(name, new_extension)))
}

/// Path of `path` relative to `root`.
///
/// # Errors
///
/// Returns [`PathError::OutsideRoot`] if `path` does not live under `root`.
pub fn relative_to<'a>(
  root: &Path,
  path: &'a Path,
) -> Result<&'a Path, PathError> {
  path.strip_prefix(root).map_err(|_| {
    PathError::OutsideRoot {
      path: path.to_path_buf(),
      root: root.to_path_buf(),
    }
  })
}

/// Mirror `path` from `source_root` into `destination_root`.
///
/// ```
/// use std::path::Path;
///
/// use mdtree_utils::remap;
///
/// let mapped = remap(
///   Path::new("/a/b"),
///   Path::new("/x/y"),
///   Path::new("/a/b/sub/file.markdown"),
/// )
/// .unwrap();
/// assert_eq!(mapped, Path::new("/x/y/sub/file.markdown"));
/// ```
///
/// # Errors
///
/// Returns [`PathError::OutsideRoot`] if `path` is not under `source_root`.
pub fn remap(
  source_root: &Path,
  destination_root: &Path,
  path: &Path,
) -> Result<PathBuf, PathError> {
  let relative = relative_to(source_root, path)?;
  Ok(destination_root.join(relative))
}

/// Collapse `.` and `..` components without touching the filesystem.
///
/// `..` directly under the root stays at the root. Leading `..` of a relative
/// path are kept. Symlinks are not resolved, so `link/..` collapses to the
/// directory holding `link`.
///
/// ```
/// use std::path::Path;
///
/// use mdtree_utils::normalize_lexically;
///
/// assert_eq!(normalize_lexically(Path::new("/a/b/../b/./out")), Path::new("/a/b/out"));
/// assert_eq!(normalize_lexically(Path::new("../x/..")), Path::new(".."));
/// ```
#[must_use]
pub fn normalize_lexically(path: &Path) -> PathBuf {
  let mut normalized = PathBuf::new();
  for component in path.components() {
    match component {
      Component::CurDir => {},
      Component::ParentDir => {
        match normalized.components().next_back() {
          Some(Component::Normal(_)) => {
            normalized.pop();
          },
          Some(Component::RootDir | Component::Prefix(_)) => {},
          _ => normalized.push(".."),
        }
      },
      other => normalized.push(other.as_os_str()),
    }
  }
  normalized
}

/// Parse a comma separated extension list such as `"md, .markdown,,txt"`.
///
/// Entries are trimmed, a leading dot is dropped and empty entries are
/// ignored. An empty result means "every extension is allowed".
#[must_use]
pub fn parse_extensions(list: &str) -> BTreeSet<String> {
  list
    .split(EXTENSIONS_SEPARATOR)
    .map(|ext| ext.trim().trim_start_matches('.'))
    .filter(|ext| !ext.is_empty())
    .map(str::to_owned)
    .collect()
}
