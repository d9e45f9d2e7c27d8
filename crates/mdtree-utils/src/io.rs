//! Text file I/O with explicit encodings.
//!
//! Every read and write names its encoding; there is no platform default.
//! Writes go through a temporary file in the target directory that is renamed
//! into place, so a failed write never leaves a truncated output behind. The
//! renamed file ends up with the mode a plain create would have given it, or
//! keeps the mode of the file it replaces.
use std::{
  fs,
  io::{self, Write},
  path::Path,
};

use encoding_rs::Encoding;
use log::trace;
use tempfile::{Builder, NamedTempFile};

/// Decoded contents of a text file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFile {
  pub text: String,

  /// Whether malformed byte sequences were replaced with U+FFFD.
  pub had_errors: bool,
}

/// Read `path` and decode it with `encoding`.
///
/// A byte order mark, if present, takes precedence over `encoding`.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn read_text(path: &Path, encoding: &'static Encoding) -> io::Result<TextFile> {
  let bytes = fs::read(path)?;
  let (text, used, had_errors) = encoding.decode(&bytes);
  trace!("Decoded {} as {}", path.display(), used.name());

  Ok(TextFile {
    text: text.into_owned(),
    had_errors,
  })
}

/// Encode `text` with `encoding` and write it to `path`, replacing any existing
/// file. Missing parent directories are created first.
///
/// Characters the encoding cannot represent are written as numeric character
/// references.
///
/// # Errors
///
/// Returns an error if a parent directory cannot be created or the file cannot
/// be written or moved into place.
pub fn write_atomic(
  path: &Path,
  text: &str,
  encoding: &'static Encoding,
) -> io::Result<()> {
  let parent = match path.parent() {
    Some(parent) if !parent.as_os_str().is_empty() => parent,
    _ => Path::new("."),
  };
  fs::create_dir_all(parent)?;

  let (bytes, ..) = encoding.output_encoding().encode(text);

  let mut tmp = temp_file_in(parent)?;
  if let Ok(existing) = fs::metadata(path)
    && existing.is_file()
  {
    tmp.as_file().set_permissions(existing.permissions())?;
  }
  tmp.write_all(&bytes)?;
  tmp.as_file().sync_all()?;
  tmp.persist(path).map_err(|e| e.error)?;

  trace!("Wrote {} bytes to {}", bytes.len(), path.display());
  Ok(())
}

/// Temporary file in `dir`, created with the default file mode so the umask
/// applies as it would for `fs::write`. Plain temp files are owner-only.
fn temp_file_in(dir: &Path) -> io::Result<NamedTempFile> {
  #[cfg_attr(not(unix), allow(unused_mut))]
  let mut builder = Builder::new();
  #[cfg(unix)]
  {
    use std::os::unix::fs::PermissionsExt;
    builder.permissions(fs::Permissions::from_mode(0o666));
  }
  builder.tempfile_in(dir)
}
