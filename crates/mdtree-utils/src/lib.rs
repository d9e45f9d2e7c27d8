//! Small, stateless helpers shared by the mdtree crates: path rewriting and
//! text file I/O with named encodings.
pub mod io;
pub mod path;

pub use io::{TextFile, read_text, write_atomic};
pub use path::{
  PathError,
  display_path,
  extension_of,
  file_extension,
  normalize_lexically,
  normalize_separators,
  parse_extensions,
  relative_to,
  remap,
  swap_file_extension,
  with_extension,
};
