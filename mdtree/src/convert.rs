//! Tree conversion.
//!
//! A run walks the source tree depth first, mirrors every file into the
//! destination tree with an `.html` extension and renders it through a single
//! [`DocumentRenderer`]. Problems with the run as a whole (missing source,
//! unreadable header or footer, uncreatable destination) are returned before
//! any file is touched. Problems with a single file are reported and counted,
//! and the walk moves on.
use std::{
  fs,
  path::{Path, PathBuf},
};

use log::{debug, info};
use mdtree_commonmark::MarkdownProcessor;
use mdtree_config::{ConversionJob, TemplateSource};
use mdtree_utils::{
  TextFile,
  display_path,
  file_extension,
  normalize_lexically,
  read_text,
  remap,
  swap_file_extension,
  write_atomic,
};
use percent_encoding::percent_decode_str;
use walkdir::{DirEntry, WalkDir};

use crate::{
  error::{ConvertError, Resource},
  render::DocumentRenderer,
  report::{Event, Reporter},
};

/// Extension every output file gets.
pub const HTML_EXTENSION: &str = ".html";

const FILE_URL_SCHEME: &str = "file://";

/// Counts and outputs of a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionSummary {
  pub converted: usize,
  pub skipped:   usize,
  pub failed:    usize,

  /// Written files, in traversal order.
  pub outputs: Vec<PathBuf>,
}

enum FileOutcome {
  Converted(PathBuf),
  Skipped(String),
}

/// Converts the tree described by a [`ConversionJob`].
///
/// Both roots are collapsed lexically up front and every path computation of
/// the run works from the collapsed form.
pub struct TreeConverter<'a> {
  job:              &'a ConversionJob,
  reporter:         &'a dyn Reporter,
  source_root:      PathBuf,
  destination_root: PathBuf,
}

impl<'a> TreeConverter<'a> {
  #[must_use]
  pub fn new(job: &'a ConversionJob, reporter: &'a dyn Reporter) -> Self {
    Self {
      job,
      reporter,
      source_root: normalize_lexically(&job.source_root),
      destination_root: normalize_lexically(&job.destination_root),
    }
  }

  /// Run the conversion.
  ///
  /// # Errors
  ///
  /// Returns an error if the source root is not a readable directory, the
  /// header or footer cannot be read, or the destination root cannot be
  /// created. Per-file failures are reported, not returned.
  pub fn convert(&self) -> Result<ConversionSummary, ConvertError> {
    let job = self.job;
    check_source_root(&self.source_root)?;

    let header = self.resolve_template(Resource::Header, job.header.as_ref())?;
    let footer = self.resolve_template(Resource::Footer, job.footer.as_ref())?;

    fs::create_dir_all(&self.destination_root).map_err(|source| {
      ConvertError::DestinationCreate {
        path: self.destination_root.clone(),
        source,
      }
    })?;

    info!("Source directory: {}", self.source_root.display());
    info!("Destination directory: {}", self.destination_root.display());

    let renderer = DocumentRenderer::new(
      header.as_deref(),
      footer.as_deref(),
      MarkdownProcessor::new(job.markdown_options()),
    );

    let mut summary = ConversionSummary::default();
    for entry in self.walk() {
      let entry = match entry {
        Ok(entry) => entry,
        Err(e) => {
          let path = e.path().map(Path::to_path_buf);
          self.reporter.report(&Event::Warning {
            path:    path.as_deref(),
            message: ConvertError::from(e).to_string(),
          });
          continue;
        },
      };

      if entry.file_type().is_file() {
        self.convert_entry(entry.path(), &renderer, &mut summary);
      }
    }

    info!(
      "Converted {} files, skipped {}, failed {}",
      summary.converted, summary.skipped, summary.failed
    );
    Ok(summary)
  }

  /// Depth first walk of the source root, without the destination subtree
  /// when it is nested in the source.
  fn walk(&self) -> impl Iterator<Item = walkdir::Result<DirEntry>> + use<> {
    let destination = self.destination_root.clone();
    let prune = destination != self.source_root
      && destination.starts_with(&self.source_root);
    if prune {
      debug!(
        "Destination lies inside the source, excluding {}",
        destination.display()
      );
    }

    let mut walker = WalkDir::new(&self.source_root).follow_links(true);
    if self.job.sort_entries {
      walker = walker.sort_by_file_name();
    }

    walker.into_iter().filter_entry(move |entry| {
      !(prune && entry.path().starts_with(&destination))
    })
  }

  fn convert_entry(
    &self,
    source: &Path,
    renderer: &DocumentRenderer,
    summary: &mut ConversionSummary,
  ) {
    match self.convert_file(source, renderer) {
      Ok(FileOutcome::Converted(destination)) => {
        self.reporter.report(&Event::Converted {
          source,
          destination: &destination,
        });
        summary.converted += 1;
        summary.outputs.push(destination);
      },
      Ok(FileOutcome::Skipped(extension)) => {
        self.reporter.report(&Event::Skipped {
          source,
          extension: &extension,
        });
        summary.skipped += 1;
      },
      Err(error) => {
        self.reporter.report(&Event::Failed {
          source,
          error: &error,
        });
        summary.failed += 1;
      },
    }
  }

  fn convert_file(
    &self,
    source: &Path,
    renderer: &DocumentRenderer,
  ) -> Result<FileOutcome, ConvertError> {
    let job = self.job;

    // The filter looks at the mapped name
    let candidate = remap(&self.source_root, &self.destination_root, source)?;
    let extension = file_extension(&candidate);
    if !job.allows_extension(extension) {
      return Ok(FileOutcome::Skipped(extension.to_owned()));
    }
    let destination = swap_file_extension(&candidate, HTML_EXTENSION)?;

    let content = self.read(source).map_err(|e| {
      ConvertError::FileRead {
        path:   source.to_path_buf(),
        source: e,
      }
    })?;

    let rendered = renderer.render(&content);
    write_atomic(&destination, &rendered.html, job.encoding).map_err(|e| {
      ConvertError::FileWrite {
        path:   destination.clone(),
        source: e,
      }
    })?;

    Ok(FileOutcome::Converted(destination))
  }

  /// Read and decode a file, warning when bytes had to be replaced.
  fn read(&self, path: &Path) -> std::io::Result<String> {
    let TextFile { text, had_errors } = read_text(path, self.job.encoding)?;
    if had_errors {
      self.reporter.report(&Event::Warning {
        path:    Some(path),
        message: format!(
          "malformed {} input, invalid sequences were replaced",
          self.job.encoding.name()
        ),
      });
    }
    Ok(text)
  }

  /// Fetch header or footer text once for the whole run.
  fn resolve_template(
    &self,
    resource: Resource,
    source: Option<&TemplateSource>,
  ) -> Result<Option<String>, ConvertError> {
    let path = match source {
      None => return Ok(None),
      Some(TemplateSource::Text(text)) => return Ok(Some(text.clone())),
      Some(TemplateSource::Path(path)) => path.clone(),
      Some(TemplateSource::Url(url)) => {
        file_url_path(url).ok_or_else(|| {
          ConvertError::unavailable(
            resource,
            url.as_str(),
            "only file:// URLs are supported",
          )
        })?
      },
    };

    let text = self
      .read(&path)
      .map_err(|e| ConvertError::unavailable(resource, display_path(&path), e))?;
    debug!("Loaded {resource} from {}", path.display());
    Ok(Some(text))
  }
}

/// Convert the tree described by `job`, reporting to `reporter`.
///
/// # Errors
///
/// See [`TreeConverter::convert`].
pub fn convert(
  job: &ConversionJob,
  reporter: &dyn Reporter,
) -> Result<ConversionSummary, ConvertError> {
  TreeConverter::new(job, reporter).convert()
}

/// The source root must be a directory whose entries can be listed.
fn check_source_root(root: &Path) -> Result<(), ConvertError> {
  match fs::metadata(root) {
    Ok(metadata) if metadata.is_dir() => {
      fs::read_dir(root).map(drop).map_err(|e| {
        ConvertError::unavailable(Resource::Source, display_path(root), e)
      })
    },
    Ok(_) => {
      Err(ConvertError::unavailable(
        Resource::Source,
        display_path(root),
        "not a directory",
      ))
    },
    Err(e) => {
      Err(ConvertError::unavailable(
        Resource::Source,
        display_path(root),
        e,
      ))
    },
  }
}

/// Local path of a `file://` URL, with `%XX` escapes decoded. Only absolute
/// paths, with an empty or `localhost` authority, are accepted.
fn file_url_path(url: &str) -> Option<PathBuf> {
  let rest = url.strip_prefix(FILE_URL_SCHEME)?;
  let path = rest.strip_prefix("localhost").unwrap_or(rest);
  if !path.starts_with('/') {
    return None;
  }
  let decoded = percent_decode_str(path).decode_utf8().ok()?;
  Some(PathBuf::from(decoded.as_ref()))
}
