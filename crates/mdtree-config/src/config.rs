use std::{
  collections::BTreeMap,
  fs,
  path::{self, Path, PathBuf},
};

use encoding_rs::Encoding;
use mdtree_commonmark::{CodeBlockTemplate, EntityTable};
use mdtree_utils::{normalize_lexically, parse_extensions};
use serde::{Deserialize, Serialize};

use crate::{
  error::ConfigError,
  job::{ConversionJob, TemplateSource},
};

/// Destination used when none is configured.
pub const DEFAULT_DESTINATION: &str = "build";

/// Encoding used when none is configured.
pub const DEFAULT_ENCODING: &str = "utf-8";

/// File names probed, in order, when no config file is given explicitly.
pub const CONFIG_FILENAMES: [&str; 4] =
  ["mdtree.toml", "mdtree.json", ".mdtree.toml", ".mdtree.json"];

/// Configuration for a conversion run.
///
/// [`Config`] is what users write: loaded from TOML or JSON files, patched by
/// `KEY=VALUE` overrides and command line flags, then turned into an immutable
/// [`ConversionJob`] by [`Config::to_job`]. Every field is optional so that
/// merging only ever replaces values that were actually set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
  /// Directory containing the markdown tree.
  pub source: Option<PathBuf>,

  /// Directory receiving the HTML tree.
  pub destination: Option<PathBuf>,

  /// Header file path or `file://` URL.
  pub header: Option<String>,

  /// Footer file path or `file://` URL.
  pub footer: Option<String>,

  /// Two-slot code block template.
  pub code_template: Option<String>,

  /// Extensions to convert. Empty converts every file.
  pub extensions: Vec<String>,

  /// Encoding label for reading sources and templates and writing output.
  pub encoding: Option<String>,

  /// Whether to enable GitHub Flavored Markdown.
  pub gfm: Option<bool>,

  /// Whether to visit directory entries in file name order.
  pub sort_entries: Option<bool>,

  /// Replacement entity table, single characters to replacement text.
  pub entities: Option<BTreeMap<String, String>>,
}

impl Config {
  /// Load configuration from a file (TOML or JSON).
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or parsed, or if the format is
  /// unsupported.
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
      ConfigError::Config(format!(
        "Failed to read config file: {}: {}",
        path.display(),
        e
      ))
    })?;

    let ext = path
      .extension()
      .and_then(|ext| ext.to_str())
      .map(str::to_lowercase);

    match ext.as_deref() {
      Some("json") => {
        serde_json::from_str(&content).map_err(|e| {
          ConfigError::Config(format!(
            "Failed to parse JSON config from {}: {}",
            path.display(),
            e
          ))
        })
      },
      Some("toml") => {
        toml::from_str(&content).map_err(|e| {
          ConfigError::Config(format!(
            "Failed to parse TOML config from {}: {}",
            path.display(),
            e
          ))
        })
      },
      Some(_) => {
        Err(ConfigError::Config(format!(
          "Unsupported config file format: {}",
          path.display()
        )))
      },
      None => {
        Err(ConfigError::Config(format!(
          "Config file has no extension: {}",
          path.display()
        )))
      },
    }
  }

  /// Load and merge config files, then apply `KEY=VALUE` overrides.
  ///
  /// With no explicit files, a config file in the working directory is used
  /// if one exists (see [`CONFIG_FILENAMES`]).
  ///
  /// # Errors
  ///
  /// Returns an error if a file cannot be loaded or an override is invalid.
  pub fn load(
    config_files: &[PathBuf],
    config_overrides: &[String],
  ) -> Result<Self, ConfigError> {
    let mut config = Self::default();

    if config_files.is_empty() {
      let discovered = std::env::current_dir()
        .ok()
        .and_then(|dir| Self::find_config_file(&dir));
      if let Some(path) = discovered {
        log::info!("Using discovered config file: {}", path.display());
        config = Self::from_file(&path)?;
      }
    } else {
      for path in config_files {
        config.merge(Self::from_file(path)?);
      }
      if config_files.len() > 1 {
        log::info!("Loaded and merged {} config files", config_files.len());
      }
    }

    if !config_overrides.is_empty() {
      config.apply_overrides(config_overrides)?;
    }

    Ok(config)
  }

  /// Search `dir` for a config file.
  #[must_use]
  pub fn find_config_file(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILENAMES
      .iter()
      .map(|name| dir.join(name))
      .find(|path| path.is_file())
  }

  /// Merge another config into this one, with the other config's values taking
  /// precedence.
  ///
  /// # Merge Rules
  ///
  /// - [`Option<T>`] fields: other's [`Some`] value replaces this one
  /// - `extensions`: other's entries are appended
  /// - `entities`: other's entries are merged in, overriding single keys
  pub fn merge(&mut self, other: Self) {
    let Self {
      source,
      destination,
      header,
      footer,
      code_template,
      extensions,
      encoding,
      gfm,
      sort_entries,
      entities,
    } = other;

    if source.is_some() {
      self.source = source;
    }
    if destination.is_some() {
      self.destination = destination;
    }
    if header.is_some() {
      self.header = header;
    }
    if footer.is_some() {
      self.footer = footer;
    }
    if code_template.is_some() {
      self.code_template = code_template;
    }
    self.extensions.extend(extensions);
    if encoding.is_some() {
      self.encoding = encoding;
    }
    self.gfm = gfm.or(self.gfm);
    self.sort_entries = sort_entries.or(self.sort_entries);
    if let Some(other_entities) = entities {
      self
        .entities
        .get_or_insert_with(BTreeMap::new)
        .extend(other_entities);
    }
  }

  /// Apply `KEY=VALUE` overrides in order.
  ///
  /// ```rust
  /// use mdtree_config::Config;
  ///
  /// let mut config = Config::default();
  /// config
  ///   .apply_overrides(&["extensions=md,markdown".to_string(), "gfm=false".to_string()])
  ///   .unwrap();
  /// assert_eq!(config.gfm, Some(false));
  /// ```
  ///
  /// # Errors
  ///
  /// Returns an error if an override is not `KEY=VALUE`, names an unknown key
  /// or carries a value of the wrong type.
  pub fn apply_overrides(
    &mut self,
    overrides: &[String],
  ) -> Result<(), ConfigError> {
    for override_str in overrides {
      let (key, value) = override_str.split_once('=').ok_or_else(|| {
        ConfigError::Config(format!(
          "Invalid config override format: '{override_str}'. Expected \
           KEY=VALUE"
        ))
      })?;

      self.apply_override(key.trim(), value.trim())?;
    }

    Ok(())
  }

  /// Apply a single override. `entities.<char>` sets one table entry; an
  /// empty value clears optional fields.
  ///
  /// # Errors
  ///
  /// Returns an error for unknown keys or unparsable values.
  pub fn apply_override(
    &mut self,
    key: &str,
    value: &str,
  ) -> Result<(), ConfigError> {
    let optional = |value: &str| (!value.is_empty()).then(|| value.to_owned());

    match key {
      "source" => self.source = optional(value).map(PathBuf::from),
      "destination" => self.destination = optional(value).map(PathBuf::from),
      "header" => self.header = optional(value),
      "footer" => self.footer = optional(value),
      "code_template" => self.code_template = optional(value),
      "extensions" => {
        self.extensions = parse_extensions(value).into_iter().collect();
      },
      "encoding" => self.encoding = optional(value),
      "gfm" => self.gfm = Some(parse_bool(key, value)?),
      "sort_entries" => self.sort_entries = Some(parse_bool(key, value)?),
      _ => {
        let Some(entity) = key.strip_prefix("entities.") else {
          return Err(ConfigError::Config(format!(
            "Unknown config key: '{key}'"
          )));
        };
        self
          .entities
          .get_or_insert_with(BTreeMap::new)
          .insert(entity.to_owned(), value.to_owned());
      },
    }

    Ok(())
  }

  /// Destination directory, falling back to [`DEFAULT_DESTINATION`].
  #[must_use]
  pub fn destination_dir(&self) -> PathBuf {
    self
      .destination
      .clone()
      .unwrap_or_else(|| PathBuf::from(DEFAULT_DESTINATION))
  }

  /// Validate this config and build the job it describes.
  ///
  /// Source and destination are made absolute relative to the working
  /// directory, with `.` and `..` collapsed. Existence is not checked here;
  /// the converter does that before touching any file.
  ///
  /// # Errors
  ///
  /// Returns an error if the source is missing, the code template or entity
  /// table is malformed, or the encoding label is unknown.
  pub fn to_job(&self) -> Result<ConversionJob, ConfigError> {
    let source = self.source.as_deref().ok_or(ConfigError::MissingSource)?;
    let source_root = normalize_lexically(&path::absolute(source)?);
    let destination_root =
      normalize_lexically(&path::absolute(self.destination_dir())?);

    let label = self.encoding.as_deref().unwrap_or(DEFAULT_ENCODING);
    let encoding = Encoding::for_label(label.as_bytes())
      .ok_or_else(|| ConfigError::UnknownEncoding(label.to_owned()))?;

    let code_block_template = self
      .code_template
      .as_deref()
      .map(CodeBlockTemplate::parse)
      .transpose()?;

    let entity_overrides = self
      .entities
      .as_ref()
      .map(EntityTable::from_string_keys)
      .transpose()?;

    let allowed_extensions = self
      .extensions
      .iter()
      .flat_map(|ext| parse_extensions(ext))
      .collect();

    Ok(ConversionJob {
      source_root,
      destination_root,
      header: self.header.as_deref().map(TemplateSource::from_reference),
      footer: self.footer.as_deref().map(TemplateSource::from_reference),
      code_block_template,
      entity_overrides,
      allowed_extensions,
      encoding,
      gfm: self.gfm.unwrap_or(true),
      sort_entries: self.sort_entries.unwrap_or(true),
    })
  }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
  value.parse().map_err(|_| {
    ConfigError::Config(format!(
      "Invalid boolean for '{key}': '{value}'. Expected true or false"
    ))
  })
}

#[cfg(test)]
mod tests {
  #![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::field_reassign_with_default,
    reason = "Fine in tests"
  )]

  use encoding_rs::{UTF_8, WINDOWS_1252};
  use tempfile::tempdir;

  use super::*;

  #[test]
  fn test_from_toml_file() {
    let dir = tempdir().expect("Failed to create temp dir in test");
    let path = dir.path().join("mdtree.toml");
    fs::write(
      &path,
      r#"
source = "docs"
destination = "site"
header = "templates/header.html"
extensions = ["md", "markdown"]
code_template = "<pre lang=\"%s\">%s</pre>"

[entities]
"&" = "&amp;"
"#,
    )
    .unwrap();

    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.source, Some(PathBuf::from("docs")));
    assert_eq!(config.destination, Some(PathBuf::from("site")));
    assert_eq!(config.extensions, vec!["md", "markdown"]);
    assert_eq!(
      config.entities.as_ref().and_then(|e| e.get("&")).map(String::as_str),
      Some("&amp;")
    );
  }

  #[test]
  fn test_from_json_file() {
    let dir = tempdir().expect("Failed to create temp dir in test");
    let path = dir.path().join("mdtree.json");
    fs::write(&path, r#"{ "source": "docs", "gfm": false }"#).unwrap();

    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.source, Some(PathBuf::from("docs")));
    assert_eq!(config.gfm, Some(false));
  }

  #[test]
  fn test_unknown_field_is_rejected() {
    let dir = tempdir().expect("Failed to create temp dir in test");
    let path = dir.path().join("mdtree.toml");
    fs::write(&path, "sauce = \"docs\"\n").unwrap();
    assert!(Config::from_file(&path).is_err());
  }

  #[test]
  fn test_parse_errors_name_the_file() {
    let dir = tempdir().expect("Failed to create temp dir in test");

    let toml_path = dir.path().join("broken.toml");
    fs::write(&toml_path, "source = [\n").unwrap();
    let err = Config::from_file(&toml_path).unwrap_err();
    assert!(matches!(err, ConfigError::Config(_)));
    assert!(err.to_string().contains("Failed to parse TOML config"));
    assert!(err.to_string().contains("broken.toml"));

    let json_path = dir.path().join("broken.json");
    fs::write(&json_path, "{ \"source\": ").unwrap();
    let err = Config::from_file(&json_path).unwrap_err();
    assert!(matches!(err, ConfigError::Config(_)));
    assert!(err.to_string().contains("broken.json"));
  }

  #[test]
  fn test_unsupported_extension() {
    let dir = tempdir().expect("Failed to create temp dir in test");
    let path = dir.path().join("mdtree.yaml");
    fs::write(&path, "source: docs\n").unwrap();
    let err = Config::from_file(&path).unwrap_err();
    assert!(err.to_string().contains("Unsupported config file format"));
  }

  #[test]
  fn test_find_config_file_order() {
    let dir = tempdir().expect("Failed to create temp dir in test");
    assert_eq!(Config::find_config_file(dir.path()), None);

    fs::write(dir.path().join(".mdtree.toml"), "").unwrap();
    fs::write(dir.path().join("mdtree.json"), "{}").unwrap();
    assert_eq!(
      Config::find_config_file(dir.path()),
      Some(dir.path().join("mdtree.json"))
    );
  }

  #[test]
  fn test_merge_option_fields() {
    let mut base = Config::default();
    base.source = Some(PathBuf::from("base-src"));
    base.header = Some("h.html".to_string());

    let mut other = Config::default();
    other.header = Some("other.html".to_string());
    other.gfm = Some(false);

    base.merge(other);
    assert_eq!(base.source, Some(PathBuf::from("base-src")));
    assert_eq!(base.header.as_deref(), Some("other.html"));
    assert_eq!(base.gfm, Some(false));
  }

  #[test]
  fn test_merge_collections() {
    let mut base = Config::default();
    base.extensions = vec!["md".to_string()];
    base.entities = Some(BTreeMap::from([
      ("&".to_string(), "&amp;".to_string()),
      ("<".to_string(), "&lt;".to_string()),
    ]));

    let mut other = Config::default();
    other.extensions = vec!["markdown".to_string()];
    other.entities =
      Some(BTreeMap::from([("<".to_string(), "&#60;".to_string())]));

    base.merge(other);
    assert_eq!(base.extensions, vec!["md", "markdown"]);
    let entities = base.entities.unwrap();
    assert_eq!(entities["&"], "&amp;");
    assert_eq!(entities["<"], "&#60;");
  }

  #[test]
  fn test_apply_overrides() {
    let mut config = Config::default();
    config
      .apply_overrides(&[
        "source=docs".to_string(),
        "extensions=md, .markdown".to_string(),
        "sort_entries=false".to_string(),
        "entities.ò=&ograve;".to_string(),
      ])
      .unwrap();

    assert_eq!(config.source, Some(PathBuf::from("docs")));
    assert_eq!(config.extensions, vec!["markdown", "md"]);
    assert_eq!(config.sort_entries, Some(false));
    assert_eq!(config.entities.unwrap()["ò"], "&ograve;");
  }

  #[test]
  fn test_apply_overrides_errors() {
    let mut config = Config::default();
    assert!(config.apply_overrides(&["source".to_string()]).is_err());
    assert!(config.apply_overrides(&["colour=red".to_string()]).is_err());
    assert!(config.apply_overrides(&["gfm=maybe".to_string()]).is_err());
  }

  #[test]
  fn test_empty_override_clears_option() {
    let mut config = Config::default();
    config.header = Some("h.html".to_string());
    config.apply_override("header", "").unwrap();
    assert_eq!(config.header, None);
  }

  #[test]
  fn test_to_job_requires_source() {
    assert!(matches!(
      Config::default().to_job(),
      Err(ConfigError::MissingSource)
    ));
  }

  #[test]
  fn test_to_job_defaults() {
    let mut config = Config::default();
    config.source = Some(PathBuf::from("docs"));

    let job = config.to_job().unwrap();
    assert!(job.source_root.is_absolute());
    assert!(job.source_root.ends_with("docs"));
    assert!(job.destination_root.ends_with(DEFAULT_DESTINATION));
    assert_eq!(job.encoding, UTF_8);
    assert!(job.allowed_extensions.is_empty());
    assert!(job.gfm);
    assert!(job.sort_entries);
    assert!(job.header.is_none());
  }

  #[test]
  fn test_to_job_collapses_parent_components() {
    let config = Config {
      source: Some(PathBuf::from("/srv/docs/../docs/.")),
      destination: Some(PathBuf::from("/srv/docs/sub/../out")),
      ..Default::default()
    };

    let job = config.to_job().unwrap();
    assert_eq!(job.source_root, PathBuf::from("/srv/docs"));
    assert_eq!(job.destination_root, PathBuf::from("/srv/docs/out"));
  }

  #[test]
  fn test_to_job_full() {
    let config = Config {
      source: Some(PathBuf::from("/srv/docs")),
      destination: Some(PathBuf::from("/srv/site")),
      header: Some("file:///srv/header.html".to_string()),
      footer: Some("footer.html".to_string()),
      code_template: Some("<pre lang=\"%s\">%s</pre>".to_string()),
      extensions: vec![".md".to_string(), "markdown,text".to_string()],
      encoding: Some("latin1".to_string()),
      gfm: Some(false),
      sort_entries: Some(false),
      entities: Some(BTreeMap::from([(
        "&".to_string(),
        "&amp;".to_string(),
      )])),
    };

    let job = config.to_job().unwrap();
    assert_eq!(job.source_root, PathBuf::from("/srv/docs"));
    assert_eq!(job.destination_root, PathBuf::from("/srv/site"));
    assert_eq!(
      job.header,
      Some(TemplateSource::Url("file:///srv/header.html".to_string()))
    );
    assert_eq!(
      job.footer,
      Some(TemplateSource::Path(PathBuf::from("footer.html")))
    );
    assert!(job.code_block_template.is_some());
    assert_eq!(
      job.allowed_extensions.iter().map(String::as_str).collect::<Vec<_>>(),
      vec!["markdown", "md", "text"]
    );
    // latin1 is an alias of windows-1252 in the WHATWG registry
    assert_eq!(job.encoding, WINDOWS_1252);
    assert!(!job.gfm);
    assert!(!job.sort_entries);
    assert_eq!(job.entity_overrides.unwrap().get('&'), Some("&amp;"));
  }

  #[test]
  fn test_to_job_rejects_bad_values() {
    let base = Config {
      source: Some(PathBuf::from("docs")),
      ..Default::default()
    };

    let bad_template = Config {
      code_template: Some("<pre>%d</pre>".to_string()),
      ..base.clone()
    };
    assert!(matches!(bad_template.to_job(), Err(ConfigError::Template(_))));

    let bad_encoding = Config {
      encoding: Some("klingon".to_string()),
      ..base.clone()
    };
    assert!(matches!(
      bad_encoding.to_job(),
      Err(ConfigError::UnknownEncoding(_))
    ));

    let bad_entities = Config {
      entities: Some(BTreeMap::from([("ab".to_string(), "x".to_string())])),
      ..base
    };
    assert!(matches!(bad_entities.to_job(), Err(ConfigError::Entity(_))));
  }
}
