use std::path::PathBuf;

use clap::{ArgAction, Parser};
use mdtree_config::{Config, ConfigError};
use mdtree_utils::parse_extensions;

/// Command line interface for mdtree
#[derive(Parser, Debug)]
#[command(
  author,
  version,
  about = "Convert a directory tree of Markdown documents into HTML",
  arg_required_else_help = true
)]
pub struct Cli {
  /// Directory containing the Markdown tree. Required, either here or in a
  /// config file.
  #[arg(short, long)]
  pub source: Option<PathBuf>,

  /// Directory receiving the HTML tree [default: build]
  #[arg(short, long)]
  pub destination: Option<PathBuf>,

  /// Header prepended to every document (path or file:// URL)
  #[arg(short = 'H', long)]
  pub header: Option<String>,

  /// Footer appended to every document (path or file:// URL)
  #[arg(short, long)]
  pub footer: Option<String>,

  /// Code block template with two slots, language then code, e.g.
  /// '<pre lang="%s">%s</pre>'
  #[arg(short = 't', long = "code-template")]
  pub code_template: Option<String>,

  /// Comma separated list of extensions to convert. Empty converts every
  /// file.
  #[arg(short, long)]
  pub extensions: Option<String>,

  /// Encoding of source files, header, footer and output [default: utf-8]
  #[arg(long)]
  pub encoding: Option<String>,

  /// Visit directory entries in filesystem order instead of by name
  #[arg(long)]
  pub unsorted: bool,

  /// Path to configuration file(s) (TOML or JSON, can be specified multiple
  /// times). Multiple files are merged in order, with later files overriding
  /// earlier ones
  #[arg(short = 'c', long = "config-file", action = ArgAction::Append)]
  pub config_files: Vec<PathBuf>,

  /// Override configuration values (KEY=VALUE format, can be used multiple
  /// times)
  #[arg(long = "config", action = ArgAction::Append)]
  pub config_overrides: Vec<String>,

  /// Enable verbose debug logging
  #[arg(short, long)]
  pub verbose: bool,
}

impl Cli {
  /// Parse command line arguments into a [`Cli`] struct.
  #[must_use]
  pub fn parse_args() -> Self {
    Self::parse()
  }

  /// Load config files and overrides, then apply the flags given on the
  /// command line on top.
  ///
  /// # Errors
  ///
  /// Returns an error if a config file or override is invalid.
  pub fn load_config(&self) -> Result<Config, ConfigError> {
    let mut config = Config::load(&self.config_files, &self.config_overrides)?;
    self.merge_into(&mut config);
    Ok(config)
  }

  /// Apply explicit flags to `config`. Flags that were not given leave the
  /// config alone.
  pub fn merge_into(&self, config: &mut Config) {
    if let Some(source) = &self.source {
      config.source = Some(source.clone());
    }
    if let Some(destination) = &self.destination {
      config.destination = Some(destination.clone());
    }
    if let Some(header) = &self.header {
      config.header = Some(header.clone());
    }
    if let Some(footer) = &self.footer {
      config.footer = Some(footer.clone());
    }
    if let Some(template) = &self.code_template {
      config.code_template = Some(template.clone());
    }
    if let Some(extensions) = &self.extensions {
      config.extensions = parse_extensions(extensions).into_iter().collect();
    }
    if let Some(encoding) = &self.encoding {
      config.encoding = Some(encoding.clone());
    }
    if self.unsorted {
      config.sort_entries = Some(false);
    }
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, reason = "Fine in tests")]
  use clap::error::ErrorKind;

  use super::*;

  #[test]
  fn no_arguments_prints_help() {
    let err = Cli::try_parse_from(["mdtree"]).unwrap_err();
    assert_eq!(
      err.kind(),
      ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
    );
  }

  #[test]
  fn unknown_flag_is_rejected() {
    let err = Cli::try_parse_from(["mdtree", "--sauce", "docs"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownArgument);
  }

  #[test]
  fn all_flags() {
    let cli = Cli::try_parse_from([
      "mdtree",
      "-s",
      "docs",
      "-d",
      "site",
      "-H",
      "header.html",
      "-f",
      "file:///srv/footer.html",
      "-t",
      r#"<pre lang="%s">%s</pre>"#,
      "-e",
      "markdown,text",
      "--encoding",
      "windows-1252",
      "--unsorted",
      "-c",
      "a.toml",
      "-c",
      "b.json",
      "--config",
      "gfm=false",
      "-v",
    ])
    .unwrap();

    assert_eq!(cli.source, Some(PathBuf::from("docs")));
    assert_eq!(cli.destination, Some(PathBuf::from("site")));
    assert_eq!(cli.header.as_deref(), Some("header.html"));
    assert_eq!(cli.footer.as_deref(), Some("file:///srv/footer.html"));
    assert_eq!(cli.extensions.as_deref(), Some("markdown,text"));
    assert_eq!(cli.encoding.as_deref(), Some("windows-1252"));
    assert!(cli.unsorted);
    assert_eq!(cli.config_files, vec![
      PathBuf::from("a.toml"),
      PathBuf::from("b.json")
    ]);
    assert_eq!(cli.config_overrides, vec!["gfm=false"]);
    assert!(cli.verbose);
  }

  #[test]
  fn flags_override_config() {
    let cli =
      Cli::try_parse_from(["mdtree", "--source", "cli-docs", "-e", ".md"])
        .unwrap();

    let mut config = Config {
      source: Some(PathBuf::from("file-docs")),
      destination: Some(PathBuf::from("file-site")),
      extensions: vec!["markdown".to_string()],
      ..Default::default()
    };
    cli.merge_into(&mut config);

    assert_eq!(config.source, Some(PathBuf::from("cli-docs")));
    assert_eq!(config.destination, Some(PathBuf::from("file-site")));
    assert_eq!(config.extensions, vec!["md"]);
    assert_eq!(config.sort_entries, None);
  }

  #[test]
  fn empty_extension_flag_allows_everything() {
    let cli =
      Cli::try_parse_from(["mdtree", "-s", "docs", "-e", ""]).unwrap();
    let mut config = Config {
      extensions: vec!["md".to_string()],
      ..Default::default()
    };
    cli.merge_into(&mut config);
    assert!(config.extensions.is_empty());
  }
}
