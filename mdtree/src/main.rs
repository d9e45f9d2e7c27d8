use clap::{CommandFactory, error::ErrorKind};
use color_eyre::eyre::{Context, Result};
use log::{LevelFilter, info, warn};
use mdtree::{LogReporter, cli::Cli, convert};
use mdtree_config::ConfigError;

fn main() -> Result<()> {
  color_eyre::install()?;

  let cli = Cli::parse_args();

  env_logger::Builder::new()
    .filter_level(if cli.verbose {
      LevelFilter::Debug
    } else {
      LevelFilter::Info
    })
    .write_style(env_logger::WriteStyle::Always)
    .init();

  let config = cli
    .load_config()
    .wrap_err("Failed to load configuration")?;

  let job = match config.to_job() {
    Ok(job) => job,
    Err(ConfigError::MissingSource) => {
      Cli::command()
        .error(
          ErrorKind::MissingRequiredArgument,
          "a source directory is required: pass --source or set `source` in \
           a config file",
        )
        .exit()
    },
    Err(e) => return Err(e).wrap_err("Invalid configuration"),
  };

  let summary = convert(&job, &LogReporter).wrap_err_with(|| {
    format!("Failed to convert {}", job.source_root.display())
  })?;

  if summary.failed > 0 {
    warn!(
      "{} of {} files could not be converted",
      summary.failed,
      summary.converted + summary.failed
    );
  }
  info!(
    "HTML tree written to {}",
    job.destination_root.display()
  );

  Ok(())
}
