pub mod config;
pub mod error;
pub mod job;

pub use config::Config;
pub use error::ConfigError;
pub use job::{ConversionJob, TemplateSource};
