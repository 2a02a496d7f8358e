//! Configuration parsing and types.

pub mod env;
pub mod parser;
pub mod types;
pub mod validate;

pub use parser::load_config;
pub use types::*;
pub use validate::validate_config;

use crate::common::error::ConfigError;

/// Load the optional config file, apply environment overrides, and validate.
///
/// Without a file every section starts from its defaults.
pub fn load_and_validate(path: Option<&str>) -> Result<Config, ConfigError> {
    let config = match path {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };

    let config = env::apply_env_overrides(config);
    validate_config(&config)?;
    Ok(config)
}
