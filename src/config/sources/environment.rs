//! Environment variable source: COOKDB prefix with __ separator

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;

/// Add the environment overlay, e.g. `COOKDB__PLATFORM=linux` or
/// `COOKDB__LOGGING__LEVEL=debug`.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(builder.add_source(
        Environment::with_prefix("COOKDB")
            .separator("__")
            .try_parsing(true),
    ))
}
