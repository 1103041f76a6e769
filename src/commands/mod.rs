pub mod generate;
pub mod holidays;

use anyhow::Result;
use std::path::Path;

use stundenzettel::config::Config;

// Re-export command functions for convenience
pub use generate::{generate, GenerateArgs};
pub use holidays::holidays;

const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Load the configuration file over the environment variables
///
/// An explicit path must exist. Without one, `config.toml` in the working
/// directory is used when present, else the environment alone.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::from_file(path),
        None => {
            let default = Path::new(DEFAULT_CONFIG_FILE);
            if default.exists() {
                Config::from_file(default)
            } else {
                Config::from_env()
            }
        }
    }
}
