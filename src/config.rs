use anyhow::{Context, Result};
use serde::Deserialize;
use solax_local_lib::protocol::DeviceVariant;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// How decoded values are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One `name: value unit` line per quantity.
    #[default]
    Text,
    Json,
    Yaml,
}

/// Settings read from the YAML configuration file.
///
/// ```yaml
/// format: json
/// variants:
///   25: x3-ultra-extended
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Output format used when `--format` is not given.
    pub format: OutputFormat,
    /// Register layout to use per payload type code, overriding the built-in choice.
    pub variants: HashMap<u16, DeviceVariant>,
}

impl Config {
    pub const DEFAULT_CONFIG_FILE: &'static str = "solaxdec.yml";

    /// Loads the configuration.
    ///
    /// An explicitly given file must exist. Without one, the default file in the
    /// working directory is used if present, otherwise the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => {
                let default_file = Path::new(Self::DEFAULT_CONFIG_FILE);
                if !default_file.exists() {
                    log::debug!("No config file found, using defaults");
                    return Ok(Self::default());
                }
                default_file
            }
        };
        log::debug!("Loading config file from {path:?}");
        let file = File::open(path)
            .with_context(|| format!("Cannot open config file {}", path.display()))?;
        serde_yaml::from_reader(file)
            .with_context(|| format!("Cannot parse config file {}", path.display()))
    }

    /// The configured register layout for a payload type code, if any.
    pub fn variant_for(&self, type_code: u16) -> Option<DeviceVariant> {
        self.variants.get(&type_code).copied()
    }
}
