use crate::config::{Config, OutputFormat};
use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use solax_local_lib::protocol as proto;
use std::path::PathBuf;

fn parse_offset(s: &str) -> Result<u16, String> {
    clap_num::maybe_hex::<u16>(s).map_err(|e| format!("Invalid register offset format: {e}"))
}

fn parse_variant(s: &str) -> Result<proto::DeviceVariant, String> {
    s.parse::<proto::DeviceVariant>().map_err(|e| e.to_string())
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum CliCommands {
    /// Decode a local API payload and print every quantity of its register layout.
    Decode {
        /// Payload file in the local API JSON format, "-" reads from standard input.
        #[arg(default_value = "-")]
        input: String,

        /// Register layout to decode with, instead of the one selected by the payload type code.
        /// Supported values: x3-ultra, x3-ultra-extended.
        #[arg(long, value_parser = parse_variant, verbatim_doc_comment)]
        variant: Option<proto::DeviceVariant>,

        /// Output format. Defaults to the config file setting, or text.
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Print a single raw register of a payload, or a 32-bit value built from two registers.
    /// Offsets can be specified in decimal or hexadecimal (e.g., "58" or "0x3a").
    #[clap(verbatim_doc_comment)]
    Raw {
        /// Payload file in the local API JSON format, "-" reads from standard input.
        input: String,

        /// Zero-based register offset. Used as the low word together with `--high`.
        #[arg(value_parser = parse_offset)]
        offset: u16,

        /// Offset of the high word. Prints the signed 32-bit combination of both registers.
        #[arg(long, value_parser = parse_offset)]
        high: Option<u16>,
    },

    /// List the supported register layouts and their register tables.
    Variants,
}

const fn about_text() -> &'static str {
    "SolaX local API decoder - Decode inverter register data into physical values."
}

#[derive(Parser, Debug)]
#[command(name="solaxdec", author, version, about=about_text(), long_about = None, propagate_version = true)]
pub struct CliArgs {
    /// Configure verbosity of logging output.
    /// -v for info, -vv for debug, -vvv for trace. Default is warnings only.
    #[command(flatten)]
    pub verbose: Verbosity<WarnLevel>,

    /// YAML configuration file.
    /// Defaults to "solaxdec.yml" in the working directory, if it exists.
    #[arg(global = true, short, long, verbatim_doc_comment)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommands,
}

impl CliArgs {
    /// Loads the configuration file named on the command line, or the default one.
    pub fn load_config(&self) -> Result<Config> {
        Config::load(self.config.as_deref())
    }
}
