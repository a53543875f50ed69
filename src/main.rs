//! SolaX local API decoder CLI
//!
//! A command-line interface (CLI) application for decoding the register data
//! that SolaX inverters report over their local (LAN) API.
//!
//! This tool allows users to:
//! - Decode a saved (or piped) payload into voltages, currents, powers and energy totals.
//! - Print the decoded values as text, JSON or YAML.
//! - Inspect single raw registers and 32-bit register pairs.
//! - List the supported register layouts.
//!
//! Fetching the payload from the inverter is out of scope, e.g. use
//! `curl -d "optType=ReadRealTimeData&pwd=<serial>" http://<inverter> | solaxdec decode`.
//!
//! The CLI leverages the `solax_local_lib` crate for the register tables and decoding.

use anyhow::{Context, Result};
use clap::Parser;
use flexi_logger::{Logger, LoggerHandle};
use log::*;
use serde::Serialize;
use solax_local_lib::{
    decoder::{LocalData, Reading},
    payload::LocalConnectRawData,
    protocol as proto,
    registers::{read_32bit_signed, RawRegisters},
};
use std::io::Read;
use std::panic;

mod commandline;
mod config;

use config::{Config, OutputFormat};

fn logging_init(loglevel: LevelFilter) -> LoggerHandle {
    let log_handle = Logger::try_with_env_or_str(loglevel.as_str())
        .expect("Cannot init logging")
        .start()
        .expect("Cannot start logging");

    panic::set_hook(Box::new(|panic_info| {
        let (filename, line, column) = panic_info
            .location()
            .map(|loc| (loc.file(), loc.line(), loc.column()))
            .unwrap_or(("<unknown_file>", 0, 0));

        let cause_str = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            *s
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.as_str()
        } else {
            "<unknown_panic_cause>"
        };

        error!(
            target: "panic",
            "Thread '{}' panicked at '{}': {}:{} - Cause: {}",
            std::thread::current().name().unwrap_or("<unnamed>"),
            filename,
            line,
            column,
            cause_str
        );
    }));
    log_handle
}

/// Reads the payload text from a file, or from stdin for "-".
fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        debug!("Reading payload from stdin");
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Cannot read payload from stdin")?;
        Ok(buffer)
    } else {
        debug!("Reading payload from {input}");
        std::fs::read_to_string(input).with_context(|| format!("Cannot read payload file {input}"))
    }
}

fn load_payload(input: &str) -> Result<LocalConnectRawData> {
    let json = read_input(input)?;
    let payload = LocalConnectRawData::from_json(&json)
        .with_context(|| format!("Cannot parse payload from {input}"))?;
    info!(
        "Payload from dongle {} (firmware {}), type {}, {} registers",
        payload.wifi_serial,
        payload.wifi_version,
        payload.type_code,
        payload.data.len()
    );
    Ok(payload)
}

/// Picks the register layout: command line first, then config file, then the payload type code.
fn select_variant(
    payload: &LocalConnectRawData,
    requested: Option<proto::DeviceVariant>,
    config: &Config,
) -> Result<proto::DeviceVariant> {
    if let Some(variant) = requested.or_else(|| config.variant_for(payload.type_code)) {
        return Ok(variant);
    }
    payload
        .variant()
        .with_context(|| "Cannot select a register layout, use --variant to choose one")
}

#[derive(Debug, Serialize)]
struct DecodedOutput<'a> {
    wifi_serial: &'a str,
    wifi_version: &'a str,
    inverter_serial: Option<&'a str>,
    variant: proto::DeviceVariant,
    inverter_work_mode: String,
    readings: Vec<Reading>,
}

impl<'a> DecodedOutput<'a> {
    fn new(payload: &'a LocalConnectRawData, data: &LocalData) -> Self {
        Self {
            wifi_serial: &payload.wifi_serial,
            wifi_version: &payload.wifi_version,
            inverter_serial: payload.inverter_serial(),
            variant: data.variant(),
            inverter_work_mode: data.inverter_work_mode(),
            readings: data.readings().collect(),
        }
    }
}

fn format_text(payload: &LocalConnectRawData, data: &LocalData) -> String {
    let mut text = format!(
        "Variant: {} (type {})\nWiFi dongle: {} (firmware {})\n",
        data.variant(),
        payload.type_code,
        payload.wifi_serial,
        payload.wifi_version
    );
    if let Some(serial) = payload.inverter_serial() {
        text.push_str(&format!("Inverter: {serial}\n"));
    }
    for reading in data.readings() {
        text.push_str(&reading.to_string());
        if !data.is_available(reading.quantity) {
            text.push_str(" (not reported)");
        }
        text.push('\n');
    }
    text
}

fn format_output(
    payload: &LocalConnectRawData,
    data: &LocalData,
    format: OutputFormat,
) -> Result<String> {
    Ok(match format {
        OutputFormat::Text => format_text(payload, data),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&DecodedOutput::new(payload, data))
                .context("Cannot serialize readings to JSON")?;
            json.push('\n');
            json
        }
        OutputFormat::Yaml => serde_yaml::to_string(&DecodedOutput::new(payload, data))
            .context("Cannot serialize readings to YAML")?,
    })
}

fn handle_decode(
    input: &str,
    variant: Option<proto::DeviceVariant>,
    format: Option<OutputFormat>,
    config: &Config,
) -> Result<()> {
    let payload = load_payload(input)?;
    let variant = select_variant(&payload, variant, config)?;
    info!("Executing: Decode as {variant}");
    let data = payload
        .decode_as(variant)
        .with_context(|| format!("Cannot decode payload as {variant}"))?;
    print!("{}", format_output(&payload, &data, format.unwrap_or(config.format))?);
    Ok(())
}

fn handle_raw(input: &str, offset: u16, high: Option<u16>) -> Result<()> {
    let payload = load_payload(input)?;
    let registers = RawRegisters::from(payload.data);
    let low_value = registers
        .get(offset)
        .with_context(|| format!("Cannot read register {offset}"))?;
    match high {
        Some(high) => {
            let high_value = registers
                .get(high)
                .with_context(|| format!("Cannot read register {high}"))?;
            println!(
                "Registers {offset} (low) = {low_value}, {high} (high) = {high_value}: {}",
                read_32bit_signed(low_value, high_value)
            );
        }
        None => println!("Register {offset} = {low_value} (0x{:04X})", low_value as u16),
    }
    Ok(())
}

fn handle_variants() {
    for variant in proto::DeviceVariant::ALL {
        println!(
            "{variant} (type {}, at least {} registers)",
            variant.type_code(),
            variant.minimum_len()
        );
        for spec in variant.profile() {
            let availability = match spec.availability {
                proto::Availability::Required => "",
                proto::Availability::Optional => "optional",
            };
            println!(
                "  {:<32} {:>8} /{:<4} {:<4} {availability}",
                spec.quantity.name(),
                spec.source.to_string(),
                spec.divisor as u8,
                spec.quantity.unit().symbol(),
            );
        }
    }
}

fn main() -> Result<()> {
    let args = commandline::CliArgs::parse();

    let _log_handle = logging_init(args.verbose.log_level_filter());
    info!(
        "solaxdec started. Log level: {}",
        args.verbose.log_level_filter()
    );

    let config = args.load_config()?;

    match &args.command {
        commandline::CliCommands::Decode {
            input,
            variant,
            format,
        } => handle_decode(input, *variant, *format, &config)?,
        commandline::CliCommands::Raw {
            input,
            offset,
            high,
        } => {
            info!("Executing: Read raw register {offset}");
            handle_raw(input, *offset, *high)?;
        }
        commandline::CliCommands::Variants => handle_variants(),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(type_code: u16) -> LocalConnectRawData {
        let mut data = vec![0i16; 300];
        data[0] = 2366;
        data[129] = 7875;
        LocalConnectRawData {
            wifi_serial: "SN1".to_string(),
            wifi_version: "1.003.11".to_string(),
            type_code,
            data,
            information: vec![
                serde_json::json!(30.0),
                serde_json::json!(25),
                serde_json::json!("H3BC"),
            ],
        }
    }

    #[test]
    fn test_select_variant_precedence() {
        let mut config = Config::default();
        assert_eq!(
            select_variant(&payload(25), None, &config).unwrap(),
            proto::DeviceVariant::X3Ultra
        );
        assert!(select_variant(&payload(99), None, &config).is_err());

        config
            .variants
            .insert(25, proto::DeviceVariant::X3UltraExtended);
        assert_eq!(
            select_variant(&payload(25), None, &config).unwrap(),
            proto::DeviceVariant::X3UltraExtended
        );
        assert_eq!(
            select_variant(&payload(25), Some(proto::DeviceVariant::X3Ultra), &config).unwrap(),
            proto::DeviceVariant::X3Ultra
        );
    }

    #[test]
    fn test_format_text() {
        let payload = payload(25);
        let data = payload.decode_as(proto::DeviceVariant::X3UltraExtended).unwrap();
        let text = format_text(&payload, &data);
        assert!(text.starts_with("Variant: x3-ultra-extended (type 25)\n"));
        assert!(text.contains("Inverter: H3BC\n"));
        assert!(text.contains("voltage-phase1: 236.6 V\n"));
        assert!(text.contains("pv3-voltage: 787.5 V\n"));
        assert!(text.contains("inverter-work-mode-code: 0\n"));
    }

    #[test]
    fn test_format_text_marks_missing_optional_hardware() {
        let mut payload = payload(25);
        payload.data.truncate(120);
        let data = payload.decode_as(proto::DeviceVariant::X3UltraExtended).unwrap();
        let text = format_text(&payload, &data);
        assert!(text.contains("pv3-voltage: 0 V (not reported)\n"));
        assert!(text.contains("voltage-phase1: 236.6 V\n"));
    }

    #[test]
    fn test_format_json() {
        let payload = payload(25);
        let data = payload.decode().unwrap();
        let json = format_output(&payload, &data, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["variant"], "x3-ultra");
        assert_eq!(value["inverter_serial"], "H3BC");
        assert_eq!(value["readings"][0]["quantity"], "voltage-phase1");
        assert_eq!(value["readings"][0]["value"], 236.6);
        assert_eq!(value["readings"][0]["unit"], "V");
    }

    #[test]
    fn test_format_yaml() {
        let payload = payload(25);
        let data = payload.decode().unwrap();
        let yaml = format_output(&payload, &data, OutputFormat::Yaml).unwrap();
        assert!(yaml.contains("variant: x3-ultra\n"));
        assert!(yaml.contains("quantity: voltage-phase1"));
    }
}
