//! A library for decoding the register data reported by SolaX inverters over their local (LAN) API.
//!
//! The local API answers every poll with a JSON document whose `Data` field is a
//! flat array of 16-bit registers. This crate turns that array into typed,
//! scaled physical quantities:
//!
//! 1.  [`registers::RawRegisters`] owns the register array and offers strict
//!     and soft (zero-default) reads, plus [`registers::read_32bit_signed`] for
//!     counters spanning two registers.
//! 2.  [`protocol`] holds the per-model register tables, selected through
//!     [`protocol::DeviceVariant`].
//! 3.  [`decoder::LocalData`] applies a table to a buffer and exposes one
//!     accessor per quantity.
//! 4.  [`payload::LocalConnectRawData`] (feature `serde`) parses the JSON document
//!     and picks the table from its `type` code.
//!
//! Fetching the document from the inverter is left to the caller.
//!
//! ## Quick Start
//!
//! ```
//! use solax_local_lib::payload::LocalConnectRawData;
//!
//! let mut registers = vec!["0"; 300];
//! registers[0] = "2366";
//! let json = format!(
//!     r#"{{"sn":"SNXXXXXXX","ver":"1.003.11","type":25,"Data":[{}],"Information":[]}}"#,
//!     registers.join(",")
//! );
//!
//! let data = LocalConnectRawData::from_json(&json)?.decode()?;
//! println!("Voltage phase 1: {} V", data.voltage_phase1());
//! for reading in data.readings() {
//!     println!("{reading}");
//! }
//! # Ok::<(), solax_local_lib::Error>(())
//! ```

pub mod decoder;
pub mod error;
pub mod protocol;
pub mod registers;

#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
#[cfg(feature = "serde")]
pub mod payload;

pub use error::{Error, Result};
