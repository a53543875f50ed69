//! Table-driven decoder for one poll cycle of local API data.
//!
//! [`LocalData`] pairs a [`RawRegisters`] buffer with the [`DeviceVariant`] that
//! produced it. The buffer length is checked once on construction, after that
//! every accessor is infallible: required registers are known to be present,
//! optional and undeclared quantities decode to `0`.
//!
//! ```
//! use solax_local_lib::{decoder::LocalData, protocol::DeviceVariant};
//!
//! let mut registers = vec![0i16; 106];
//! registers[0] = 2366;
//! registers[58] = 7586;
//! registers[59] = 1;
//!
//! let data = LocalData::new(DeviceVariant::X3Ultra, registers)?;
//! assert_eq!(data.voltage_phase1(), 236.6);
//! assert_eq!(data.total_energy(), 7312.2);
//! assert_eq!(data.pv3_voltage(), 0.0);
//! # Ok::<(), solax_local_lib::Error>(())
//! ```
use crate::error::{Error, Result};
use crate::protocol::{DeviceVariant, Quantity, RegisterSpec, Source, Unit};
use crate::registers::RawRegisters;
use std::fmt;

/// One decoded quantity, ready for presentation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Reading {
    pub quantity: Quantity,
    pub value: f64,
    pub unit: Unit,
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unit == Unit::None {
            write!(f, "{}: {}", self.quantity, self.value)
        } else {
            write!(f, "{}: {} {}", self.quantity, self.value, self.unit)
        }
    }
}

/// Decoded view of the register array reported by one inverter.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalData {
    variant: DeviceVariant,
    registers: RawRegisters,
}

impl LocalData {
    /// Creates a decoder for `registers` laid out as `variant`.
    ///
    /// # Errors
    ///
    /// [`Error::BufferTooShort`] if the buffer ends before the last register the
    /// variant requires.
    pub fn new(variant: DeviceVariant, registers: impl Into<RawRegisters>) -> Result<Self> {
        let registers = registers.into();
        let expected = variant.minimum_len();
        if registers.len() < expected {
            return Err(Error::BufferTooShort {
                variant,
                expected,
                actual: registers.len(),
            });
        }
        log::debug!(
            "Decoding {} registers as {variant} (minimum {expected})",
            registers.len()
        );
        Ok(Self { variant, registers })
    }

    /// The register layout used by this decoder.
    pub fn variant(&self) -> DeviceVariant {
        self.variant
    }

    /// The underlying register buffer.
    pub fn registers(&self) -> &RawRegisters {
        &self.registers
    }

    /// Reads one raw register.
    ///
    /// # Errors
    ///
    /// [`Error::OffsetOutOfRange`] beyond the end of the buffer.
    pub fn raw(&self, offset: u16) -> Result<i16> {
        self.registers.get(offset)
    }

    /// Returns `true` if the variant's layout declares `quantity`.
    pub fn supports(&self, quantity: Quantity) -> bool {
        self.variant.spec(quantity).is_some()
    }

    /// Returns `true` if `quantity` is declared and all of its registers are in the buffer.
    pub fn is_available(&self, quantity: Quantity) -> bool {
        self.variant
            .spec(quantity)
            .is_some_and(|spec| self.registers.contains(spec.source.last_offset()))
    }

    fn raw_value(&self, spec: &RegisterSpec) -> i32 {
        match spec.source {
            Source::Single(offset) => i32::from(self.registers.get_or_zero(offset)),
            Source::Pair { low, high } => self.registers.pair_or_zero(low, high),
        }
    }

    fn raw_of(&self, quantity: Quantity) -> i32 {
        match self.variant.spec(quantity) {
            Some(spec) => self.raw_value(spec),
            None => {
                log::trace!("{quantity} is not part of the {} layout", self.variant);
                0
            }
        }
    }

    // Single registers only, so the value always fits.
    fn raw_i16(&self, quantity: Quantity) -> i16 {
        self.raw_of(quantity) as i16
    }

    /// Decodes `quantity` and applies its divisor.
    ///
    /// Quantities the variant does not declare, and optional ones whose
    /// registers are missing, decode to `0.0`.
    pub fn value(&self, quantity: Quantity) -> f64 {
        match self.variant.spec(quantity) {
            Some(spec) => spec.divisor.scale(self.raw_of(quantity)),
            None => 0.0,
        }
    }

    /// Every quantity of the variant's layout, in table order.
    pub fn readings(&self) -> impl Iterator<Item = Reading> + '_ {
        self.variant.profile().map(move |spec| Reading {
            quantity: spec.quantity,
            value: spec.divisor.scale(self.raw_value(spec)),
            unit: spec.quantity.unit(),
        })
    }

    // Inverter

    pub fn voltage_phase1(&self) -> f64 {
        self.value(Quantity::VoltagePhase1)
    }

    pub fn voltage_phase2(&self) -> f64 {
        self.value(Quantity::VoltagePhase2)
    }

    pub fn voltage_phase3(&self) -> f64 {
        self.value(Quantity::VoltagePhase3)
    }

    pub fn current_phase1(&self) -> f64 {
        self.value(Quantity::CurrentPhase1)
    }

    pub fn current_phase2(&self) -> f64 {
        self.value(Quantity::CurrentPhase2)
    }

    pub fn current_phase3(&self) -> f64 {
        self.value(Quantity::CurrentPhase3)
    }

    pub fn output_power_phase1(&self) -> i16 {
        self.raw_i16(Quantity::OutputPowerPhase1)
    }

    pub fn output_power_phase2(&self) -> i16 {
        self.raw_i16(Quantity::OutputPowerPhase2)
    }

    pub fn output_power_phase3(&self) -> i16 {
        self.raw_i16(Quantity::OutputPowerPhase3)
    }

    pub fn frequency_phase1(&self) -> f64 {
        self.value(Quantity::FrequencyPhase1)
    }

    pub fn frequency_phase2(&self) -> f64 {
        self.value(Quantity::FrequencyPhase2)
    }

    pub fn frequency_phase3(&self) -> f64 {
        self.value(Quantity::FrequencyPhase3)
    }

    /// Raw work-mode code of the inverter.
    pub fn inverter_work_mode_code(&self) -> i16 {
        self.raw_i16(Quantity::InverterWorkModeCode)
    }

    /// Work-mode code in its decimal string form.
    pub fn inverter_work_mode(&self) -> String {
        self.inverter_work_mode_code().to_string()
    }

    // PV strings

    pub fn pv1_voltage(&self) -> f64 {
        self.value(Quantity::Pv1Voltage)
    }

    pub fn pv2_voltage(&self) -> f64 {
        self.value(Quantity::Pv2Voltage)
    }

    pub fn pv3_voltage(&self) -> f64 {
        self.value(Quantity::Pv3Voltage)
    }

    pub fn pv1_current(&self) -> f64 {
        self.value(Quantity::Pv1Current)
    }

    pub fn pv2_current(&self) -> f64 {
        self.value(Quantity::Pv2Current)
    }

    pub fn pv3_current(&self) -> f64 {
        self.value(Quantity::Pv3Current)
    }

    pub fn pv1_power(&self) -> i16 {
        self.raw_i16(Quantity::Pv1Power)
    }

    pub fn pv2_power(&self) -> i16 {
        self.raw_i16(Quantity::Pv2Power)
    }

    pub fn pv3_power(&self) -> i16 {
        self.raw_i16(Quantity::Pv3Power)
    }

    // Battery

    pub fn battery_voltage(&self) -> f64 {
        self.value(Quantity::BatteryVoltage)
    }

    pub fn battery_current(&self) -> f64 {
        self.value(Quantity::BatteryCurrent)
    }

    pub fn battery_power(&self) -> i16 {
        self.raw_i16(Quantity::BatteryPower)
    }

    /// State of charge in percent.
    pub fn battery_level(&self) -> i16 {
        self.raw_i16(Quantity::BatteryLevel)
    }

    pub fn battery_temperature(&self) -> i16 {
        self.raw_i16(Quantity::BatteryTemperature)
    }

    pub fn battery2_voltage(&self) -> f64 {
        self.value(Quantity::Battery2Voltage)
    }

    pub fn battery2_current(&self) -> f64 {
        self.value(Quantity::Battery2Current)
    }

    pub fn battery2_power(&self) -> i16 {
        self.raw_i16(Quantity::Battery2Power)
    }

    pub fn battery2_level(&self) -> i16 {
        self.raw_i16(Quantity::Battery2Level)
    }

    pub fn battery2_temperature(&self) -> i16 {
        self.raw_i16(Quantity::Battery2Temperature)
    }

    // Grid

    /// Power exported to the grid in watts, negative while importing.
    pub fn feed_in_power(&self) -> i32 {
        self.raw_of(Quantity::FeedInPower)
    }

    pub fn power_usage(&self) -> i16 {
        self.raw_i16(Quantity::PowerUsage)
    }

    // Totals, all in kWh

    pub fn total_energy(&self) -> f64 {
        self.value(Quantity::TotalEnergy)
    }

    pub fn total_battery_discharge_energy(&self) -> f64 {
        self.value(Quantity::TotalBatteryDischargeEnergy)
    }

    pub fn total_battery_charge_energy(&self) -> f64 {
        self.value(Quantity::TotalBatteryChargeEnergy)
    }

    pub fn total_pv_energy(&self) -> f64 {
        self.value(Quantity::TotalPvEnergy)
    }

    pub fn total_feed_in_energy(&self) -> f64 {
        self.value(Quantity::TotalFeedInEnergy)
    }

    pub fn total_consumption(&self) -> f64 {
        self.value(Quantity::TotalConsumption)
    }

    pub fn today_energy(&self) -> f64 {
        self.value(Quantity::TodayEnergy)
    }

    pub fn today_feed_in_energy(&self) -> f64 {
        self.value(Quantity::TodayFeedInEnergy)
    }

    pub fn today_consumption(&self) -> f64 {
        self.value(Quantity::TodayConsumption)
    }

    pub fn today_battery_discharge_energy(&self) -> f64 {
        self.value(Quantity::TodayBatteryDischargeEnergy)
    }

    pub fn today_battery_charge_energy(&self) -> f64 {
        self.value(Quantity::TodayBatteryChargeEnergy)
    }
}
