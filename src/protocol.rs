//! Register layouts of the supported inverter models.
//!
//! Every [`DeviceVariant`] owns a static table of [`RegisterSpec`] entries. An
//! entry tells which register (or register pair) holds a [`Quantity`], by which
//! [`Divisor`] the raw value is scaled and whether the register is always
//! reported ([`Availability::Required`]) or only meaningful when the matching
//! hardware is installed ([`Availability::Optional`]).
use crate::error::Error;
use std::fmt;
use std::str::FromStr;

/// Physical unit of a decoded [`Quantity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Unit {
    #[cfg_attr(feature = "serde", serde(rename = "V"))]
    Volt,
    #[cfg_attr(feature = "serde", serde(rename = "A"))]
    Ampere,
    #[cfg_attr(feature = "serde", serde(rename = "W"))]
    Watt,
    #[cfg_attr(feature = "serde", serde(rename = "kWh"))]
    KiloWattHour,
    #[cfg_attr(feature = "serde", serde(rename = "Hz"))]
    Hertz,
    #[cfg_attr(feature = "serde", serde(rename = "%"))]
    Percent,
    #[cfg_attr(feature = "serde", serde(rename = "°C"))]
    DegreeCelsius,
    #[cfg_attr(feature = "serde", serde(rename = ""))]
    None,
}

impl Unit {
    /// The unit symbol, empty for dimensionless codes.
    pub const fn symbol(&self) -> &'static str {
        match self {
            Unit::Volt => "V",
            Unit::Ampere => "A",
            Unit::Watt => "W",
            Unit::KiloWattHour => "kWh",
            Unit::Hertz => "Hz",
            Unit::Percent => "%",
            Unit::DegreeCelsius => "°C",
            Unit::None => "",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Every physical quantity a register profile can provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Quantity {
    VoltagePhase1,
    VoltagePhase2,
    VoltagePhase3,
    CurrentPhase1,
    CurrentPhase2,
    CurrentPhase3,
    OutputPowerPhase1,
    OutputPowerPhase2,
    OutputPowerPhase3,
    Pv1Voltage,
    Pv2Voltage,
    Pv3Voltage,
    Pv1Current,
    Pv2Current,
    Pv3Current,
    Pv1Power,
    Pv2Power,
    Pv3Power,
    FrequencyPhase1,
    FrequencyPhase2,
    FrequencyPhase3,
    InverterWorkModeCode,
    BatteryVoltage,
    BatteryCurrent,
    BatteryPower,
    BatteryLevel,
    BatteryTemperature,
    Battery2Voltage,
    Battery2Current,
    Battery2Power,
    Battery2Level,
    Battery2Temperature,
    FeedInPower,
    PowerUsage,
    TotalEnergy,
    TotalBatteryDischargeEnergy,
    TotalBatteryChargeEnergy,
    TotalPvEnergy,
    TotalFeedInEnergy,
    TotalConsumption,
    TodayEnergy,
    TodayFeedInEnergy,
    TodayConsumption,
    TodayBatteryDischargeEnergy,
    TodayBatteryChargeEnergy,
}

impl Quantity {
    /// Stable kebab-case name, as used on the command line and in serialized output.
    pub const fn name(&self) -> &'static str {
        match self {
            Quantity::VoltagePhase1 => "voltage-phase1",
            Quantity::VoltagePhase2 => "voltage-phase2",
            Quantity::VoltagePhase3 => "voltage-phase3",
            Quantity::CurrentPhase1 => "current-phase1",
            Quantity::CurrentPhase2 => "current-phase2",
            Quantity::CurrentPhase3 => "current-phase3",
            Quantity::OutputPowerPhase1 => "output-power-phase1",
            Quantity::OutputPowerPhase2 => "output-power-phase2",
            Quantity::OutputPowerPhase3 => "output-power-phase3",
            Quantity::Pv1Voltage => "pv1-voltage",
            Quantity::Pv2Voltage => "pv2-voltage",
            Quantity::Pv3Voltage => "pv3-voltage",
            Quantity::Pv1Current => "pv1-current",
            Quantity::Pv2Current => "pv2-current",
            Quantity::Pv3Current => "pv3-current",
            Quantity::Pv1Power => "pv1-power",
            Quantity::Pv2Power => "pv2-power",
            Quantity::Pv3Power => "pv3-power",
            Quantity::FrequencyPhase1 => "frequency-phase1",
            Quantity::FrequencyPhase2 => "frequency-phase2",
            Quantity::FrequencyPhase3 => "frequency-phase3",
            Quantity::InverterWorkModeCode => "inverter-work-mode-code",
            Quantity::BatteryVoltage => "battery-voltage",
            Quantity::BatteryCurrent => "battery-current",
            Quantity::BatteryPower => "battery-power",
            Quantity::BatteryLevel => "battery-level",
            Quantity::BatteryTemperature => "battery-temperature",
            Quantity::Battery2Voltage => "battery2-voltage",
            Quantity::Battery2Current => "battery2-current",
            Quantity::Battery2Power => "battery2-power",
            Quantity::Battery2Level => "battery2-level",
            Quantity::Battery2Temperature => "battery2-temperature",
            Quantity::FeedInPower => "feed-in-power",
            Quantity::PowerUsage => "power-usage",
            Quantity::TotalEnergy => "total-energy",
            Quantity::TotalBatteryDischargeEnergy => "total-battery-discharge-energy",
            Quantity::TotalBatteryChargeEnergy => "total-battery-charge-energy",
            Quantity::TotalPvEnergy => "total-pv-energy",
            Quantity::TotalFeedInEnergy => "total-feed-in-energy",
            Quantity::TotalConsumption => "total-consumption",
            Quantity::TodayEnergy => "today-energy",
            Quantity::TodayFeedInEnergy => "today-feed-in-energy",
            Quantity::TodayConsumption => "today-consumption",
            Quantity::TodayBatteryDischargeEnergy => "today-battery-discharge-energy",
            Quantity::TodayBatteryChargeEnergy => "today-battery-charge-energy",
        }
    }

    /// The unit the decoded value is expressed in.
    pub const fn unit(&self) -> Unit {
        use Quantity::*;
        match self {
            VoltagePhase1 | VoltagePhase2 | VoltagePhase3 | Pv1Voltage | Pv2Voltage
            | Pv3Voltage | BatteryVoltage | Battery2Voltage => Unit::Volt,
            CurrentPhase1 | CurrentPhase2 | CurrentPhase3 | Pv1Current | Pv2Current
            | Pv3Current | BatteryCurrent | Battery2Current => Unit::Ampere,
            OutputPowerPhase1 | OutputPowerPhase2 | OutputPowerPhase3 | Pv1Power | Pv2Power
            | Pv3Power | BatteryPower | Battery2Power | FeedInPower | PowerUsage => Unit::Watt,
            FrequencyPhase1 | FrequencyPhase2 | FrequencyPhase3 => Unit::Hertz,
            BatteryLevel | Battery2Level => Unit::Percent,
            BatteryTemperature | Battery2Temperature => Unit::DegreeCelsius,
            InverterWorkModeCode => Unit::None,
            TotalEnergy
            | TotalBatteryDischargeEnergy
            | TotalBatteryChargeEnergy
            | TotalPvEnergy
            | TotalFeedInEnergy
            | TotalConsumption
            | TodayEnergy
            | TodayFeedInEnergy
            | TodayConsumption
            | TodayBatteryDischargeEnergy
            | TodayBatteryChargeEnergy => Unit::KiloWattHour,
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fixed divisor applied to a raw register value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Divisor {
    One = 1,
    Ten = 10,
    Hundred = 100,
}

impl Divisor {
    /// Scales a raw register value into its physical value.
    ///
    /// # Examples
    ///
    /// ```
    /// use solax_local_lib::protocol::Divisor;
    ///
    /// assert_eq!(Divisor::Ten.scale(2366), 236.6);
    /// assert_eq!(Divisor::Hundred.scale(-1010), -10.1);
    /// ```
    pub fn scale(self, raw: i32) -> f64 {
        f64::from(raw) / f64::from(self as u8)
    }
}

/// Where the raw value of a quantity lives in the register array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    /// One signed 16-bit register.
    Single(u16),
    /// Two registers forming one signed 32-bit value.
    ///
    /// The word order differs between models, so each entry names the
    /// offset of its low and high word.
    Pair { low: u16, high: u16 },
}

impl Source {
    /// The highest offset read by this source.
    pub const fn last_offset(&self) -> u16 {
        match *self {
            Source::Single(offset) => offset,
            Source::Pair { low, high } => {
                if low > high {
                    low
                } else {
                    high
                }
            }
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Single(offset) => write!(f, "{offset}"),
            Source::Pair { low, high } => write!(f, "{low}+{high}"),
        }
    }
}

/// Whether a register is always reported by the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Availability {
    /// Part of every payload of the model. A payload without it is defective.
    Required,
    /// Depends on installed hardware (a third PV string, a second battery).
    /// Missing registers decode to 0.
    Optional,
}

/// One row of a register profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegisterSpec {
    pub quantity: Quantity,
    pub source: Source,
    pub divisor: Divisor,
    pub availability: Availability,
}

impl RegisterSpec {
    const fn required(quantity: Quantity, source: Source, divisor: Divisor) -> Self {
        Self {
            quantity,
            source,
            divisor,
            availability: Availability::Required,
        }
    }

    const fn optional(quantity: Quantity, source: Source, divisor: Divisor) -> Self {
        Self {
            quantity,
            source,
            divisor,
            availability: Availability::Optional,
        }
    }
}

use Divisor::{Hundred, One, Ten};
use Source::{Pair, Single};

/// X3 Ultra registers, as reported by every unit of the model family.
const X3_ULTRA: &[RegisterSpec] = &[
    RegisterSpec::required(Quantity::VoltagePhase1, Single(0), Ten),
    RegisterSpec::required(Quantity::VoltagePhase2, Single(1), Ten),
    RegisterSpec::required(Quantity::VoltagePhase3, Single(2), Ten),
    RegisterSpec::required(Quantity::CurrentPhase1, Single(3), Ten),
    RegisterSpec::required(Quantity::CurrentPhase2, Single(4), Ten),
    RegisterSpec::required(Quantity::CurrentPhase3, Single(5), Ten),
    RegisterSpec::required(Quantity::OutputPowerPhase1, Single(6), One),
    RegisterSpec::required(Quantity::OutputPowerPhase2, Single(7), One),
    RegisterSpec::required(Quantity::OutputPowerPhase3, Single(8), One),
    RegisterSpec::required(Quantity::Pv1Voltage, Single(10), Ten),
    RegisterSpec::required(Quantity::Pv2Voltage, Single(11), Ten),
    RegisterSpec::required(Quantity::Pv1Current, Single(12), Ten),
    RegisterSpec::required(Quantity::Pv2Current, Single(13), Ten),
    RegisterSpec::required(Quantity::Pv1Power, Single(14), One),
    RegisterSpec::required(Quantity::Pv2Power, Single(15), One),
    RegisterSpec::required(Quantity::FrequencyPhase1, Single(16), Hundred),
    RegisterSpec::required(Quantity::FrequencyPhase2, Single(17), Hundred),
    RegisterSpec::required(Quantity::FrequencyPhase3, Single(18), Hundred),
    RegisterSpec::required(Quantity::InverterWorkModeCode, Single(19), One),
    RegisterSpec::required(Quantity::FeedInPower, Pair { low: 34, high: 35 }, One),
    RegisterSpec::required(Quantity::BatteryVoltage, Single(39), Ten),
    RegisterSpec::required(Quantity::BatteryCurrent, Single(40), Hundred),
    RegisterSpec::required(Quantity::BatteryPower, Single(41), One),
    RegisterSpec::required(Quantity::PowerUsage, Single(47), One),
    RegisterSpec::required(Quantity::TotalEnergy, Pair { low: 58, high: 59 }, Ten),
    RegisterSpec::required(Quantity::TodayEnergy, Single(70), Ten),
    RegisterSpec::required(
        Quantity::TotalBatteryDischargeEnergy,
        Pair { low: 74, high: 75 },
        Ten,
    ),
    RegisterSpec::required(
        Quantity::TotalBatteryChargeEnergy,
        Pair { low: 76, high: 77 },
        Ten,
    ),
    RegisterSpec::required(Quantity::TodayBatteryDischargeEnergy, Single(78), Ten),
    RegisterSpec::required(Quantity::TodayBatteryChargeEnergy, Single(79), Ten),
    RegisterSpec::required(Quantity::TotalPvEnergy, Pair { low: 80, high: 81 }, Ten),
    RegisterSpec::required(
        Quantity::TotalFeedInEnergy,
        Pair { low: 86, high: 87 },
        Hundred,
    ),
    RegisterSpec::required(
        Quantity::TotalConsumption,
        Pair { low: 88, high: 89 },
        Hundred,
    ),
    RegisterSpec::required(
        Quantity::TodayFeedInEnergy,
        Pair { low: 90, high: 91 },
        Hundred,
    ),
    RegisterSpec::required(
        Quantity::TodayConsumption,
        Pair { low: 92, high: 93 },
        Hundred,
    ),
    RegisterSpec::required(Quantity::BatteryLevel, Single(103), One),
    RegisterSpec::required(Quantity::BatteryTemperature, Single(105), One),
];

/// Third PV string and second battery bank, reported by newer firmware only.
const X3_ULTRA_EXTENSION: &[RegisterSpec] = &[
    RegisterSpec::optional(Quantity::Pv3Voltage, Single(129), Ten),
    RegisterSpec::optional(Quantity::Pv3Current, Single(130), Ten),
    RegisterSpec::optional(Quantity::Pv3Power, Single(131), One),
    RegisterSpec::optional(Quantity::Battery2Voltage, Single(132), Ten),
    RegisterSpec::optional(Quantity::Battery2Current, Single(133), Hundred),
    RegisterSpec::optional(Quantity::Battery2Power, Single(134), One),
    RegisterSpec::optional(Quantity::Battery2Level, Single(140), One),
    RegisterSpec::optional(Quantity::Battery2Temperature, Single(142), One),
];

/// Supported inverter models, each with its own register layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum DeviceVariant {
    /// X3 Ultra, type code 25.
    X3Ultra,
    /// X3 Ultra with firmware that also reports a third PV string and a
    /// second battery bank. Shares type code 25 with [`DeviceVariant::X3Ultra`]
    /// and is therefore never selected from the type code alone.
    X3UltraExtended,
}

impl DeviceVariant {
    pub const ALL: [DeviceVariant; 2] = [DeviceVariant::X3Ultra, DeviceVariant::X3UltraExtended];

    /// Selects the variant for a payload `type` code.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedInverterType`] for codes without a register profile.
    pub fn from_type_code(code: u16) -> Result<Self, Error> {
        match code {
            25 => Ok(DeviceVariant::X3Ultra),
            _ => Err(Error::UnsupportedInverterType(code)),
        }
    }

    /// The payload `type` code the variant reports.
    pub const fn type_code(&self) -> u16 {
        match self {
            DeviceVariant::X3Ultra | DeviceVariant::X3UltraExtended => 25,
        }
    }

    /// Kebab-case name of the variant.
    pub const fn name(&self) -> &'static str {
        match self {
            DeviceVariant::X3Ultra => "x3-ultra",
            DeviceVariant::X3UltraExtended => "x3-ultra-extended",
        }
    }

    fn tables(&self) -> &'static [&'static [RegisterSpec]] {
        match self {
            DeviceVariant::X3Ultra => &[X3_ULTRA],
            DeviceVariant::X3UltraExtended => &[X3_ULTRA, X3_ULTRA_EXTENSION],
        }
    }

    /// All register specifications of the variant, in table order.
    pub fn profile(&self) -> impl Iterator<Item = &'static RegisterSpec> {
        self.tables().iter().flat_map(|table| table.iter())
    }

    /// The register specification of `quantity`, if the variant provides it.
    pub fn spec(&self, quantity: Quantity) -> Option<&'static RegisterSpec> {
        self.profile().find(|spec| spec.quantity == quantity)
    }

    /// Minimum number of registers a payload must carry: highest required offset plus one.
    pub fn minimum_len(&self) -> usize {
        self.profile()
            .filter(|spec| spec.availability == Availability::Required)
            .map(|spec| usize::from(spec.source.last_offset()) + 1)
            .max()
            .unwrap_or(0)
    }
}

impl fmt::Display for DeviceVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DeviceVariant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DeviceVariant::ALL
            .into_iter()
            .find(|variant| variant.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownVariant(s.to_string()))
    }
}
