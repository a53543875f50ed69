//! Model of the JSON document returned by the inverter's local API.
//!
//! ```json
//! {"sn":"SNXXXXXXX","ver":"1.003.11","type":25,"Data":[2366,2330,...],"Information":[30.000,25,"H3BC30K3065001",...]}
//! ```
//!
//! Only `Data` is decoded into physical quantities, `type` selects the register
//! layout. The remaining fields are kept for the caller.
use crate::decoder::LocalData;
use crate::error::Result;
use crate::protocol::DeviceVariant;
use crate::registers::wrap_register_value;
use serde::{Deserialize, Deserializer};

/// Raw payload of one local API poll.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LocalConnectRawData {
    /// Serial number of the WiFi dongle.
    #[serde(rename = "sn")]
    pub wifi_serial: String,
    /// Firmware version of the WiFi dongle.
    #[serde(rename = "ver")]
    pub wifi_version: String,
    #[serde(rename = "type")]
    pub type_code: u16,
    #[serde(rename = "Data", deserialize_with = "deserialize_registers")]
    pub data: Vec<i16>,
    #[serde(rename = "Information", default)]
    pub information: Vec<serde_json::Value>,
}

fn deserialize_registers<'de, D>(deserializer: D) -> std::result::Result<Vec<i16>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Vec::<i64>::deserialize(deserializer)?;
    values
        .into_iter()
        .enumerate()
        .map(|(offset, value)| {
            wrap_register_value(value).ok_or_else(|| {
                serde::de::Error::custom(format!(
                    "register {offset} value {value} does not fit into 16 bits"
                ))
            })
        })
        .collect()
}

impl LocalConnectRawData {
    /// Parses a payload from its JSON text.
    ///
    /// # Errors
    ///
    /// [`crate::Error::Json`] for malformed JSON, missing fields or register
    /// values outside `-32768..=65535`.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serial number of the inverter, the third entry of `Information`.
    pub fn inverter_serial(&self) -> Option<&str> {
        self.information.get(2).and_then(serde_json::Value::as_str)
    }

    /// Selects the register layout from the payload's type code.
    pub fn variant(&self) -> Result<DeviceVariant> {
        DeviceVariant::from_type_code(self.type_code)
    }

    /// Decodes `Data` with the layout selected by the type code.
    pub fn decode(&self) -> Result<LocalData> {
        self.decode_as(self.variant()?)
    }

    /// Decodes `Data` with an explicitly chosen layout.
    pub fn decode_as(&self, variant: DeviceVariant) -> Result<LocalData> {
        if variant.type_code() != self.type_code {
            log::warn!(
                "Decoding type {} payload as {variant} (type {})",
                self.type_code,
                variant.type_code()
            );
        }
        LocalData::new(variant, self.data.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use assert_matches::assert_matches;

    fn payload(type_code: u16, data: &str) -> String {
        format!(
            r#"{{"sn":"SN1","ver":"1.0","type":{type_code},"Data":[{data}],"Information":[30.000,25,"H3BC30K3065001",13]}}"#
        )
    }

    fn zeros(len: usize) -> String {
        vec!["0"; len].join(",")
    }

    #[test]
    fn parse_fields() {
        let raw = LocalConnectRawData::from_json(&payload(25, "2366,64526,65535,-5")).unwrap();
        assert_eq!(raw.wifi_serial, "SN1");
        assert_eq!(raw.wifi_version, "1.0");
        assert_eq!(raw.type_code, 25);
        assert_eq!(raw.data, vec![2366, -1010, -1, -5]);
        assert_eq!(raw.information.len(), 4);
        assert_eq!(raw.inverter_serial(), Some("H3BC30K3065001"));
    }

    #[test]
    fn information_is_optional() {
        let raw =
            LocalConnectRawData::from_json(r#"{"sn":"SN1","ver":"1.0","type":25,"Data":[1]}"#)
                .unwrap();
        assert!(raw.information.is_empty());
        assert_eq!(raw.inverter_serial(), None);
    }

    #[test]
    fn register_value_out_of_range() {
        assert_matches!(
            LocalConnectRawData::from_json(&payload(25, "1,65536")),
            Err(Error::Json(_))
        );
        assert_matches!(
            LocalConnectRawData::from_json(&payload(25, "-32769")),
            Err(Error::Json(_))
        );
    }

    #[test]
    fn malformed_json() {
        assert_matches!(LocalConnectRawData::from_json("{"), Err(Error::Json(_)));
        assert_matches!(
            LocalConnectRawData::from_json(r#"{"sn":"SN1","type":25,"Data":[]}"#),
            Err(Error::Json(_))
        );
    }

    #[test]
    fn decode_selects_variant_from_type_code() {
        let raw = LocalConnectRawData::from_json(&payload(25, &zeros(300))).unwrap();
        let data = raw.decode().unwrap();
        assert_eq!(data.variant(), DeviceVariant::X3Ultra);
        assert_eq!(data.registers().len(), 300);

        let extended = raw.decode_as(DeviceVariant::X3UltraExtended).unwrap();
        assert_eq!(extended.variant(), DeviceVariant::X3UltraExtended);
    }

    #[test]
    fn decode_unsupported_type() {
        let raw = LocalConnectRawData::from_json(&payload(14, &zeros(300))).unwrap();
        assert_matches!(raw.decode(), Err(Error::UnsupportedInverterType(14)));
        // An explicit variant still decodes.
        assert!(raw.decode_as(DeviceVariant::X3Ultra).is_ok());
    }

    #[test]
    fn decode_short_data() {
        let raw = LocalConnectRawData::from_json(&payload(25, &zeros(50))).unwrap();
        assert_matches!(
            raw.decode(),
            Err(Error::BufferTooShort {
                expected: 106,
                actual: 50,
                ..
            })
        );
    }
}
