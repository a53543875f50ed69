#![cfg(feature = "serde")]

use solax_local_lib::{
    decoder::LocalData,
    payload::LocalConnectRawData,
    protocol::{DeviceVariant, Quantity},
    registers::read_32bit_signed,
};

const X3_ULTRA_PAYLOAD: &str = include_str!("data/x3_ultra.json");

fn decode(variant: DeviceVariant) -> (LocalConnectRawData, LocalData) {
    let payload = LocalConnectRawData::from_json(X3_ULTRA_PAYLOAD).unwrap();
    let data = payload.decode_as(variant).unwrap();
    (payload, data)
}

#[test]
fn test_payload_metadata() {
    let (payload, data) = decode(DeviceVariant::X3Ultra);
    assert_eq!(payload.wifi_serial, "SNXXXXXXX");
    assert_eq!(payload.wifi_version, "1.003.11");
    assert_eq!(payload.type_code, 25);
    assert_eq!(payload.inverter_serial(), Some("H3BC30K3065001"));
    assert_eq!(payload.data.len(), 300);
    assert_eq!(payload.decode().unwrap(), data);
}

#[test]
fn test_inverter_values() {
    let (_, data) = decode(DeviceVariant::X3Ultra);

    assert_eq!(data.voltage_phase1(), 236.6); // [0]
    assert_eq!(data.voltage_phase2(), 233.0); // [1]
    assert_eq!(data.voltage_phase3(), 236.5); // [2]

    assert_eq!(data.current_phase1(), 12.4); // [3]
    assert_eq!(data.current_phase2(), 10.7); // [4]
    assert_eq!(data.current_phase3(), 12.1); // [5]

    assert_eq!(data.output_power_phase1(), 2906); // [6]
    assert_eq!(data.output_power_phase2(), 2472); // [7]
    assert_eq!(data.output_power_phase3(), 2839); // [8]

    assert_eq!(data.pv1_voltage(), 726.0); // [10]
    assert_eq!(data.pv2_voltage(), 717.0); // [11]
    assert_eq!(data.pv1_current(), 1.5); // [12]
    assert_eq!(data.pv2_current(), 1.6); // [13]
    assert_eq!(data.pv1_power(), 1114); // [14]
    assert_eq!(data.pv2_power(), 1193); // [15]

    assert_eq!(data.frequency_phase1(), 50.09); // [16]
    assert_eq!(data.frequency_phase2(), 50.05); // [17]
    assert_eq!(data.frequency_phase3(), 50.04); // [18]

    assert_eq!(data.inverter_work_mode_code(), 2); // [19]
    assert_eq!(data.inverter_work_mode(), "2"); // [19]
}

#[test]
fn test_battery_values() {
    let (_, data) = decode(DeviceVariant::X3Ultra);

    assert_eq!(data.battery_voltage(), 469.7); // [39]
    // 64526 as a signed word.
    assert_eq!(data.battery_current(), -10.1); // [40]
    assert_eq!(data.battery_power(), -4789); // [41]
    assert_eq!(data.battery_level(), 59); // [103]
    assert_eq!(data.battery_temperature(), 21); // [105]
}

#[test]
fn test_grid_and_totals() {
    let (_, data) = decode(DeviceVariant::X3Ultra);

    assert_eq!(data.feed_in_power(), 0); // [34][35]
    assert_eq!(data.power_usage(), 0); // [47]

    assert_eq!(data.total_energy(), 7312.2); // [58][59]
    assert_eq!(data.total_battery_discharge_energy(), 2469.1); // [74][75]
    assert_eq!(data.total_battery_charge_energy(), 2330.4); // [76][77]
    assert_eq!(data.total_pv_energy(), 6824.6); // [80][81]
    assert_eq!(data.total_feed_in_energy(), 27.03); // [86][87]
    assert_eq!(data.total_consumption(), 5449.88); // [88][89]

    assert_eq!(data.today_energy(), 5.9); // [70]
    assert_eq!(data.today_feed_in_energy(), 0.01); // [90][91]
    assert_eq!(data.today_consumption(), 10.32); // [92][93]
    assert_eq!(data.today_battery_discharge_energy(), 0.2); // [78]
    assert_eq!(data.today_battery_charge_energy(), 6.0); // [79]
}

#[test]
fn test_feed_in_power_pairing() {
    let (payload, data) = decode(DeviceVariant::X3Ultra);
    let low = payload.data[34];
    let high = payload.data[35];
    assert_eq!((low, high), (0, 0));
    assert_eq!(data.feed_in_power(), read_32bit_signed(low, high));

    // Registers 46/47 hold 34 and 0: low-word-first reads 34, high-word-first reads 34 << 16.
    assert_eq!(read_32bit_signed(payload.data[46], payload.data[47]), 34);
    assert_eq!(read_32bit_signed(payload.data[47], payload.data[46]), 2228224);
}

#[test]
fn test_baseline_layout_ignores_extension_registers() {
    let (_, data) = decode(DeviceVariant::X3Ultra);

    assert!(!data.supports(Quantity::Pv3Voltage));
    assert_eq!(data.pv3_voltage(), 0.0);
    assert_eq!(data.pv3_current(), 0.0);
    assert_eq!(data.pv3_power(), 0);
    assert_eq!(data.readings().count(), 37);
}

#[test]
fn test_extended_layout() {
    let (_, data) = decode(DeviceVariant::X3UltraExtended);

    assert!(data.is_available(Quantity::Pv3Voltage));
    assert_eq!(data.pv3_voltage(), 787.5); // [129]
    assert_eq!(data.pv3_current(), 1.4); // [130]
    assert_eq!(data.pv3_power(), 1122); // [131]

    // No second battery installed.
    assert!(data.is_available(Quantity::Battery2Voltage));
    assert_eq!(data.battery2_voltage(), 0.0); // [132]
    assert_eq!(data.battery2_current(), 0.0); // [133]
    assert_eq!(data.battery2_power(), 0); // [134]
    assert_eq!(data.battery2_level(), 0); // [140]
    assert_eq!(data.battery2_temperature(), 0); // [142]

    // Shared registers decode identically.
    assert_eq!(data.total_energy(), 7312.2);
    assert_eq!(data.readings().count(), 45);
}

#[test]
fn test_readings_match_accessors() {
    let (_, data) = decode(DeviceVariant::X3UltraExtended);
    for reading in data.readings() {
        assert_eq!(reading.value, data.value(reading.quantity), "{}", reading.quantity);
        assert_eq!(reading.unit, reading.quantity.unit());
    }
}
