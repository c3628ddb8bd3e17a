//! Parsers for the output of `find`, `udevadm` and `lsusb`.

use crate::types::UsbSerialNode;

/// Extracts sysfs device directories from `find ... -name dev` output.
///
/// Every line ending in `/dev` names a device; the directory is the line
/// without that suffix.
#[must_use]
pub fn parse_device_dirs(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter_map(|line| line.strip_suffix("/dev"))
        .map(str::to_owned)
        .collect()
}

/// Parses `udevadm info -q property --export` output.
///
/// Values are exported as `KEY='value'`; the quotes are removed.
#[must_use]
pub fn parse_udev_properties(output: &str) -> UsbSerialNode {
    let mut node = UsbSerialNode::default();

    for line in output.lines() {
        let Some((key, value)) = line.trim().split_once('=') else {
            continue;
        };
        let value = value.trim_matches('\'').to_owned();

        match key {
            "DEVNAME" => node.port = Some(value),
            "ID_VENDOR" => node.vendor = Some(value),
            "ID_VENDOR_ID" => node.vendor_id = Some(value),
            "ID_MODEL" => node.model = Some(value),
            "ID_MODEL_FROM_DATABASE" => node.model_from_database = Some(value),
            "ID_MODEL_ID" => node.product_id = Some(value),
            "ID_USB_INTERFACE_NUM" => node.interface = Some(format!("if{value}")),
            _ => {}
        }
    }

    node
}

/// Returns true if the node is a serial port worth considering.
///
/// Nodes without a device name and raw USB device nodes under
/// `/dev/bus/usb` are skipped.
#[must_use]
pub fn is_serial_candidate(node: &UsbSerialNode) -> bool {
    node.port.as_deref().is_some_and(|port| !port.contains("bus"))
}

/// Extracts `(vendor_id, product_id)` pairs from `lsusb` output.
///
/// ```text
/// Bus 001 Device 002: ID 2c7c:0125 Quectel Wireless Solutions Co., Ltd. EC25 LTE modem
/// ```
#[must_use]
pub fn parse_lsusb(output: &str) -> Vec<(String, String)> {
    output
        .lines()
        .filter_map(|line| {
            let (_, rest) = line.split_once(" ID ")?;
            let id = rest.split_whitespace().next()?;
            let (vid, pid) = id.split_once(':')?;
            Some((vid.to_ascii_lowercase(), pid.to_ascii_lowercase()))
        })
        .collect()
}
