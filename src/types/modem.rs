//! Modem identification types.

/// A supported modem chipset and the USB interface carrying its AT port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModemDescriptor {
    /// USB vendor ID as lowercase hex (e.g. `2c7c`).
    pub vendor_id: &'static str,
    /// USB product ID as lowercase hex (e.g. `0125`).
    pub product_id: &'static str,
    /// Vendor name.
    pub vendor: &'static str,
    /// Product name.
    pub product: &'static str,
    /// USB interface of the AT port, in udev form (e.g. `if02`).
    pub interface: &'static str,
}

impl ModemDescriptor {
    /// Creates a new descriptor.
    #[must_use]
    pub const fn new(
        vendor_id: &'static str,
        product_id: &'static str,
        vendor: &'static str,
        product: &'static str,
        interface: &'static str,
    ) -> Self {
        Self {
            vendor_id,
            product_id,
            vendor,
            product,
            interface,
        }
    }

    /// Returns true if the USB IDs are this modem's (case-insensitive).
    #[must_use]
    pub fn matches_ids(&self, vendor_id: &str, product_id: &str) -> bool {
        self.vendor_id.eq_ignore_ascii_case(vendor_id)
            && self.product_id.eq_ignore_ascii_case(product_id)
    }

    /// Returns true if `node` is this modem's AT interface.
    #[must_use]
    pub fn matches_node(&self, node: &UsbSerialNode) -> bool {
        node.vendor_id.as_deref() == Some(self.vendor_id)
            && node.product_id.as_deref() == Some(self.product_id)
            && node.interface.as_deref() == Some(self.interface)
    }
}

/// A USB serial device node as reported by udev.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsbSerialNode {
    /// Device path (`DEVNAME`).
    pub port: Option<String>,
    /// Vendor name (`ID_VENDOR`).
    pub vendor: Option<String>,
    /// Vendor ID (`ID_VENDOR_ID`).
    pub vendor_id: Option<String>,
    /// Model name (`ID_MODEL`).
    pub model: Option<String>,
    /// Model name from the hwdb (`ID_MODEL_FROM_DATABASE`).
    pub model_from_database: Option<String>,
    /// Product ID (`ID_MODEL_ID`).
    pub product_id: Option<String>,
    /// USB interface, `if` + `ID_USB_INTERFACE_NUM`.
    pub interface: Option<String>,
}

/// A modem port selected by detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedPort {
    /// Device path to open.
    pub port: String,
    /// USB vendor ID.
    pub vendor_id: String,
    /// USB product ID.
    pub product_id: String,
    /// Vendor name.
    pub vendor: String,
    /// Model name.
    pub model: String,
}

impl DetectedPort {
    /// Builds the detection result for `port` and the matched descriptor.
    #[must_use]
    pub fn new(port: impl Into<String>, modem: &ModemDescriptor) -> Self {
        Self {
            port: port.into(),
            vendor_id: modem.vendor_id.to_owned(),
            product_id: modem.product_id.to_owned(),
            vendor: modem.vendor.to_owned(),
            model: modem.product.to_owned(),
        }
    }
}
