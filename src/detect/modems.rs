//! Table of supported modems.
//!
//! Each entry names the USB interface that carries the AT command port;
//! the other interfaces of these modems are diagnostics, NMEA or data.

use crate::types::ModemDescriptor;

/// Quectel Wireless Solutions
pub mod quectel {
    pub const VID: &str = "2c7c";
}

/// Telit
///
/// The AT interface moves with the USB composition (RMNET, RNDIS, MBIM, ECM).
pub mod telit {
    pub const VID: &str = "1bc7";
}

/// Thales / Cinterion
pub mod thales {
    pub const VID: &str = "1e2d";
}

/// Every supported modem, in matching order.
pub static SUPPORTED_MODEMS: &[ModemDescriptor] = &[
    // Quectel
    ModemDescriptor::new(quectel::VID, "0125", "Quectel", "EC25", "if02"),
    ModemDescriptor::new(quectel::VID, "0121", "Quectel", "EC21", "if02"),
    ModemDescriptor::new(quectel::VID, "0296", "Quectel", "BG96", "if02"),
    ModemDescriptor::new(quectel::VID, "0700", "Quectel", "BG95", "if02"),
    ModemDescriptor::new(quectel::VID, "0306", "Quectel", "EP06", "if02"),
    ModemDescriptor::new(quectel::VID, "0800", "Quectel", "RM5XXQ", "if02"),
    // Telit
    ModemDescriptor::new(telit::VID, "1201", "Telit", "LE910Cx RMNET", "if04"),
    ModemDescriptor::new(telit::VID, "1203", "Telit", "LE910Cx RNDIS", "if05"),
    ModemDescriptor::new(telit::VID, "1204", "Telit", "LE910Cx MBIM", "if05"),
    ModemDescriptor::new(telit::VID, "1206", "Telit", "LE910Cx ECM", "if05"),
    ModemDescriptor::new(telit::VID, "1031", "Telit", "LE910Cx ThreadX RMNET", "if02"),
    ModemDescriptor::new(telit::VID, "1033", "Telit", "LE910Cx ThreadX ECM", "if02"),
    ModemDescriptor::new(telit::VID, "1034", "Telit", "LE910Cx ThreadX RMNET", "if00"),
    ModemDescriptor::new(telit::VID, "1035", "Telit", "LE910Cx ThreadX ECM", "if00"),
    ModemDescriptor::new(telit::VID, "1036", "Telit", "LE910Cx ThreadX OPTION ONLY", "if00"),
    ModemDescriptor::new(telit::VID, "1101", "Telit", "ME910C1", "if01"),
    ModemDescriptor::new(telit::VID, "1102", "Telit", "ME910C1", "if01"),
    ModemDescriptor::new(telit::VID, "1052", "Telit", "FN980 RNDIS", "if05"),
    ModemDescriptor::new(telit::VID, "1050", "Telit", "FN980 RMNET", "if04"),
    ModemDescriptor::new(telit::VID, "1051", "Telit", "FN980 MBIM", "if05"),
    ModemDescriptor::new(telit::VID, "1053", "Telit", "FN980 ECM", "if05"),
    // Thales
    ModemDescriptor::new(thales::VID, "0069", "Thales/Cinterion", "PLSx3", "if04"),
    ModemDescriptor::new(thales::VID, "006f", "Thales/Cinterion", "PLSx3", "if04"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_covers_every_vendor() {
        assert_eq!(SUPPORTED_MODEMS.len(), 23);
        assert_eq!(SUPPORTED_MODEMS[0].product, "EC25");
        assert!(SUPPORTED_MODEMS.iter().any(|m| m.vendor_id == telit::VID));
        assert!(SUPPORTED_MODEMS.iter().any(|m| m.vendor_id == thales::VID));
    }

    #[test]
    fn test_interfaces_use_udev_form() {
        for modem in SUPPORTED_MODEMS {
            assert!(modem.interface.starts_with("if"), "{modem:?}");
            assert_eq!(modem.interface.len(), 4, "{modem:?}");
        }
    }

    #[test]
    fn test_lookup_by_usb_ids() {
        let find = |vid: &str, pid: &str| {
            SUPPORTED_MODEMS
                .iter()
                .find(|modem| modem.matches_ids(vid, pid))
        };

        let ec25 = find("2c7c", "0125").unwrap();
        assert_eq!(ec25.product, "EC25");
        assert_eq!(ec25.interface, "if02");

        let plsx3 = find("1E2D", "006F").unwrap();
        assert_eq!(plsx3.vendor, "Thales/Cinterion");
        assert_eq!(find("1d6b", "0002"), None);
    }
}
