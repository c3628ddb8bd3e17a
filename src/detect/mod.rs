//! USB modem detection.
//!
//! Detection runs in three steps:
//! 1. `lsusb` tells which supported modem is attached,
//! 2. `find` + `udevadm` enumerate the USB serial device nodes,
//! 3. the node whose vendor, product and interface match the modem's
//!    descriptor is the AT port.

pub mod modems;
pub mod shell;
pub mod udev;

use crate::error::{Error, Result};
use crate::types::{DetectedPort, ModemDescriptor, UsbSerialNode};

pub use modems::SUPPORTED_MODEMS;
pub use shell::{Shell, SystemShell};

/// Shell snippet listing the `dev` attribute of every USB device.
const FIND_DEVICES: &str = "/usr/bin/find /sys/bus/usb/devices/usb*/ -name dev";

/// Finds the AT command port of an attached modem.
pub struct Detector<S> {
    shell: S,
    modems: &'static [ModemDescriptor],
}

impl Detector<SystemShell> {
    /// Creates a detector that runs the real system tools.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_shell(SystemShell)
    }
}

impl Default for Detector<SystemShell> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Shell> Detector<S> {
    /// Creates a detector that runs programs through `shell`.
    #[must_use]
    pub const fn with_shell(shell: S) -> Self {
        Self {
            shell,
            modems: SUPPORTED_MODEMS,
        }
    }

    /// Replaces the table of supported modems.
    #[must_use]
    pub const fn modems(mut self, modems: &'static [ModemDescriptor]) -> Self {
        self.modems = modems;
        self
    }

    /// Returns the shell used for detection.
    #[must_use]
    pub const fn shell(&self) -> &S {
        &self.shell
    }

    /// Enumerates USB serial device nodes.
    pub async fn list_nodes(&self) -> Result<Vec<UsbSerialNode>> {
        let output = self.shell.run("bash", &["-c", FIND_DEVICES]).await?;

        let mut nodes = Vec::new();
        for dir in udev::parse_device_dirs(&output) {
            let output = self
                .shell
                .run(
                    "udevadm",
                    &["info", "-q", "property", "--export", "-p", &dir],
                )
                .await?;

            let node = udev::parse_udev_properties(&output);
            if udev::is_serial_candidate(&node) {
                nodes.push(node);
            } else {
                tracing::trace!("skipping {}", dir);
            }
        }

        tracing::debug!("found {} USB serial node(s)", nodes.len());
        Ok(nodes)
    }

    /// Returns the first supported modem present in the `lsusb` listing.
    pub async fn find_modem(&self) -> Result<&'static ModemDescriptor> {
        let output = self.shell.run("lsusb", &[]).await?;
        let attached = udev::parse_lsusb(&output);

        self.modems
            .iter()
            .find(|modem| {
                attached
                    .iter()
                    .any(|(vid, pid)| modem.matches_ids(vid, pid))
            })
            .ok_or(Error::NoSupportedModem)
    }

    /// Detects the AT port of an attached supported modem.
    ///
    /// Returns `Ok(None)` when a supported modem is attached but none of
    /// the enumerated nodes is its AT interface (yet).
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoSupportedModem`] if no supported modem is attached,
    /// or the shell error of a failed tool.
    pub async fn detect_port(&self) -> Result<Option<DetectedPort>> {
        let modem = self.find_modem().await?;
        tracing::info!("found {} {}", modem.vendor, modem.product);

        let nodes = self.list_nodes().await?;
        let detected = nodes
            .iter()
            .filter(|node| modem.matches_node(node))
            .find_map(|node| node.port.as_deref())
            .map(|port| DetectedPort::new(port, modem));

        match &detected {
            Some(port) => tracing::info!("selected AT port {}", port.port),
            None => tracing::warn!(
                "no {} port on interface {}",
                modem.product,
                modem.interface
            ),
        }

        Ok(detected)
    }
}
