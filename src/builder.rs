use crate::error::Result;
use crate::platform::{self, Device};

/// Settings consumed while creating the interface.
#[derive(Clone, Default, Debug)]
pub(crate) struct DeviceConfig {
    pub dev_name: Option<String>,
    /// Ask the kernel not to validate checksums of packets written to the
    /// device. Decided before the interface is attached and fixed afterwards.
    pub skip_checksum: bool,
    pub nonblocking: bool,
}

/// Builder for a CLAT tun interface.
#[derive(Clone, Default, Debug)]
pub struct DeviceBuilder {
    dev_name: Option<String>,
    skip_checksum: Option<bool>,
    nonblocking: Option<bool>,
}

impl DeviceBuilder {
    pub fn new() -> Self {
        Self::default()
    }
    /// Requested interface name. Without one (or with an empty one) the
    /// kernel picks a `tunN` name.
    pub fn name<S: Into<String>>(mut self, dev_name: S) -> Self {
        self.dev_name = Some(dev_name.into());
        self
    }
    pub fn skip_checksum(mut self, skip_checksum: bool) -> Self {
        self.skip_checksum = Some(skip_checksum);
        self
    }
    /// Skip checksum validation on the tun side exactly when `uplink` already
    /// has GRO and rx checksum offload enabled.
    pub fn checksum_offload_from(self, uplink: Option<&str>) -> Self {
        let offloaded = platform::checksum_offloaded(uplink);
        self.skip_checksum(offloaded)
    }
    pub fn nonblocking(mut self, nonblocking: bool) -> Self {
        self.nonblocking = Some(nonblocking);
        self
    }
    pub(crate) fn config(self) -> DeviceConfig {
        DeviceConfig {
            dev_name: self.dev_name,
            skip_checksum: self.skip_checksum.unwrap_or(false),
            nonblocking: self.nonblocking.unwrap_or(false),
        }
    }
    /// Open the tun control node and attach the interface.
    pub fn build(self) -> Result<Device> {
        platform::create(&self.config())
    }
}
