pub mod sys;

mod device;
pub mod offload;

pub use self::device::{open, open_first, Device, TUN_PATHS};
pub use self::offload::{
    checksum_offloaded, checksum_offloaded_with, Ethtool, EthtoolFeature, FeatureProbe,
};

use crate::builder::DeviceConfig;
use crate::error::Result;

/// Open the tun control node and attach the configured interface.
pub(crate) fn create(config: &DeviceConfig) -> Result<Device> {
    let tun = open()?;
    let device = Device::attach(tun, config.dev_name.as_deref(), config.skip_checksum)?;
    if config.nonblocking {
        device.set_nonblocking()?;
    }
    Ok(device)
}
