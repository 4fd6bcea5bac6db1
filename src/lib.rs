/*!
Tun device plumbing for CLAT (464XLAT) daemons.

# Example:
```no_run
use clat_tun::DeviceBuilder;
use std::io::IoSlice;
let dev = DeviceBuilder::new()
    .name("clat4")
    .checksum_offload_from(Some("rmnet0"))
    .nonblocking(true)
    .build()?;
let pi = [0u8, 0, 0x08, 0x00];
let header = [0x45u8; 20];
let payload = b"payload";
dev.send_vectored(&[IoSlice::new(&pi), IoSlice::new(&header), IoSlice::new(payload)])?;
# Ok::<(), clat_tun::Error>(())
```
*/

#![cfg_attr(docsrs, feature(doc_cfg))]

pub use crate::error::{Error, Result};

mod error;

/// Length of the `struct tun_pi` header leading every packet on the device.
pub const PACKET_INFORMATION_LENGTH: usize = 4;

cfg_if::cfg_if! {
    if #[cfg(any(target_os = "linux", target_os = "android"))] {
        mod builder;
        pub use crate::builder::DeviceBuilder;
        pub use crate::platform::{
            checksum_offloaded, checksum_offloaded_with, is_nonblocking, open, open_first,
            set_nonblocking, Device, Ethtool, EthtoolFeature, FeatureProbe, Fd, TUN_PATHS,
        };
    }
}

pub mod platform;
