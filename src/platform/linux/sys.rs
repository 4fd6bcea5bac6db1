use libc::{c_char, c_int, ifreq, IFNAMSIZ};
use nix::{ioctl_read, ioctl_readwrite_bad, ioctl_write_int, ioctl_write_ptr};
use std::mem;

ioctl_readwrite_bad!(siocethtool, 0x8946, ifreq);

ioctl_read!(tungetiff, b'T', 210, c_int);

ioctl_write_int!(tunsetnocsum, b'T', 200);
ioctl_write_ptr!(tunsetiff, b'T', 202, c_int);

/// `ETHTOOL_GRXCSUM` from `linux/ethtool.h`.
pub const ETHTOOL_GRXCSUM: u32 = 0x0000_0014;
/// `ETHTOOL_GGRO` from `linux/ethtool.h`.
pub const ETHTOOL_GGRO: u32 = 0x0000_002b;

/// `struct ethtool_value`, the argument of the boolean ethtool get commands.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy)]
pub struct EthtoolValue {
    pub cmd: u32,
    pub data: u32,
}

/// A zeroed request carrying `name`.
///
/// The name is cut at the first NUL and at `IFNAMSIZ - 1` bytes so the
/// field always stays NUL terminated. The cut never splits a character, so
/// the name read back from the kernel is still valid UTF-8.
pub fn new_ifreq(name: &str) -> ifreq {
    let mut req: ifreq = unsafe { mem::zeroed() };
    let name = name.split('\0').next().unwrap_or_default();
    let mut end = name.len().min(IFNAMSIZ - 1);
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    for (dst, src) in req.ifr_name.iter_mut().zip(name[..end].bytes()) {
        *dst = src as c_char;
    }
    req
}

/// The interface name stored in `req`, up to its terminator.
pub fn ifreq_name(req: &ifreq) -> String {
    let bytes: Vec<u8> = req
        .ifr_name
        .iter()
        .take_while(|c| **c != 0)
        .map(|c| *c as u8)
        .collect();
    String::from_utf8_lossy(&bytes).into_owned()
}
