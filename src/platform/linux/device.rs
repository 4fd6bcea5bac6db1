use crate::error::{Error, Result};
use crate::platform::linux::sys::*;
use crate::platform::posix::Fd;
use libc::{c_short, ifreq, IFF_TUN, O_CLOEXEC, O_RDWR};
use std::{
    ffi::CString,
    io, mem,
    os::unix::{ffi::OsStrExt, io::RawFd},
    path::Path,
};

/// Tun control nodes, tried in order.
pub const TUN_PATHS: [&str; 2] = ["/dev/tun", "/dev/net/tun"];

/// Open the tun control node, falling back to `/dev/net/tun` when `/dev/tun`
/// can't be opened.
pub fn open() -> Result<Fd> {
    open_first(&TUN_PATHS)
}

/// Open the first of `paths` that can be opened read-write.
///
/// Fails with [`Error::DeviceUnavailable`] carrying the error of the last
/// attempt; nothing stays open in that case.
pub fn open_first<P: AsRef<Path>>(paths: &[P]) -> Result<Fd> {
    let mut last = io::Error::from(io::ErrorKind::NotFound);
    for path in paths {
        let path = path.as_ref();
        let c_path = CString::new(path.as_os_str().as_bytes())?;
        let fd = unsafe { libc::open(c_path.as_ptr(), O_RDWR | O_CLOEXEC) };
        match Fd::new(fd) {
            Ok(fd) => {
                log::debug!("opened {}", path.display());
                return Ok(fd);
            }
            Err(err) => {
                log::debug!("could not open {}: {err}", path.display());
                last = err;
            }
        }
    }
    Err(Error::DeviceUnavailable(last))
}

/// The requests issued against a tun handle while attaching an interface.
pub(crate) trait TunControl {
    fn set_iff(&self, req: &mut ifreq) -> nix::Result<()>;
    fn set_no_checksum(&self) -> nix::Result<()>;
}

impl TunControl for Fd {
    fn set_iff(&self, req: &mut ifreq) -> nix::Result<()> {
        unsafe { tunsetiff(self.inner, req as *mut _ as *mut _) }.map(|_| ())
    }
    fn set_no_checksum(&self) -> nix::Result<()> {
        unsafe { tunsetnocsum(self.inner, 1) }.map(|_| ())
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) struct Attachment {
    pub name: String,
    pub checksum_skipped: bool,
}

/// Create (or attach to) a tun-mode interface on `ctl`.
///
/// `requested` may be empty, the kernel then picks the name. The name the
/// kernel settled on is returned. A rejected `TUNSETNOCSUM` only costs the
/// checksum shortcut and is not reported as an error.
pub(crate) fn attach<C: TunControl>(
    ctl: &C,
    requested: &str,
    skip_checksum: bool,
) -> nix::Result<Attachment> {
    let mut req = new_ifreq(requested);
    req.ifr_ifru.ifru_flags = IFF_TUN as c_short;
    ctl.set_iff(&mut req)?;

    let name = ifreq_name(&req);
    let checksum_skipped = if skip_checksum {
        match ctl.set_no_checksum() {
            Ok(()) => true,
            Err(err) => {
                log::warn!("{name}: kernel refused to skip rx checksums: {err}");
                false
            }
        }
    } else {
        false
    };
    Ok(Attachment {
        name,
        checksum_skipped,
    })
}

/// A TUN device using the TUN/TAP Linux driver.
#[derive(Debug)]
pub struct Device {
    pub(crate) tun: Fd,
    name: String,
    checksum_skipped: bool,
}

impl Device {
    /// Bind `tun` to a tun-mode interface named `name`, or to a kernel-chosen
    /// name when `name` is `None` or empty.
    ///
    /// When `skip_checksum` is set the kernel is also asked not to validate
    /// checksums of packets written through the handle. On failure `tun` is
    /// closed and the kernel's errno comes back as [`Error::Sys`].
    pub fn attach(tun: Fd, name: Option<&str>, skip_checksum: bool) -> Result<Self> {
        let attachment = attach(&tun, name.unwrap_or_default(), skip_checksum)?;
        log::info!(
            "attached tun interface {} (rx checksum skipped: {})",
            attachment.name,
            attachment.checksum_skipped
        );
        Ok(Device {
            tun,
            name: attachment.name,
            checksum_skipped: attachment.checksum_skipped,
        })
    }

    pub(crate) fn from_tun(tun: Fd) -> Self {
        let name = unsafe { name(tun.inner) }.unwrap_or_default();
        Self {
            tun,
            name,
            checksum_skipped: false,
        }
    }

    /// The interface name confirmed by the kernel.
    ///
    /// Empty for a device built from a descriptor that isn't attached to a
    /// tun interface.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the kernel accepted the request to skip rx checksum validation.
    pub fn checksum_skipped(&self) -> bool {
        self.checksum_skipped
    }
}

unsafe fn name(fd: RawFd) -> io::Result<String> {
    let mut req: ifreq = mem::zeroed();
    if let Err(err) = tungetiff(fd, &mut req as *mut _ as *mut _) {
        return Err(io::Error::from(err));
    }
    Ok(ifreq_name(&req))
}
