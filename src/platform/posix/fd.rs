use std::io;
use std::io::{IoSlice, IoSliceMut};
use std::os::unix::io::{AsRawFd, IntoRawFd, RawFd};

use nix::fcntl::{fcntl, FcntlArg, OFlag};

/// POSIX file descriptor support for `io` traits.
///
/// The descriptor is closed when the value is dropped.
#[derive(Debug)]
pub struct Fd {
    pub(crate) inner: RawFd,
}

impl Fd {
    pub fn new(value: RawFd) -> io::Result<Self> {
        if value < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(Self::new_uncheck(value))
    }
    pub(crate) fn new_uncheck(value: RawFd) -> Self {
        Fd { inner: value }
    }

    /// Enable non-blocking mode
    pub fn set_nonblocking(&self) -> io::Result<()> {
        set_nonblocking(self)
    }
    pub fn is_nonblocking(&self) -> io::Result<bool> {
        is_nonblocking(self)
    }

    #[inline]
    pub fn read(&self, buf: &mut [u8]) -> io::Result<usize> {
        let fd = self.as_raw_fd();
        let amount = unsafe { libc::read(fd, buf.as_mut_ptr() as *mut _, buf.len()) };
        if amount < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(amount as usize)
    }
    #[inline]
    pub fn readv(&self, bufs: &mut [IoSliceMut<'_>]) -> io::Result<usize> {
        if bufs.len() > max_iov() {
            return Err(io::Error::from(io::ErrorKind::InvalidInput));
        }
        let amount = unsafe {
            libc::readv(
                self.as_raw_fd(),
                bufs.as_mut_ptr() as *mut libc::iovec as *const libc::iovec,
                bufs.len() as libc::c_int,
            )
        };
        if amount < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(amount as usize)
    }

    #[inline]
    pub fn write(&self, buf: &[u8]) -> io::Result<usize> {
        let fd = self.as_raw_fd();
        let amount = unsafe { libc::write(fd, buf.as_ptr() as *const _, buf.len()) };
        if amount < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(amount as usize)
    }
    /// Gather `bufs` in order and hand them to the kernel in a single `writev`.
    #[inline]
    pub fn writev(&self, bufs: &[IoSlice<'_>]) -> io::Result<usize> {
        if bufs.len() > max_iov() {
            return Err(io::Error::from(io::ErrorKind::InvalidInput));
        }
        let amount = unsafe {
            libc::writev(
                self.as_raw_fd(),
                bufs.as_ptr() as *const libc::iovec,
                bufs.len() as libc::c_int,
            )
        };
        if amount < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(amount as usize)
    }
}

/// Switch any descriptor to non-blocking mode, keeping its other status flags.
pub fn set_nonblocking<F: AsRawFd>(fd: &F) -> io::Result<()> {
    let flags = fcntl(fd.as_raw_fd(), FcntlArg::F_GETFL)?;
    let flags = OFlag::from_bits_retain(flags) | OFlag::O_NONBLOCK;
    fcntl(fd.as_raw_fd(), FcntlArg::F_SETFL(flags))?;
    Ok(())
}

pub fn is_nonblocking<F: AsRawFd>(fd: &F) -> io::Result<bool> {
    let flags = fcntl(fd.as_raw_fd(), FcntlArg::F_GETFL)?;
    Ok(OFlag::from_bits_retain(flags).contains(OFlag::O_NONBLOCK))
}

pub(crate) const fn max_iov() -> usize {
    libc::UIO_MAXIOV as usize
}

impl AsRawFd for Fd {
    fn as_raw_fd(&self) -> RawFd {
        self.inner
    }
}

impl IntoRawFd for Fd {
    fn into_raw_fd(mut self) -> RawFd {
        let fd = self.inner;
        self.inner = -1;
        fd
    }
}

impl Drop for Fd {
    fn drop(&mut self) {
        if self.inner >= 0 {
            unsafe { libc::close(self.inner) };
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn pipe() -> (Fd, Fd) {
        let mut fds = [0; 2];
        assert_eq!(unsafe { libc::pipe(fds.as_mut_ptr()) }, 0);
        (Fd::new(fds[0]).unwrap(), Fd::new(fds[1]).unwrap())
    }

    #[test]
    fn negative_descriptor_is_rejected() {
        assert!(Fd::new(-1).is_err());
    }

    #[test]
    fn nonblocking_keeps_other_flags() {
        let (_rx, tx) = pipe();
        let before = fcntl(tx.as_raw_fd(), FcntlArg::F_GETFL).unwrap();
        tx.set_nonblocking().unwrap();
        let after = fcntl(tx.as_raw_fd(), FcntlArg::F_GETFL).unwrap();
        assert_eq!(after, before | libc::O_NONBLOCK);
    }

    #[test]
    fn nonblocking_writes_back_every_status_bit() {
        let path = std::env::temp_dir().join(format!("clat-tun-{}-flags", std::process::id()));
        let c_path = std::ffi::CString::new(path.to_str().unwrap()).unwrap();
        let raw = unsafe {
            libc::open(
                c_path.as_ptr(),
                libc::O_RDWR | libc::O_CREAT | libc::O_APPEND,
                0o600,
            )
        };
        let file = Fd::new(raw).unwrap();
        // the kernel may report bits (O_LARGEFILE on 64-bit) nix has no name for
        let before = fcntl(file.as_raw_fd(), FcntlArg::F_GETFL).unwrap();
        assert_ne!(before & libc::O_APPEND, 0);

        set_nonblocking(&file).unwrap();
        let after = fcntl(file.as_raw_fd(), FcntlArg::F_GETFL).unwrap();
        assert_eq!(after, before | libc::O_NONBLOCK);
        assert!(is_nonblocking(&file).unwrap());

        drop(file);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn into_raw_fd_releases_ownership() {
        let (rx, _tx) = pipe();
        let raw = rx.into_raw_fd();
        assert_ne!(unsafe { libc::fcntl(raw, libc::F_GETFD) }, -1);
        unsafe { libc::close(raw) };
    }
}
