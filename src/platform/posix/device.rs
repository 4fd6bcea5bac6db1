use crate::platform::posix::Fd;
use crate::platform::Device;
use std::io;
use std::io::{IoSlice, IoSliceMut};
use std::os::fd::{AsFd, AsRawFd, BorrowedFd, FromRawFd, IntoRawFd, RawFd};

impl FromRawFd for Device {
    unsafe fn from_raw_fd(fd: RawFd) -> Self {
        Device::from_fd(fd)
    }
}
impl AsRawFd for Device {
    fn as_raw_fd(&self) -> RawFd {
        self.tun.as_raw_fd()
    }
}
impl AsFd for Device {
    fn as_fd(&self) -> BorrowedFd<'_> {
        unsafe { BorrowedFd::borrow_raw(self.as_raw_fd()) }
    }
}

impl IntoRawFd for Device {
    fn into_raw_fd(self) -> RawFd {
        self.tun.into_raw_fd()
    }
}
impl Device {
    /// # Safety
    /// The fd passed in must be an owned file descriptor; in particular, it must be open.
    pub unsafe fn from_fd(fd: RawFd) -> Self {
        Device::from_tun(Fd::new_uncheck(fd))
    }
    pub fn is_nonblocking(&self) -> io::Result<bool> {
        self.tun.is_nonblocking()
    }
    /// Moves this Device into nonblocking mode.
    ///
    /// Later `send*`/`recv*` calls fail with `WouldBlock` instead of waiting.
    pub fn set_nonblocking(&self) -> io::Result<()> {
        self.tun.set_nonblocking()
    }

    /// Recv a packet from tun device
    pub fn recv(&self, buf: &mut [u8]) -> io::Result<usize> {
        self.tun.read(buf)
    }
    pub fn recv_vectored(&self, bufs: &mut [IoSliceMut<'_>]) -> io::Result<usize> {
        self.tun.readv(bufs)
    }

    /// Send a packet to tun device
    pub fn send(&self, buf: &[u8]) -> io::Result<usize> {
        self.tun.write(buf)
    }
    /// Send one packet whose bytes are spread over `bufs`, in order.
    ///
    /// Interfaces are attached without `IFF_NO_PI`, so the first
    /// [`PACKET_INFORMATION_LENGTH`](crate::PACKET_INFORMATION_LENGTH) bytes
    /// are a `struct tun_pi`.
    ///
    /// This is a single `writev`; the returned count is what the kernel
    /// accepted. Failures, `WouldBlock` included, are returned untouched.
    pub fn send_vectored(&self, bufs: &[IoSlice<'_>]) -> io::Result<usize> {
        self.tun.writev(bufs)
    }
}
