#[cfg(any(target_os = "linux", target_os = "android"))]
pub mod posix;

#[cfg(any(target_os = "linux", target_os = "android"))]
pub mod linux;

#[cfg(any(target_os = "linux", target_os = "android"))]
pub use self::linux::*;

#[cfg(any(target_os = "linux", target_os = "android"))]
pub use crate::platform::posix::{is_nonblocking, set_nonblocking, Fd};
