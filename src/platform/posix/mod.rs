mod fd;
pub use self::fd::{is_nonblocking, set_nonblocking, Fd};

pub(crate) mod device;
