#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("could not open tun device")]
    DeviceUnavailable(#[source] std::io::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[cfg(any(target_os = "linux", target_os = "android"))]
    #[error(transparent)]
    Sys(#[from] nix::Error),

    #[error(transparent)]
    Nul(#[from] std::ffi::NulError),
}

impl From<Error> for std::io::Error {
    fn from(value: Error) -> Self {
        match value {
            Error::Io(err) | Error::DeviceUnavailable(err) => err,
            #[cfg(any(target_os = "linux", target_os = "android"))]
            Error::Sys(errno) => errno.into(),
            _ => std::io::Error::new(std::io::ErrorKind::Other, value),
        }
    }
}

pub type Result<T, E = Error> = ::std::result::Result<T, E>;
