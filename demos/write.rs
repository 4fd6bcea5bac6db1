//! Attach a CLAT interface and push a few translated-looking packets at it.
//!
//! Usage: `write [uplink]`, e.g. `write rmnet0`. Checksum validation on the
//! tun side is skipped when the uplink already offloads it.

#[cfg(any(target_os = "linux", target_os = "android"))]
fn main() -> Result<(), clat_tun::Error> {
    use clat_tun::{DeviceBuilder, PACKET_INFORMATION_LENGTH};
    use std::io::{ErrorKind, IoSlice};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    let uplink = std::env::args().nth(1);

    let dev = DeviceBuilder::new()
        .name("clat4")
        .checksum_offload_from(uplink.as_deref())
        .nonblocking(true)
        .build()?;
    log::info!(
        "{} ready, rx checksum skipped: {}",
        dev.name(),
        dev.checksum_skipped()
    );

    let pi: [u8; PACKET_INFORMATION_LENGTH] = [0x00, 0x00, 0x08, 0x00];
    let mut header = [
        0x45, 0x00, 0x00, 0x20, 0x00, 0x00, 0x40, 0x00, 0x40, 0x11, 0x00, 0x00, 192, 0, 0, 4,
        192, 0, 0, 1,
    ];
    let udp = [0x13, 0x88, 0x13, 0x88, 0x00, 0x0c, 0x00, 0x00];
    let payload = *b"ping";

    for id in 0u16..4 {
        header[4..6].copy_from_slice(&id.to_be_bytes());
        let packet = [
            IoSlice::new(&pi),
            IoSlice::new(&header),
            IoSlice::new(&udp),
            IoSlice::new(&payload),
        ];
        match dev.send_vectored(&packet) {
            Ok(n) => log::info!("sent packet {id}: {n} bytes"),
            Err(err) if err.kind() == ErrorKind::WouldBlock => {
                log::warn!("device busy, dropped packet {id}")
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

#[cfg(not(any(target_os = "linux", target_os = "android")))]
fn main() {
    unimplemented!()
}
