//! Detection of receive checksum offload on the uplink interface.
//!
//! Translated packets only need fresh checksums when the kernel hasn't
//! already validated them. That is known to be the case when the uplink
//! driver both coalesces (GRO) and validates (rx checksum) incoming traffic.

use crate::platform::linux::sys::{
    new_ifreq, siocethtool, EthtoolValue, ETHTOOL_GGRO, ETHTOOL_GRXCSUM,
};
use crate::platform::posix::Fd;
use libc::{c_char, AF_INET, SOCK_CLOEXEC, SOCK_DGRAM};
use std::os::unix::io::AsRawFd;

/// An ethtool feature that can be queried on an interface.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum EthtoolFeature {
    /// Generic receive offload.
    Gro,
    /// Receive checksum validation.
    RxChecksum,
}

impl EthtoolFeature {
    fn cmd(self) -> u32 {
        match self {
            EthtoolFeature::Gro => ETHTOOL_GGRO,
            EthtoolFeature::RxChecksum => ETHTOOL_GRXCSUM,
        }
    }
}

/// Answers whether a feature is enabled on an interface.
///
/// Implementations never fail: anything that prevents an answer means the
/// feature is treated as absent.
pub trait FeatureProbe {
    fn feature_enabled(&self, iface: &str, feature: EthtoolFeature) -> bool;
}

/// Queries features with the `SIOCETHTOOL` ioctl.
#[derive(Clone, Copy, Debug, Default)]
pub struct Ethtool;

impl FeatureProbe for Ethtool {
    fn feature_enabled(&self, iface: &str, feature: EthtoolFeature) -> bool {
        if iface.is_empty() {
            return false;
        }
        // ethtool requests go through a socket, not the device itself
        let ctl = match unsafe { ctl() } {
            Ok(ctl) => ctl,
            Err(err) => {
                log::debug!("no socket to query {feature:?} on {iface}: {err}");
                return false;
            }
        };

        let mut value = EthtoolValue {
            cmd: feature.cmd(),
            data: 0,
        };
        let mut req = new_ifreq(iface);
        req.ifr_ifru.ifru_data = &mut value as *mut EthtoolValue as *mut c_char;

        match unsafe { siocethtool(ctl.as_raw_fd(), &mut req) } {
            Ok(_) => {
                log::debug!("{iface}: {feature:?} = {}", value.data);
                value.data != 0
            }
            Err(err) => {
                log::debug!("{iface}: {feature:?} query failed: {err}");
                false
            }
        }
    }
}

unsafe fn ctl() -> std::io::Result<Fd> {
    Fd::new(libc::socket(AF_INET, SOCK_DGRAM | SOCK_CLOEXEC, 0))
}

/// Whether the uplink `iface` delivers packets whose checksums were already
/// validated, so that the tun side can be told to skip validation.
pub fn checksum_offloaded(iface: Option<&str>) -> bool {
    checksum_offloaded_with(&Ethtool, iface)
}

/// [`checksum_offloaded`] with a caller supplied probe.
///
/// True only when both GRO and rx checksum validation are enabled. A missing
/// or empty interface name is false.
pub fn checksum_offloaded_with<P: FeatureProbe + ?Sized>(probe: &P, iface: Option<&str>) -> bool {
    let Some(iface) = iface.filter(|iface| !iface.is_empty()) else {
        return false;
    };
    let offloaded = probe.feature_enabled(iface, EthtoolFeature::Gro)
        && probe.feature_enabled(iface, EthtoolFeature::RxChecksum);
    log::debug!("{iface}: rx checksum offloaded: {offloaded}");
    offloaded
}

#[cfg(test)]
mod test {
    use super::*;
    use std::cell::RefCell;

    struct Fixed {
        gro: bool,
        rx_checksum: bool,
        asked: RefCell<Vec<(String, EthtoolFeature)>>,
    }

    impl Fixed {
        fn new(gro: bool, rx_checksum: bool) -> Self {
            Fixed {
                gro,
                rx_checksum,
                asked: RefCell::new(Vec::new()),
            }
        }
    }

    impl FeatureProbe for Fixed {
        fn feature_enabled(&self, iface: &str, feature: EthtoolFeature) -> bool {
            self.asked.borrow_mut().push((iface.to_string(), feature));
            match feature {
                EthtoolFeature::Gro => self.gro,
                EthtoolFeature::RxChecksum => self.rx_checksum,
            }
        }
    }

    #[test]
    fn needs_both_features() {
        for (gro, rx_checksum) in [(false, false), (false, true), (true, false), (true, true)] {
            let probe = Fixed::new(gro, rx_checksum);
            assert_eq!(
                checksum_offloaded_with(&probe, Some("rmnet0")),
                gro && rx_checksum,
                "gro={gro} rx_checksum={rx_checksum}"
            );
        }
    }

    #[test]
    fn missing_interface_is_never_offloaded() {
        let probe = Fixed::new(true, true);
        assert!(!checksum_offloaded_with(&probe, None));
        assert!(!checksum_offloaded_with(&probe, Some("")));
        assert!(probe.asked.borrow().is_empty());
    }

    #[test]
    fn queries_the_named_interface() {
        let probe = Fixed::new(true, true);
        assert!(checksum_offloaded_with(&probe, Some("wlan0")));
        assert_eq!(
            *probe.asked.borrow(),
            [
                ("wlan0".to_string(), EthtoolFeature::Gro),
                ("wlan0".to_string(), EthtoolFeature::RxChecksum),
            ]
        );
    }

    #[test]
    fn skips_checksum_query_without_gro() {
        let probe = Fixed::new(false, true);
        assert!(!checksum_offloaded_with(&probe, Some("wlan0")));
        assert_eq!(probe.asked.borrow().len(), 1);
    }

    #[test]
    fn ethtool_reports_nothing_for_empty_name() {
        assert!(!Ethtool.feature_enabled("", EthtoolFeature::Gro));
        assert!(!checksum_offloaded(None));
    }

    #[test]
    fn ethtool_reports_nothing_for_unknown_interface() {
        assert!(!Ethtool.feature_enabled("nosuchif9", EthtoolFeature::RxChecksum));
        assert!(!checksum_offloaded(Some("nosuchif9")));
    }

    #[test]
    fn ethtool_sees_loopback_offloads() {
        // loopback always has rx checksum and the GRO soft feature on
        assert!(Ethtool.feature_enabled("lo", EthtoolFeature::Gro));
        assert!(Ethtool.feature_enabled("lo", EthtoolFeature::RxChecksum));
        assert!(checksum_offloaded(Some("lo")));
    }

    #[test]
    fn feature_commands_match_ethtool_header() {
        assert_eq!(EthtoolFeature::Gro.cmd(), 0x2b);
        assert_eq!(EthtoolFeature::RxChecksum.cmd(), 0x14);
    }
}
