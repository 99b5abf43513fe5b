use std::io::ErrorKind;
use std::net::{IpAddr, Ipv4Addr, TcpListener};

use crate::domain::ports::network::{PortProbe, PortProbeError, PortState};

/// Probes a port by trying to bind it, the way the server would at startup.
pub struct TcpPortProbe {
    bind_addr: IpAddr,
}

impl TcpPortProbe {
    #[must_use]
    pub const fn new(bind_addr: IpAddr) -> Self {
        Self { bind_addr }
    }
}

impl Default for TcpPortProbe {
    fn default() -> Self {
        Self::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
    }
}

impl PortProbe for TcpPortProbe {
    fn probe(&self, port: u16) -> Result<PortState, PortProbeError> {
        // The listener is dropped immediately, releasing the port
        match TcpListener::bind((self.bind_addr, port)) {
            Ok(_) => Ok(PortState::Free),
            Err(e) if e.kind() == ErrorKind::AddrInUse => Ok(PortState::InUse),
            Err(e) => Err(PortProbeError {
                port,
                reason: e.to_string(),
            }),
        }
    }
}
