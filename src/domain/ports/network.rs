use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortState {
    Free,
    InUse,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot probe port {port}: {reason}")]
pub struct PortProbeError {
    pub port: u16,
    pub reason: String,
}

pub trait PortProbe: Send + Sync {
    /// Report whether `port` is already bound on this host.
    ///
    /// # Errors
    ///
    /// Returns `PortProbeError` when the state cannot be determined
    /// (e.g. privileged port without permission).
    fn probe(&self, port: u16) -> Result<PortState, PortProbeError>;
}
