use thiserror::Error;

/// Failures reported by register devices.
///
/// Address-space accesses are total and never fail; the only error is a
/// request for a register the device does not declare.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum RegisterError {
    /// The register name is not part of the device layout.
    #[error("device `{device}` declares no register named `{register}`")]
    InvalidRegister {
        /// Name of the device that rejected the access.
        device: &'static str,
        /// Register name that was requested.
        register: String,
    },
}
