//! Error type shared by the register buffer, the decoder and the payload model.
use crate::protocol::DeviceVariant;

/// Represents all errors that can occur while decoding local API data.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The register array does not contain every register the variant requires.
    ///
    /// This indicates a transport or parsing defect upstream, the buffer is
    /// never padded silently.
    #[error(
        "Register buffer too short for {variant}: expected at least {expected} registers, got {actual}"
    )]
    BufferTooShort {
        variant: DeviceVariant,
        expected: usize,
        actual: usize,
    },

    /// An explicit raw read was beyond the end of the register buffer.
    #[error("Register offset {offset} is out of range (buffer length {len})")]
    OffsetOutOfRange { offset: u16, len: usize },

    /// The payload's `type` code has no register profile.
    #[error("Unsupported inverter type code: {0}")]
    UnsupportedInverterType(u16),

    /// A variant name that does not match any known variant.
    #[error("Unknown device variant: '{0}'")]
    UnknownVariant(String),

    /// Wraps `serde_json::Error` raised while parsing a payload.
    #[cfg(feature = "serde")]
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// The result type for decoding operations.
pub type Result<T> = std::result::Result<T, Error>;
