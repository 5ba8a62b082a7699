use thiserror::Error;

/// Error type for all chunk compression operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Unknown codec/decoder/preset/tune name. The message enumerates the
    /// valid alternatives scoped to the codec in question.
    #[error("{0}")]
    Config(String),

    /// A hardware-class codec was requested but no usable accelerator exists.
    /// Raised on the write path under strict policy only; the read path
    /// silently substitutes a software decoder instead.
    #[error("hardware unavailable: {0}")]
    HardwareUnavailable(String),

    /// The container was written by an unknown format version.
    #[error("container version mismatch: chunk uses version {found}, this implementation supports version {supported}")]
    VersionMismatch { found: u32, supported: u32 },

    /// Truncated or malformed container bytes.
    #[error("invalid container: {0}")]
    InvalidContainer(String),

    /// The quantization layer cannot represent this sample type.
    #[error("unsupported sample type: {0}")]
    UnsupportedSampleType(String),

    /// Array store failure (missing chunk, corrupt attribute).
    #[error("store error: {0}")]
    Store(String),

    /// Codec engine failure, passed through from the backend.
    #[error("codec engine error: {0}")]
    Engine(#[from] anyhow::Error),
}

/// Result type alias for chunk compression operations.
pub type Result<T> = std::result::Result<T, Error>;
