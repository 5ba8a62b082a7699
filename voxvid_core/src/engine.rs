use crate::params::ParameterSet;

/// External video encode/decode backend.
///
/// Each implementation receives the resolved parameter tuple and a raw frame
/// buffer (quantized samples, frame-major). The core never interprets the
/// payload an engine produces; it is carried opaquely inside the chunk
/// container. Implementations must be safe for concurrent use so independent
/// callers can process chunks in parallel.
pub trait CodecEngine: Send + Sync {
    /// Engine name for diagnostics.
    fn name(&self) -> &'static str;

    /// Compress a frame buffer into an opaque payload.
    fn encode(&self, params: &ParameterSet, frames: &[u8]) -> anyhow::Result<Vec<u8>>;

    /// Reconstruct the frame buffer from an opaque payload.
    fn decode(&self, params: &ParameterSet, payload: &[u8]) -> anyhow::Result<Vec<u8>>;
}
