use voxvid_core::{CodecEngine, ParameterSet};

/// Zstandard engine.
///
/// A lossless stand-in for a video backend: each chunk's frame buffer is
/// compressed independently with `zstd` at the configured level (default 3).
/// Because it is lossless, pipeline round trips through this engine isolate
/// quantization error from codec error.
pub struct ZstdEngine {
    /// Compression level (1 = fast / larger, 22 = slow / smallest).
    pub level: i32,
}

impl Default for ZstdEngine {
    fn default() -> Self {
        Self { level: 3 }
    }
}

impl ZstdEngine {
    pub fn new(level: i32) -> Self {
        Self { level }
    }
}

impl CodecEngine for ZstdEngine {
    fn name(&self) -> &'static str {
        "zstd"
    }

    fn encode(&self, _params: &ParameterSet, frames: &[u8]) -> anyhow::Result<Vec<u8>> {
        let payload = zstd::bulk::compress(frames, self.level)?;
        Ok(payload)
    }

    fn decode(&self, _params: &ParameterSet, payload: &[u8]) -> anyhow::Result<Vec<u8>> {
        let frames = zstd::decode_all(payload)?;
        Ok(frames)
    }
}
