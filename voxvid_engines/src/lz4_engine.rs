use lz4_flex::{compress_prepend_size, decompress_size_prepended};
use voxvid_core::{CodecEngine, ParameterSet};

/// LZ4 engine.
///
/// Fastest lossless stand-in of the bundled engines; best when decode
/// latency matters more than size reduction.
pub struct Lz4Engine;

impl CodecEngine for Lz4Engine {
    fn name(&self) -> &'static str {
        "lz4"
    }

    fn encode(&self, _params: &ParameterSet, frames: &[u8]) -> anyhow::Result<Vec<u8>> {
        Ok(compress_prepend_size(frames))
    }

    fn decode(&self, _params: &ParameterSet, payload: &[u8]) -> anyhow::Result<Vec<u8>> {
        let frames = decompress_size_prepended(payload)
            .map_err(|e| anyhow::anyhow!("lz4 decompress error: {}", e))?;
        Ok(frames)
    }
}
