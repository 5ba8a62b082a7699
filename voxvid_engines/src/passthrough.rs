use voxvid_core::{CodecEngine, ParameterSet};

/// No-op engine: carries frame buffers verbatim.
///
/// Useful for verifying the container and quantization layers independently
/// of any codec, and as the reference point for fidelity metrics.
pub struct PassthroughEngine;

impl CodecEngine for PassthroughEngine {
    fn name(&self) -> &'static str {
        "passthrough"
    }

    fn encode(&self, _params: &ParameterSet, frames: &[u8]) -> anyhow::Result<Vec<u8>> {
        Ok(frames.to_vec())
    }

    fn decode(&self, _params: &ParameterSet, payload: &[u8]) -> anyhow::Result<Vec<u8>> {
        Ok(payload.to_vec())
    }
}
