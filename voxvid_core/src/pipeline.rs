use std::sync::Arc;

use tracing::warn;

use crate::container;
use crate::engine::CodecEngine;
use crate::error::{Error, Result};
use crate::hw::{validate, HardwareProbe};
use crate::params::{resolve, CodecRequest, ParameterSet, Strictness};
use crate::quant::{forward, inverse, BitDepth, QuantOptions, QuantizationProfile, Samples};
use crate::store::ArrayStore;

/// Write/read glue around the core transforms.
///
/// Write path: resolve → quantize forward → engine encode → container encode
/// → store. Read path: store → container decode → hardware re-validation →
/// engine decode → quantize inverse. Holds no mutable state; independent
/// callers may process chunks concurrently.
pub struct ChunkPipeline {
    engine: Box<dyn CodecEngine>,
    probe: Arc<dyn HardwareProbe>,
    strictness: Strictness,
}

impl ChunkPipeline {
    pub fn new(engine: Box<dyn CodecEngine>, probe: Arc<dyn HardwareProbe>) -> Self {
        Self {
            engine,
            probe,
            strictness: Strictness::Strict,
        }
    }

    /// Select the write-path policy for hardware-class conflicts.
    pub fn with_strictness(mut self, strictness: Strictness) -> Self {
        self.strictness = strictness;
        self
    }

    /// Compress one chunk and store it.
    ///
    /// The quantization profile is derived and persisted at the first write
    /// of the array; every later write reuses the stored profile. Zero
    /// dimensions in the request are filled from the store's chunk shape.
    pub fn write_chunk(
        &self,
        store: &mut dyn ArrayStore,
        index: u64,
        request: &CodecRequest,
        opts: QuantOptions,
        data: &Samples,
    ) -> Result<()> {
        let mut params = resolve(request, self.probe.as_ref(), self.strictness)?;

        // Chunk shape is (depth, height, width); fill the inferred slots.
        let [d, h, w] = store.chunk_shape();
        if params.width == 0 {
            params.width = w;
        }
        if params.height == 0 {
            params.height = h;
        }
        if params.depth == 0 {
            params.depth = d;
        }

        let expected = params.width as u64 * params.height as u64 * params.depth as u64;
        if expected != data.len() as u64 {
            return Err(Error::Config(format!(
                "chunk holds {} samples but dimensions {}×{}×{} expect {expected}",
                data.len(),
                params.width,
                params.height,
                params.depth
            )));
        }

        let profile = match QuantizationProfile::load(store)? {
            Some(profile) => profile,
            None => {
                let profile = QuantizationProfile::derive(data, request.bit_depth, opts);
                profile.persist(store);
                profile
            }
        };
        params.bit_mode = profile.bit_depth.code();

        let quantized = forward(data, &profile)?;
        let payload = self.engine.encode(&params, quantized.as_bytes())?;
        let chunk = container::encode(&params, &payload);
        store.set_chunk(index, &chunk)
    }

    /// Load one chunk, decode it, and reconstruct the native samples.
    ///
    /// A stored hardware decoder that is unusable on this host is replaced
    /// by the encoder's default software decoder before the engine runs; the
    /// compressed payload is never altered. An array without a persisted
    /// profile decodes to samples at the container's bit width, unmodified.
    pub fn read_chunk(&self, store: &dyn ArrayStore, index: u64) -> Result<Samples> {
        let bytes = store.get_chunk(index)?;
        let (stored, payload) = container::decode(&bytes)?;
        let params = self.revalidate(stored);

        let raw = self.engine.decode(&params, payload)?;
        let bit_depth = BitDepth::from_code(params.bit_mode).ok_or_else(|| {
            Error::InvalidContainer(format!("unknown bit_mode {} in stored parameters", params.bit_mode))
        })?;
        let quantized = Samples::from_frame_bytes(raw, bit_depth)?;

        match QuantizationProfile::load(store)? {
            Some(profile) => inverse(&quantized, &profile),
            None => Ok(quantized),
        }
    }

    /// Re-validate a stored hardware decoder against the current host.
    fn revalidate(&self, stored: ParameterSet) -> ParameterSet {
        let Some(decoder) = stored.decoder_codec() else {
            return stored;
        };
        if !decoder.is_hardware() {
            return stored;
        }
        let Some(encoder) = stored.encoder_codec() else {
            return stored;
        };

        let mut params = stored;
        let actual = validate(self.probe.as_ref(), encoder.name(), stored.gpu as i32);
        if actual < 0 {
            warn!(
                decoder = decoder.name(),
                "stored hardware decoder unusable on this host; substituting software decoder"
            );
            params.decoder = encoder.default_decoder().id();
            params.gpu = 0;
        } else {
            params.gpu = actual as u32;
        }
        params
    }
}
