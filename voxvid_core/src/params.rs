use tracing::warn;

use crate::codecs::{Decoder, Encoder, PRESET_NONE, TUNE_NONE};
use crate::error::{Error, Result};
use crate::hw::{validate, HardwareProbe};
use crate::quant::BitDepth;

/// Number of `u32` fields in a serialized [`ParameterSet`].
pub const PARAMETER_FIELDS: usize = 11;

/// How hardware-class conflicts are treated on the write path.
///
/// Under [`Strictness::Strict`] a hardware codec with no usable accelerator
/// fails resolution. [`Strictness::Lenient`] logs a warning and continues
/// with the software decoder and GPU slot 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strictness {
    #[default]
    Strict,
    Lenient,
}

/// Logical compression request, created per write call and consumed once.
#[derive(Debug, Clone)]
pub struct CodecRequest {
    /// Encoder codec name, e.g. `"libx264"`.
    pub codec: String,
    /// Explicit decoder override; `None` selects the encoder's counterpart.
    pub decoder: Option<String>,
    /// Preset name in the codec's own vocabulary.
    pub preset: Option<String>,
    /// Tune name in the codec's own vocabulary.
    pub tune: Option<String>,
    /// Constant rate factor (lower = better quality).
    pub quality: u32,
    pub bit_depth: BitDepth,
    /// Film grain synthesis strength, 0 = disabled.
    pub grain: u32,
    /// GPU preference; −1 requests CPU-only.
    pub gpu: i32,
    /// Chunk dimensions; 0 means "infer from data at write time".
    pub width: u32,
    pub height: u32,
    pub depth: u32,
}

impl Default for CodecRequest {
    fn default() -> Self {
        Self {
            codec: "libx264".to_string(),
            decoder: None,
            preset: None,
            tune: None,
            quality: 0,
            bit_depth: BitDepth::Eight,
            grain: 0,
            gpu: 0,
            width: 0,
            height: 0,
            depth: 0,
        }
    }
}

/// The canonical numeric tuple exchanged with the codec engine and persisted
/// in every chunk container. Resolved once per chunk write, never mutated
/// afterward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterSet {
    pub encoder: u32,
    pub decoder: u32,
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub bit_mode: u32,
    pub preset: u32,
    pub tune: u32,
    pub quality: u32,
    pub grain: u32,
    pub gpu: u32,
}

impl ParameterSet {
    /// Fields in declaration order, as serialized in the container.
    pub fn to_words(&self) -> [u32; PARAMETER_FIELDS] {
        [
            self.encoder,
            self.decoder,
            self.width,
            self.height,
            self.depth,
            self.bit_mode,
            self.preset,
            self.tune,
            self.quality,
            self.grain,
            self.gpu,
        ]
    }

    pub fn from_words(words: &[u32; PARAMETER_FIELDS]) -> Self {
        Self {
            encoder: words[0],
            decoder: words[1],
            width: words[2],
            height: words[3],
            depth: words[4],
            bit_mode: words[5],
            preset: words[6],
            tune: words[7],
            quality: words[8],
            grain: words[9],
            gpu: words[10],
        }
    }

    pub fn encoder_codec(&self) -> Option<Encoder> {
        Encoder::from_id(self.encoder)
    }

    pub fn decoder_codec(&self) -> Option<Decoder> {
        Decoder::from_id(self.decoder)
    }
}

/// Resolve a logical request into a validated parameter set.
///
/// Table lookups (codec, decoder, preset, tune) all complete before any
/// hardware is probed, so configuration errors never have probing side
/// effects. Dimension fields pass through unmodified, including zeros.
pub fn resolve(
    request: &CodecRequest,
    probe: &dyn HardwareProbe,
    strictness: Strictness,
) -> Result<ParameterSet> {
    let encoder = Encoder::from_name(&request.codec).ok_or_else(|| {
        let known: Vec<&str> = Encoder::ALL.iter().map(|e| e.name()).collect();
        Error::Config(format!(
            "unknown codec '{}'; available codecs: {}",
            request.codec,
            known.join(", ")
        ))
    })?;

    let explicit_decoder = request.decoder.is_some();
    let mut decoder = match &request.decoder {
        Some(name) => Decoder::from_name(name).ok_or_else(|| {
            let known: Vec<&str> = Decoder::ALL.iter().map(|d| d.name()).collect();
            Error::Config(format!(
                "unknown decoder '{name}'; available decoders: {}",
                known.join(", ")
            ))
        })?,
        None => {
            if request.gpu >= 0 {
                encoder
                    .hardware_decoder()
                    .unwrap_or_else(|| encoder.default_decoder())
            } else {
                encoder.default_decoder()
            }
        }
    };

    let preset = match &request.preset {
        Some(name) => encoder.resolve_preset(name)?,
        None => PRESET_NONE,
    };
    let tune = match &request.tune {
        Some(name) => encoder.resolve_tune(name)?,
        None => TUNE_NONE,
    };

    // Hardware-class conflict check. Only reached once every table lookup
    // succeeded, and only probes when an accelerator was actually asked for.
    let mut gpu_slot = request.gpu.max(0) as u32;
    if request.gpu >= 0 {
        if let Some(vendor) = encoder.vendor() {
            let actual = validate(probe, encoder.name(), request.gpu);
            if actual < 0 {
                match strictness {
                    Strictness::Strict => {
                        return Err(Error::HardwareUnavailable(format!(
                            "{} requested but no usable {} device detected",
                            encoder.name(),
                            vendor.as_str()
                        )));
                    }
                    Strictness::Lenient => {
                        warn!(
                            codec = encoder.name(),
                            "no usable accelerator; continuing with software decoder"
                        );
                        if !explicit_decoder {
                            decoder = encoder.default_decoder();
                        }
                        gpu_slot = 0;
                    }
                }
            } else {
                gpu_slot = actual as u32;
            }
        }
    }

    Ok(ParameterSet {
        encoder: encoder.id(),
        decoder: decoder.id(),
        width: request.width,
        height: request.height,
        depth: request.depth,
        bit_mode: request.bit_depth.code(),
        preset,
        tune,
        quality: request.quality,
        grain: request.grain,
        gpu: gpu_slot,
    })
}
