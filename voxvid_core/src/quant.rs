use std::fmt;

use crate::error::{Error, Result};
use crate::store::{ArrayStore, AttrValue};

// Attribute keys under which the profile is persisted on the array.
pub const ATTR_BIT: &str = "bit";
pub const ATTR_NORM: &str = "norm";
pub const ATTR_BETA: &str = "beta";
pub const ATTR_MIN: &str = "init_min_intensity";
pub const ATTR_MAX: &str = "init_max_intensity";
pub const ATTR_DATA_TYPE: &str = "data_type";

// ── Bit depths ─────────────────────────────────────────────────────────────

/// Fixed bit depths a codec engine can consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BitDepth {
    #[default]
    Eight,
    Ten,
    Twelve,
}

impl BitDepth {
    /// Wire code stored in the `bit_mode` parameter slot.
    pub fn code(&self) -> u32 {
        match self {
            BitDepth::Eight => 0,
            BitDepth::Ten => 1,
            BitDepth::Twelve => 2,
        }
    }

    pub fn from_code(code: u32) -> Option<BitDepth> {
        match code {
            0 => Some(BitDepth::Eight),
            1 => Some(BitDepth::Ten),
            2 => Some(BitDepth::Twelve),
            _ => None,
        }
    }

    pub fn bits(&self) -> u32 {
        match self {
            BitDepth::Eight => 8,
            BitDepth::Ten => 10,
            BitDepth::Twelve => 12,
        }
    }

    pub fn from_bits(bits: u32) -> Option<BitDepth> {
        match bits {
            8 => Some(BitDepth::Eight),
            10 => Some(BitDepth::Ten),
            12 => Some(BitDepth::Twelve),
            _ => None,
        }
    }

    /// Largest representable quantized value, `2^b − 1`.
    pub fn max_value(&self) -> u32 {
        (1 << self.bits()) - 1
    }
}

// ── Sample domains ─────────────────────────────────────────────────────────

/// Numeric domains the quantization layer accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleType {
    U8,
    U16,
    F32,
}

impl SampleType {
    /// Stable code persisted in the `data_type` attribute.
    pub fn code(&self) -> u32 {
        match self {
            SampleType::U8 => 0,
            SampleType::U16 => 1,
            SampleType::F32 => 2,
        }
    }

    pub fn from_code(code: u32) -> Result<SampleType> {
        match code {
            0 => Ok(SampleType::U8),
            1 => Ok(SampleType::U16),
            2 => Ok(SampleType::F32),
            _ => Err(Error::UnsupportedSampleType(format!(
                "persisted data_type code {code} is not one of uint8 (0), uint16 (1), float32 (2)"
            ))),
        }
    }
}

impl fmt::Display for SampleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SampleType::U8 => "uint8",
            SampleType::U16 => "uint16",
            SampleType::F32 => "float32",
        })
    }
}

/// A buffer of samples in one of the supported domains.
#[derive(Debug, Clone, PartialEq)]
pub enum Samples {
    U8(Vec<u8>),
    U16(Vec<u16>),
    F32(Vec<f32>),
}

impl Samples {
    pub fn sample_type(&self) -> SampleType {
        match self {
            Samples::U8(_) => SampleType::U8,
            Samples::U16(_) => SampleType::U16,
            Samples::F32(_) => SampleType::F32,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Samples::U8(v) => v.len(),
            Samples::U16(v) => v.len(),
            Samples::F32(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// View the buffer as raw bytes in native sample layout.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Samples::U8(v) => v.as_slice(),
            Samples::U16(v) => bytemuck::cast_slice(v),
            Samples::F32(v) => bytemuck::cast_slice(v),
        }
    }

    /// Reassemble a decoded frame buffer into samples at the container's
    /// bit width (`u8` for 8-bit, `u16` for 10/12-bit).
    pub fn from_frame_bytes(bytes: Vec<u8>, bit_depth: BitDepth) -> Result<Samples> {
        match bit_depth {
            BitDepth::Eight => Ok(Samples::U8(bytes)),
            BitDepth::Ten | BitDepth::Twelve => {
                if bytes.len() % 2 != 0 {
                    return Err(Error::InvalidContainer(format!(
                        "decoded frame buffer is {} bytes, expected a multiple of 2",
                        bytes.len()
                    )));
                }
                Ok(Samples::U16(bytemuck::pod_collect_to_vec(&bytes)))
            }
        }
    }

    /// Sample range used for quantization: scanned for floating data,
    /// assumed `[0, type-max]` for unsigned integer data.
    fn range(&self) -> (f64, f64) {
        match self {
            Samples::U8(_) => (0.0, u8::MAX as f64),
            Samples::U16(_) => (0.0, u16::MAX as f64),
            Samples::F32(v) => {
                let mut min = f64::INFINITY;
                let mut max = f64::NEG_INFINITY;
                for &x in v {
                    let x = x as f64;
                    min = min.min(x);
                    max = max.max(x);
                }
                if min > max {
                    (0.0, 0.0)
                } else {
                    (min, max)
                }
            }
        }
    }
}

fn to_f64_iter<'a>(data: &'a Samples) -> Box<dyn Iterator<Item = f64> + 'a> {
    match data {
        Samples::U8(v) => Box::new(v.iter().map(|&x| x as f64)),
        Samples::U16(v) => Box::new(v.iter().map(|&x| x as f64)),
        Samples::F32(v) => Box::new(v.iter().map(|&x| x as f64)),
    }
}

// ── Profile ────────────────────────────────────────────────────────────────

/// Branch selection for the forward transform at the first write of an array.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuantOptions {
    /// Linearly rescale `[min,max]` onto the quantized range before applying
    /// the power weighting. When false, the exponent is derived analytically
    /// from the dynamic range instead.
    pub normalize: bool,
    /// Perceptual weighting exponent β, used only with `normalize`.
    pub beta: f64,
}

impl Default for QuantOptions {
    fn default() -> Self {
        Self {
            normalize: false,
            beta: 1.0,
        }
    }
}

/// Per-array quantization metadata.
///
/// Computed once at the first write of an array, persisted as array-level
/// attributes, and read back — never recomputed — on every subsequent read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuantizationProfile {
    pub bit_depth: BitDepth,
    pub normalize: bool,
    /// Power-law exponent β. Under `normalize` this is the caller's
    /// perceptual weight; otherwise it is derived so the dynamic range maps
    /// exactly onto the quantized range.
    pub gamma: f64,
    pub sample_min: f64,
    pub sample_max: f64,
    pub source: SampleType,
}

impl QuantizationProfile {
    /// Derive the profile for `data` at the first write of an array.
    ///
    /// `u8` volumes always travel at 8 bits regardless of the requested
    /// depth. Without `normalize`, β is chosen as `ln(max_val)/ln(max−min)`
    /// so that the top of the dynamic range lands exactly on the top of the
    /// quantized range; degenerate ranges (`max − min ≤ 1`) fall back to the
    /// identity transform.
    pub fn derive(data: &Samples, bit_depth: BitDepth, opts: QuantOptions) -> QuantizationProfile {
        let bit_depth = match data.sample_type() {
            SampleType::U8 => BitDepth::Eight,
            _ => bit_depth,
        };
        let (sample_min, sample_max) = data.range();
        let gamma = if opts.normalize {
            if opts.beta > 0.0 {
                opts.beta
            } else {
                1.0
            }
        } else if sample_max - sample_min > 1.0 {
            (bit_depth.max_value() as f64).ln() / (sample_max - sample_min).ln()
        } else {
            1.0
        };
        QuantizationProfile {
            bit_depth,
            normalize: opts.normalize,
            gamma,
            sample_min,
            sample_max,
            source: data.sample_type(),
        }
    }

    /// True when the forward transform degenerates to a range-clipped cast:
    /// β = 1 without normalization, or a zero dynamic range.
    pub fn is_identity(&self) -> bool {
        (!self.normalize && self.gamma == 1.0) || self.sample_max <= self.sample_min
    }

    /// Write the profile to array-level attributes.
    pub fn persist(&self, store: &mut dyn ArrayStore) {
        store.set_attr(ATTR_BIT, AttrValue::U32(self.bit_depth.bits()));
        store.set_attr(ATTR_NORM, AttrValue::Bool(self.normalize));
        store.set_attr(ATTR_BETA, AttrValue::F64(self.gamma));
        store.set_attr(ATTR_MIN, AttrValue::F64(self.sample_min));
        store.set_attr(ATTR_MAX, AttrValue::F64(self.sample_max));
        store.set_attr(ATTR_DATA_TYPE, AttrValue::U32(self.source.code()));
    }

    /// Load the profile persisted at first write. `None` when the array was
    /// written without the quantization layer.
    pub fn load(store: &dyn ArrayStore) -> Result<Option<QuantizationProfile>> {
        let Some(bit) = store.get_attr(ATTR_BIT) else {
            return Ok(None);
        };
        let bits = bit
            .as_u32()
            .ok_or_else(|| Error::Store("attribute 'bit' is not an integer".into()))?;
        let bit_depth = BitDepth::from_bits(bits)
            .ok_or_else(|| Error::Store(format!("attribute 'bit' holds unsupported depth {bits}")))?;
        let normalize = store
            .get_attr(ATTR_NORM)
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
        let gamma = store
            .get_attr(ATTR_BETA)
            .and_then(|v| v.as_f64())
            .unwrap_or(1.0);
        let sample_min = store
            .get_attr(ATTR_MIN)
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        let sample_max = store
            .get_attr(ATTR_MAX)
            .and_then(|v| v.as_f64())
            .unwrap_or(bit_depth.max_value() as f64);
        let source = match store.get_attr(ATTR_DATA_TYPE) {
            Some(v) => {
                let code = v
                    .as_u32()
                    .ok_or_else(|| Error::Store("attribute 'data_type' is not an integer".into()))?;
                SampleType::from_code(code)?
            }
            None => SampleType::U8,
        };
        Ok(Some(QuantizationProfile {
            bit_depth,
            normalize,
            gamma,
            sample_min,
            sample_max,
            source,
        }))
    }
}

// ── Transforms ─────────────────────────────────────────────────────────────

/// Forward quantization: native samples → integers at the profile's bit depth.
///
/// The two branches form the canonical pair:
/// - `normalize`: `v' = ((v − min)/(max − min))^β · max_val`
/// - otherwise:   `v' = (v − min)^β` with β derived at profile creation
///
/// Values outside the profile's range (possible on chunks written after the
/// first) are clamped, never wrapped. The identity fast path is a plain
/// range-clipped cast, bit-identical to `clip(v, 0, max_val)` at the target
/// width.
pub fn forward(data: &Samples, profile: &QuantizationProfile) -> Result<Samples> {
    if data.sample_type() != profile.source {
        return Err(Error::UnsupportedSampleType(format!(
            "array profile was derived from {} samples but this chunk holds {}",
            profile.source,
            data.sample_type()
        )));
    }

    let max_val = profile.bit_depth.max_value() as f64;
    let identity = profile.is_identity();
    let range = profile.sample_max - profile.sample_min;

    let quantize = move |v: f64| -> f64 {
        if identity {
            v.clamp(0.0, max_val)
        } else if profile.normalize {
            let x = ((v - profile.sample_min) / range).clamp(0.0, 1.0);
            (x.powf(profile.gamma) * max_val).round().clamp(0.0, max_val)
        } else {
            let shifted = (v - profile.sample_min).max(0.0);
            shifted.powf(profile.gamma).round().clamp(0.0, max_val)
        }
    };

    let transformed = to_f64_iter(data).map(quantize);
    Ok(match profile.bit_depth {
        BitDepth::Eight => Samples::U8(transformed.map(|q| q as u8).collect()),
        BitDepth::Ten | BitDepth::Twelve => {
            Samples::U16(transformed.map(|q| q as u16).collect())
        }
    })
}

/// Inverse quantization: integers at the profile's bit depth → native samples.
///
/// Applies the exact algebraic inverse of the branch used at encode time and
/// clips to `[min,max]` to absorb codec-introduced overshoot.
pub fn inverse(quantized: &Samples, profile: &QuantizationProfile) -> Result<Samples> {
    let width_ok = matches!(
        (quantized, profile.bit_depth),
        (Samples::U8(_), BitDepth::Eight)
            | (Samples::U16(_), BitDepth::Ten)
            | (Samples::U16(_), BitDepth::Twelve)
    );
    if !width_ok {
        return Err(Error::UnsupportedSampleType(format!(
            "quantized buffer holds {} samples, which does not match the profile's {}-bit depth",
            quantized.sample_type(),
            profile.bit_depth.bits()
        )));
    }

    let max_val = profile.bit_depth.max_value() as f64;
    let identity = profile.is_identity();
    let range = profile.sample_max - profile.sample_min;

    let reconstruct = move |q: f64| -> f64 {
        let v = if identity {
            q
        } else if profile.normalize {
            let x = (q / max_val).clamp(0.0, 1.0);
            x.powf(1.0 / profile.gamma) * range + profile.sample_min
        } else {
            q.powf(1.0 / profile.gamma) + profile.sample_min
        };
        v.clamp(profile.sample_min, profile.sample_max)
    };

    let values = to_f64_iter(quantized).map(reconstruct);
    Ok(match profile.source {
        SampleType::U8 => Samples::U8(values.map(|v| v.round() as u8).collect()),
        SampleType::U16 => Samples::U16(values.map(|v| v.round() as u16).collect()),
        SampleType::F32 => Samples::F32(values.map(|v| v as f32).collect()),
    })
}
