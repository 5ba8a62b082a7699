use crate::quant::{Samples, SampleType};

/// Peak signal-to-noise ratio in dB between an original buffer and its
/// reconstruction. `inf` for identical buffers, `NaN` when the buffers are
/// not comparable (different type or length).
pub fn psnr(original: &Samples, reconstructed: &Samples) -> f64 {
    if original.sample_type() != reconstructed.sample_type()
        || original.len() != reconstructed.len()
        || original.is_empty()
    {
        return f64::NAN;
    }

    let mse = match (original, reconstructed) {
        (Samples::U8(a), Samples::U8(b)) => mean_squared_error(a.iter().map(|&x| x as f64), b.iter().map(|&x| x as f64)),
        (Samples::U16(a), Samples::U16(b)) => mean_squared_error(a.iter().map(|&x| x as f64), b.iter().map(|&x| x as f64)),
        (Samples::F32(a), Samples::F32(b)) => mean_squared_error(a.iter().map(|&x| x as f64), b.iter().map(|&x| x as f64)),
        _ => unreachable!(),
    };
    if mse == 0.0 {
        return f64::INFINITY;
    }

    let peak = match original.sample_type() {
        SampleType::U8 => u8::MAX as f64,
        SampleType::U16 => u16::MAX as f64,
        // Floating data has no type-level peak; use the observed range.
        SampleType::F32 => match original {
            Samples::F32(v) => {
                let (min, max) = v.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
                    (lo.min(x as f64), hi.max(x as f64))
                });
                max - min
            }
            _ => unreachable!(),
        },
    };

    20.0 * (peak / mse.sqrt()).log10()
}

fn mean_squared_error(a: impl Iterator<Item = f64>, b: impl Iterator<Item = f64>) -> f64 {
    let mut sum = 0.0;
    let mut n = 0u64;
    for (x, y) in a.zip(b) {
        sum += (x - y) * (x - y);
        n += 1;
    }
    sum / n as f64
}

/// Compression ratio (raw / compressed).
pub fn compression_ratio(raw_len: u64, compressed_len: u64) -> f64 {
    if compressed_len == 0 {
        return 1.0;
    }
    raw_len as f64 / compressed_len as f64
}
