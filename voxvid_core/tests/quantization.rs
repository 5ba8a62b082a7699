use voxvid_core::quant::{ATTR_BIT, ATTR_DATA_TYPE};
use voxvid_core::{
    forward, inverse, ArrayStore, AttrValue, BitDepth, Error, MemoryStore, QuantOptions,
    QuantizationProfile, Samples, SampleType,
};

/// Deterministic u16 samples spanning the full range.
fn u16_volume(len: usize, seed: u64) -> Vec<u16> {
    let mut rng = seed;
    (0..len)
        .map(|_| {
            rng = rng
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (rng >> 48) as u16
        })
        .collect()
}

/// Analytic inverse of the forward transform, for computing the local
/// quantization step around a quantized value.
fn reconstruct(profile: &QuantizationProfile, q: f64) -> f64 {
    let max_val = profile.bit_depth.max_value() as f64;
    let range = profile.sample_max - profile.sample_min;
    if profile.normalize {
        (q / max_val).powf(1.0 / profile.gamma) * range + profile.sample_min
    } else {
        q.powf(1.0 / profile.gamma) + profile.sample_min
    }
}

/// One quantization step in the sample domain, local to `q`.
fn local_step(profile: &QuantizationProfile, q: f64) -> f64 {
    let lo = (q - 1.0).max(0.0);
    let hi = (q + 1.0).min(profile.bit_depth.max_value() as f64);
    (reconstruct(profile, hi) - reconstruct(profile, lo)) / (hi - lo).max(1.0)
}

fn assert_within_one_step(original: &[f64], quantized: &[f64], reconstructed: &[f64], profile: &QuantizationProfile) {
    for ((&x, &q), &y) in original.iter().zip(quantized).zip(reconstructed) {
        let step = local_step(profile, q);
        assert!(
            (x - y).abs() <= step + 1e-9,
            "sample {x} reconstructed as {y} (q={q}), off by more than one step ({step})"
        );
    }
}

// ── Identity fast path ─────────────────────────────────────────────────────

#[test]
fn uint8_volume_is_identity_at_eight_bits() {
    let data: Vec<u8> = (0..=255).collect();
    let samples = Samples::U8(data.clone());
    let profile = QuantizationProfile::derive(&samples, BitDepth::Eight, QuantOptions::default());
    // ln(255)/ln(255) = 1, so the derived exponent is exactly the identity.
    assert!(profile.is_identity());
    assert_eq!(forward(&samples, &profile).unwrap(), samples);
    assert_eq!(inverse(&samples, &profile).unwrap(), samples);
}

#[test]
fn identity_fast_path_is_a_range_clipped_cast() {
    let data: Vec<u16> = vec![0, 1, 200, 255, 256, 1000, 65535];
    let profile = QuantizationProfile {
        bit_depth: BitDepth::Eight,
        normalize: false,
        gamma: 1.0,
        sample_min: 0.0,
        sample_max: 65535.0,
        source: SampleType::U16,
    };
    let out = forward(&Samples::U16(data.clone()), &profile).unwrap();
    let expected: Vec<u8> = data.iter().map(|&v| v.min(255) as u8).collect();
    assert_eq!(out, Samples::U8(expected));
}

#[test]
fn zero_dynamic_range_skips_scaling() {
    let samples = Samples::F32(vec![42.0; 64]);
    let profile = QuantizationProfile::derive(&samples, BitDepth::Eight, QuantOptions::default());
    assert_eq!(profile.sample_min, profile.sample_max);
    assert!(profile.is_identity());

    let q = forward(&samples, &profile).unwrap();
    assert_eq!(q, Samples::U8(vec![42; 64]));
    // Inverse clamps back into the degenerate range.
    assert_eq!(inverse(&q, &profile).unwrap(), samples);
}

// ── Power-law branch ───────────────────────────────────────────────────────

#[test]
fn uint16_power_law_round_trip_within_one_step() {
    let data = u16_volume(4096, 0x5EED);
    let samples = Samples::U16(data.clone());
    let profile = QuantizationProfile::derive(&samples, BitDepth::Eight, QuantOptions::default());
    assert!(!profile.is_identity());
    assert!(!profile.normalize);

    let quantized = forward(&samples, &profile).unwrap();
    let restored = inverse(&quantized, &profile).unwrap();

    let x: Vec<f64> = data.iter().map(|&v| v as f64).collect();
    let q: Vec<f64> = match &quantized {
        Samples::U8(v) => v.iter().map(|&v| v as f64).collect(),
        _ => panic!("8-bit depth must quantize to u8"),
    };
    let y: Vec<f64> = match &restored {
        Samples::U16(v) => v.iter().map(|&v| v as f64).collect(),
        _ => panic!("inverse must restore the source type"),
    };
    assert_within_one_step(&x, &q, &y, &profile);
}

#[test]
fn power_law_maps_top_of_range_onto_max_value() {
    // Gamma compression must not clip information at the top of range.
    let samples = Samples::U16(vec![0, 1, 65535]);
    let profile = QuantizationProfile::derive(&samples, BitDepth::Eight, QuantOptions::default());
    let q = forward(&samples, &profile).unwrap();
    assert_eq!(q, Samples::U8(vec![0, 1, 255]));
}

#[test]
fn float_power_law_round_trip() {
    let data: Vec<f32> = (0..2048).map(|i| (i as f32) * 3.17).collect();
    let samples = Samples::F32(data.clone());
    let profile = QuantizationProfile::derive(&samples, BitDepth::Ten, QuantOptions::default());

    let quantized = forward(&samples, &profile).unwrap();
    let restored = inverse(&quantized, &profile).unwrap();

    let x: Vec<f64> = data.iter().map(|&v| v as f64).collect();
    let q: Vec<f64> = match &quantized {
        Samples::U16(v) => v.iter().map(|&v| v as f64).collect(),
        _ => panic!("10-bit depth must quantize to u16"),
    };
    let y: Vec<f64> = match &restored {
        Samples::F32(v) => v.iter().map(|&v| v as f64).collect(),
        _ => panic!("inverse must restore the source type"),
    };
    assert_within_one_step(&x, &q, &y, &profile);
}

// ── Normalize branch ───────────────────────────────────────────────────────

#[test]
fn normalized_uint16_round_trip_with_perceptual_beta() {
    let data = u16_volume(4096, 0xBEEF);
    let samples = Samples::U16(data.clone());
    let opts = QuantOptions {
        normalize: true,
        beta: 0.5,
    };
    let profile = QuantizationProfile::derive(&samples, BitDepth::Ten, opts);
    assert_eq!(profile.gamma, 0.5);

    let quantized = forward(&samples, &profile).unwrap();
    let restored = inverse(&quantized, &profile).unwrap();

    let x: Vec<f64> = data.iter().map(|&v| v as f64).collect();
    let q: Vec<f64> = match &quantized {
        Samples::U16(v) => v.iter().map(|&v| v as f64).collect(),
        _ => panic!("10-bit depth must quantize to u16"),
    };
    let y: Vec<f64> = match &restored {
        Samples::U16(v) => v.iter().map(|&v| v as f64).collect(),
        _ => panic!("inverse must restore the source type"),
    };
    assert_within_one_step(&x, &q, &y, &profile);
}

#[test]
fn negative_float_range_normalizes_linearly() {
    // MRI-style data with negative values.
    let data: Vec<f32> = (-1000..1000).map(|i| i as f32 * 0.73).collect();
    let samples = Samples::F32(data.clone());
    let opts = QuantOptions {
        normalize: true,
        beta: 1.0,
    };
    let profile = QuantizationProfile::derive(&samples, BitDepth::Twelve, opts);
    assert!(profile.sample_min < 0.0);

    let quantized = forward(&samples, &profile).unwrap();
    let restored = inverse(&quantized, &profile).unwrap();

    let step = (profile.sample_max - profile.sample_min) / profile.bit_depth.max_value() as f64;
    match (&samples, &restored) {
        (Samples::F32(a), Samples::F32(b)) => {
            for (&x, &y) in a.iter().zip(b) {
                assert!(
                    (x as f64 - y as f64).abs() <= step,
                    "{x} reconstructed as {y}, off by more than one step ({step})"
                );
            }
        }
        _ => panic!("inverse must restore the source type"),
    }
}

#[test]
fn codec_overshoot_is_clipped_on_inverse() {
    let profile = QuantizationProfile {
        bit_depth: BitDepth::Eight,
        normalize: true,
        gamma: 1.0,
        sample_min: 10.0,
        sample_max: 20.0,
        source: SampleType::F32,
    };
    // 255 reconstructs to sample_max; anything the codec pushed past the
    // range must clamp to the persisted bounds.
    let restored = inverse(&Samples::U8(vec![0, 255]), &profile).unwrap();
    assert_eq!(restored, Samples::F32(vec![10.0, 20.0]));
}

// ── Profile derivation and persistence ─────────────────────────────────────

#[test]
fn uint8_sources_are_forced_to_eight_bits() {
    let samples = Samples::U8(vec![1, 2, 3]);
    let profile = QuantizationProfile::derive(&samples, BitDepth::Twelve, QuantOptions::default());
    assert_eq!(profile.bit_depth, BitDepth::Eight);
}

#[test]
fn profile_round_trips_through_store_attributes() {
    let samples = Samples::U16(u16_volume(256, 1));
    let profile = QuantizationProfile::derive(&samples, BitDepth::Ten, QuantOptions::default());

    let mut store = MemoryStore::new([4, 8, 8], SampleType::U16);
    profile.persist(&mut store);

    let loaded = QuantizationProfile::load(&store).unwrap().unwrap();
    assert_eq!(loaded, profile);
}

#[test]
fn missing_profile_loads_as_none() {
    let store = MemoryStore::new([4, 8, 8], SampleType::U16);
    assert!(QuantizationProfile::load(&store).unwrap().is_none());
}

#[test]
fn unknown_persisted_sample_type_is_rejected() {
    let mut store = MemoryStore::new([4, 8, 8], SampleType::U16);
    store.set_attr(ATTR_BIT, AttrValue::U32(8));
    store.set_attr(ATTR_DATA_TYPE, AttrValue::U32(7));
    let err = QuantizationProfile::load(&store).unwrap_err();
    assert!(matches!(err, Error::UnsupportedSampleType(_)), "got: {err}");
}

#[test]
fn forward_rejects_samples_that_do_not_match_the_profile() {
    let samples = Samples::U16(vec![1, 2, 3]);
    let profile = QuantizationProfile::derive(&samples, BitDepth::Eight, QuantOptions::default());
    let err = forward(&Samples::F32(vec![1.0]), &profile).unwrap_err();
    assert!(matches!(err, Error::UnsupportedSampleType(_)), "got: {err}");
}
