use voxvid_core::{resolve, CodecRequest, Error, FixedProbe, ParameterSet, Strictness};

fn request(codec: &str) -> CodecRequest {
    CodecRequest {
        codec: codec.to_string(),
        ..CodecRequest::default()
    }
}

fn no_gpus() -> FixedProbe {
    FixedProbe { nvidia: 0, intel: 0 }
}

#[test]
fn unknown_codec_lists_every_known_codec() {
    let err = resolve(&request("libx266"), &no_gpus(), Strictness::Strict).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
    let msg = err.to_string();
    for name in [
        "mpeg4",
        "libxvid",
        "libx264",
        "h264_nvenc",
        "libx265",
        "hevc_nvenc",
        "libsvtav1",
        "librav1e",
        "av1_nvenc",
        "av1_qsv",
    ] {
        assert!(msg.contains(name), "missing codec {name} in: {msg}");
    }
}

#[test]
fn bogus_preset_lists_exactly_that_codecs_presets() {
    let mut req = request("libx264");
    req.preset = Some("bogus".to_string());
    let err = resolve(&req, &no_gpus(), Strictness::Strict).unwrap_err();
    assert!(matches!(err, Error::Config(_)));

    let msg = err.to_string();
    let x264 = [
        "ultrafast",
        "superfast",
        "veryfast",
        "faster",
        "fast",
        "medium",
        "slow",
        "slower",
        "veryslow",
    ];
    for name in x264 {
        assert!(msg.contains(name), "missing preset {name} in: {msg}");
    }
    // Nothing from other codecs' vocabularies leaks in.
    assert!(!msg.contains("p1"), "nvenc presets leaked into: {msg}");
    let listed = msg.split_once("valid presets:").unwrap().1;
    assert_eq!(listed.split(',').count(), x264.len());
}

#[test]
fn bogus_tune_lists_exactly_that_codecs_tunes() {
    let mut req = request("libsvtav1");
    req.tune = Some("film".to_string()); // valid for x264, not svtav1
    let err = resolve(&req, &no_gpus(), Strictness::Strict).unwrap_err();
    let msg = err.to_string();
    for name in ["vq", "psnr", "fastdecode"] {
        assert!(msg.contains(name), "missing tune {name} in: {msg}");
    }
    assert!(!msg.contains("stillimage"), "x264 tunes leaked into: {msg}");
}

#[test]
fn codec_without_presets_rejects_any_preset() {
    let mut req = request("mpeg4");
    req.preset = Some("fast".to_string());
    let err = resolve(&req, &no_gpus(), Strictness::Strict).unwrap_err();
    assert!(err.to_string().contains("accepts no presets"));
}

#[test]
fn unknown_decoder_lists_decoder_table() {
    let mut req = request("libx264");
    req.decoder = Some("h263".to_string());
    let err = resolve(&req, &no_gpus(), Strictness::Strict).unwrap_err();
    let msg = err.to_string();
    for name in ["h264", "h264_cuvid", "hevc", "libdav1d", "av1_qsv"] {
        assert!(msg.contains(name), "missing decoder {name} in: {msg}");
    }
}

#[test]
fn end_to_end_example_parameter_set() {
    let req = CodecRequest {
        codec: "libx264".to_string(),
        preset: Some("medium".to_string()),
        quality: 23,
        gpu: 0,
        width: 256,
        height: 256,
        depth: 100,
        ..CodecRequest::default()
    };
    let params = resolve(&req, &no_gpus(), Strictness::Strict).unwrap();
    assert_eq!(
        params,
        ParameterSet {
            encoder: 2,  // libx264
            decoder: 1,  // h264
            width: 256,
            height: 256,
            depth: 100,
            bit_mode: 0, // 8-bit
            preset: 15,  // x264 medium
            tune: 0,
            quality: 23,
            grain: 0,
            gpu: 0,
        }
    );
}

#[test]
fn zero_dimensions_pass_through_unmodified() {
    let params = resolve(&request("libx265"), &no_gpus(), Strictness::Strict).unwrap();
    assert_eq!((params.width, params.height, params.depth), (0, 0, 0));
}

#[test]
fn explicit_decoder_override_wins() {
    let mut req = request("libx264");
    req.decoder = Some("hevc".to_string());
    let params = resolve(&req, &no_gpus(), Strictness::Strict).unwrap();
    assert_eq!(params.decoder, 3);
}

#[test]
fn gpu_encoder_selects_hardware_decoder() {
    let mut req = request("h264_nvenc");
    req.gpu = 0;
    let probe = FixedProbe { nvidia: 1, intel: 0 };
    let params = resolve(&req, &probe, Strictness::Strict).unwrap();
    assert_eq!(params.decoder, 2); // h264_cuvid
    assert_eq!(params.gpu, 0);
}

#[test]
fn resolver_clamps_gpu_index_to_inventory() {
    let mut req = request("hevc_nvenc");
    req.gpu = 5;
    let probe = FixedProbe { nvidia: 2, intel: 0 };
    let params = resolve(&req, &probe, Strictness::Strict).unwrap();
    assert_eq!(params.gpu, 1);
    assert_eq!(params.decoder, 4); // hevc_cuvid
}

#[test]
fn cpu_request_selects_software_decoder() {
    let mut req = request("h264_nvenc");
    req.gpu = -1;
    let params = resolve(&req, &no_gpus(), Strictness::Strict).unwrap();
    assert_eq!(params.decoder, 1); // h264, not cuvid
    assert_eq!(params.gpu, 0);
}

#[test]
fn qsv_encoder_lands_on_device_zero() {
    let mut req = request("av1_qsv");
    req.gpu = 2;
    let probe = FixedProbe { nvidia: 0, intel: 1 };
    let params = resolve(&req, &probe, Strictness::Strict).unwrap();
    assert_eq!(params.decoder, 8); // av1_qsv decodes its own payloads
    assert_eq!(params.gpu, 0);
}

#[test]
fn strict_policy_fails_on_missing_hardware() {
    let mut req = request("h264_nvenc");
    req.gpu = 0;
    let err = resolve(&req, &no_gpus(), Strictness::Strict).unwrap_err();
    assert!(matches!(err, Error::HardwareUnavailable(_)), "got: {err}");
}

#[test]
fn lenient_policy_continues_with_software_decoder() {
    let mut req = request("h264_nvenc");
    req.gpu = 0;
    let params = resolve(&req, &no_gpus(), Strictness::Lenient).unwrap();
    assert_eq!(params.decoder, 1); // h264
    assert_eq!(params.gpu, 0);
    assert_eq!(params.encoder, 3); // request itself is preserved
}

#[test]
fn config_errors_surface_before_hardware_is_probed() {
    use voxvid_core::{HardwareProbe, Vendor};

    struct PanicProbe;
    impl HardwareProbe for PanicProbe {
        fn count(&self, _vendor: Vendor) -> u32 {
            panic!("probing must not happen when table lookup fails");
        }
    }

    let mut req = request("h264_nvenc");
    req.gpu = 0;
    req.preset = Some("bogus".to_string());
    let err = resolve(&req, &PanicProbe, Strictness::Strict).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}
