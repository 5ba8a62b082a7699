use voxvid_core::{validate, FixedProbe, HardwareProbe, Vendor};

/// Probe that fails the test if it is ever consulted.
struct PanicProbe;

impl HardwareProbe for PanicProbe {
    fn count(&self, _vendor: Vendor) -> u32 {
        panic!("hardware probe must not run for this request");
    }
}

#[test]
fn explicit_cpu_request_never_probes() {
    assert_eq!(validate(&PanicProbe, "h264_nvenc", -1), -1);
    assert_eq!(validate(&PanicProbe, "av1_qsv", -5), -1);
}

#[test]
fn software_codec_passes_requested_index_through() {
    // No vendor requirement: the index is returned unchanged, no probing.
    assert_eq!(validate(&PanicProbe, "libx264", 3), 3);
    assert_eq!(validate(&PanicProbe, "libsvtav1", 0), 0);
}

#[test]
fn nvenc_without_nvidia_falls_back_to_cpu() {
    let probe = FixedProbe { nvidia: 0, intel: 0 };
    assert_eq!(validate(&probe, "h264_nvenc", 0), -1);
}

#[test]
fn nvenc_out_of_range_index_is_clamped() {
    let probe = FixedProbe { nvidia: 2, intel: 0 };
    assert_eq!(validate(&probe, "h264_nvenc", 5), 1);
}

#[test]
fn nvenc_in_range_index_is_unchanged() {
    let probe = FixedProbe { nvidia: 2, intel: 0 };
    assert_eq!(validate(&probe, "hevc_nvenc", 1), 1);
    assert_eq!(validate(&probe, "hevc_nvenc", 0), 0);
}

#[test]
fn cuvid_decoders_are_nvidia_class() {
    let probe = FixedProbe { nvidia: 0, intel: 1 };
    assert_eq!(validate(&probe, "h264_cuvid", 0), -1);
}

#[test]
fn qsv_with_intel_device_always_uses_index_zero() {
    let probe = FixedProbe { nvidia: 0, intel: 1 };
    assert_eq!(validate(&probe, "av1_qsv", 3), 0);
    assert_eq!(validate(&probe, "av1_qsv", 0), 0);
}

#[test]
fn qsv_without_intel_device_falls_back_to_cpu() {
    let probe = FixedProbe { nvidia: 4, intel: 0 };
    assert_eq!(validate(&probe, "av1_qsv", 0), -1);
}
