use crate::error::{Error, Result};
use crate::hw::Vendor;

/// Preset slot value when no preset was requested.
pub const PRESET_NONE: u32 = 0;

/// Tune slot value when no tune was requested.
pub const TUNE_NONE: u32 = 0;

// ── Encoders ───────────────────────────────────────────────────────────────

/// Closed set of supported encoders. The discriminant is the stable numeric
/// id stored in the `encoder` slot of every chunk container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum Encoder {
    Mpeg4 = 0,
    Xvid = 1,
    X264 = 2,
    H264Nvenc = 3,
    X265 = 4,
    HevcNvenc = 5,
    SvtAv1 = 6,
    Rav1e = 7,
    Av1Nvenc = 8,
    Av1Qsv = 9,
}

impl Encoder {
    pub const ALL: [Encoder; 10] = [
        Encoder::Mpeg4,
        Encoder::Xvid,
        Encoder::X264,
        Encoder::H264Nvenc,
        Encoder::X265,
        Encoder::HevcNvenc,
        Encoder::SvtAv1,
        Encoder::Rav1e,
        Encoder::Av1Nvenc,
        Encoder::Av1Qsv,
    ];

    /// Codec name as passed to the codec engine.
    pub fn name(&self) -> &'static str {
        match self {
            Encoder::Mpeg4 => "mpeg4",
            Encoder::Xvid => "libxvid",
            Encoder::X264 => "libx264",
            Encoder::H264Nvenc => "h264_nvenc",
            Encoder::X265 => "libx265",
            Encoder::HevcNvenc => "hevc_nvenc",
            Encoder::SvtAv1 => "libsvtav1",
            Encoder::Rav1e => "librav1e",
            Encoder::Av1Nvenc => "av1_nvenc",
            Encoder::Av1Qsv => "av1_qsv",
        }
    }

    pub fn from_name(name: &str) -> Option<Encoder> {
        Encoder::ALL.iter().copied().find(|e| e.name() == name)
    }

    #[inline]
    pub fn id(&self) -> u32 {
        *self as u32
    }

    pub fn from_id(id: u32) -> Option<Encoder> {
        Encoder::ALL.get(id as usize).copied()
    }

    /// GPU vendor this encoder requires, if it is a hardware-class codec.
    pub fn vendor(&self) -> Option<Vendor> {
        match self {
            Encoder::H264Nvenc | Encoder::HevcNvenc | Encoder::Av1Nvenc => Some(Vendor::Nvidia),
            Encoder::Av1Qsv => Some(Vendor::Intel),
            _ => None,
        }
    }

    /// Default software decoder for payloads produced by this encoder.
    /// AV1 payloads decode through dav1d, never libaom.
    pub fn default_decoder(&self) -> Decoder {
        match self {
            Encoder::Mpeg4 | Encoder::Xvid => Decoder::Mpeg4,
            Encoder::X264 | Encoder::H264Nvenc => Decoder::H264,
            Encoder::X265 | Encoder::HevcNvenc => Decoder::Hevc,
            Encoder::SvtAv1 | Encoder::Rav1e | Encoder::Av1Nvenc | Encoder::Av1Qsv => {
                Decoder::Dav1d
            }
        }
    }

    /// Hardware-decoder counterpart, for encoders that have one.
    pub fn hardware_decoder(&self) -> Option<Decoder> {
        match self {
            Encoder::H264Nvenc => Some(Decoder::H264Cuvid),
            Encoder::HevcNvenc => Some(Decoder::HevcCuvid),
            Encoder::Av1Nvenc => Some(Decoder::Av1Cuvid),
            Encoder::Av1Qsv => Some(Decoder::Av1Qsv),
            _ => None,
        }
    }

    /// Preset vocabulary owned by this encoder, as (name, id) pairs.
    pub fn presets(&self) -> &'static [(&'static str, u32)] {
        match self {
            Encoder::Mpeg4 | Encoder::Xvid => &[],
            Encoder::X264 => X264_PRESETS,
            Encoder::H264Nvenc => H264_NVENC_PRESETS,
            Encoder::X265 => X265_PRESETS,
            Encoder::HevcNvenc => HEVC_NVENC_PRESETS,
            Encoder::SvtAv1 => SVTAV1_PRESETS,
            Encoder::Rav1e => RAV1E_PRESETS,
            Encoder::Av1Nvenc => AV1_NVENC_PRESETS,
            Encoder::Av1Qsv => AV1_QSV_PRESETS,
        }
    }

    /// Tune vocabulary owned by this encoder, as (name, id) pairs.
    pub fn tunes(&self) -> &'static [(&'static str, u32)] {
        match self {
            Encoder::Mpeg4 | Encoder::Xvid => &[],
            Encoder::X264 => X264_TUNES,
            Encoder::H264Nvenc => H264_NVENC_TUNES,
            Encoder::X265 => X265_TUNES,
            Encoder::HevcNvenc => HEVC_NVENC_TUNES,
            Encoder::SvtAv1 => SVTAV1_TUNES,
            Encoder::Rav1e => RAV1E_TUNES,
            Encoder::Av1Nvenc => AV1_NVENC_TUNES,
            Encoder::Av1Qsv => AV1_QSV_TUNES,
        }
    }

    /// Look up a preset name in this encoder's vocabulary. The error lists
    /// only this encoder's valid presets.
    pub fn resolve_preset(&self, name: &str) -> Result<u32> {
        lookup(self.presets(), name)
            .ok_or_else(|| Error::Config(invalid_choice("preset", name, self.name(), self.presets())))
    }

    /// Look up a tune name in this encoder's vocabulary. The error lists
    /// only this encoder's valid tunes.
    pub fn resolve_tune(&self, name: &str) -> Result<u32> {
        lookup(self.tunes(), name)
            .ok_or_else(|| Error::Config(invalid_choice("tune", name, self.name(), self.tunes())))
    }
}

// ── Decoders ───────────────────────────────────────────────────────────────

/// Closed set of supported decoders. The discriminant is the stable numeric
/// id stored in the `decoder` slot of every chunk container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum Decoder {
    Mpeg4 = 0,
    H264 = 1,
    H264Cuvid = 2,
    Hevc = 3,
    HevcCuvid = 4,
    AomAv1 = 5,
    Dav1d = 6,
    Av1Cuvid = 7,
    Av1Qsv = 8,
}

impl Decoder {
    pub const ALL: [Decoder; 9] = [
        Decoder::Mpeg4,
        Decoder::H264,
        Decoder::H264Cuvid,
        Decoder::Hevc,
        Decoder::HevcCuvid,
        Decoder::AomAv1,
        Decoder::Dav1d,
        Decoder::Av1Cuvid,
        Decoder::Av1Qsv,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Decoder::Mpeg4 => "mpeg4",
            Decoder::H264 => "h264",
            Decoder::H264Cuvid => "h264_cuvid",
            Decoder::Hevc => "hevc",
            Decoder::HevcCuvid => "hevc_cuvid",
            Decoder::AomAv1 => "libaom-av1",
            Decoder::Dav1d => "libdav1d",
            Decoder::Av1Cuvid => "av1_cuvid",
            Decoder::Av1Qsv => "av1_qsv",
        }
    }

    pub fn from_name(name: &str) -> Option<Decoder> {
        Decoder::ALL.iter().copied().find(|d| d.name() == name)
    }

    #[inline]
    pub fn id(&self) -> u32 {
        *self as u32
    }

    pub fn from_id(id: u32) -> Option<Decoder> {
        Decoder::ALL.get(id as usize).copied()
    }

    /// Whether this decoder runs on a vendor accelerator.
    pub fn is_hardware(&self) -> bool {
        matches!(
            self,
            Decoder::H264Cuvid | Decoder::HevcCuvid | Decoder::Av1Cuvid | Decoder::Av1Qsv
        )
    }
}

// ── Vocabulary tables ──────────────────────────────────────────────────────
// Preset and tune ids are namespaced per codec in blocks of 100 so a raw
// value in a stored container identifies its codec family on sight.

const X264_PRESETS: &[(&str, u32)] = &[
    ("ultrafast", 10),
    ("superfast", 11),
    ("veryfast", 12),
    ("faster", 13),
    ("fast", 14),
    ("medium", 15),
    ("slow", 16),
    ("slower", 17),
    ("veryslow", 18),
];

const H264_NVENC_PRESETS: &[(&str, u32)] = &[
    ("p1", 100),
    ("p2", 101),
    ("p3", 102),
    ("p4", 103),
    ("p5", 104),
    ("p6", 105),
    ("p7", 106),
];

const X265_PRESETS: &[(&str, u32)] = &[
    ("ultrafast", 200),
    ("superfast", 201),
    ("veryfast", 202),
    ("faster", 203),
    ("fast", 204),
    ("medium", 205),
    ("slow", 206),
    ("slower", 207),
    ("veryslow", 208),
];

const HEVC_NVENC_PRESETS: &[(&str, u32)] = &[
    ("p1", 300),
    ("p2", 301),
    ("p3", 302),
    ("p4", 303),
    ("p5", 304),
    ("p6", 305),
    ("p7", 306),
];

const SVTAV1_PRESETS: &[(&str, u32)] = &[
    ("0", 400),
    ("1", 401),
    ("2", 402),
    ("3", 403),
    ("4", 404),
    ("5", 405),
    ("6", 406),
    ("7", 407),
    ("8", 408),
    ("9", 409),
    ("10", 410),
    ("11", 411),
    ("12", 412),
    ("13", 413),
];

const RAV1E_PRESETS: &[(&str, u32)] = &[
    ("0", 500),
    ("1", 501),
    ("2", 502),
    ("3", 503),
    ("4", 504),
    ("5", 505),
    ("6", 506),
    ("7", 507),
    ("8", 508),
    ("9", 509),
    ("10", 510),
];

const AV1_NVENC_PRESETS: &[(&str, u32)] = &[
    ("p1", 600),
    ("p2", 601),
    ("p3", 602),
    ("p4", 603),
    ("p5", 604),
    ("p6", 605),
    ("p7", 606),
];

const AV1_QSV_PRESETS: &[(&str, u32)] = &[
    ("veryfast", 700),
    ("faster", 701),
    ("fast", 702),
    ("medium", 703),
    ("slow", 704),
    ("slower", 705),
    ("veryslow", 706),
];

const X264_TUNES: &[(&str, u32)] = &[
    ("psnr", 10),
    ("ssim", 11),
    ("grain", 12),
    ("fastdecode", 13),
    ("zerolatency", 14),
    ("animation", 15),
    ("film", 16),
    ("stillimage", 17),
];

const H264_NVENC_TUNES: &[(&str, u32)] = &[
    ("hq", 100),
    ("ll", 101),
    ("ull", 102),
    ("lossless", 103),
];

const X265_TUNES: &[(&str, u32)] = &[
    ("psnr", 200),
    ("ssim", 201),
    ("grain", 202),
    ("fastdecode", 203),
    ("zerolatency", 204),
    ("animation", 205),
];

const HEVC_NVENC_TUNES: &[(&str, u32)] = &[
    ("hq", 300),
    ("ll", 301),
    ("ull", 302),
    ("lossless", 303),
];

const SVTAV1_TUNES: &[(&str, u32)] = &[("vq", 400), ("psnr", 401), ("fastdecode", 402)];

const RAV1E_TUNES: &[(&str, u32)] = &[("psnr", 500), ("psychovisual", 501)];

const AV1_NVENC_TUNES: &[(&str, u32)] = &[
    ("hq", 600),
    ("ll", 601),
    ("ull", 602),
    ("lossless", 603),
];

const AV1_QSV_TUNES: &[(&str, u32)] = &[
    ("unknown", 700),
    ("displayremoting", 701),
    ("videoconference", 702),
    ("archive", 703),
    ("livestreaming", 704),
    ("cameracapture", 705),
    ("videosurveillance", 706),
    ("gamestreaming", 707),
    ("remotegaming", 708),
];

fn lookup(table: &[(&str, u32)], name: &str) -> Option<u32> {
    table.iter().find(|(n, _)| *n == name).map(|(_, id)| *id)
}

fn invalid_choice(kind: &str, got: &str, codec: &str, table: &[(&str, u32)]) -> String {
    if table.is_empty() {
        return format!("invalid {kind} '{got}': codec '{codec}' accepts no {kind}s");
    }
    let valid: Vec<&str> = table.iter().map(|(n, _)| *n).collect();
    format!(
        "invalid {kind} '{got}' for codec '{codec}'; valid {kind}s: {}",
        valid.join(", ")
    )
}
