//! Quality tiers and per-track quality resolution
//!
//! The catalog is a fixed table in display order. `resolve_quality_tiers`
//! decides which tiers a track is eligible for from its server-reported
//! modes and formats. Device capability is not considered here; the download
//! options view applies it afterwards.

use serde::{Deserialize, Serialize};

use super::codec::{CodecCapabilityProbe, MIMETYPE_AUDIO_AC4, MIMETYPE_AUDIO_EAC3_JOC};

pub const MODE_DOLBY_ATMOS: &str = "DOLBY_ATMOS";
pub const MODE_STEREO: &str = "STEREO";
pub const FORMAT_DOLBY_ATMOS: &str = "DOLBY_ATMOS";
pub const FORMAT_HIRES_LOSSLESS: &str = "HIRES_LOSSLESS";
pub const FORMAT_LOSSLESS: &str = "LOSSLESS";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QualityKey {
    HiRes,
    Lossless,
    Aac320,
    Aac96,
    DolbyAtmosAc3,
    DolbyAtmosAc4,
}

/// One selectable audio quality/codec option
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QualityTier {
    pub key: QualityKey,
    pub label: &'static str,
    pub short_label: &'static str,
    pub summary: &'static str,
    /// Quality name sent with a download request
    pub quality: &'static str,
    /// Decoder the tier needs; `None` for stereo codecs every host can play
    pub codec: Option<&'static str>,
    /// Newer codec variant of a tier that shares its nominal quality
    pub alternate_codec: bool,
}

pub const HI_RES: QualityTier = QualityTier {
    key: QualityKey::HiRes,
    label: "Hi-Res Lossless",
    short_label: "Hi-Res",
    summary: "Up to 24-bit/192 kHz FLAC",
    quality: "HI_RES_LOSSLESS",
    codec: None,
    alternate_codec: false,
};

pub const LOSSLESS: QualityTier = QualityTier {
    key: QualityKey::Lossless,
    label: "Lossless",
    short_label: "CD",
    summary: "16-bit/44.1 kHz FLAC",
    quality: "LOSSLESS",
    codec: None,
    alternate_codec: false,
};

pub const AAC_320: QualityTier = QualityTier {
    key: QualityKey::Aac320,
    label: "AAC 320 kbps",
    short_label: "320",
    summary: "High quality AAC, smaller files",
    quality: "HIGH",
    codec: None,
    alternate_codec: false,
};

pub const AAC_96: QualityTier = QualityTier {
    key: QualityKey::Aac96,
    label: "AAC 96 kbps",
    short_label: "96",
    summary: "Low bitrate AAC for saving space",
    quality: "LOW",
    codec: None,
    alternate_codec: false,
};

pub const DOLBY_ATMOS_AC3: QualityTier = QualityTier {
    key: QualityKey::DolbyAtmosAc3,
    label: "Dolby Atmos (E-AC-3)",
    short_label: "Atmos AC-3",
    summary: "Immersive audio in E-AC-3 JOC, widest device support",
    quality: "DOLBY_ATMOS",
    codec: Some(MIMETYPE_AUDIO_EAC3_JOC),
    alternate_codec: false,
};

pub const DOLBY_ATMOS_AC4: QualityTier = QualityTier {
    key: QualityKey::DolbyAtmosAc4,
    label: "Dolby Atmos (AC-4)",
    short_label: "Atmos AC-4",
    summary: "Immersive audio in AC-4, needs a recent decoder",
    quality: "DOLBY_ATMOS",
    codec: Some(MIMETYPE_AUDIO_AC4),
    alternate_codec: true,
};

pub const QUALITY_CATALOG: [QualityTier; 6] = [
    HI_RES,
    LOSSLESS,
    AAC_320,
    AAC_96,
    DOLBY_ATMOS_AC3,
    DOLBY_ATMOS_AC4,
];

impl QualityTier {
    pub fn lookup(key: QualityKey) -> &'static QualityTier {
        match key {
            QualityKey::HiRes => &HI_RES,
            QualityKey::Lossless => &LOSSLESS,
            QualityKey::Aac320 => &AAC_320,
            QualityKey::Aac96 => &AAC_96,
            QualityKey::DolbyAtmosAc3 => &DOLBY_ATMOS_AC3,
            QualityKey::DolbyAtmosAc4 => &DOLBY_ATMOS_AC4,
        }
    }

    pub fn is_supported(&self, probe: &CodecCapabilityProbe) -> bool {
        self.codec.is_none_or(|codec| probe.is_decodable(codec))
    }
}

fn contains(tags: &[String], tag: &str) -> bool {
    tags.iter().any(|t| t == tag)
}

/// Ordered list of tiers a track may be downloaded in.
///
/// Atmos takes precedence over the stereo lossy/lossless tiers: a track with
/// Atmos never lists Lossless or AAC, though Hi-Res can still appear.
pub fn resolve_quality_tiers(
    modes: Option<&[String]>,
    formats: Option<&[String]>,
) -> Vec<QualityTier> {
    let (Some(modes), Some(formats)) = (modes, formats) else {
        return Vec::new();
    };
    if modes.is_empty() || formats.is_empty() {
        return Vec::new();
    }

    let has_dolby_atmos =
        contains(modes, MODE_DOLBY_ATMOS) && contains(formats, FORMAT_DOLBY_ATMOS);
    let has_stereo = contains(modes, MODE_STEREO);

    let mut keys = Vec::new();

    if has_dolby_atmos {
        keys.push(QualityKey::DolbyAtmosAc3);
        keys.push(QualityKey::DolbyAtmosAc4);
    }

    if has_stereo && contains(formats, FORMAT_HIRES_LOSSLESS) {
        keys.push(QualityKey::HiRes);
    }

    if has_stereo && !has_dolby_atmos {
        if contains(formats, FORMAT_LOSSLESS) {
            keys.push(QualityKey::Lossless);
        }
        keys.push(QualityKey::Aac320);
        keys.push(QualityKey::Aac96);
    }

    keys.into_iter().map(|key| *QualityTier::lookup(key)).collect()
}
