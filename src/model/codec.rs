//! Device codec capability probe
//!
//! Answers "can this host decode codec X?" from an inventory of installed
//! decoders. The inventory is read once and memoized for the process lifetime.

use std::collections::HashSet;
use std::sync::OnceLock;

use symphonia::core::codecs::{
    CodecType, CODEC_TYPE_AAC, CODEC_TYPE_ALAC, CODEC_TYPE_FLAC, CODEC_TYPE_MP3, CODEC_TYPE_VORBIS,
};

pub const MIMETYPE_AUDIO_EAC3_JOC: &str = "audio/eac3-joc";
pub const MIMETYPE_AUDIO_AC4: &str = "audio/ac4";

/// MIME identifiers advertised for each symphonia codec type.
/// Symphonia ships no Dolby decoders, so Atmos identifiers never appear here.
const SYMPHONIA_MIME_TYPES: &[(CodecType, &[&str])] = &[
    (CODEC_TYPE_FLAC, &["audio/flac"]),
    (CODEC_TYPE_AAC, &["audio/mp4a-latm"]),
    (CODEC_TYPE_ALAC, &["audio/alac"]),
    (CODEC_TYPE_MP3, &["audio/mpeg"]),
    (CODEC_TYPE_VORBIS, &["audio/vorbis"]),
];

/// One entry of the host's codec inventory
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecoderInfo {
    pub name: String,
    pub is_encoder: bool,
    pub supported_types: Vec<String>,
}

/// Source of installed codecs
pub trait DecoderInventory: Send + Sync {
    fn decoders(&self) -> Vec<DecoderInfo>;
}

/// Decoders registered in symphonia's default codec registry
pub struct SymphoniaInventory;

impl DecoderInventory for SymphoniaInventory {
    fn decoders(&self) -> Vec<DecoderInfo> {
        let registry = symphonia::default::get_codecs();

        SYMPHONIA_MIME_TYPES
            .iter()
            .filter_map(|(codec, mime_types)| {
                registry.get_codec(*codec).map(|descriptor| DecoderInfo {
                    name: descriptor.short_name.to_string(),
                    is_encoder: false,
                    supported_types: mime_types.iter().map(|m| m.to_string()).collect(),
                })
            })
            .collect()
    }
}

/// Fixed inventory
#[cfg(test)]
#[derive(Clone, Debug, Default)]
pub struct StaticInventory {
    entries: Vec<DecoderInfo>,
}

#[cfg(test)]
impl StaticInventory {
    pub fn new(entries: Vec<DecoderInfo>) -> Self {
        Self { entries }
    }

    /// Inventory with one decoder per given MIME identifier
    pub fn with_decoders(mime_types: &[&str]) -> Self {
        Self::new(
            mime_types
                .iter()
                .map(|mime| DecoderInfo {
                    name: format!("{mime} decoder"),
                    is_encoder: false,
                    supported_types: vec![mime.to_string()],
                })
                .collect(),
        )
    }
}

#[cfg(test)]
impl DecoderInventory for StaticInventory {
    fn decoders(&self) -> Vec<DecoderInfo> {
        self.entries.clone()
    }
}

pub struct CodecCapabilityProbe {
    inventory: Box<dyn DecoderInventory>,
    decodable: OnceLock<HashSet<String>>,
}

impl CodecCapabilityProbe {
    pub fn new(inventory: impl DecoderInventory + 'static) -> Self {
        Self {
            inventory: Box::new(inventory),
            decodable: OnceLock::new(),
        }
    }

    /// Probe backed by the symphonia codec registry
    pub fn system() -> Self {
        Self::new(SymphoniaInventory)
    }

    /// Whether any non-encoder entry advertises `codec`. Never fails.
    pub fn is_decodable(&self, codec: &str) -> bool {
        self.decodable
            .get_or_init(|| {
                let types: HashSet<String> = self
                    .inventory
                    .decoders()
                    .into_iter()
                    .filter(|info| !info.is_encoder)
                    .flat_map(|info| info.supported_types)
                    .collect();
                tracing::debug!(decodable = ?types, "Codec inventory loaded");
                types
            })
            .contains(codec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingInventory {
        calls: Arc<AtomicUsize>,
    }

    impl DecoderInventory for CountingInventory {
        fn decoders(&self) -> Vec<DecoderInfo> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            vec![DecoderInfo {
                name: "ac4".to_string(),
                is_encoder: false,
                supported_types: vec![MIMETYPE_AUDIO_AC4.to_string()],
            }]
        }
    }

    #[test]
    fn reports_advertised_decoders() {
        let probe = CodecCapabilityProbe::new(StaticInventory::with_decoders(&[MIMETYPE_AUDIO_AC4]));
        assert!(probe.is_decodable(MIMETYPE_AUDIO_AC4));
        assert!(!probe.is_decodable(MIMETYPE_AUDIO_EAC3_JOC));
    }

    #[test]
    fn ignores_encoders() {
        let probe = CodecCapabilityProbe::new(StaticInventory::new(vec![DecoderInfo {
            name: "eac3 encoder".to_string(),
            is_encoder: true,
            supported_types: vec![MIMETYPE_AUDIO_EAC3_JOC.to_string()],
        }]));
        assert!(!probe.is_decodable(MIMETYPE_AUDIO_EAC3_JOC));
    }

    #[test]
    fn inventory_is_read_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let probe = CodecCapabilityProbe::new(CountingInventory { calls: calls.clone() });

        assert!(probe.is_decodable(MIMETYPE_AUDIO_AC4));
        assert!(!probe.is_decodable("audio/flac"));
        assert!(probe.is_decodable(MIMETYPE_AUDIO_AC4));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn symphonia_inventory_knows_flac() {
        let probe = CodecCapabilityProbe::system();
        assert!(probe.is_decodable("audio/flac"));
        assert!(!probe.is_decodable(MIMETYPE_AUDIO_AC4));
        assert!(!probe.is_decodable("audio/unknown"));
    }
}
