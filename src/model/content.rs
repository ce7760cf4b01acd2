//! Catalog records returned by the search service

use serde::{Deserialize, Serialize};

use super::codec::CodecCapabilityProbe;
use super::filter::QualityFilter;

/// A track or album from search results
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub explicit: bool,
    #[serde(default)]
    pub cover: Option<String>,
    #[serde(default)]
    pub artists: Vec<String>,
    /// Server-reported playback modes; `None` when the server could not tell
    #[serde(default)]
    pub modes: Option<Vec<String>>,
    /// Server-reported formats; `None` when the server could not tell
    #[serde(default)]
    pub formats: Option<Vec<String>>,
}

impl SearchResult {
    pub fn artist_line(&self) -> String {
        self.artists.join(", ")
    }

    pub fn has_format(&self, format: &str) -> bool {
        self.formats
            .as_ref()
            .is_some_and(|formats| formats.iter().any(|f| f == format))
    }

    /// True iff at least one reported format maps to a filter tag this
    /// device can decode
    pub fn has_supported_format(&self, probe: &CodecCapabilityProbe) -> bool {
        self.formats.as_ref().is_some_and(|formats| {
            formats.iter().any(|format| {
                QualityFilter::from_format(format).is_some_and(|q| q.is_supported(probe))
            })
        })
    }
}

#[cfg(test)]
pub(crate) fn sample_result(id: i64, explicit: bool, formats: &[&str]) -> SearchResult {
    SearchResult {
        id,
        title: format!("Track {id}"),
        duration: "3:30".to_string(),
        explicit,
        cover: None,
        artists: vec!["Artist".to_string()],
        modes: Some(vec!["STEREO".to_string()]),
        formats: Some(formats.iter().map(|f| f.to_string()).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::codec::{StaticInventory, MIMETYPE_AUDIO_AC4};

    #[test]
    fn decodes_service_record() {
        let json = r#"{
            "id": 77,
            "title": "Song",
            "duration": "4:01",
            "explicit": true,
            "cover": null,
            "artists": ["A", "B"],
            "modes": ["STEREO"],
            "formats": ["LOSSLESS"]
        }"#;
        let result: SearchResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.id, 77);
        assert_eq!(result.artist_line(), "A, B");
        assert!(result.has_format("LOSSLESS"));
    }

    #[test]
    fn missing_capabilities_decode_as_none() {
        let result: SearchResult = serde_json::from_str(r#"{"id": 1, "title": "x"}"#).unwrap();
        assert_eq!(result.modes, None);
        assert_eq!(result.formats, None);
    }

    #[test]
    fn supported_format_depends_on_device() {
        let bare = CodecCapabilityProbe::new(StaticInventory::default());
        let ac4 = CodecCapabilityProbe::new(StaticInventory::with_decoders(&[MIMETYPE_AUDIO_AC4]));

        let atmos_only = sample_result(1, false, &["DOLBY_ATMOS"]);
        assert!(!atmos_only.has_supported_format(&bare));
        assert!(atmos_only.has_supported_format(&ac4));

        let lossless = sample_result(2, false, &["LOSSLESS"]);
        assert!(lossless.has_supported_format(&bare));

        let unknown = sample_result(3, false, &["MQA"]);
        assert!(!unknown.has_supported_format(&ac4));

        let mut no_formats = sample_result(4, false, &[]);
        no_formats.formats = None;
        assert!(!no_formats.has_supported_format(&ac4));
    }
}
