//! Quality picker state for a single track

use super::codec::CodecCapabilityProbe;
use super::quality::{resolve_quality_tiers, QualityTier};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DownloadOptions {
    input: Option<(Option<Vec<String>>, Option<Vec<String>>)>,
    options: Vec<QualityTier>,
    show_unsupported_formats: bool,
    notified_no_viable: bool,
}

impl DownloadOptions {
    pub fn new(show_unsupported_formats: bool) -> Self {
        Self {
            show_unsupported_formats,
            ..Self::default()
        }
    }

    /// Resolves tiers for a new `(modes, formats)` pair. Repeating the
    /// current pair changes nothing.
    pub fn update(&mut self, modes: Option<&[String]>, formats: Option<&[String]>) {
        let input = (modes.map(<[String]>::to_vec), formats.map(<[String]>::to_vec));
        if self.input.as_ref() == Some(&input) {
            return;
        }

        self.options = resolve_quality_tiers(modes, formats);
        self.input = Some(input);
        self.notified_no_viable = false;
    }

    pub fn set_show_unsupported_formats(&mut self, show: bool) {
        self.show_unsupported_formats = show;
    }

    /// Every tier the track is eligible for
    pub fn options(&self) -> &[QualityTier] {
        &self.options
    }

    /// Tiers the user may pick on this device
    pub fn visible(&self, probe: &CodecCapabilityProbe) -> Vec<QualityTier> {
        self.options
            .iter()
            .filter(|tier| self.show_unsupported_formats || tier.is_supported(probe))
            .copied()
            .collect()
    }

    /// True once per input when the track has tiers but none survive the
    /// visibility filter
    pub fn take_no_viable_notice(&mut self, probe: &CodecCapabilityProbe) -> bool {
        if self.notified_no_viable || self.options.is_empty() || !self.visible(probe).is_empty() {
            return false;
        }
        self.notified_no_viable = true;
        true
    }
}
