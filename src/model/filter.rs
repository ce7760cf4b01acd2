//! Search result filtering by quality tag and content rating

use std::collections::BTreeSet;

use super::codec::{CodecCapabilityProbe, MIMETYPE_AUDIO_AC4, MIMETYPE_AUDIO_EAC3_JOC};
use super::content::SearchResult;
use super::quality::{FORMAT_DOLBY_ATMOS, FORMAT_HIRES_LOSSLESS, FORMAT_LOSSLESS};

/// Quality tag offered as a search filter
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum QualityFilter {
    HiRes,
    Lossless,
    Atmos,
}

impl QualityFilter {
    pub const ALL: [QualityFilter; 3] = [Self::HiRes, Self::Lossless, Self::Atmos];

    pub fn label(self) -> &'static str {
        match self {
            Self::HiRes => "Hi-Res",
            Self::Lossless => "Lossless",
            Self::Atmos => "Dolby Atmos",
        }
    }

    /// Format tag the server reports for this quality
    pub fn format(self) -> &'static str {
        match self {
            Self::HiRes => FORMAT_HIRES_LOSSLESS,
            Self::Lossless => FORMAT_LOSSLESS,
            Self::Atmos => FORMAT_DOLBY_ATMOS,
        }
    }

    pub fn from_format(format: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|q| q.format() == format)
    }

    /// Atmos needs either Dolby decoder; stereo qualities play anywhere
    pub fn is_supported(self, probe: &CodecCapabilityProbe) -> bool {
        match self {
            Self::HiRes | Self::Lossless => true,
            Self::Atmos => {
                probe.is_decodable(MIMETYPE_AUDIO_EAC3_JOC) || probe.is_decodable(MIMETYPE_AUDIO_AC4)
            }
        }
    }

    /// Tags offered to the user under the given reveal-unsupported preference
    pub fn offered(reveal_unsupported: bool, probe: &CodecCapabilityProbe) -> Vec<Self> {
        Self::ALL
            .into_iter()
            .filter(|q| reveal_unsupported || q.is_supported(probe))
            .collect()
    }
}

/// Content rating filter
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ContentFilter {
    Clean,
    Explicit,
}

impl ContentFilter {
    pub const ALL: [ContentFilter; 2] = [Self::Clean, Self::Explicit];

    pub fn label(self) -> &'static str {
        match self {
            Self::Clean => "Clean",
            Self::Explicit => "Explicit",
        }
    }

    pub fn explicit(self) -> bool {
        matches!(self, Self::Explicit)
    }
}

/// Active filter tags. Immutable: every change produces a new value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchFilter {
    pub qualities: BTreeSet<QualityFilter>,
    pub content_filters: BTreeSet<ContentFilter>,
}

impl SearchFilter {
    pub fn with_quality(&self, quality: QualityFilter) -> Self {
        let mut next = self.clone();
        next.qualities.insert(quality);
        next
    }

    pub fn without_quality(&self, quality: QualityFilter) -> Self {
        let mut next = self.clone();
        next.qualities.remove(&quality);
        next
    }

    pub fn with_content(&self, filter: ContentFilter) -> Self {
        let mut next = self.clone();
        next.content_filters.insert(filter);
        next
    }

    pub fn without_content(&self, filter: ContentFilter) -> Self {
        let mut next = self.clone();
        next.content_filters.remove(&filter);
        next
    }

    /// Drops quality tags whose tier this device cannot decode
    pub fn retain_supported(&self, probe: &CodecCapabilityProbe) -> Self {
        let mut next = self.clone();
        next.qualities.retain(|q| q.is_supported(probe));
        next
    }

    pub fn is_empty(&self) -> bool {
        self.qualities.is_empty() && self.content_filters.is_empty()
    }

    pub fn matches(&self, result: &SearchResult) -> bool {
        let quality_match =
            self.qualities.is_empty() || self.qualities.iter().any(|q| result.has_format(q.format()));
        let content_match = self.content_filters.is_empty()
            || self
                .content_filters
                .iter()
                .any(|c| c.explicit() == result.explicit);

        quality_match && content_match
    }
}

/// One row of the Filters pane: offered quality tags, then content tags
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterChip {
    Quality(QualityFilter),
    Content(ContentFilter),
}

impl FilterChip {
    pub fn chips(available_qualities: &[QualityFilter]) -> Vec<Self> {
        available_qualities
            .iter()
            .copied()
            .map(Self::Quality)
            .chain(ContentFilter::ALL.into_iter().map(Self::Content))
            .collect()
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Quality(q) => q.label(),
            Self::Content(c) => c.label(),
        }
    }

    pub fn is_active(self, filter: &SearchFilter) -> bool {
        match self {
            Self::Quality(q) => filter.qualities.contains(&q),
            Self::Content(c) => filter.content_filters.contains(&c),
        }
    }
}

/// Subset of `results` matching every active clause, in input order.
///
/// The reveal-unsupported preference only shapes which tags can be active;
/// once a tag is active it matches the same way regardless.
pub fn filter_results(
    results: &[SearchResult],
    filter: &SearchFilter,
    _reveal_unsupported: bool,
) -> Vec<SearchResult> {
    results
        .iter()
        .filter(|result| filter.matches(result))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::codec::StaticInventory;
    use crate::model::content::sample_result;
    use pretty_assertions::assert_eq;

    fn ids(results: &[SearchResult]) -> Vec<i64> {
        results.iter().map(|r| r.id).collect()
    }

    fn sample_results() -> Vec<SearchResult> {
        vec![
            sample_result(1, true, &["LOSSLESS"]),
            sample_result(2, false, &["LOSSLESS", "HIRES_LOSSLESS"]),
            sample_result(3, false, &["DOLBY_ATMOS"]),
            sample_result(4, true, &[]),
        ]
    }

    #[test]
    fn empty_filter_keeps_everything_in_order() {
        let results = sample_results();
        let filtered = filter_results(&results, &SearchFilter::default(), false);
        assert_eq!(ids(&filtered), vec![1, 2, 3, 4]);
    }

    #[test]
    fn quality_tags_are_or_ed() {
        let filter = SearchFilter::default()
            .with_quality(QualityFilter::HiRes)
            .with_quality(QualityFilter::Atmos);
        assert_eq!(ids(&filter_results(&sample_results(), &filter, false)), vec![2, 3]);
    }

    #[test]
    fn clauses_are_and_ed() {
        let result = vec![sample_result(9, true, &["LOSSLESS"])];

        let explicit = SearchFilter::default()
            .with_quality(QualityFilter::Lossless)
            .with_content(ContentFilter::Explicit);
        assert_eq!(ids(&filter_results(&result, &explicit, false)), vec![9]);

        let clean = SearchFilter::default()
            .with_quality(QualityFilter::Lossless)
            .with_content(ContentFilter::Clean);
        assert!(filter_results(&result, &clean, false).is_empty());
    }

    #[test]
    fn both_content_tags_match_everything() {
        let filter = SearchFilter::default()
            .with_content(ContentFilter::Clean)
            .with_content(ContentFilter::Explicit);
        assert_eq!(ids(&filter_results(&sample_results(), &filter, true)), vec![1, 2, 3, 4]);
    }

    #[test]
    fn missing_formats_never_match_a_quality_tag() {
        let mut result = sample_result(5, false, &[]);
        result.formats = None;
        let filter = SearchFilter::default().with_quality(QualityFilter::Lossless);
        assert!(filter_results(&[result], &filter, false).is_empty());
    }

    #[test]
    fn filtering_is_idempotent() {
        let results = sample_results();
        let filter = SearchFilter::default()
            .with_quality(QualityFilter::Lossless)
            .with_content(ContentFilter::Clean);
        let once = filter_results(&results, &filter, false);
        let twice = filter_results(&once, &filter, false);
        assert_eq!(once, twice);
    }

    #[test]
    fn filter_values_have_set_semantics() {
        let filter = SearchFilter::default()
            .with_quality(QualityFilter::Lossless)
            .with_quality(QualityFilter::Lossless);
        assert_eq!(filter.qualities.len(), 1);

        let removed = filter.without_quality(QualityFilter::Lossless);
        assert!(removed.is_empty());
        assert_eq!(filter.qualities.len(), 1);
    }

    #[test]
    fn offered_tags_follow_preference() {
        let probe = CodecCapabilityProbe::new(StaticInventory::default());
        assert_eq!(
            QualityFilter::offered(false, &probe),
            vec![QualityFilter::HiRes, QualityFilter::Lossless]
        );
        assert_eq!(QualityFilter::offered(true, &probe), QualityFilter::ALL.to_vec());
    }

    #[test]
    fn chips_list_offered_qualities_then_content() {
        let chips = FilterChip::chips(&[QualityFilter::Lossless]);
        assert_eq!(
            chips,
            vec![
                FilterChip::Quality(QualityFilter::Lossless),
                FilterChip::Content(ContentFilter::Clean),
                FilterChip::Content(ContentFilter::Explicit),
            ]
        );

        let filter = SearchFilter::default().with_content(ContentFilter::Clean);
        assert!(chips[1].is_active(&filter));
        assert!(!chips[0].is_active(&filter));
    }

    #[test]
    fn retain_supported_prunes_atmos() {
        let probe = CodecCapabilityProbe::new(StaticInventory::default());
        let filter = SearchFilter::default()
            .with_quality(QualityFilter::Atmos)
            .with_quality(QualityFilter::Lossless)
            .with_content(ContentFilter::Clean);
        let pruned = filter.retain_supported(&probe);
        assert_eq!(pruned.qualities.into_iter().collect::<Vec<_>>(), vec![QualityFilter::Lossless]);
        assert_eq!(pruned.content_filters.len(), 1);
    }
}
