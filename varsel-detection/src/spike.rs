//! ## varsel-detection::spike
//! **Sliding-window spike detection over social text**
//!
//! No single text mention crosses a threshold on its own; a burst of
//! topically-similar mentions inside a trailing window does. Keyword buckets
//! are ordered data, not control flow, so rule sets are testable in isolation
//! and swappable per deployment.
//!
//! Matching is literal substring containment (multi-word phrases included)
//! over lowercased text, via one Aho-Corasick automaton per bucket.

use std::collections::VecDeque;

use aho_corasick::AhoCorasick;
use tracing::debug;

use varsel_config::SpikeConfig;
use varsel_core::alert::AlertCategory;
use varsel_core::events::GeoPoint;

use crate::error::DetectionError;

/// One topical bucket: the keywords that count an entry toward it, and the
/// primary keywords used to pick a coordinate source on trigger.
pub struct KeywordRule {
    topic: String,
    category: AlertCategory,
    reason: String,
    keywords: AhoCorasick,
    primary: AhoCorasick,
}

impl KeywordRule {
    pub fn new(
        topic: impl Into<String>,
        category: AlertCategory,
        reason: impl Into<String>,
        keywords: &[&str],
        primary: &[&str],
    ) -> Result<Self, DetectionError> {
        Ok(Self {
            topic: topic.into(),
            category,
            reason: reason.into(),
            keywords: build_matcher(keywords)?,
            primary: build_matcher(primary)?,
        })
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }
}

fn build_matcher(patterns: &[&str]) -> Result<AhoCorasick, DetectionError> {
    AhoCorasick::new(patterns).map_err(|e| DetectionError::PatternError(e.to_string()))
}

/// The default bucket set, in matching order. An entry counts toward the
/// first bucket it matches, so order is part of the contract: a text
/// containing both "quake" and "fire" counts as earthquake.
pub fn default_rules() -> Result<Vec<KeywordRule>, DetectionError> {
    Ok(vec![
        KeywordRule::new(
            "earthquake",
            AlertCategory::Earthquake,
            "earthquake reports spike",
            &["earthquake", "quake", "tremor"],
            &["earthquake"],
        )?,
        KeywordRule::new(
            "flood",
            AlertCategory::Flood,
            "flood reports spike",
            &["flood", "water", "river overflow", "submerge"],
            &["flood"],
        )?,
        KeywordRule::new(
            "fire",
            AlertCategory::Fire,
            "fire reports spike",
            &["fire", "smoke", "burning"],
            &["fire", "smoke"],
        )?,
        // Collapse mentions surface under the report category.
        KeywordRule::new(
            "collapse",
            AlertCategory::Report,
            "building collapse reports spike",
            &["collapsed", "collapse", "building down", "trapped", "help"],
            &["collapsed"],
        )?,
    ])
}

struct WindowEntry {
    ts_ms: u64,
    text: String,
    coords: Option<GeoPoint>,
}

/// A triggered spike: what to alert on and where the burst was last seen.
#[derive(Debug)]
pub struct SpikeHit {
    pub category: AlertCategory,
    pub reason: String,
    /// Coordinates of the most recent window entry matching the winning
    /// bucket's primary keywords, if any entry had them.
    pub coords: Option<GeoPoint>,
}

/// Time-bounded buffer of recent text observations.
///
/// The window is owned exclusively by the detector and only ever grows or
/// shrinks on text ingestion; no other event kind touches it.
pub struct SpikeDetector {
    window: VecDeque<WindowEntry>,
    rules: Vec<KeywordRule>,
    window_ms: u64,
    min_count: usize,
}

impl SpikeDetector {
    pub fn new(config: &SpikeConfig) -> Result<Self, DetectionError> {
        Ok(Self::with_rules(config, default_rules()?))
    }

    pub fn with_rules(config: &SpikeConfig, rules: Vec<KeywordRule>) -> Self {
        Self {
            window: VecDeque::new(),
            rules,
            window_ms: config.window_ms,
            min_count: config.min_count,
        }
    }

    /// Ingests one text observation and reports a spike if the window now
    /// holds `min_count` entries for some bucket.
    ///
    /// `ts_ms` is the event's timestamp; `now_ms` is processing time. Aging
    /// uses `now_ms` so back-dated events cannot purge entries relative to
    /// anything but the actual clock.
    ///
    /// On trigger the entire window is cleared: a sustained burst emits one
    /// alert per window-refill, not one per event past the threshold.
    pub fn observe(
        &mut self,
        ts_ms: u64,
        now_ms: u64,
        text: &str,
        coords: Option<GeoPoint>,
    ) -> Option<SpikeHit> {
        self.window.push_back(WindowEntry {
            ts_ms,
            text: text.to_lowercase(),
            coords,
        });

        let cutoff = now_ms.saturating_sub(self.window_ms);
        self.window.retain(|entry| entry.ts_ms >= cutoff);

        // First-match-wins: each entry counts toward at most one bucket,
        // tested in declaration order.
        let mut counts = vec![0usize; self.rules.len()];
        for entry in &self.window {
            if let Some(idx) = self
                .rules
                .iter()
                .position(|rule| rule.keywords.is_match(entry.text.as_str()))
            {
                counts[idx] += 1;
            }
        }

        let (idx, count) = scan_top(&counts)?;
        if count < self.min_count {
            return None;
        }

        let rule = &self.rules[idx];
        let coords = self
            .window
            .iter()
            .rev()
            .find(|entry| rule.primary.is_match(entry.text.as_str()))
            .and_then(|entry| entry.coords);

        debug!(topic = rule.topic(), count, "keyword spike threshold crossed");

        let hit = SpikeHit {
            category: rule.category.clone(),
            reason: rule.reason.clone(),
            coords,
        };
        self.window.clear();
        Some(hit)
    }

    pub fn window_len(&self) -> usize {
        self.window.len()
    }
}

/// Max-scan over bucket counts. Strict > comparison: on a tie, the earliest
/// bucket in declaration order is retained.
fn scan_top(counts: &[usize]) -> Option<(usize, usize)> {
    let mut top: Option<(usize, usize)> = None;
    for (idx, &count) in counts.iter().enumerate() {
        if count > top.map_or(0, |(_, best)| best) {
            top = Some((idx, count));
        }
    }
    top
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: u64 = 1_700_000_000_000;

    fn detector() -> SpikeDetector {
        SpikeDetector::new(&SpikeConfig::default()).unwrap()
    }

    #[test]
    fn five_matching_texts_trigger_once() {
        let mut spike = detector();
        for i in 0..4 {
            assert!(spike
                .observe(NOW + i, NOW + i, "earthquake downtown", None)
                .is_none());
        }
        let hit = spike
            .observe(NOW + 4, NOW + 4, "another earthquake felt", None)
            .expect("fifth matching text should trigger");
        assert_eq!(hit.category, AlertCategory::Earthquake);
        assert_eq!(hit.reason, "earthquake reports spike");
        assert_eq!(spike.window_len(), 0, "window clears on trigger");
    }

    #[test]
    fn sixth_text_does_not_retrigger_after_clear() {
        let mut spike = detector();
        for i in 0..5 {
            spike.observe(NOW + i, NOW + i, "tremor reported", None);
        }
        assert!(spike.observe(NOW + 5, NOW + 5, "tremor again", None).is_none());
        assert_eq!(spike.window_len(), 1);
    }

    #[test]
    fn matching_is_case_insensitive_substring() {
        let mut spike = detector();
        for i in 0..4 {
            spike.observe(NOW + i, NOW + i, "FLOOD warning issued", None);
        }
        let hit = spike
            .observe(NOW + 4, NOW + 4, "the river overflow is here", None)
            .expect("phrase keyword should also count");
        assert_eq!(hit.category, AlertCategory::Flood);
    }

    #[test]
    fn entry_counts_toward_first_bucket_only() {
        // "water" (flood bucket) + "fire": flood is declared after
        // earthquake but before fire, so each text counts as flood.
        let mut spike = detector();
        for i in 0..4 {
            spike.observe(NOW + i, NOW + i, "water and fire everywhere", None);
        }
        let hit = spike
            .observe(NOW + 4, NOW + 4, "water and fire everywhere", None)
            .expect("five entries in one bucket");
        assert_eq!(hit.category, AlertCategory::Flood);
    }

    #[test]
    fn max_scan_tie_keeps_earliest_bucket() {
        assert_eq!(scan_top(&[2, 2, 0, 0]), Some((0, 2)));
        assert_eq!(scan_top(&[1, 3, 3, 0]), Some((1, 3)));
        assert_eq!(scan_top(&[0, 0, 0, 0]), None);
        assert_eq!(scan_top(&[0, 0, 1, 4]), Some((3, 4)));
    }

    #[test]
    fn collapse_spike_surfaces_as_report() {
        let mut spike = detector();
        for i in 0..4 {
            spike.observe(NOW + i, NOW + i, "building down near the market", None);
        }
        let hit = spike
            .observe(NOW + 4, NOW + 4, "people trapped, send help", None)
            .expect("collapse bucket should trigger");
        assert_eq!(hit.category, AlertCategory::Report);
        assert_eq!(hit.reason, "building collapse reports spike");
    }

    #[test]
    fn stale_entries_age_out_of_counts() {
        let mut spike = detector();
        for i in 0..4 {
            spike.observe(NOW + i, NOW + i, "earthquake", None);
        }
        // 11 seconds later the first four are outside the window.
        let later = NOW + 11_000;
        assert!(spike.observe(later, later, "earthquake", None).is_none());
        assert_eq!(spike.window_len(), 1);
    }

    #[test]
    fn back_dated_entry_ages_against_processing_time() {
        let mut spike = detector();
        // Event stamped 20s in the past is immediately outside the window
        // relative to the processing clock.
        spike.observe(NOW - 20_000, NOW, "earthquake", None);
        assert_eq!(spike.window_len(), 0);
    }

    #[test]
    fn coords_come_from_most_recent_primary_match() {
        let mut spike = detector();
        let early = GeoPoint::new(10.0, 10.0);
        let late = GeoPoint::new(20.0, 20.0);
        spike.observe(NOW, NOW, "earthquake here", Some(early));
        spike.observe(NOW + 1, NOW + 1, "earthquake again", Some(late));
        // "quake" counts for the bucket but is not a primary keyword.
        spike.observe(NOW + 2, NOW + 2, "big quake", None);
        spike.observe(NOW + 3, NOW + 3, "tremor", None);
        let hit = spike.observe(NOW + 4, NOW + 4, "quake!", None).unwrap();
        assert_eq!(hit.coords, Some(late));
    }

    #[test]
    fn no_primary_match_yields_no_coords() {
        let mut spike = detector();
        for i in 0..4 {
            spike.observe(NOW + i, NOW + i, "quake", Some(GeoPoint::new(1.0, 1.0)));
        }
        let hit = spike
            .observe(NOW + 4, NOW + 4, "quake", Some(GeoPoint::new(1.0, 1.0)))
            .unwrap();
        // Entries match the bucket keyword "quake" but never the primary
        // keyword "earthquake".
        assert!(hit.coords.is_none());
    }

    #[test]
    fn unrelated_text_never_triggers() {
        let mut spike = detector();
        for i in 0..50 {
            assert!(spike
                .observe(NOW + i, NOW + i, "normal traffic update", None)
                .is_none());
        }
    }
}
