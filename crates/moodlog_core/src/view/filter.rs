//! Entry list filtering and summary counts.

use crate::model::entry::{Entry, Mood};
use std::collections::BTreeMap;

/// Transient list filters. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub search_text: String,
    /// Exact match against `Entry::date`.
    pub date_filter: Option<String>,
    pub mood: Option<Mood>,
}

impl FilterState {
    pub fn is_empty(&self) -> bool {
        self.search_text.is_empty() && self.date_filter.is_none() && self.mood.is_none()
    }
}

/// Entries whose text contains `search_text` (case-insensitive) and whose
/// date equals `date_filter` when one is set.
pub fn visible_entries<'a>(
    entries: &'a [Entry],
    search_text: &str,
    date_filter: Option<&str>,
) -> Vec<&'a Entry> {
    let needle = search_text.to_lowercase();
    entries
        .iter()
        .filter(|entry| entry.text_contains(&needle))
        .filter(|entry| date_filter.map_or(true, |date| entry.date == date))
        .collect()
}

/// `visible_entries` plus the optional mood filter.
pub fn apply_filter<'a>(entries: &'a [Entry], filter: &FilterState) -> Vec<&'a Entry> {
    visible_entries(entries, &filter.search_text, filter.date_filter.as_deref())
        .into_iter()
        .filter(|entry| filter.mood.map_or(true, |mood| entry.mood == mood))
        .collect()
}

/// Collection summary shown under the entry list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryStats {
    pub total: usize,
    /// Only moods with at least one entry appear.
    pub by_mood: BTreeMap<Mood, usize>,
}

pub fn entry_stats(entries: &[Entry]) -> EntryStats {
    let mut by_mood = BTreeMap::new();
    for entry in entries {
        *by_mood.entry(entry.mood).or_insert(0) += 1;
    }
    EntryStats {
        total: entries.len(),
        by_mood,
    }
}

#[cfg(test)]
mod tests {
    use super::{apply_filter, entry_stats, visible_entries, FilterState};
    use crate::model::entry::{Entry, EntryId, Mood};

    fn sample() -> Vec<Entry> {
        vec![
            Entry::new(EntryId(3), "Long RUN today", Mood::Tired, "10/19/2026", Vec::new()),
            Entry::new(EntryId(2), "Rainy", Mood::Sad, "10/18/2026", Vec::new()),
            Entry::new(EntryId(1), "ran errands", Mood::Happy, "10/18/2026", Vec::new()),
        ]
    }

    fn ids(entries: &[&Entry]) -> Vec<i64> {
        entries.iter().map(|entry| entry.id.0).collect()
    }

    #[test]
    fn empty_filters_return_everything_in_order() {
        let entries = sample();
        assert_eq!(ids(&visible_entries(&entries, "", None)), vec![3, 2, 1]);
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let entries = sample();
        assert_eq!(ids(&visible_entries(&entries, "run", None)), vec![3]);
        assert_eq!(ids(&visible_entries(&entries, "RA", None)), vec![2, 1]);
    }

    #[test]
    fn search_and_date_are_and_combined() {
        let entries = sample();
        assert_eq!(
            ids(&visible_entries(&entries, "ra", Some("10/18/2026"))),
            vec![2, 1]
        );
        assert!(visible_entries(&entries, "run", Some("10/18/2026")).is_empty());
    }

    #[test]
    fn mood_filter_narrows_the_view() {
        let entries = sample();
        let filter = FilterState {
            mood: Some(Mood::Sad),
            ..FilterState::default()
        };
        assert_eq!(ids(&apply_filter(&entries, &filter)), vec![2]);
    }

    #[test]
    fn stats_count_per_mood() {
        let stats = entry_stats(&sample());
        assert_eq!(stats.total, 3);
        assert_eq!(stats.by_mood.get(&Mood::Sad), Some(&1));
        assert_eq!(stats.by_mood.get(&Mood::Angry), None);
    }
}
