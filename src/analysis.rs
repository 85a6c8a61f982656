// Frequency analysis over a fetched draw history.
//
// Pure functions: same history in, same summary out. Ranking uses an
// explicit tie-break (equal counts order ascending by number) so the
// most/least-common anchors are reproducible across runs.

use serde::Serialize;

use crate::model::DrawRecord;

// ---------------------------------------------------------------------------
// Frequency table
// ---------------------------------------------------------------------------

/// Occurrence counts per number, zero-filled across `1..=universe_max` so
/// chart consumers always see the full universe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrequencyTable {
    universe_max: u8,
    /// `counts[i]` is the count for number `i + 1`.
    counts: Vec<u32>,
}

impl FrequencyTable {
    fn new(universe_max: u8) -> Self {
        Self {
            universe_max,
            counts: vec![0; universe_max as usize],
        }
    }

    pub fn universe_max(&self) -> u8 {
        self.universe_max
    }

    /// Count for a number, or 0 for anything outside the universe.
    pub fn count(&self, number: u8) -> u32 {
        if number == 0 {
            return 0;
        }
        self.counts.get(number as usize - 1).copied().unwrap_or(0)
    }

    /// Sum of all counts. Equals `draws * draw_size` for a valid history.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }

    /// (number, count) pairs over the full universe, ascending by number.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u32)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .map(|(i, &c)| ((i + 1) as u8, c))
    }
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Analysis output: the zero-filled table plus the frequency anchors fed
/// into the ticket suggester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrequencySummary {
    pub table: FrequencyTable,
    /// Top 2 drawn numbers by count descending; ties ascending by number.
    /// Empty when the history is empty.
    pub most_common: Vec<u8>,
    /// Bottom 1 drawn number by count ascending; ties ascending by number.
    pub least_common: Vec<u8>,
}

/// Compute the frequency summary for a history. An empty history is a
/// valid "no data yet" state: zero table, empty anchor lists.
pub fn analyze(history: &[DrawRecord], universe_max: u8) -> FrequencySummary {
    let mut table = FrequencyTable::new(universe_max);

    for record in history {
        for &number in &record.numbers {
            if number >= 1 && number <= universe_max {
                table.counts[number as usize - 1] += 1;
            }
        }
    }

    // Only numbers actually drawn compete for most/least common.
    let mut drawn: Vec<(u8, u32)> = table.iter().filter(|&(_, count)| count > 0).collect();

    // Count descending, number ascending on ties.
    drawn.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    let most_common: Vec<u8> = drawn.iter().take(2).map(|&(n, _)| n).collect();

    // Count ascending, number ascending on ties.
    drawn.sort_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(&b.0)));
    let least_common: Vec<u8> = drawn.iter().take(1).map(|&(n, _)| n).collect();

    FrequencySummary {
        table,
        most_common,
        least_common,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DrawRecord;

    fn two_draw_history() -> Vec<DrawRecord> {
        vec![
            DrawRecord::new(1, vec![1, 2, 3, 4, 5, 6]),
            DrawRecord::new(2, vec![1, 2, 3, 7, 8, 9]),
        ]
    }

    #[test]
    fn counts_match_known_history() {
        let summary = analyze(&two_draw_history(), 60);
        let table = &summary.table;

        for n in [1, 2, 3] {
            assert_eq!(table.count(n), 2, "number {n}");
        }
        for n in [4, 5, 6, 7, 8, 9] {
            assert_eq!(table.count(n), 1, "number {n}");
        }
        assert_eq!(table.count(10), 0);
        assert_eq!(table.count(60), 0);
    }

    #[test]
    fn total_is_draws_times_draw_size() {
        let summary = analyze(&two_draw_history(), 60);
        assert_eq!(summary.table.total(), 2 * 6);
    }

    #[test]
    fn most_common_breaks_ties_ascending() {
        // 1, 2, 3 all tie at count 2: deterministic pick is [1, 2].
        let summary = analyze(&two_draw_history(), 60);
        assert_eq!(summary.most_common, vec![1, 2]);
    }

    #[test]
    fn least_common_breaks_ties_ascending() {
        // 4..=9 all tie at count 1: deterministic pick is 4.
        let summary = analyze(&two_draw_history(), 60);
        assert_eq!(summary.least_common, vec![4]);
    }

    #[test]
    fn never_drawn_numbers_are_not_anchors() {
        // 10..=60 have count 0 but must not appear as least common.
        let summary = analyze(&two_draw_history(), 60);
        assert_eq!(summary.least_common, vec![4]);
        assert!(summary.table.count(10) == 0);
    }

    #[test]
    fn empty_history_is_valid_state() {
        let summary = analyze(&[], 25);

        assert!(summary.most_common.is_empty());
        assert!(summary.least_common.is_empty());
        assert_eq!(summary.table.total(), 0);
        // Table still spans the whole universe for display.
        assert_eq!(summary.table.iter().count(), 25);
    }

    #[test]
    fn clear_frequency_leader_wins() {
        let history = vec![
            DrawRecord::new(1, vec![10, 20, 30, 40, 50, 60]),
            DrawRecord::new(2, vec![10, 20, 31, 41, 51, 59]),
            DrawRecord::new(3, vec![10, 21, 32, 42, 52, 58]),
        ];
        let summary = analyze(&history, 60);

        assert_eq!(summary.most_common, vec![10, 20]);
        assert_eq!(summary.table.count(10), 3);
        assert_eq!(summary.table.count(20), 2);
    }

    #[test]
    fn analyze_is_idempotent() {
        let history = two_draw_history();
        assert_eq!(analyze(&history, 60), analyze(&history, 60));
    }

    #[test]
    fn most_common_count_dominates_least_common() {
        let summary = analyze(&two_draw_history(), 60);
        let least = summary.least_common[0];
        for &n in &summary.most_common {
            assert!(summary.table.count(n) >= summary.table.count(least));
        }
    }

    #[test]
    fn table_iter_is_ascending_and_zero_filled() {
        let summary = analyze(&two_draw_history(), 12);
        let pairs: Vec<(u8, u32)> = summary.table.iter().collect();

        assert_eq!(pairs.len(), 12);
        assert_eq!(pairs[0], (1, 2));
        assert_eq!(pairs[11], (12, 0));
    }
}
