//! Frequency counts and deterministic top-N ranking.

use std::cmp::Ordering;

/// The stable string a value is displayed as.
///
/// Ranking ties in [`ValueCounts::top`] are broken by comparing this string,
/// so it must be the exact text callers render. Implementations document
/// their key per type.
pub trait DisplayKey {
    fn display_key(&self) -> String;
}

impl DisplayKey for String {
    /// Strings rank by themselves.
    fn display_key(&self) -> String {
        self.clone()
    }
}

/// A value and the number of source records that mapped to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueCount<T> {
    pub value: T,
    pub count: usize,
}

/// An unordered multiset of counted values, produced by grouping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueCounts<T>(Vec<ValueCount<T>>);

impl<T> Default for ValueCounts<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T> ValueCounts<T> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValueCount<T>> {
        self.0.iter()
    }

    /// Widest count in decimal, for column alignment.
    #[must_use]
    pub fn max_count_width(&self) -> usize {
        self.0
            .iter()
            .map(|entry| entry.count.to_string().len())
            .max()
            .unwrap_or(0)
    }

    /// Widest rendered value under `render`, for column alignment.
    pub fn max_value_width(&self, render: impl Fn(&T) -> String) -> usize {
        self.0
            .iter()
            .map(|entry| render(&entry.value).chars().count())
            .max()
            .unwrap_or(0)
    }
}

impl<T: Clone + DisplayKey> ValueCounts<T> {
    /// Returns the `n` highest counts.
    ///
    /// Ordered descending by count; equal counts order ascending by the
    /// value's [`DisplayKey`] string, making the result reproducible. Counts
    /// are never altered; entries beyond `n` are dropped.
    #[must_use]
    pub fn top(&self, n: usize) -> Self {
        if n == 0 {
            return Self::default();
        }

        let mut entries = self.0.clone();
        entries.sort_by(|a, b| match b.count.cmp(&a.count) {
            Ordering::Equal => a.value.display_key().cmp(&b.value.display_key()),
            ordering => ordering,
        });
        entries.truncate(n);
        Self(entries)
    }
}

impl<T> FromIterator<ValueCount<T>> for ValueCounts<T> {
    fn from_iter<I: IntoIterator<Item = ValueCount<T>>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a, T> IntoIterator for &'a ValueCounts<T> {
    type Item = &'a ValueCount<T>;
    type IntoIter = std::slice::Iter<'a, ValueCount<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<T> IntoIterator for ValueCounts<T> {
    type Item = ValueCount<T>;
    type IntoIter = std::vec::IntoIter<ValueCount<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(entries: &[(&str, usize)]) -> ValueCounts<String> {
        entries
            .iter()
            .map(|(value, count)| ValueCount {
                value: (*value).to_string(),
                count: *count,
            })
            .collect()
    }

    #[test]
    fn top_zero_is_empty() {
        let ranked = counts(&[("a", 3), ("b", 1)]).top(0);
        assert!(ranked.is_empty());
    }

    #[test]
    fn top_orders_by_count_descending() {
        let ranked = counts(&[("low", 1), ("high", 5), ("mid", 3)]).top(10);
        let order: Vec<_> = ranked.iter().map(|entry| entry.value.as_str()).collect();
        assert_eq!(order, ["high", "mid", "low"]);
    }

    #[test]
    fn top_breaks_ties_by_display_key() {
        let ranked = counts(&[("zebra", 2), ("apple", 2), ("mango", 2)]).top(3);
        let order: Vec<_> = ranked.iter().map(|entry| entry.value.as_str()).collect();
        assert_eq!(order, ["apple", "mango", "zebra"]);
    }

    #[test]
    fn top_beyond_len_keeps_all_entries() {
        let source = counts(&[("a", 1), ("b", 2)]);
        let ranked = source.top(100);
        assert_eq!(ranked.len(), 2);
        let total: usize = ranked.iter().map(|entry| entry.count).sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn top_truncates_without_touching_counts() {
        let ranked = counts(&[("a", 5), ("b", 4), ("c", 3)]).top(2);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked.iter().next().unwrap().count, 5);
    }

    #[test]
    fn top_is_idempotent_for_the_same_input() {
        let source = counts(&[("x", 2), ("y", 2), ("z", 7)]);
        assert_eq!(source.top(2), source.top(2));
    }

    #[test]
    fn width_helpers() {
        let source = counts(&[("a", 7), ("bbb", 123)]);
        assert_eq!(source.max_count_width(), 3);
        assert_eq!(source.max_value_width(|value| value.clone()), 3);
        assert_eq!(ValueCounts::<String>::default().max_count_width(), 0);
    }
}
