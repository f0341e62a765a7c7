//! Exact-color histogram with running mode

use std::collections::HashMap;

use super::ColorKey;

/// Occupancy counts per exact RGB key
///
/// The mode is tracked while inserting: a key becomes the mode only when
/// its count strictly exceeds the current maximum, so on equal counts the
/// key that reached that count first in scan order wins.
#[derive(Debug, Clone, Default)]
pub struct ColorHistogram {
    counts: HashMap<ColorKey, u32>,
    mode: Option<(ColorKey, u32)>,
    total: usize,
}

impl ColorHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `key`
    pub fn insert(&mut self, key: ColorKey) {
        let count = self.counts.entry(key).or_insert(0);
        *count += 1;
        self.total += 1;

        let max = self.mode.map_or(0, |(_, max)| max);
        if *count > max {
            self.mode = Some((key, *count));
        }
    }

    /// Most frequent key and its count
    pub fn mode(&self) -> Option<(ColorKey, u32)> {
        self.mode
    }

    /// Number of distinct keys
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    /// Number of inserted samples
    pub fn total(&self) -> usize {
        self.total
    }
}

impl FromIterator<ColorKey> for ColorHistogram {
    fn from_iter<I: IntoIterator<Item = ColorKey>>(iter: I) -> Self {
        let mut histogram = Self::new();
        for key in iter {
            histogram.insert(key);
        }
        histogram
    }
}
