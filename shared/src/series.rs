use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::settings::MAX_SERIES_POINTS;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub timestamp_ms: i64,
    pub value: f64,
}

impl Sample {
    pub fn new(timestamp_ms: i64, value: f64) -> Self {
        Self {
            timestamp_ms,
            value,
        }
    }

    /// Same reading, re-stamped.
    pub fn at(&self, timestamp_ms: i64) -> Self {
        Self {
            timestamp_ms,
            value: self.value,
        }
    }
}

/// Bounded, time-ordered window of samples. Oldest samples fall off the front.
/// Capacity is kept within `1..=MAX_SERIES_POINTS`.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    max: usize,
    buf: VecDeque<Sample>,
}

impl Series {
    pub fn new(max: usize) -> Self {
        let max = max.clamp(1, MAX_SERIES_POINTS);
        Self {
            max,
            buf: VecDeque::with_capacity(max),
        }
    }

    pub fn push(&mut self, sample: Sample) {
        if self.buf.len() == self.max {
            self.buf.pop_front();
        }
        self.buf.push_back(sample);
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.max
    }

    pub fn latest(&self) -> Option<&Sample> {
        self.buf.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.buf.iter()
    }

    /// `(t_ms, y)` pairs in the shape the chart component consumes.
    pub fn points(&self) -> Vec<(i64, f64)> {
        self.buf.iter().map(|s| (s.timestamp_ms, s.value)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_exceeds_capacity_and_evicts_oldest() {
        let mut s = Series::new(200);
        for i in 0..1_000 {
            s.push(Sample::new(i, i as f64));
            assert!(s.len() <= 200);
        }
        assert_eq!(s.len(), 200);
        assert_eq!(s.iter().next().map(|x| x.timestamp_ms), Some(800));
        assert_eq!(s.latest().map(|x| x.timestamp_ms), Some(999));
    }

    #[test]
    fn zero_capacity_is_clamped_to_one() {
        let mut s = Series::new(0);
        s.push(Sample::new(1, 1.0));
        s.push(Sample::new(2, 2.0));
        assert_eq!(s.len(), 1);
        assert_eq!(s.points(), vec![(2, 2.0)]);
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut s = Series::new(3);
        s.push(Sample::new(1, 1.0));
        s.clear();
        assert!(s.is_empty());
        assert_eq!(s.capacity(), 3);
    }

    #[test]
    fn capacity_is_capped() {
        let mut s = Series::new(5_000);
        assert_eq!(s.capacity(), MAX_SERIES_POINTS);
        for i in 0..1_000 {
            s.push(Sample::new(i, 0.0));
        }
        assert_eq!(s.len(), MAX_SERIES_POINTS);
    }
}
