use std::collections::HashMap;
use std::hash::Hash;

/// Smallest axis change worth reporting.
pub const AXIS_THRESHOLD: f32 = 0.05;

/// Suppresses axis jitter: a value is reported the first time, when it moved
/// at least the threshold since the last report, or when it hits rest or an
/// extreme.
#[derive(Debug, Clone)]
pub struct AxisFilter<K> {
    threshold: f32,
    last: HashMap<K, f32>,
}

impl<K: Hash + Eq> AxisFilter<K> {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            last: HashMap::new(),
        }
    }

    /// The value rounded to two decimals if it should be reported.
    pub fn report(&mut self, key: K, value: f32) -> Option<f32> {
        let rounded = (value * 100.0).round() / 100.0;
        let settled = rounded == -1.0 || rounded == 0.0 || rounded == 1.0;
        let moved = match self.last.get(&key) {
            None => true,
            Some(prev) => (rounded - prev).abs() >= self.threshold - 1e-6,
        };
        if !(moved || settled) {
            return None;
        }
        self.last.insert(key, rounded);
        Some(rounded)
    }

    /// Forget a device's axes, e.g. after it disconnects.
    pub fn forget(&mut self, pred: impl Fn(&K) -> bool) {
        self.last.retain(|k, _| !pred(k));
    }
}

impl<K: Hash + Eq> Default for AxisFilter<K> {
    fn default() -> Self {
        Self::new(AXIS_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_value_always_reported() {
        let mut f = AxisFilter::default();
        assert_eq!(f.report((0, 0), 0.123), Some(0.12));
    }

    #[test]
    fn small_moves_are_suppressed() {
        let mut f = AxisFilter::default();
        f.report((0, 0), 0.40);
        assert_eq!(f.report((0, 0), 0.42), None);
        assert_eq!(f.report((0, 0), 0.45), Some(0.45));
        assert_eq!(f.report((0, 1), 0.45), Some(0.45));
    }

    #[test]
    fn rest_and_extremes_always_reported() {
        let mut f = AxisFilter::default();
        f.report((0, 0), 0.01);
        assert_eq!(f.report((0, 0), 0.0), Some(0.0));
        assert_eq!(f.report((0, 0), 0.0), Some(0.0));
        f.report((0, 0), 0.98);
        assert_eq!(f.report((0, 0), 1.0), Some(1.0));
    }

    #[test]
    fn forget_resets_a_device() {
        let mut f = AxisFilter::default();
        f.report((1, 0), 0.5);
        f.forget(|&(pad, _)| pad == 1);
        assert_eq!(f.report((1, 0), 0.51), Some(0.51));
    }
}
