//! Bounded rolling histories backing the dashboard charts.

use std::collections::VecDeque;

/// Chart window for CPU, RAM and GPU percent histories.
pub const METRIC_HISTORY_LEN: usize = 60;
/// Chart window for the temperature history.
pub const TEMP_HISTORY_LEN: usize = 50;

/// Fixed-length FIFO of chart samples. Always holds exactly `cap` values:
/// it starts pre-filled with zeros so charts render a full window from the
/// first frame, and every push evicts the oldest sample.
#[derive(Debug, Clone)]
pub struct RollingHistory {
    buf: VecDeque<f64>,
    cap: usize,
}

impl RollingHistory {
    pub fn new(cap: usize) -> Self {
        let mut buf = VecDeque::with_capacity(cap);
        buf.resize(cap, 0.0);
        RollingHistory { buf, cap }
    }

    pub fn push(&mut self, v: f64) {
        if self.buf.len() == self.cap {
            self.buf.pop_front();
        }
        self.buf.push_back(v);
    }

    pub fn latest(&self) -> f64 {
        self.buf.back().copied().unwrap_or(0.0)
    }

    /// Ordered copy, oldest first. Safe to hand to a renderer while the
    /// sampler keeps pushing.
    pub fn snapshot(&self) -> Vec<f64> {
        self.buf.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_full_of_zeros() {
        let h = RollingHistory::new(60);
        let snap = h.snapshot();
        assert_eq!(snap.len(), 60);
        assert!(snap.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn push_keeps_length_and_evicts_fifo() {
        let mut h = RollingHistory::new(5);
        for v in [1.0, 2.0, 3.0] {
            h.push(v);
        }
        // Three zeros evicted from the front, three samples appended.
        assert_eq!(h.snapshot(), vec![0.0, 0.0, 1.0, 2.0, 3.0]);
        assert_eq!(h.latest(), 3.0);

        for v in [4.0, 5.0, 6.0] {
            h.push(v);
        }
        assert_eq!(h.snapshot(), vec![2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn length_is_invariant_under_many_pushes() {
        let mut h = RollingHistory::new(50);
        for i in 0..500 {
            h.push(i as f64);
            assert_eq!(h.snapshot().len(), 50);
        }
        assert_eq!(h.latest(), 499.0);
    }
}
