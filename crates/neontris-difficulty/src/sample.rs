use std::{collections::VecDeque, time::Duration};

/// What happened when one piece locked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerformanceSample {
    /// Session time of the lock.
    pub timestamp: Duration,
    pub score_delta: usize,
    pub lines_delta: usize,
    /// Whether the piece went where the advisor recommended; `None` without advice.
    pub matched_advice: Option<bool>,
}

/// Most recent samples, bounded by count and by age.
#[derive(Debug, Clone, Default)]
pub struct SampleWindow {
    samples: VecDeque<PerformanceSample>,
}

impl SampleWindow {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `sample`, then drops samples beyond `max_len` or older than `max_age`
    /// relative to it.
    pub fn push(&mut self, sample: PerformanceSample, max_len: usize, max_age: Duration) {
        self.samples.push_back(sample);
        while self.samples.len() > max_len {
            self.samples.pop_front();
        }
        self.evict_before(sample.timestamp.saturating_sub(max_age));
    }

    /// Drops samples recorded before `cutoff`.
    pub fn evict_before(&mut self, cutoff: Duration) {
        while self
            .samples
            .front()
            .is_some_and(|sample| sample.timestamp < cutoff)
        {
            self.samples.pop_front();
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[must_use]
    pub fn oldest(&self) -> Option<&PerformanceSample> {
        self.samples.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PerformanceSample> {
        self.samples.iter()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(secs: u64) -> PerformanceSample {
        PerformanceSample {
            timestamp: Duration::from_secs(secs),
            score_delta: 0,
            lines_delta: 0,
            matched_advice: None,
        }
    }

    #[test]
    fn test_bounded_by_count() {
        let mut window = SampleWindow::new();
        for secs in 0..10 {
            window.push(sample(secs), 4, Duration::from_secs(3600));
        }
        assert_eq!(window.len(), 4);
        assert_eq!(window.oldest(), Some(&sample(6)));
    }

    #[test]
    fn test_bounded_by_age() {
        let mut window = SampleWindow::new();
        for secs in [0, 10, 50, 100] {
            window.push(sample(secs), 100, Duration::from_secs(60));
        }
        let kept: Vec<_> = window.iter().map(|s| s.timestamp.as_secs()).collect();
        assert_eq!(kept, vec![50, 100]);

        window.evict_before(Duration::from_secs(200));
        assert!(window.is_empty());
    }
}
