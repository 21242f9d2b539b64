use std::time::Duration;

use crate::SampleWindow;

/// Adherence reported when no sample carries advice.
pub const NEUTRAL_ADHERENCE: f64 = 0.5;

/// Player performance over the rolling window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RollingMetrics {
    pub score_per_minute: f64,
    pub lines_per_minute: f64,
    /// Fraction of advised moves that followed the advice, in `[0, 1]`.
    pub adherence: f64,
}

impl RollingMetrics {
    /// Measures `window` as of `now`.
    ///
    /// Rates are taken over the span from the oldest sample to `now`, but never over
    /// less than `min_span`.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn measure(window: &SampleWindow, now: Duration, min_span: Duration) -> Self {
        let span = window
            .oldest()
            .map_or(Duration::ZERO, |oldest| now.saturating_sub(oldest.timestamp))
            .max(min_span);
        let minutes = span.as_secs_f64() / 60.0;

        let score: usize = window.iter().map(|s| s.score_delta).sum();
        let lines: usize = window.iter().map(|s| s.lines_delta).sum();

        let (advised, matched) = window
            .iter()
            .filter_map(|s| s.matched_advice)
            .fold((0_usize, 0_usize), |(advised, matched), m| {
                (advised + 1, matched + usize::from(m))
            });
        let adherence = if advised == 0 {
            NEUTRAL_ADHERENCE
        } else {
            matched as f64 / advised as f64
        };

        Self {
            score_per_minute: score as f64 / minutes,
            lines_per_minute: lines as f64 / minutes,
            adherence,
        }
    }
}
