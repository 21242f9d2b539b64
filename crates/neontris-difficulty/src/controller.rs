use std::time::Duration;

use crate::{DifficultyConfig, DifficultyConfigError, PerformanceSample, RollingMetrics, SampleWindow};

/// Whether the controller has seen enough play to adjust gravity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::IsVariant)]
pub enum DifficultyPhase {
    #[display("warming up")]
    WarmingUp,
    #[display("active")]
    Active,
}

/// Snapshot of the controller's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifficultyState {
    pub drop_interval: Duration,
    /// Session time of the last recomputation.
    pub last_recompute: Duration,
    pub phase: DifficultyPhase,
}

/// Maps rolling player performance to the gravity interval.
///
/// Feed it one [`PerformanceSample`] per locked piece and call [`Self::tick`] with the
/// session clock. Once warmed up it recomputes the interval on a fixed cadence: the
/// better the player, the shorter the interval, never changing by more than
/// `max_step_ratio` at a time and never leaving `[min_interval, max_interval]`.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use neontris_difficulty::{DifficultyConfig, DifficultyController};
///
/// let mut controller = DifficultyController::new(DifficultyConfig::default()).unwrap();
/// assert_eq!(controller.current_drop_interval(), Duration::from_millis(1000));
/// // Nothing happens before the first recomputation is due.
/// assert_eq!(controller.tick(Duration::from_secs(1)), None);
/// ```
#[derive(Debug, Clone)]
pub struct DifficultyController {
    config: DifficultyConfig,
    window: SampleWindow,
    samples_recorded: usize,
    state: DifficultyState,
}

impl DifficultyController {
    pub fn new(config: DifficultyConfig) -> Result<Self, DifficultyConfigError> {
        config.validate()?;
        let state = Self::initial_state(&config);
        Ok(Self {
            config,
            window: SampleWindow::new(),
            samples_recorded: 0,
            state,
        })
    }

    fn initial_state(config: &DifficultyConfig) -> DifficultyState {
        DifficultyState {
            drop_interval: config.initial_interval(),
            last_recompute: Duration::ZERO,
            phase: DifficultyPhase::WarmingUp,
        }
    }

    #[must_use]
    pub fn state(&self) -> DifficultyState {
        self.state
    }

    #[must_use]
    pub fn phase(&self) -> DifficultyPhase {
        self.state.phase
    }

    #[must_use]
    pub fn current_drop_interval(&self) -> Duration {
        self.state.drop_interval
    }

    /// Metrics over the current window as of `now`.
    #[must_use]
    pub fn metrics(&self, now: Duration) -> RollingMetrics {
        RollingMetrics::measure(&self.window, now, self.config.min_span())
    }

    pub fn record_sample(&mut self, sample: PerformanceSample) {
        self.samples_recorded += 1;
        self.window
            .push(sample, self.config.window_size, self.config.window_age());
    }

    /// Advances the controller to session time `now`.
    ///
    /// Returns the new drop interval when a recomputation happened, `None` otherwise.
    /// While warming up the interval never changes.
    pub fn tick(&mut self, now: Duration) -> Option<Duration> {
        if self.state.phase.is_warming_up()
            && self.samples_recorded >= self.config.warmup_samples
            && now >= self.config.warmup_duration()
        {
            self.state.phase = DifficultyPhase::Active;
            tracing::debug!(samples = self.samples_recorded, ?now, "difficulty warmed up");
        }

        if now.saturating_sub(self.state.last_recompute) < self.config.recompute_every() {
            return None;
        }
        self.state.last_recompute = now;
        if self.state.phase.is_warming_up() {
            return None;
        }

        self.window
            .evict_before(now.saturating_sub(self.config.window_age()));
        let metrics = self.metrics(now);
        let skill = self.config.skill(&metrics);
        let target = self.config.target_interval(skill);
        let current = self.state.drop_interval;
        let max_step = current.mul_f64(self.config.max_step_ratio);
        let next = target
            .clamp(current.saturating_sub(max_step), current + max_step)
            .clamp(self.config.min_interval(), self.config.max_interval());
        self.state.drop_interval = next;

        tracing::debug!(
            score_per_minute = metrics.score_per_minute,
            lines_per_minute = metrics.lines_per_minute,
            adherence = metrics.adherence,
            skill,
            ?target,
            ?next,
            "drop interval recomputed"
        );
        Some(next)
    }

    /// Forgets all samples and returns to the initial interval and warm-up phase.
    pub fn reset(&mut self) {
        self.window.clear();
        self.samples_recorded = 0;
        self.state = Self::initial_state(&self.config);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(config: DifficultyConfig) -> DifficultyController {
        DifficultyController::new(config).unwrap()
    }

    fn strong_sample(secs: u64) -> PerformanceSample {
        PerformanceSample {
            timestamp: Duration::from_secs(secs),
            score_delta: 800,
            lines_delta: 4,
            matched_advice: Some(true),
        }
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = DifficultyConfig {
            recompute_every_secs: 0,
            ..DifficultyConfig::default()
        };
        assert!(DifficultyController::new(config).is_err());
    }

    #[test]
    fn test_interval_unchanged_while_warming_up() {
        let mut controller = controller(DifficultyConfig {
            warmup_samples: 10,
            ..DifficultyConfig::default()
        });
        for secs in 0..5 {
            controller.record_sample(strong_sample(secs));
        }
        // Enough time, too few samples.
        assert_eq!(controller.tick(Duration::from_secs(60)), None);
        assert!(controller.phase().is_warming_up());
        assert_eq!(controller.current_drop_interval(), Duration::from_millis(1000));
    }

    #[test]
    fn test_warmup_needs_time_as_well_as_samples() {
        let mut controller = controller(DifficultyConfig::default());
        for secs in 0..10 {
            controller.record_sample(strong_sample(secs));
        }
        assert_eq!(controller.tick(Duration::from_secs(10)), None);
        assert!(controller.phase().is_warming_up());
        assert!(controller.tick(Duration::from_secs(30)).is_some());
        assert!(controller.phase().is_active());
    }

    #[test]
    fn test_strong_play_speeds_up_gradually() {
        let config = DifficultyConfig::default();
        let min = config.min_interval();
        let mut controller = controller(config);

        let mut previous = controller.current_drop_interval();
        let mut recomputations = 0;
        for secs in 0..=900 {
            if secs % 2 == 0 {
                controller.record_sample(strong_sample(secs));
            }
            let Some(next) = controller.tick(Duration::from_secs(secs)) else {
                continue;
            };
            recomputations += 1;
            assert!(next >= min);
            if previous > min {
                assert!(next < previous, "{next:?} should be below {previous:?}");
            }
            let lower_bound = previous.as_secs_f64() * 0.9 - 1e-6;
            assert!(next.as_secs_f64() >= lower_bound);
            previous = next;
        }
        assert_eq!(recomputations, 30);
        assert_eq!(controller.current_drop_interval(), min);
    }

    #[test]
    fn test_idle_play_slows_down_to_target() {
        let config = DifficultyConfig {
            initial_interval_ms: 500,
            warmup_samples: 0,
            ..DifficultyConfig::default()
        };
        let max = config.max_interval();
        // No samples: neutral adherence only, skill 0.1.
        let target = config.target_interval(0.1);
        let mut controller = controller(config);

        let mut previous = controller.current_drop_interval();
        for step in 1..=20 {
            let next = controller.tick(Duration::from_secs(30 * step)).unwrap();
            assert!(next >= previous);
            assert!(next <= max);
            assert!(next.as_secs_f64() <= previous.as_secs_f64() * 1.1 + 1e-6);
            previous = next;
        }
        assert!(previous.abs_diff(target) < Duration::from_millis(1));
    }

    #[test]
    fn test_reset() {
        let mut controller = controller(DifficultyConfig {
            warmup_samples: 0,
            warmup_secs: 0,
            ..DifficultyConfig::default()
        });
        controller.record_sample(strong_sample(1));
        controller.tick(Duration::from_secs(30));
        assert!(controller.current_drop_interval() < Duration::from_millis(1000));

        controller.reset();
        assert_eq!(
            controller.state(),
            DifficultyState {
                drop_interval: Duration::from_millis(1000),
                last_recompute: Duration::ZERO,
                phase: DifficultyPhase::WarmingUp,
            }
        );
        assert_eq!(controller.metrics(Duration::from_secs(60)).adherence, 0.5);
    }
}
