use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::RollingMetrics;

/// Tuning of the difficulty controller. Every field has a default, so a partial TOML
/// table is enough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DifficultyConfig {
    /// Gravity interval at the start of a session.
    pub initial_interval_ms: u64,
    /// Fastest gravity the controller may choose.
    pub min_interval_ms: u64,
    /// Slowest gravity the controller may choose.
    pub max_interval_ms: u64,
    /// Session time between two recomputations.
    pub recompute_every_secs: u64,
    /// Samples needed before the controller leaves the warm-up phase.
    pub warmup_samples: usize,
    /// Session time needed before the controller leaves the warm-up phase.
    pub warmup_secs: u64,
    /// Maximum number of samples kept in the rolling window.
    pub window_size: usize,
    /// Maximum age of a sample in the rolling window.
    pub window_secs: u64,
    /// Shortest span rates are computed over.
    pub min_span_secs: u64,
    /// Largest change per recomputation, as a fraction of the current interval.
    pub max_step_ratio: f64,
    pub score_per_minute: MetricRange,
    pub lines_per_minute: MetricRange,
    pub blend: SkillBlend,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self {
            initial_interval_ms: 1000,
            min_interval_ms: 100,
            max_interval_ms: 1000,
            recompute_every_secs: 30,
            warmup_samples: 5,
            warmup_secs: 30,
            window_size: 50,
            window_secs: 120,
            min_span_secs: 6,
            max_step_ratio: 0.1,
            score_per_minute: MetricRange {
                baseline: 0.0,
                ceiling: 1000.0,
            },
            lines_per_minute: MetricRange {
                baseline: 0.0,
                ceiling: 5.0,
            },
            blend: SkillBlend::default(),
        }
    }
}

/// Values a rate is normalized between: `baseline` maps to 0 and `ceiling` to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricRange {
    pub baseline: f64,
    pub ceiling: f64,
}

impl MetricRange {
    #[must_use]
    pub fn normalize(&self, value: f64) -> f64 {
        ((value - self.baseline) / (self.ceiling - self.baseline)).clamp(0.0, 1.0)
    }
}

/// Relative weights of the three normalized metrics in the skill estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SkillBlend {
    pub score: f64,
    pub lines: f64,
    pub adherence: f64,
}

impl Default for SkillBlend {
    fn default() -> Self {
        Self {
            score: 0.5,
            lines: 0.3,
            adherence: 0.2,
        }
    }
}

/// A difficulty setting that cannot drive the controller.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum DifficultyConfigError {
    #[display("difficulty `{_0}` must be positive")]
    NotPositive(#[error(not(source))] &'static str),
    #[display("difficulty min_interval_ms ({min}) exceeds max_interval_ms ({max})")]
    IntervalOrder { min: u64, max: u64 },
    #[display("difficulty initial_interval_ms ({initial}) is outside {min}..={max}")]
    InitialOutOfRange { initial: u64, min: u64, max: u64 },
    #[display("difficulty max_step_ratio must be in (0, 1], got {_0}")]
    StepRatio(#[error(not(source))] f64),
    #[display("difficulty `{_0}` ceiling must be finite and above its baseline")]
    MetricRange(#[error(not(source))] &'static str),
    #[display("difficulty blend weights must be finite, non-negative and not all zero")]
    Blend,
}

impl DifficultyConfig {
    pub fn validate(&self) -> Result<(), DifficultyConfigError> {
        use DifficultyConfigError as E;

        let positive = [
            ("min_interval_ms", self.min_interval_ms),
            ("recompute_every_secs", self.recompute_every_secs),
            ("window_secs", self.window_secs),
            ("min_span_secs", self.min_span_secs),
        ];
        if let Some(&(name, _)) = positive.iter().find(|(_, value)| *value == 0) {
            return Err(E::NotPositive(name));
        }
        if self.window_size == 0 {
            return Err(E::NotPositive("window_size"));
        }
        if self.min_interval_ms > self.max_interval_ms {
            return Err(E::IntervalOrder {
                min: self.min_interval_ms,
                max: self.max_interval_ms,
            });
        }
        if !(self.min_interval_ms..=self.max_interval_ms).contains(&self.initial_interval_ms) {
            return Err(E::InitialOutOfRange {
                initial: self.initial_interval_ms,
                min: self.min_interval_ms,
                max: self.max_interval_ms,
            });
        }
        if !(self.max_step_ratio > 0.0 && self.max_step_ratio <= 1.0) {
            return Err(E::StepRatio(self.max_step_ratio));
        }
        for (name, range) in [
            ("score_per_minute", self.score_per_minute),
            ("lines_per_minute", self.lines_per_minute),
        ] {
            if !(range.baseline.is_finite()
                && range.ceiling.is_finite()
                && range.ceiling > range.baseline)
            {
                return Err(E::MetricRange(name));
            }
        }
        let SkillBlend {
            score,
            lines,
            adherence,
        } = self.blend;
        let weights = [score, lines, adherence];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) || weights.iter().sum::<f64>() <= 0.0
        {
            return Err(E::Blend);
        }
        Ok(())
    }

    #[must_use]
    pub fn initial_interval(&self) -> Duration {
        Duration::from_millis(self.initial_interval_ms)
    }

    #[must_use]
    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }

    #[must_use]
    pub fn max_interval(&self) -> Duration {
        Duration::from_millis(self.max_interval_ms)
    }

    #[must_use]
    pub fn recompute_every(&self) -> Duration {
        Duration::from_secs(self.recompute_every_secs)
    }

    #[must_use]
    pub fn warmup_duration(&self) -> Duration {
        Duration::from_secs(self.warmup_secs)
    }

    #[must_use]
    pub fn window_age(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    #[must_use]
    pub fn min_span(&self) -> Duration {
        Duration::from_secs(self.min_span_secs)
    }

    /// Blends the normalized metrics into a skill estimate in `[0, 1]`.
    #[must_use]
    pub fn skill(&self, metrics: &RollingMetrics) -> f64 {
        let blend = &self.blend;
        let total = blend.score + blend.lines + blend.adherence;
        let weighted = blend.score * self.score_per_minute.normalize(metrics.score_per_minute)
            + blend.lines * self.lines_per_minute.normalize(metrics.lines_per_minute)
            + blend.adherence * metrics.adherence.clamp(0.0, 1.0);
        (weighted / total).clamp(0.0, 1.0)
    }

    /// Gravity interval the controller moves toward for `skill`; higher skill, shorter
    /// interval.
    #[must_use]
    pub fn target_interval(&self, skill: f64) -> Duration {
        let max = self.max_interval();
        let range = max - self.min_interval();
        max - range.mul_f64(skill.clamp(0.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(DifficultyConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_rejects_bad_intervals() {
        let config = DifficultyConfig {
            min_interval_ms: 0,
            ..DifficultyConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(DifficultyConfigError::NotPositive("min_interval_ms"))
        );

        let config = DifficultyConfig {
            min_interval_ms: 500,
            max_interval_ms: 400,
            initial_interval_ms: 450,
            ..DifficultyConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(DifficultyConfigError::IntervalOrder { .. })
        ));

        let config = DifficultyConfig {
            initial_interval_ms: 2000,
            ..DifficultyConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(DifficultyConfigError::InitialOutOfRange { .. })
        ));
    }

    #[test]
    fn test_rejects_bad_tuning() {
        let config = DifficultyConfig {
            max_step_ratio: 0.0,
            ..DifficultyConfig::default()
        };
        assert_eq!(config.validate(), Err(DifficultyConfigError::StepRatio(0.0)));

        let config = DifficultyConfig {
            lines_per_minute: MetricRange {
                baseline: 5.0,
                ceiling: 5.0,
            },
            ..DifficultyConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(DifficultyConfigError::MetricRange("lines_per_minute"))
        );

        let config = DifficultyConfig {
            blend: SkillBlend {
                score: 0.0,
                lines: 0.0,
                adherence: 0.0,
            },
            ..DifficultyConfig::default()
        };
        assert_eq!(config.validate(), Err(DifficultyConfigError::Blend));
    }

    #[test]
    fn test_partial_toml() {
        let config: DifficultyConfig = toml::from_str(
            "
            min_interval_ms = 80
            [blend]
            adherence = 0.0
            ",
        )
        .unwrap();
        assert_eq!(config.min_interval_ms, 80);
        assert_eq!(config.max_interval_ms, 1000);
        assert_eq!(config.blend.score, 0.5);
        assert_eq!(config.blend.adherence, 0.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_skill_and_target_are_monotonic() {
        let config = DifficultyConfig::default();
        let idle = RollingMetrics {
            score_per_minute: 0.0,
            lines_per_minute: 0.0,
            adherence: 0.0,
        };
        let strong = RollingMetrics {
            score_per_minute: 5000.0,
            lines_per_minute: 20.0,
            adherence: 1.0,
        };
        assert_eq!(config.skill(&idle), 0.0);
        assert!((config.skill(&strong) - 1.0).abs() < 1e-9);
        assert_eq!(config.target_interval(0.0), Duration::from_millis(1000));
        assert_eq!(config.target_interval(1.0), Duration::from_millis(100));
        assert!(config.target_interval(0.3) > config.target_interval(0.6));
    }
}
