use std::fmt;

use serde::{Deserialize, Serialize};

use crate::BoardAnalysis;

/// Default penalty per unit of aggregate height.
pub const WEIGHT_HEIGHT: f32 = 0.510_066;
/// Default reward per complete line.
pub const WEIGHT_LINES: f32 = 0.760_666;
/// Default penalty per hole.
pub const WEIGHT_HOLES: f32 = 0.356_63;
/// Default penalty per unit of bumpiness.
pub const WEIGHT_BUMPINESS: f32 = 0.184_483;

/// Magnitudes of the four feature weights.
///
/// The sign of each term is fixed by the evaluator: height, holes and bumpiness are
/// penalties, complete lines a reward. Every weight must be finite and non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HeuristicWeights {
    pub height: f32,
    pub lines: f32,
    pub holes: f32,
    pub bumpiness: f32,
}

impl Default for HeuristicWeights {
    fn default() -> Self {
        Self {
            height: WEIGHT_HEIGHT,
            lines: WEIGHT_LINES,
            holes: WEIGHT_HOLES,
            bumpiness: WEIGHT_BUMPINESS,
        }
    }
}

/// A heuristic weight that is negative, infinite or NaN.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
#[display("advisor weight `{name}` must be a finite non-negative number, got {value}")]
pub struct WeightsError {
    name: &'static str,
    value: f32,
}

impl HeuristicWeights {
    pub fn validate(&self) -> Result<(), WeightsError> {
        let named = [
            ("height", self.height),
            ("lines", self.lines),
            ("holes", self.holes),
            ("bumpiness", self.bumpiness),
        ];
        for (name, value) in named {
            if !value.is_finite() || value < 0.0 {
                return Err(WeightsError { name, value });
            }
        }
        Ok(())
    }
}

/// Scores the board that results from a placement. Higher is better.
pub trait PlacementEvaluator: fmt::Debug + Send + Sync {
    fn evaluate_placement(&self, analysis: &BoardAnalysis<'_>) -> f32;
}

/// Linear combination of aggregate height, complete lines, holes and bumpiness.
///
/// ```
/// use neontris_advisor::{BoardAnalysis, HeuristicEvaluator, HeuristicWeights, PlacementEvaluator};
/// use neontris_engine::Board;
///
/// let evaluator = HeuristicEvaluator::new(HeuristicWeights::default()).unwrap();
/// let board = Board::new();
/// assert_eq!(evaluator.evaluate_placement(&BoardAnalysis::new(&board)), 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct HeuristicEvaluator {
    weights: HeuristicWeights,
}

impl Default for HeuristicEvaluator {
    fn default() -> Self {
        Self {
            weights: HeuristicWeights::default(),
        }
    }
}

impl HeuristicEvaluator {
    pub fn new(weights: HeuristicWeights) -> Result<Self, WeightsError> {
        weights.validate()?;
        Ok(Self { weights })
    }
}

impl PlacementEvaluator for HeuristicEvaluator {
    #[expect(clippy::cast_precision_loss)]
    fn evaluate_placement(&self, analysis: &BoardAnalysis<'_>) -> f32 {
        let w = &self.weights;
        -w.height * analysis.aggregate_height() as f32
            + w.lines * analysis.complete_lines() as f32
            - w.holes * analysis.holes() as f32
            - w.bumpiness * analysis.bumpiness() as f32
    }
}
