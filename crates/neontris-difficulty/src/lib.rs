//! Adaptive gravity for neontris.
//!
//! The [`DifficultyController`] watches how the player is doing and shortens or
//! lengthens the interval between gravity steps:
//!
//! - every locked piece becomes a [`PerformanceSample`] in a bounded [`SampleWindow`]
//! - [`RollingMetrics`] turn the window into score per minute, lines per minute and
//!   advice adherence
//! - [`DifficultyConfig::skill`] blends them into a single value in `[0, 1]`, which maps
//!   to a target interval the controller approaches in small steps
//!
//! The controller only reads the session clock it is given, so it is fully
//! deterministic under test.

pub use self::{config::*, controller::*, metrics::*, sample::*};

mod config;
mod controller;
mod metrics;
mod sample;
