//! Utility helpers: geometric queries, gradient noise, logging and profiling.

pub mod logging;
pub mod math;
pub mod noise;
pub mod profiling;

pub use math::*;
pub use profiling::StepProfiler;
