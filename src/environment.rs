//! The contract an environment must satisfy to be driven by the [`Trainer`](crate::trainer::Trainer).

use ndarray::{Array1, ArrayView1};
use serde::{Serialize, Deserialize};

use crate::error::BoxError;

/// Shape of the observation vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObservationSpace {
    pub dim: usize,
}

/// Shape of the action vector and its symmetric per-dimension bound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActionSpace {
    pub dim: usize,
    /// Maximum action magnitude; valid actions lie in `[-bound, bound]`
    pub bound: f32,
}

/// Additional information from a step
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepInfo {
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

/// Result of a single environment step
#[derive(Debug, Clone)]
pub struct Step {
    pub next_state: Array1<f32>,
    pub reward: f32,
    /// Whether the episode ended at this step
    pub done: bool,
    pub info: StepInfo,
}

impl Step {
    pub fn new(next_state: Array1<f32>, reward: f32, done: bool) -> Self {
        Step {
            next_state,
            reward,
            done,
            info: StepInfo::default(),
        }
    }
}

/// A continuous-control environment.
///
/// Calls are blocking. Errors are returned to the trainer untouched and end
/// the training run.
pub trait Environment {
    fn observation_space(&self) -> ObservationSpace;

    fn action_space(&self) -> ActionSpace;

    /// Start a new episode and return its initial state.
    fn reset(&mut self) -> Result<Array1<f32>, BoxError>;

    /// Advance the simulation by one step.
    fn step(&mut self, action: ArrayView1<f32>) -> Result<Step, BoxError>;
}
