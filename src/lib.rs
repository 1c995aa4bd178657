//! # DDPG - Deep Deterministic Policy Gradient for continuous control
//!
//! An off-policy actor-critic agent built on `ndarray`: dense networks with
//! hand-written backpropagation, per-network optimizer state, Polyak-averaged
//! target networks, and a uniform replay buffer.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ddpg::algorithms::DdpgBuilder;
//! use ddpg::trainer::{Trainer, TrainerConfig};
//! # use ddpg::environment::{ActionSpace, Environment, ObservationSpace, Step};
//! # use ddpg::error::BoxError;
//! # use ndarray::{Array1, ArrayView1};
//! # struct MyEnv;
//! # impl Environment for MyEnv {
//! #     fn observation_space(&self) -> ObservationSpace { ObservationSpace { dim: 3 } }
//! #     fn action_space(&self) -> ActionSpace { ActionSpace { dim: 1, bound: 2.0 } }
//! #     fn reset(&mut self) -> Result<Array1<f32>, BoxError> { Ok(Array1::zeros(3)) }
//! #     fn step(&mut self, _a: ArrayView1<f32>) -> Result<Step, BoxError> { Ok(Step::new(Array1::zeros(3), 0.0, true)) }
//! # }
//!
//! let mut env = MyEnv;
//! let mut agent = DdpgBuilder::new(3, 1).action_bound(2.0).seed(1).build().unwrap();
//!
//! let history = Trainer::new(TrainerConfig::default())
//!     .train(&mut agent, &mut env)
//!     .unwrap();
//! println!("best episode: {:?}", history.best_reward());
//! ```
//!
//! ## Module Organization
//!
//! - [`activations`] - ReLU, Tanh and Linear activations
//! - [`algorithms`] - The DDPG agent and its builder
//! - [`config`] - Agent hyperparameters
//! - [`environment`] - Environment contract consumed by the trainer
//! - [`error`] - Error types and result handling
//! - [`layers`] - Dense layers and weight initialization
//! - [`network`] - Feed-forward networks with forward/backward passes
//! - [`optimizer`] - SGD and Adam with explicit per-network state
//! - [`replay_buffer`] - Experience replay
//! - [`target_network`] - Soft and hard target updates
//! - [`trainer`] - Episode loop and reward history

pub mod activations;
pub mod algorithms;
pub mod config;
pub mod environment;
pub mod error;
pub mod layers;
pub mod network;
pub mod optimizer;
pub mod replay_buffer;
pub mod target_network;
pub mod trainer;

pub use algorithms::{DdpgAgent, DdpgBuilder, LearnStats};
pub use config::DdpgConfig;
pub use error::{DdpgError, Result};

#[cfg(test)]
mod tests;
