//! # Activation Functions Module
//!
//! Non-linearities used by the actor and critic networks.
//!
//! - **ReLU**: `max(0, x)`, used in every hidden layer
//! - **Tanh**: squashes the actor output into `[-1, 1]` before action scaling
//! - **Linear**: identity, used for the critic's unbounded Q-value output
//!
//! ```rust
//! use ddpg::activations::Activation;
//! use ndarray::array;
//!
//! let mut data = array![[1.0, -0.5, 0.0, 2.0]];
//! Activation::Relu.apply_batch(&mut data);
//! assert_eq!(data, array![[1.0, 0.0, 0.0, 2.0]]);
//! ```

pub mod functions;

pub use functions::Activation;
