//! # RL Algorithms Module
//!
//! - **DDPG (Deep Deterministic Policy Gradient)**
//!   - Off-policy actor-critic for continuous action spaces
//!   - Deterministic tanh policy scaled to the environment's action bound
//!   - Critic trained on bootstrapped targets from slowly tracking target networks
//!   - Uniform experience replay
//!
//! ## Learning step
//!
//! 1. Sample a batch from the replay buffer (skipped while warming up)
//! 2. `y = r + γ (1 - done) Q'(s', π'(s'))`
//! 3. One critic step on `mean (Q(s, a) - y)^2`
//! 4. One actor step on `-mean Q(s, π(s))` using the updated critic
//! 5. Soft-update both target networks with rate τ

pub mod ddpg;

pub use ddpg::{DdpgAgent, DdpgBuilder, LearnStats};
