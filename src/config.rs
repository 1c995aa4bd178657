//! Agent hyperparameters.
//!
//! A [`DdpgConfig`] is fixed when the agent is built. Missing fields in a JSON
//! document fall back to the defaults below.
//!
//! ```rust
//! use ddpg::config::DdpgConfig;
//!
//! let config = DdpgConfig::from_json_str(r#"{ "batch_size": 32, "seed": 7 }"#).unwrap();
//! assert_eq!(config.batch_size, 32);
//! assert_eq!(config.gamma, 0.99);
//! ```

use serde::{Serialize, Deserialize};
use std::path::Path;

use crate::error::{DdpgError, Result};
use crate::layers::WeightInit;
use crate::optimizer::OptimizerKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DdpgConfig {
    /// Discount factor γ
    pub gamma: f32,
    /// Soft-update rate τ
    pub tau: f32,
    pub batch_size: usize,
    pub actor_learning_rate: f32,
    pub critic_learning_rate: f32,
    /// Maximum number of stored transitions
    pub buffer_capacity: usize,
    pub actor_hidden_sizes: Vec<usize>,
    pub critic_hidden_sizes: Vec<usize>,
    pub optimizer: OptimizerKind,
    pub weight_init: WeightInit,
    /// Seed for weight initialization and batch sampling; entropy when absent
    pub seed: Option<u64>,
}

impl Default for DdpgConfig {
    fn default() -> Self {
        DdpgConfig {
            gamma: 0.99,
            tau: 0.005,
            batch_size: 64,
            actor_learning_rate: 0.001,
            critic_learning_rate: 0.002,
            buffer_capacity: 1_000_000,
            actor_hidden_sizes: vec![400, 300],
            critic_hidden_sizes: vec![400, 300],
            optimizer: OptimizerKind::Adam,
            weight_init: WeightInit::XavierUniform,
            seed: None,
        }
    }
}

impl DdpgConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.gamma) {
            return Err(DdpgError::invalid_parameter(
                "gamma".to_string(),
                format!("must lie in [0, 1], got {}", self.gamma),
            ));
        }
        if !(self.tau > 0.0 && self.tau <= 1.0) {
            return Err(DdpgError::invalid_parameter(
                "tau".to_string(),
                format!("must lie in (0, 1], got {}", self.tau),
            ));
        }
        if self.batch_size == 0 {
            return Err(DdpgError::invalid_parameter("batch_size", "must be at least 1"));
        }
        if self.buffer_capacity < self.batch_size {
            return Err(DdpgError::invalid_parameter(
                "buffer_capacity".to_string(),
                format!(
                    "capacity {} cannot hold a batch of {}",
                    self.buffer_capacity, self.batch_size
                ),
            ));
        }
        for (name, lr) in [
            ("actor_learning_rate", self.actor_learning_rate),
            ("critic_learning_rate", self.critic_learning_rate),
        ] {
            if !(lr.is_finite() && lr > 0.0) {
                return Err(DdpgError::invalid_parameter(
                    name.to_string(),
                    format!("must be positive and finite, got {}", lr),
                ));
            }
        }
        for (name, sizes) in [
            ("actor_hidden_sizes", &self.actor_hidden_sizes),
            ("critic_hidden_sizes", &self.critic_hidden_sizes),
        ] {
            if sizes.iter().any(|&units| units == 0) {
                return Err(DdpgError::invalid_parameter(name, "hidden layers need at least one unit"));
            }
        }
        self.weight_init.validate()
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: DdpgConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a JSON config file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
