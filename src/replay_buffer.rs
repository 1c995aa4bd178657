use ndarray::{Array1, Array2};
use rand::Rng;
use serde::{Serialize, Deserialize};
use std::collections::VecDeque;

use crate::error::{DdpgError, Result};

/// One environment step as seen by the agent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub state: Array1<f32>,
    pub action: Array1<f32>,
    pub reward: f32,
    pub next_state: Array1<f32>,
    pub done: bool,
}

/// Fixed-capacity FIFO experience store with uniform sampling.
#[derive(Clone, Debug)]
pub struct ReplayBuffer {
    buffer: VecDeque<Transition>,
    capacity: usize,
}

impl ReplayBuffer {
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(DdpgError::invalid_parameter(
                "capacity",
                "Capacity must be greater than 0",
            ));
        }
        Ok(ReplayBuffer {
            // Large buffers grow on demand rather than reserving up front.
            buffer: VecDeque::with_capacity(capacity.min(4096)),
            capacity,
        })
    }

    /// Append a transition, evicting the oldest one first when full.
    pub fn store(&mut self, transition: Transition) {
        if self.buffer.len() == self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(transition);
    }

    /// Draw `batch_size` distinct transitions uniformly at random.
    ///
    /// Returns `None` while fewer than `batch_size` transitions are stored.
    pub fn sample<R: Rng + ?Sized>(&self, batch_size: usize, rng: &mut R) -> Option<Vec<&Transition>> {
        if self.buffer.len() < batch_size {
            return None;
        }
        let indices = rand::seq::index::sample(rng, self.buffer.len(), batch_size);
        Some(indices.into_iter().map(|i| &self.buffer[i]).collect())
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Stored transitions, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Transition> {
        self.buffer.iter()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

/// Transitions stacked row-wise into batch matrices.
#[derive(Clone, Debug)]
pub struct TransitionBatch {
    /// `[batch, state_dim]`
    pub states: Array2<f32>,
    /// `[batch, action_dim]`
    pub actions: Array2<f32>,
    /// `[batch, 1]`
    pub rewards: Array2<f32>,
    /// `[batch, state_dim]`
    pub next_states: Array2<f32>,
    /// `[batch, 1]`, 1.0 for terminal transitions
    pub dones: Array2<f32>,
}

impl TransitionBatch {
    pub fn from_transitions(batch: &[&Transition], state_dim: usize, action_dim: usize) -> Result<Self> {
        if batch.is_empty() {
            return Err(DdpgError::EmptyBatch);
        }
        let rows = batch.len();
        let mut states = Array2::zeros((rows, state_dim));
        let mut actions = Array2::zeros((rows, action_dim));
        let mut rewards = Array2::zeros((rows, 1));
        let mut next_states = Array2::zeros((rows, state_dim));
        let mut dones = Array2::zeros((rows, 1));

        for (i, transition) in batch.iter().enumerate() {
            DdpgError::check_width("state", state_dim, transition.state.len())?;
            DdpgError::check_width("action", action_dim, transition.action.len())?;
            DdpgError::check_width("next state", state_dim, transition.next_state.len())?;

            states.row_mut(i).assign(&transition.state);
            actions.row_mut(i).assign(&transition.action);
            rewards[[i, 0]] = transition.reward;
            next_states.row_mut(i).assign(&transition.next_state);
            dones[[i, 0]] = if transition.done { 1.0 } else { 0.0 };
        }

        Ok(TransitionBatch {
            states,
            actions,
            rewards,
            next_states,
            dones,
        })
    }

    pub fn len(&self) -> usize {
        self.states.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
