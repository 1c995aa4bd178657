use ndarray::{concatenate, s, Array1, Array2, ArrayView1, ArrayView2, Axis, Zip};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Serialize, Deserialize};
use tracing::{debug, trace};

use crate::activations::Activation;
use crate::config::DdpgConfig;
use crate::error::{DdpgError, Result};
use crate::network::NeuralNetwork;
use crate::optimizer::{Optimizer, OptimizerKind, OptimizerWrapper};
use crate::replay_buffer::{ReplayBuffer, Transition, TransitionBatch};
use crate::target_network::{hard_update, soft_update};

/// Losses and value estimate from one learning step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LearnStats {
    /// Mean squared TD error of the critic before its update
    pub critic_loss: f32,
    /// Negative mean Q of the actor's actions under the updated critic
    pub actor_loss: f32,
    /// Mean critic estimate on the sampled state-action pairs
    pub mean_q: f32,
}

/// Deep Deterministic Policy Gradient agent.
///
/// Owns the actor and critic, their target copies, one optimizer per live
/// network, and the replay buffer. Nothing outside the agent can mutate them;
/// accessors hand out shared references only.
///
/// ```rust
/// use ddpg::algorithms::DdpgBuilder;
/// use ndarray::array;
///
/// let agent = DdpgBuilder::new(3, 1)
///     .action_bound(2.0)
///     .hidden_sizes(vec![32, 32], vec![32, 32])
///     .seed(42)
///     .build()
///     .unwrap();
///
/// let action = agent.act(array![1.0, 0.0, 0.5].view()).unwrap();
/// assert!(action[0].abs() <= 2.0);
/// ```
#[derive(Debug, Clone)]
pub struct DdpgAgent {
    actor: NeuralNetwork,
    actor_target: NeuralNetwork,
    critic: NeuralNetwork,
    critic_target: NeuralNetwork,
    actor_optimizer: OptimizerWrapper,
    critic_optimizer: OptimizerWrapper,
    buffer: ReplayBuffer,
    config: DdpgConfig,
    state_dim: usize,
    action_dim: usize,
    action_bound: f32,
    learn_steps: usize,
    rng: StdRng,
}

impl DdpgAgent {
    /// Build an agent for an environment with `state_dim` observations and
    /// `action_dim` actions bounded by `action_bound`.
    pub fn new(state_dim: usize, action_dim: usize, action_bound: f32, config: DdpgConfig) -> Result<Self> {
        config.validate()?;
        if state_dim == 0 || action_dim == 0 {
            return Err(DdpgError::invalid_parameter(
                "dimensions".to_string(),
                format!("state_dim and action_dim must be positive, got {} and {}", state_dim, action_dim),
            ));
        }
        if !(action_bound.is_finite() && action_bound > 0.0) {
            return Err(DdpgError::invalid_parameter(
                "action_bound".to_string(),
                format!("must be positive and finite, got {}", action_bound),
            ));
        }

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut actor_sizes = vec![state_dim];
        actor_sizes.extend_from_slice(&config.actor_hidden_sizes);
        actor_sizes.push(action_dim);
        let actor_activations = vec![Activation::Relu; config.actor_hidden_sizes.len()]
            .into_iter()
            .chain(std::iter::once(Activation::Tanh))
            .collect::<Vec<_>>();

        let mut critic_sizes = vec![state_dim + action_dim];
        critic_sizes.extend_from_slice(&config.critic_hidden_sizes);
        critic_sizes.push(1);
        let critic_activations = vec![Activation::Relu; config.critic_hidden_sizes.len()]
            .into_iter()
            .chain(std::iter::once(Activation::Linear))
            .collect::<Vec<_>>();

        let actor = NeuralNetwork::new(&actor_sizes, &actor_activations, config.weight_init, &mut rng)?;
        let critic = NeuralNetwork::new(&critic_sizes, &critic_activations, config.weight_init, &mut rng)?;

        // Targets start from their own draw and are then overwritten with τ = 1.
        let mut actor_target = NeuralNetwork::new(&actor_sizes, &actor_activations, config.weight_init, &mut rng)?;
        let mut critic_target = NeuralNetwork::new(&critic_sizes, &critic_activations, config.weight_init, &mut rng)?;
        hard_update(&actor, &mut actor_target)?;
        hard_update(&critic, &mut critic_target)?;

        let actor_optimizer = config.optimizer.build(&actor);
        let critic_optimizer = config.optimizer.build(&critic);
        let buffer = ReplayBuffer::new(config.buffer_capacity)?;

        debug!(
            state_dim,
            action_dim,
            action_bound,
            actor_params = actor.parameter_count(),
            critic_params = critic.parameter_count(),
            "built DDPG agent"
        );

        Ok(DdpgAgent {
            actor,
            actor_target,
            critic,
            critic_target,
            actor_optimizer,
            critic_optimizer,
            buffer,
            config,
            state_dim,
            action_dim,
            action_bound,
            learn_steps: 0,
            rng,
        })
    }

    /// Deterministic policy action for `state`, scaled to `[-action_bound, action_bound]`.
    pub fn act(&self, state: ArrayView1<f32>) -> Result<Array1<f32>> {
        DdpgError::check_width("state", self.state_dim, state.len())?;
        let action = self.actor.predict(state)?;
        Ok(action * self.action_bound)
    }

    /// Add a transition to the replay buffer after checking its dimensions.
    pub fn store(&mut self, transition: Transition) -> Result<()> {
        DdpgError::check_width("state", self.state_dim, transition.state.len())?;
        DdpgError::check_width("action", self.action_dim, transition.action.len())?;
        DdpgError::check_width("next state", self.state_dim, transition.next_state.len())?;
        self.buffer.store(transition);
        Ok(())
    }

    pub fn remember(
        &mut self,
        state: Array1<f32>,
        action: Array1<f32>,
        reward: f32,
        next_state: Array1<f32>,
        done: bool,
    ) -> Result<()> {
        self.store(Transition {
            state,
            action,
            reward,
            next_state,
            done,
        })
    }

    /// Sample a batch and run one learning step.
    ///
    /// Returns `Ok(None)` without touching any network while the buffer holds
    /// fewer than `batch_size` transitions.
    pub fn replay(&mut self) -> Result<Option<LearnStats>> {
        let batch = match self.buffer.sample(self.config.batch_size, &mut self.rng) {
            Some(sampled) => TransitionBatch::from_transitions(&sampled, self.state_dim, self.action_dim)?,
            None => {
                trace!(stored = self.buffer.len(), batch_size = self.config.batch_size, "not enough transitions to learn");
                return Ok(None);
            }
        };
        self.train_on_batch(&batch).map(Some)
    }

    /// Bootstrapped critic targets `y = r + γ (1 - done) Q'(s', π'(s'))`.
    ///
    /// Terminal rows get exactly `r`.
    pub fn compute_targets(&self, batch: &TransitionBatch) -> Result<Array2<f32>> {
        self.check_batch(batch)?;
        let next_actions = self.actor_target.predict_batch(batch.next_states.view())? * self.action_bound;
        let next_q = self
            .critic_target
            .predict_batch(state_action(batch.next_states.view(), next_actions.view())?.view())?;

        let gamma = self.config.gamma;
        let mut targets = Array2::zeros(batch.rewards.dim());
        Zip::from(&mut targets)
            .and(&batch.rewards)
            .and(&batch.dones)
            .and(&next_q)
            .for_each(|y, &r, &done, &q| {
                *y = if done > 0.5 { r } else { r + gamma * q };
            });
        Ok(targets)
    }

    /// Critic step, then actor step against the updated critic, then target sync.
    pub fn train_on_batch(&mut self, batch: &TransitionBatch) -> Result<LearnStats> {
        if batch.is_empty() {
            return Err(DdpgError::EmptyBatch);
        }
        let targets = self.compute_targets(batch)?;
        let n = batch.len() as f32;

        // Critic: minimize mean (Q(s, a) - y)^2 with y held constant.
        let q = self
            .critic
            .forward_batch(state_action(batch.states.view(), batch.actions.view())?.view())?;
        let td_error = &q - &targets;
        let critic_loss = td_error.mapv(|e| e * e).sum() / n;
        let mean_q = q.mean().unwrap_or(0.0);
        let (critic_grads, _) = self.critic.backward_batch((td_error * (2.0 / n)).view())?;
        self.critic_optimizer
            .apply(&mut self.critic, &critic_grads, self.config.critic_learning_rate)?;

        // Actor: minimize -mean Q(s, π(s)) through the critic's action input.
        let raw_actions = self.actor.forward_batch(batch.states.view())?;
        let policy_actions = &raw_actions * self.action_bound;
        let policy_q = self
            .critic
            .forward_batch(state_action(batch.states.view(), policy_actions.view())?.view())?;
        let actor_loss = -policy_q.sum() / n;
        let dloss_dq = Array2::from_elem(policy_q.dim(), -1.0 / n);
        let (_, critic_input_grad) = self.critic.backward_batch(dloss_dq.view())?;
        let dloss_draw = critic_input_grad.slice(s![.., self.state_dim..]).to_owned() * self.action_bound;
        let (actor_grads, _) = self.actor.backward_batch(dloss_draw.view())?;
        self.actor_optimizer
            .apply(&mut self.actor, &actor_grads, self.config.actor_learning_rate)?;

        soft_update(&self.actor, &mut self.actor_target, self.config.tau)?;
        soft_update(&self.critic, &mut self.critic_target, self.config.tau)?;

        self.learn_steps += 1;
        trace!(step = self.learn_steps, critic_loss, actor_loss, mean_q, "learning step");

        Ok(LearnStats {
            critic_loss,
            actor_loss,
            mean_q,
        })
    }

    fn check_batch(&self, batch: &TransitionBatch) -> Result<()> {
        DdpgError::check_width("batch states", self.state_dim, batch.states.ncols())?;
        DdpgError::check_width("batch actions", self.action_dim, batch.actions.ncols())?;
        DdpgError::check_width("batch next states", self.state_dim, batch.next_states.ncols())?;
        let rows = batch.len();
        for (what, matrix) in [
            ("actions", &batch.actions),
            ("rewards", &batch.rewards),
            ("next states", &batch.next_states),
            ("dones", &batch.dones),
        ] {
            if matrix.nrows() != rows {
                return Err(DdpgError::dimension_mismatch(
                    format!("{} with {} rows", what, rows),
                    format!("{} rows", matrix.nrows()),
                ));
            }
        }
        Ok(())
    }

    pub fn actor(&self) -> &NeuralNetwork {
        &self.actor
    }

    pub fn critic(&self) -> &NeuralNetwork {
        &self.critic
    }

    pub fn actor_target(&self) -> &NeuralNetwork {
        &self.actor_target
    }

    pub fn critic_target(&self) -> &NeuralNetwork {
        &self.critic_target
    }

    pub fn buffer(&self) -> &ReplayBuffer {
        &self.buffer
    }

    pub fn config(&self) -> &DdpgConfig {
        &self.config
    }

    pub fn state_dim(&self) -> usize {
        self.state_dim
    }

    pub fn action_dim(&self) -> usize {
        self.action_dim
    }

    pub fn action_bound(&self) -> f32 {
        self.action_bound
    }

    /// Number of completed learning steps.
    pub fn learn_steps(&self) -> usize {
        self.learn_steps
    }
}

/// Critic input: states and actions side by side.
fn state_action<'a>(states: ArrayView2<'a, f32>, actions: ArrayView2<'a, f32>) -> Result<Array2<f32>> {
    concatenate(Axis(1), &[states, actions]).map_err(|_| {
        DdpgError::dimension_mismatch(
            format!("{} action rows", states.nrows()),
            format!("{}", actions.nrows()),
        )
    })
}

/// Builder for DdpgAgent
pub struct DdpgBuilder {
    state_dim: usize,
    action_dim: usize,
    action_bound: f32,
    config: DdpgConfig,
}

impl DdpgBuilder {
    pub fn new(state_dim: usize, action_dim: usize) -> Self {
        DdpgBuilder {
            state_dim,
            action_dim,
            action_bound: 1.0,
            config: DdpgConfig::default(),
        }
    }

    pub fn config(mut self, config: DdpgConfig) -> Self {
        self.config = config;
        self
    }

    pub fn action_bound(mut self, bound: f32) -> Self {
        self.action_bound = bound;
        self
    }

    pub fn gamma(mut self, gamma: f32) -> Self {
        self.config.gamma = gamma;
        self
    }

    pub fn tau(mut self, tau: f32) -> Self {
        self.config.tau = tau;
        self
    }

    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.config.batch_size = batch_size;
        self
    }

    pub fn learning_rates(mut self, actor: f32, critic: f32) -> Self {
        self.config.actor_learning_rate = actor;
        self.config.critic_learning_rate = critic;
        self
    }

    pub fn hidden_sizes(mut self, actor: Vec<usize>, critic: Vec<usize>) -> Self {
        self.config.actor_hidden_sizes = actor;
        self.config.critic_hidden_sizes = critic;
        self
    }

    pub fn buffer_capacity(mut self, capacity: usize) -> Self {
        self.config.buffer_capacity = capacity;
        self
    }

    pub fn optimizer(mut self, optimizer: OptimizerKind) -> Self {
        self.config.optimizer = optimizer;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn build(self) -> Result<DdpgAgent> {
        DdpgAgent::new(self.state_dim, self.action_dim, self.action_bound, self.config)
    }
}
