//! Episode loop driving a [`DdpgAgent`] against an [`Environment`].

use serde::{Serialize, Deserialize};
use tracing::{debug, info};

use crate::algorithms::DdpgAgent;
use crate::environment::Environment;
use crate::error::{DdpgError, Result};
use crate::replay_buffer::Transition;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    pub episodes: usize,
    /// Cut an episode after this many steps even if the environment has not
    /// signalled termination. The cut transition is stored as non-terminal.
    pub max_steps_per_episode: Option<usize>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        TrainerConfig {
            episodes: 100,
            max_steps_per_episode: None,
        }
    }
}

/// Summary emitted after each episode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpisodeReport {
    pub episode: usize,
    pub total_reward: f32,
    pub steps: usize,
    /// Learning steps actually taken during the episode
    pub learn_steps: usize,
}

/// Per-episode results of a training run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingHistory {
    pub episode_rewards: Vec<f32>,
    pub episode_lengths: Vec<usize>,
    pub learn_steps: usize,
}

impl TrainingHistory {
    fn record(&mut self, report: &EpisodeReport) {
        self.episode_rewards.push(report.total_reward);
        self.episode_lengths.push(report.steps);
        self.learn_steps += report.learn_steps;
    }

    pub fn episodes(&self) -> usize {
        self.episode_rewards.len()
    }

    pub fn best_reward(&self) -> Option<f32> {
        self.episode_rewards.iter().copied().reduce(f32::max)
    }

    /// Trailing mean over the last `window` episodes, one value per episode.
    pub fn moving_average(&self, window: usize) -> Vec<f32> {
        let window = window.max(1);
        (0..self.episode_rewards.len())
            .map(|end| {
                let start = (end + 1).saturating_sub(window);
                let slice = &self.episode_rewards[start..=end];
                slice.iter().sum::<f32>() / slice.len() as f32
            })
            .collect()
    }
}

pub struct Trainer {
    config: TrainerConfig,
}

impl Trainer {
    pub fn new(config: TrainerConfig) -> Self {
        Trainer { config }
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    pub fn train<E: Environment>(&self, agent: &mut DdpgAgent, env: &mut E) -> Result<TrainingHistory> {
        self.train_with(agent, env, |_| {})
    }

    /// Run all episodes, calling `on_episode` after each one.
    ///
    /// Any environment or agent error stops the run immediately.
    pub fn train_with<E, F>(&self, agent: &mut DdpgAgent, env: &mut E, mut on_episode: F) -> Result<TrainingHistory>
    where
        E: Environment,
        F: FnMut(&EpisodeReport),
    {
        check_compatible(agent, env)?;
        let mut history = TrainingHistory::default();

        for episode in 0..self.config.episodes {
            let report = self.run_episode(episode, agent, env)?;
            info!(
                episode = report.episode,
                steps = report.steps,
                "episode {} total reward {:.2}",
                report.episode,
                report.total_reward
            );
            history.record(&report);
            on_episode(&report);
        }

        debug!(
            episodes = history.episodes(),
            learn_steps = history.learn_steps,
            "training finished"
        );
        Ok(history)
    }

    fn run_episode<E: Environment>(&self, episode: usize, agent: &mut DdpgAgent, env: &mut E) -> Result<EpisodeReport> {
        let mut state = env.reset().map_err(DdpgError::Environment)?;
        let mut total_reward = 0.0;
        let mut steps = 0;
        let mut learn_steps = 0;

        loop {
            let action = agent.act(state.view())?;
            let step = env.step(action.view()).map_err(DdpgError::Environment)?;
            let done = step.done;

            agent.store(Transition {
                state,
                action,
                reward: step.reward,
                next_state: step.next_state.clone(),
                done,
            })?;
            if agent.replay()?.is_some() {
                learn_steps += 1;
            }

            state = step.next_state;
            total_reward += step.reward;
            steps += 1;

            let truncated = self
                .config
                .max_steps_per_episode
                .map_or(false, |limit| steps >= limit);
            if done || truncated {
                break;
            }
        }

        Ok(EpisodeReport {
            episode,
            total_reward,
            steps,
            learn_steps,
        })
    }
}

fn check_compatible<E: Environment>(agent: &DdpgAgent, env: &E) -> Result<()> {
    let observation = env.observation_space();
    let action = env.action_space();
    DdpgError::check_width("environment observation", agent.state_dim(), observation.dim)?;
    DdpgError::check_width("environment action", agent.action_dim(), action.dim)?;
    if action.bound != agent.action_bound() {
        return Err(DdpgError::invalid_parameter(
            "action_bound".to_string(),
            format!(
                "agent scales actions by {} but the environment allows {}",
                agent.action_bound(),
                action.bound
            ),
        ));
    }
    Ok(())
}
