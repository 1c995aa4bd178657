//! Pendulum swing-up solved with DDPG
//!
//! ```text
//! cargo run --release --example pendulum_ddpg -- --episodes 200 --seed 7
//! RUST_LOG=debug cargo run --example pendulum_ddpg -- --config ddpg.json
//! ```

use clap::Parser;
use ddpg::algorithms::DdpgAgent;
use ddpg::config::DdpgConfig;
use ddpg::environment::{ActionSpace, Environment, ObservationSpace, Step};
use ddpg::error::BoxError;
use ddpg::trainer::{Trainer, TrainerConfig};
use ndarray::{array, Array1, ArrayView1};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::PI;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Train a DDPG agent on the pendulum swing-up task")]
struct Args {
    /// Number of training episodes
    #[arg(long, default_value_t = 100)]
    episodes: usize,

    /// Seed for the agent and the environment
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// JSON file with agent hyperparameters
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Observation is `[cos θ, sin θ, θ̇]`, action is a torque in `[-2, 2]`.
struct Pendulum {
    theta: f32,
    theta_dot: f32,
    max_speed: f32,
    max_torque: f32,
    dt: f32,
    gravity: f32,
    mass: f32,
    length: f32,
    steps: usize,
    max_steps: usize,
    rng: StdRng,
}

impl Pendulum {
    fn new(seed: u64) -> Self {
        Pendulum {
            theta: 0.0,
            theta_dot: 0.0,
            max_speed: 8.0,
            max_torque: 2.0,
            dt: 0.05,
            gravity: 10.0,
            mass: 1.0,
            length: 1.0,
            steps: 0,
            max_steps: 200,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn observation(&self) -> Array1<f32> {
        array![self.theta.cos(), self.theta.sin(), self.theta_dot]
    }
}

fn angle_normalize(angle: f32) -> f32 {
    (angle + PI).rem_euclid(2.0 * PI) - PI
}

impl Environment for Pendulum {
    fn observation_space(&self) -> ObservationSpace {
        ObservationSpace { dim: 3 }
    }

    fn action_space(&self) -> ActionSpace {
        ActionSpace { dim: 1, bound: self.max_torque }
    }

    fn reset(&mut self) -> Result<Array1<f32>, BoxError> {
        self.theta = self.rng.gen_range(-PI..PI);
        self.theta_dot = self.rng.gen_range(-1.0..1.0);
        self.steps = 0;
        Ok(self.observation())
    }

    fn step(&mut self, action: ArrayView1<f32>) -> Result<Step, BoxError> {
        let torque = action[0].clamp(-self.max_torque, self.max_torque);
        let cost = angle_normalize(self.theta).powi(2) + 0.1 * self.theta_dot.powi(2) + 0.001 * torque.powi(2);

        let acceleration = -3.0 * self.gravity / (2.0 * self.length) * self.theta.sin()
            + 3.0 / (self.mass * self.length.powi(2)) * torque;
        self.theta_dot = (self.theta_dot + acceleration * self.dt).clamp(-self.max_speed, self.max_speed);
        self.theta += self.theta_dot * self.dt;
        self.steps += 1;

        Ok(Step::new(self.observation(), -cost, self.steps >= self.max_steps))
    }
}

fn main() -> Result<(), BoxError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => DdpgConfig::from_file(path)?,
        None => DdpgConfig::default(),
    };
    config.seed.get_or_insert(args.seed);

    let mut env = Pendulum::new(args.seed);
    let space = env.action_space();
    let mut agent = DdpgAgent::new(env.observation_space().dim, space.dim, space.bound, config)?;

    let trainer = Trainer::new(TrainerConfig {
        episodes: args.episodes,
        max_steps_per_episode: None,
    });
    let history = trainer.train_with(&mut agent, &mut env, |report| {
        if report.episode % 10 == 9 {
            info!(learn_steps = report.learn_steps, "finished episode {}", report.episode + 1);
        }
    })?;

    let averages = history.moving_average(10);
    if let Some(last) = averages.last() {
        println!("average reward over the last 10 episodes: {:.2}", last);
    }
    if let Some(best) = history.best_reward() {
        println!("best episode reward: {:.2}", best);
    }
    println!("learning steps: {}", history.learn_steps);
    Ok(())
}
