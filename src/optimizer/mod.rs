//! Optimizers with explicit per-network state.
//!
//! Each network is paired with its own [`OptimizerWrapper`]; moment estimates
//! are indexed by layer so the same optimizer must always be applied to the
//! network it was built for.

use ndarray::{Array1, Array2, Zip};
use serde::{Serialize, Deserialize};

use crate::error::{DdpgError, Result};
use crate::layers::LayerGradients;
use crate::network::NeuralNetwork;

pub trait Optimizer {
    fn update_weights(&mut self, layer: usize, weights: &mut Array2<f32>, gradients: &Array2<f32>, learning_rate: f32);
    fn update_biases(&mut self, layer: usize, biases: &mut Array1<f32>, gradients: &Array1<f32>, learning_rate: f32);

    /// Called once after every layer of the network has been updated.
    fn finish_step(&mut self) {}

    /// Number of layers this optimizer keeps state for, if it keeps any.
    fn layer_count(&self) -> Option<usize> {
        None
    }

    /// Apply one gradient-descent step to every layer of `network`.
    fn apply(&mut self, network: &mut NeuralNetwork, gradients: &[LayerGradients], learning_rate: f32) -> Result<()> {
        if gradients.len() != network.layers.len() {
            return Err(DdpgError::TrainingError(format!(
                "got gradients for {} layers, network has {}",
                gradients.len(),
                network.layers.len()
            )));
        }
        if let Some(count) = self.layer_count() {
            if count != network.layers.len() {
                return Err(DdpgError::TrainingError(format!(
                    "optimizer tracks {} layers, network has {}",
                    count,
                    network.layers.len()
                )));
            }
        }
        for (i, (layer, grads)) in network.layers.iter_mut().zip(gradients).enumerate() {
            if layer.weights.dim() != grads.weights.dim() || layer.biases.dim() != grads.biases.dim() {
                return Err(DdpgError::dimension_mismatch(
                    format!("layer {} gradients {:?}", i, layer.weights.dim()),
                    format!("{:?}", grads.weights.dim()),
                ));
            }
            self.update_weights(i, &mut layer.weights, &grads.weights, learning_rate);
            self.update_biases(i, &mut layer.biases, &grads.biases, learning_rate);
        }
        self.finish_step();
        Ok(())
    }
}

/// Which optimizer to build for each network.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OptimizerKind {
    Sgd,
    #[default]
    Adam,
}

impl OptimizerKind {
    /// Build fresh optimizer state sized for `network`.
    pub fn build(&self, network: &NeuralNetwork) -> OptimizerWrapper {
        match self {
            OptimizerKind::Sgd => OptimizerWrapper::SGD(SGD::new()),
            OptimizerKind::Adam => OptimizerWrapper::Adam(Adam::default(network)),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub enum OptimizerWrapper {
    SGD(SGD),
    Adam(Adam),
}

impl Optimizer for OptimizerWrapper {
    fn update_weights(&mut self, layer: usize, weights: &mut Array2<f32>, gradients: &Array2<f32>, learning_rate: f32) {
        match self {
            OptimizerWrapper::SGD(optimizer) => optimizer.update_weights(layer, weights, gradients, learning_rate),
            OptimizerWrapper::Adam(optimizer) => optimizer.update_weights(layer, weights, gradients, learning_rate),
        }
    }

    fn update_biases(&mut self, layer: usize, biases: &mut Array1<f32>, gradients: &Array1<f32>, learning_rate: f32) {
        match self {
            OptimizerWrapper::SGD(optimizer) => optimizer.update_biases(layer, biases, gradients, learning_rate),
            OptimizerWrapper::Adam(optimizer) => optimizer.update_biases(layer, biases, gradients, learning_rate),
        }
    }

    fn finish_step(&mut self) {
        match self {
            OptimizerWrapper::SGD(optimizer) => optimizer.finish_step(),
            OptimizerWrapper::Adam(optimizer) => optimizer.finish_step(),
        }
    }

    fn layer_count(&self) -> Option<usize> {
        match self {
            OptimizerWrapper::SGD(optimizer) => optimizer.layer_count(),
            OptimizerWrapper::Adam(optimizer) => optimizer.layer_count(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SGD;

impl SGD {
    pub fn new() -> SGD {
        SGD
    }
}

impl Default for SGD {
    fn default() -> Self {
        Self::new()
    }
}

impl Optimizer for SGD {
    fn update_weights(&mut self, _layer: usize, weights: &mut Array2<f32>, gradients: &Array2<f32>, learning_rate: f32) {
        weights.zip_mut_with(gradients, |w, &g| *w -= learning_rate * g);
    }

    fn update_biases(&mut self, _layer: usize, biases: &mut Array1<f32>, gradients: &Array1<f32>, learning_rate: f32) {
        biases.zip_mut_with(gradients, |b, &g| *b -= learning_rate * g);
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Adam {
    pub beta1: f32,
    pub beta2: f32,
    pub epsilon: f32,
    m_weights: Vec<Array2<f32>>,
    v_weights: Vec<Array2<f32>>,
    m_biases: Vec<Array1<f32>>,
    v_biases: Vec<Array1<f32>>,
    /// Step number used for bias correction, starting at 1
    pub t: usize,
}

impl Adam {
    pub fn new(network: &NeuralNetwork, beta1: f32, beta2: f32, epsilon: f32) -> Self {
        let layers = &network.layers;
        Adam {
            beta1,
            beta2,
            epsilon,
            m_weights: layers.iter().map(|layer| Array2::zeros(layer.weights.dim())).collect(),
            v_weights: layers.iter().map(|layer| Array2::zeros(layer.weights.dim())).collect(),
            m_biases: layers.iter().map(|layer| Array1::zeros(layer.biases.dim())).collect(),
            v_biases: layers.iter().map(|layer| Array1::zeros(layer.biases.dim())).collect(),
            t: 1,
        }
    }

    pub fn default(network: &NeuralNetwork) -> Self {
        Self::new(network, 0.9, 0.999, 1e-8)
    }

    fn bias_corrections(&self) -> (f32, f32) {
        (
            1.0 - self.beta1.powi(self.t as i32),
            1.0 - self.beta2.powi(self.t as i32),
        )
    }
}

impl Optimizer for Adam {
    fn update_weights(&mut self, layer: usize, weights: &mut Array2<f32>, gradients: &Array2<f32>, learning_rate: f32) {
        let (c1, c2) = self.bias_corrections();
        let (beta1, beta2, epsilon) = (self.beta1, self.beta2, self.epsilon);
        let m = &mut self.m_weights[layer];
        let v = &mut self.v_weights[layer];

        Zip::from(weights)
            .and(m)
            .and(v)
            .and(gradients)
            .for_each(|w, m, v, &g| {
                *m = beta1 * *m + (1.0 - beta1) * g;
                *v = beta2 * *v + (1.0 - beta2) * g * g;
                let m_hat = *m / c1;
                let v_hat = *v / c2;
                *w -= learning_rate * m_hat / (v_hat.sqrt() + epsilon);
            });
    }

    fn update_biases(&mut self, layer: usize, biases: &mut Array1<f32>, gradients: &Array1<f32>, learning_rate: f32) {
        let (c1, c2) = self.bias_corrections();
        let (beta1, beta2, epsilon) = (self.beta1, self.beta2, self.epsilon);
        let m = &mut self.m_biases[layer];
        let v = &mut self.v_biases[layer];

        Zip::from(biases)
            .and(m)
            .and(v)
            .and(gradients)
            .for_each(|b, m, v, &g| {
                *m = beta1 * *m + (1.0 - beta1) * g;
                *v = beta2 * *v + (1.0 - beta2) * g * g;
                let m_hat = *m / c1;
                let v_hat = *v / c2;
                *b -= learning_rate * m_hat / (v_hat.sqrt() + epsilon);
            });
    }

    fn finish_step(&mut self) {
        self.t += 1;
    }

    fn layer_count(&self) -> Option<usize> {
        Some(self.m_weights.len())
    }
}
