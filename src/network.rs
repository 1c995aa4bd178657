use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::activations::Activation;
use crate::error::{DdpgError, Result};
use crate::layers::{DenseLayer, LayerGradients, WeightInit};

/// A feed-forward network of dense layers.
///
/// The network owns its parameters only; optimizer state lives in a separate
/// [`OptimizerWrapper`](crate::optimizer::OptimizerWrapper) so that a network
/// can be cloned into a target copy without dragging moment estimates along.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(try_from = "LayerStack")]
pub struct NeuralNetwork {
    pub layers: Vec<DenseLayer>,
}

/// Serialized form, checked by [`NeuralNetwork::with_layers`] on the way in.
#[derive(Deserialize)]
struct LayerStack {
    layers: Vec<DenseLayer>,
}

impl TryFrom<LayerStack> for NeuralNetwork {
    type Error = DdpgError;

    fn try_from(stack: LayerStack) -> Result<Self> {
        NeuralNetwork::with_layers(stack.layers)
    }
}

impl NeuralNetwork {
    /// Create a network with the given layer sizes and per-layer activations.
    /// `layer_sizes` includes the input width, so it has one more entry than `activations`.
    pub fn new<R: Rng + ?Sized>(
        layer_sizes: &[usize],
        activations: &[Activation],
        init: WeightInit,
        rng: &mut R,
    ) -> Result<Self> {
        if layer_sizes.len() < 2 {
            return Err(DdpgError::invalid_parameter(
                "layer_sizes".to_string(),
                format!("need at least an input and an output size, got {:?}", layer_sizes),
            ));
        }
        if layer_sizes.len() - 1 != activations.len() {
            return Err(DdpgError::dimension_mismatch(
                format!("{} activations", layer_sizes.len() - 1),
                format!("{}", activations.len()),
            ));
        }
        if let Some(pos) = layer_sizes.iter().position(|&size| size == 0) {
            return Err(DdpgError::invalid_parameter(
                "layer_sizes".to_string(),
                format!("layer {} has zero units", pos),
            ));
        }
        init.validate()?;

        let layers = layer_sizes
            .windows(2)
            .zip(activations.iter())
            .map(|(window, &activation)| DenseLayer::new(window[0], window[1], activation, init, rng))
            .collect::<Vec<_>>();

        Ok(NeuralNetwork { layers })
    }

    pub fn with_layers(layers: Vec<DenseLayer>) -> Result<Self> {
        if layers.is_empty() {
            return Err(DdpgError::invalid_parameter("layers", "network needs at least one layer"));
        }
        for (i, pair) in layers.windows(2).enumerate() {
            if pair[0].output_size() != pair[1].input_size() {
                return Err(DdpgError::dimension_mismatch(
                    format!("layer {} input of width {}", i + 1, pair[0].output_size()),
                    format!("width {}", pair[1].input_size()),
                ));
            }
        }
        Ok(NeuralNetwork { layers })
    }

    /// Width of the first layer's input, 0 for a network without layers.
    pub fn input_size(&self) -> usize {
        self.layers.first().map_or(0, DenseLayer::input_size)
    }

    pub fn output_size(&self) -> usize {
        self.layers.last().map_or(0, DenseLayer::output_size)
    }

    pub fn parameter_count(&self) -> usize {
        self.layers
            .iter()
            .map(|layer| layer.weights.len() + layer.biases.len())
            .sum()
    }

    /// All weights and biases, layer by layer, flattened into one vector.
    pub fn flat_parameters(&self) -> Array1<f32> {
        self.layers
            .iter()
            .flat_map(|layer| layer.weights.iter().chain(layer.biases.iter()).copied())
            .collect()
    }

    /// Whether both networks have the same layer shapes and activations.
    pub fn same_architecture(&self, other: &NeuralNetwork) -> bool {
        self.layers.len() == other.layers.len()
            && self.layers.iter().zip(other.layers.iter()).all(|(a, b)| {
                a.weights.dim() == b.weights.dim() && a.activation == b.activation
            })
    }

    fn check_input(&self, width: usize) -> Result<()> {
        if self.layers.is_empty() {
            return Err(DdpgError::invalid_parameter("layers", "network has no layers"));
        }
        DdpgError::check_width("network input", self.input_size(), width)
    }

    /// Forward pass for a single input vector.
    pub fn predict(&self, input: ArrayView1<f32>) -> Result<Array1<f32>> {
        let output = self.predict_batch(input.insert_axis(Axis(0)))?;
        Ok(output.index_axis_move(Axis(0), 0))
    }

    /// Forward pass for a batch of inputs, one row per sample. Leaves the backprop cache alone.
    pub fn predict_batch(&self, inputs: ArrayView2<f32>) -> Result<Array2<f32>> {
        self.check_input(inputs.ncols())?;
        let mut current_output = inputs.to_owned();
        for layer in &self.layers {
            current_output = layer.predict_batch(current_output.view());
        }
        Ok(current_output)
    }

    /// Forward pass that caches intermediate values for a following `backward_batch`.
    pub fn forward_batch(&mut self, inputs: ArrayView2<f32>) -> Result<Array2<f32>> {
        self.check_input(inputs.ncols())?;
        let mut current_output = inputs.to_owned();
        for layer in &mut self.layers {
            current_output = layer.forward_batch(current_output.view());
        }
        Ok(current_output)
    }

    /// Backpropagate dLoss/dOutput through the cached forward pass.
    ///
    /// Returns the per-layer parameter gradients (input layer first) and the
    /// gradient with respect to the network input.
    pub fn backward_batch(&self, output_errors: ArrayView2<f32>) -> Result<(Vec<LayerGradients>, Array2<f32>)> {
        let mut gradients = Vec::with_capacity(self.layers.len());
        let mut current_error = output_errors.to_owned();

        for layer in self.layers.iter().rev() {
            let backward = layer.backward_batch(current_error.view())?;
            gradients.push(backward.gradients);
            current_error = backward.input_grad;
        }

        gradients.reverse();
        Ok((gradients, current_error))
    }
}
