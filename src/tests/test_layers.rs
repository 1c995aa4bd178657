use ndarray::{array, Array2};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::activations::Activation;
use crate::error::DdpgError;
use crate::layers::{DenseLayer, WeightInit};

fn rng() -> StdRng {
    StdRng::seed_from_u64(7)
}

#[test]
fn test_dense_layer_shapes() {
    let layer = DenseLayer::new(3, 5, Activation::Relu, WeightInit::XavierUniform, &mut rng());
    assert_eq!(layer.weights.shape(), [3, 5]);
    assert_eq!(layer.biases.shape(), [5]);
    assert_eq!(layer.input_size(), 3);
    assert_eq!(layer.output_size(), 5);
    assert!(layer.biases.iter().all(|&b| b == 0.0));
}

#[test]
fn test_xavier_limits() {
    let layer = DenseLayer::new(400, 300, Activation::Relu, WeightInit::XavierUniform, &mut rng());
    let limit = (6.0f32 / 700.0).sqrt();
    assert!(layer.weights.iter().all(|w| w.abs() <= limit));
}

#[test]
fn test_seeded_initialization_is_reproducible() {
    let a = DenseLayer::new(4, 4, Activation::Tanh, WeightInit::HeUniform, &mut rng());
    let b = DenseLayer::new(4, 4, Activation::Tanh, WeightInit::HeUniform, &mut rng());
    assert_eq!(a.weights, b.weights);
}

#[test]
fn test_uniform_init_validation() {
    assert!(WeightInit::Uniform { min: -0.1, max: 0.1 }.validate().is_ok());
    assert!(matches!(
        WeightInit::Uniform { min: 0.5, max: 0.5 }.validate(),
        Err(DdpgError::InvalidParameter { .. })
    ));
}

#[test]
fn test_forward_known_weights() {
    let layer = DenseLayer::new(2, 2, Activation::Relu, WeightInit::Zeros, &mut rng())
        .with_weights(array![[1.0, -1.0], [2.0, 0.5]])
        .unwrap()
        .with_biases(array![0.5, -3.0])
        .unwrap();

    let output = layer.predict_batch(array![[1.0, 1.0]].view());
    assert_eq!(output, array![[3.5, 0.0]]);
}

#[test]
fn test_with_weights_rejects_wrong_shape() {
    let layer = DenseLayer::new(2, 2, Activation::Relu, WeightInit::Zeros, &mut rng());
    let result = layer.with_weights(Array2::zeros((3, 2)));
    assert!(matches!(result, Err(DdpgError::DimensionMismatch { .. })));
}

#[test]
fn test_backward_requires_forward() {
    let layer = DenseLayer::new(2, 1, Activation::Linear, WeightInit::XavierUniform, &mut rng());
    let result = layer.backward_batch(array![[1.0]].view());
    assert!(matches!(result, Err(DdpgError::TrainingError(_))));
}

#[test]
fn test_backward_linear_layer() {
    let mut layer = DenseLayer::new(2, 1, Activation::Linear, WeightInit::Zeros, &mut rng())
        .with_weights(array![[2.0], [-1.0]])
        .unwrap();
    let inputs = array![[1.0, 3.0], [0.5, -1.0]];
    layer.forward_batch(inputs.view());

    let backward = layer.backward_batch(array![[1.0], [2.0]].view()).unwrap();
    // dW = X^T g, db = sum g, dX = g W^T
    assert_eq!(backward.gradients.weights, array![[2.0], [1.0]]);
    assert_eq!(backward.gradients.biases, array![3.0]);
    assert_eq!(backward.input_grad, array![[2.0, -1.0], [4.0, -2.0]]);
}
