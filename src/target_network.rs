//! Target network synchronization.
//!
//! Target networks are lagged copies of the live actor and critic used to
//! compute bootstrap targets. They are never trained directly; instead their
//! parameters track the live ones through Polyak averaging:
//!
//! ```text
//! θ_target = τ * θ_live + (1 - τ) * θ_target
//! ```
//!
//! τ = 1 is a hard copy and is used once, when the agent is built.

use ndarray::Zip;

use crate::error::{DdpgError, Result};
use crate::network::NeuralNetwork;

/// Blend `live` parameters into `target` with rate `tau` in `(0, 1]`.
///
/// `live` is only read. Both networks must share the same architecture.
///
/// ```rust
/// use ddpg::activations::Activation;
/// use ddpg::layers::WeightInit;
/// use ddpg::network::NeuralNetwork;
/// use ddpg::target_network::soft_update;
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let mut rng = StdRng::seed_from_u64(0);
/// let live = NeuralNetwork::new(&[2, 1], &[Activation::Linear], WeightInit::Uniform { min: 1.0, max: 1.5 }, &mut rng).unwrap();
/// let mut target = NeuralNetwork::new(&[2, 1], &[Activation::Linear], WeightInit::Zeros, &mut rng).unwrap();
///
/// soft_update(&live, &mut target, 0.5).unwrap();
/// assert_eq!(target.layers[0].weights[[0, 0]], 0.5 * live.layers[0].weights[[0, 0]]);
/// ```
pub fn soft_update(live: &NeuralNetwork, target: &mut NeuralNetwork, tau: f32) -> Result<()> {
    if !(tau > 0.0 && tau <= 1.0) {
        return Err(DdpgError::invalid_parameter(
            "tau".to_string(),
            format!("must lie in (0, 1], got {}", tau),
        ));
    }
    if !live.same_architecture(target) {
        return Err(DdpgError::dimension_mismatch(
            describe(live),
            describe(target),
        ));
    }

    if tau == 1.0 {
        for (target_layer, live_layer) in target.layers.iter_mut().zip(live.layers.iter()) {
            target_layer.weights.assign(&live_layer.weights);
            target_layer.biases.assign(&live_layer.biases);
        }
        return Ok(());
    }

    let keep = 1.0 - tau;
    for (target_layer, live_layer) in target.layers.iter_mut().zip(live.layers.iter()) {
        Zip::from(&mut target_layer.weights)
            .and(&live_layer.weights)
            .for_each(|t, &l| *t = tau * l + keep * *t);
        Zip::from(&mut target_layer.biases)
            .and(&live_layer.biases)
            .for_each(|t, &l| *t = tau * l + keep * *t);
    }
    Ok(())
}

/// Exact copy of `live` into `target`.
pub fn hard_update(live: &NeuralNetwork, target: &mut NeuralNetwork) -> Result<()> {
    soft_update(live, target, 1.0)
}

fn describe(network: &NeuralNetwork) -> String {
    let shapes = network
        .layers
        .iter()
        .map(|layer| format!("{}x{}", layer.input_size(), layer.output_size()))
        .collect::<Vec<_>>();
    format!("network [{}]", shapes.join(", "))
}
