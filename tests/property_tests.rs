#[cfg(test)]
mod property_tests {
    use ddpg::activations::Activation;
    use ddpg::algorithms::DdpgBuilder;
    use ddpg::layers::WeightInit;
    use ddpg::network::NeuralNetwork;
    use ddpg::replay_buffer::{ReplayBuffer, Transition};
    use ddpg::target_network::soft_update;
    use ndarray::Array1;
    use proptest::prelude::*;
    use rand::{rngs::StdRng, SeedableRng};
    use std::collections::HashSet;

    fn transition(id: usize) -> Transition {
        Transition {
            state: Array1::from_elem(2, id as f32),
            action: Array1::from_elem(1, 0.0),
            reward: id as f32,
            next_state: Array1::from_elem(2, id as f32 + 1.0),
            done: false,
        }
    }

    fn state_strategy(size: usize) -> impl Strategy<Value = Array1<f32>> {
        prop::collection::vec(-1e3f32..1e3, size).prop_map(Array1::from_vec)
    }

    proptest! {
        #[test]
        fn test_buffer_keeps_most_recent(capacity in 1usize..64, stored in 0usize..200) {
            let mut buffer = ReplayBuffer::new(capacity).unwrap();
            for id in 0..stored {
                buffer.store(transition(id));
            }

            prop_assert_eq!(buffer.len(), stored.min(capacity));
            let kept = buffer.iter().map(|t| t.reward as usize).collect::<Vec<_>>();
            let expected = (stored.saturating_sub(capacity)..stored).collect::<Vec<_>>();
            prop_assert_eq!(kept, expected);
        }

        #[test]
        fn test_sample_is_distinct_and_live(
            capacity in 1usize..64,
            stored in 0usize..150,
            batch_size in 1usize..32,
            seed in any::<u64>(),
        ) {
            let mut buffer = ReplayBuffer::new(capacity).unwrap();
            for id in 0..stored {
                buffer.store(transition(id));
            }
            let mut rng = StdRng::seed_from_u64(seed);

            match buffer.sample(batch_size, &mut rng) {
                None => prop_assert!(buffer.len() < batch_size),
                Some(batch) => {
                    prop_assert_eq!(batch.len(), batch_size);
                    let ids = batch.iter().map(|t| t.reward as usize).collect::<HashSet<_>>();
                    prop_assert_eq!(ids.len(), batch_size);
                    let oldest = stored.saturating_sub(capacity);
                    prop_assert!(ids.iter().all(|&id| id >= oldest && id < stored));
                }
            }
        }

        #[test]
        fn test_soft_update_blends(tau in 0.001f32..=1.0, seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let sizes = [3, 5, 2];
            let activations = [Activation::Relu, Activation::Tanh];
            let live = NeuralNetwork::new(&sizes, &activations, WeightInit::XavierUniform, &mut rng).unwrap();
            let mut target = NeuralNetwork::new(&sizes, &activations, WeightInit::Uniform { min: -1.0, max: 1.0 }, &mut rng).unwrap();
            let before = target.flat_parameters();

            soft_update(&live, &mut target, tau).unwrap();

            let live_params = live.flat_parameters();
            let after = target.flat_parameters();
            for i in 0..after.len() {
                let expected = tau * live_params[i] + (1.0 - tau) * before[i];
                prop_assert!((after[i] - expected).abs() < 1e-5);
            }
            prop_assert_eq!(live.flat_parameters(), live_params);
        }

        #[test]
        fn test_actions_within_bound(
            state in state_strategy(4),
            bound in 0.1f32..10.0,
            seed in 0u64..16,
        ) {
            let agent = DdpgBuilder::new(4, 2)
                .action_bound(bound)
                .hidden_sizes(vec![8, 8], vec![8, 8])
                .buffer_capacity(8)
                .batch_size(4)
                .seed(seed)
                .build()
                .unwrap();

            let action = agent.act(state.view()).unwrap();
            prop_assert_eq!(action.len(), 2);
            prop_assert!(action.iter().all(|a| a.is_finite() && a.abs() <= bound));
        }
    }
}
