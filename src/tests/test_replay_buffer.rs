use ndarray::array;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;

use crate::error::DdpgError;
use crate::replay_buffer::{ReplayBuffer, Transition, TransitionBatch};

fn transition(i: usize) -> Transition {
    Transition {
        state: array![i as f32, 0.0],
        action: array![-(i as f32)],
        reward: i as f32,
        next_state: array![(i + 1) as f32, 0.0],
        done: i % 5 == 4,
    }
}

#[test]
fn test_replay_buffer_store_and_sample() {
    let mut buffer = ReplayBuffer::new(10).unwrap();
    let mut rng = StdRng::seed_from_u64(0);
    buffer.store(transition(0));
    assert_eq!(buffer.len(), 1);

    let sample = buffer.sample(1, &mut rng).unwrap();
    assert_eq!(sample[0], &transition(0));
}

#[test]
fn test_zero_capacity_is_rejected() {
    assert!(matches!(ReplayBuffer::new(0), Err(DdpgError::InvalidParameter { .. })));
}

#[test]
fn test_replay_buffer_capacity_is_fifo() {
    let mut buffer = ReplayBuffer::new(3).unwrap();

    for i in 0..5 {
        buffer.store(transition(i));
        assert!(buffer.len() <= 3);
    }

    assert_eq!(buffer.len(), 3);
    assert_eq!(buffer.capacity(), 3);
    let rewards: Vec<f32> = buffer.iter().map(|t| t.reward).collect();
    assert_eq!(rewards, vec![2.0, 3.0, 4.0]);
}

#[test]
fn test_sample_requires_enough_data() {
    let mut buffer = ReplayBuffer::new(10).unwrap();
    let mut rng = StdRng::seed_from_u64(1);
    for i in 0..4 {
        buffer.store(transition(i));
    }
    assert!(buffer.sample(5, &mut rng).is_none());
    assert_eq!(buffer.sample(4, &mut rng).map(|s| s.len()), Some(4));
}

#[test]
fn test_sample_is_without_replacement() {
    let mut buffer = ReplayBuffer::new(100).unwrap();
    let mut rng = StdRng::seed_from_u64(2);
    for i in 0..50 {
        buffer.store(transition(i));
    }

    for _ in 0..20 {
        let sample = buffer.sample(50, &mut rng).unwrap();
        let distinct: HashSet<u32> = sample.iter().map(|t| t.reward as u32).collect();
        assert_eq!(distinct.len(), 50);
    }
}

#[test]
fn test_sample_only_returns_live_transitions() {
    let mut buffer = ReplayBuffer::new(8).unwrap();
    let mut rng = StdRng::seed_from_u64(3);
    for i in 0..20 {
        buffer.store(transition(i));
    }
    for _ in 0..20 {
        for t in buffer.sample(4, &mut rng).unwrap() {
            assert!(t.reward >= 12.0);
        }
    }
}

#[test]
fn test_clear() {
    let mut buffer = ReplayBuffer::new(4).unwrap();
    buffer.store(transition(0));
    buffer.clear();
    assert!(buffer.is_empty());
}

#[test]
fn test_batch_stacking() {
    let transitions = (0..5).map(transition).collect::<Vec<_>>();
    let refs = transitions.iter().collect::<Vec<_>>();

    let batch = TransitionBatch::from_transitions(&refs, 2, 1).unwrap();
    assert_eq!(batch.len(), 5);
    assert_eq!(batch.states.shape(), [5, 2]);
    assert_eq!(batch.actions.shape(), [5, 1]);
    assert_eq!(batch.rewards.shape(), [5, 1]);
    assert_eq!(batch.next_states.row(3), array![4.0, 0.0]);
    assert_eq!(batch.dones.column(0).to_vec(), vec![0.0, 0.0, 0.0, 0.0, 1.0]);
}

#[test]
fn test_batch_stacking_errors() {
    assert!(matches!(
        TransitionBatch::from_transitions(&[], 2, 1),
        Err(DdpgError::EmptyBatch)
    ));

    let t = transition(0);
    assert!(matches!(
        TransitionBatch::from_transitions(&[&t], 3, 1),
        Err(DdpgError::DimensionMismatch { .. })
    ));
}
