use crate::config::DdpgConfig;
use crate::error::DdpgError;
use crate::layers::WeightInit;
use crate::optimizer::OptimizerKind;

#[test]
fn test_defaults() {
    let config = DdpgConfig::default();
    assert_eq!(config.gamma, 0.99);
    assert_eq!(config.tau, 0.005);
    assert_eq!(config.batch_size, 64);
    assert_eq!(config.actor_learning_rate, 0.001);
    assert_eq!(config.critic_learning_rate, 0.002);
    assert_eq!(config.buffer_capacity, 1_000_000);
    assert_eq!(config.actor_hidden_sizes, vec![400, 300]);
    assert_eq!(config.critic_hidden_sizes, vec![400, 300]);
    assert_eq!(config.optimizer, OptimizerKind::Adam);
    assert_eq!(config.seed, None);
    assert!(config.validate().is_ok());
}

#[test]
fn test_partial_json_uses_defaults() {
    let config = DdpgConfig::from_json_str(r#"{ "tau": 0.01, "optimizer": "Sgd", "seed": 3 }"#).unwrap();
    assert_eq!(config.tau, 0.01);
    assert_eq!(config.optimizer, OptimizerKind::Sgd);
    assert_eq!(config.seed, Some(3));
    assert_eq!(config.batch_size, 64);
}

#[test]
fn test_json_round_trip() {
    let config = DdpgConfig {
        weight_init: WeightInit::Uniform { min: -0.05, max: 0.05 },
        actor_hidden_sizes: vec![64],
        ..DdpgConfig::default()
    };
    let json = config.to_json_string().unwrap();
    assert_eq!(DdpgConfig::from_json_str(&json).unwrap(), config);
}

#[test]
fn test_invalid_values_are_rejected() {
    let cases = [
        DdpgConfig { tau: 0.0, ..DdpgConfig::default() },
        DdpgConfig { tau: 1.5, ..DdpgConfig::default() },
        DdpgConfig { gamma: 1.2, ..DdpgConfig::default() },
        DdpgConfig { batch_size: 0, ..DdpgConfig::default() },
        DdpgConfig { buffer_capacity: 10, batch_size: 64, ..DdpgConfig::default() },
        DdpgConfig { actor_learning_rate: 0.0, ..DdpgConfig::default() },
        DdpgConfig { critic_learning_rate: f32::INFINITY, ..DdpgConfig::default() },
        DdpgConfig { critic_hidden_sizes: vec![400, 0], ..DdpgConfig::default() },
    ];
    for config in cases {
        assert!(matches!(config.validate(), Err(DdpgError::InvalidParameter { .. })));
    }
}

#[test]
fn test_malformed_json() {
    assert!(matches!(
        DdpgConfig::from_json_str("{ \"gamma\": "),
        Err(DdpgError::Serialization(_))
    ));
    assert!(matches!(
        DdpgConfig::from_json_str(r#"{ "tau": 2.0 }"#),
        Err(DdpgError::InvalidParameter { .. })
    ));
}

#[test]
fn test_missing_file() {
    assert!(matches!(
        DdpgConfig::from_file("/nonexistent/ddpg.json"),
        Err(DdpgError::Io(_))
    ));
}
