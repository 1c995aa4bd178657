pub mod test_config;
pub mod test_layers;
pub mod test_replay_buffer;
