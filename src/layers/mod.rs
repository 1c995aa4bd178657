pub mod dense;
pub mod initialization;

pub use dense::{DenseLayer, LayerBackward, LayerGradients};
pub use initialization::WeightInit;
