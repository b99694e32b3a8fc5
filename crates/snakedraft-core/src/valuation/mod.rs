pub mod classifier;
pub mod monte_carlo;
pub mod sampler;
pub mod weights;
