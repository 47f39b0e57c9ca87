pub mod classifier;
pub mod models;

pub use classifier::RiskClassifier;
pub use models::*;
