//! Business logic services

pub mod draws;
pub mod prediction;
pub mod subscription;

pub use draws::DrawHistory;
pub use prediction::{PredictionConfig, PredictionService};
pub use subscription::SubscriptionState;
