//! HTTP front for a hosted SAG mill throughput model.
//!
//! Accepts eight process readings as JSON, forwards them as one CSV row to a
//! SageMaker endpoint and relays the predicted tonnage per hour.

pub mod config;
pub mod error;
pub mod inference;
pub mod models;
pub mod routes;

pub use config::Settings;
pub use error::PredictError;
pub use inference::{PredictionClient, SageMakerRuntime};
pub use models::{PredictionInput, PredictionOutput};
pub use routes::AppState;
