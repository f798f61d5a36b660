//! Catch-success prediction and gear recommendations for recreational
//! fishing.
//!
//! [`predictor::Predictor`] is the entry point: it derives features from a
//! validated [`types::PredictionRequest`], scores it with a learned model or
//! the knowledge-base heuristic, and assembles bait, lure, rig, technique and
//! spot suggestions alongside weather and seasonal insights.

pub mod api;
pub mod config;
pub mod error;
pub mod features;
pub mod insights;
pub mod knowledge;
pub mod model;
pub mod predictor;
pub mod recommend;
pub mod scorer;
pub mod types;

pub use error::{ApiError, ValidationError};
pub use predictor::{generate_prediction, Predictor};
pub use types::{PredictionRequest, PredictionResponse, RequestParams};
