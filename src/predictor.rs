use std::sync::Arc;

use chrono::Utc;
use rand::Rng;

use crate::error::ApiError;
use crate::features::{self, FEATURE_COUNT};
use crate::insights;
use crate::knowledge::KnowledgeBase;
use crate::recommend;
use crate::scorer::SuccessScorer;
use crate::types::{PredictionRequest, PredictionResponse};

const KNOWN_SPECIES_CONFIDENCE: f64 = 0.5;
const UNKNOWN_SPECIES_CONFIDENCE: f64 = 0.2;

pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Composes feature derivation, scoring and every generator into one
/// response. Holds only read-only state, so one instance serves all
/// requests concurrently.
pub struct Predictor {
    knowledge: KnowledgeBase,
    scorer: SuccessScorer,
    log_features: bool,
}

impl Predictor {
    pub fn new(knowledge: KnowledgeBase, scorer: SuccessScorer) -> Self {
        Self {
            knowledge,
            scorer,
            log_features: false,
        }
    }

    /// Built-in knowledge base, no model.
    pub fn heuristic() -> Self {
        let kb = KnowledgeBase::builtin();
        Self::new(kb, SuccessScorer::heuristic(kb))
    }

    /// Log a digest of every feature vector.
    pub fn with_feature_logging(mut self, enabled: bool) -> Self {
        self.log_features = enabled;
        self
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn model_loaded(&self) -> bool {
        self.scorer.model_loaded()
    }

    /// One forward pass on a zero vector so lazy backends are ready before
    /// the first request.
    pub fn warmup(&self) -> anyhow::Result<()> {
        if let Some(model) = self.scorer.model() {
            model.predict_probability(&[0.0; FEATURE_COUNT])?;
            tracing::info!("warmup forward ok");
        }
        Ok(())
    }

    pub fn predict(&self, request: &PredictionRequest) -> PredictionResponse {
        self.predict_with_rng(request, &mut rand::thread_rng())
    }

    /// As [`Predictor::predict`], drawing the placeholder spots from `rng`.
    pub fn predict_with_rng<R: Rng>(&self, request: &PredictionRequest, rng: &mut R) -> PredictionResponse {
        let species = request.species();
        tracing::info!(
            "generating prediction for {} at ({}, {})",
            species,
            request.latitude(),
            request.longitude()
        );

        let features = features::derive(request);
        if self.log_features {
            tracing::info!("features species={} {}", species, features.summary());
        }

        let score = self.scorer.score(request, &features);
        let kb = &self.knowledge;
        let known = kb.is_known(species);

        let confidence = score.probability * 0.5
            + if known {
                KNOWN_SPECIES_CONFIDENCE
            } else {
                UNKNOWN_SPECIES_CONFIDENCE
            };

        tracing::debug!(
            "species={} season={} time_of_day={} p={:.3} via {:?}",
            species,
            features.season.as_str(),
            features.time_of_day.as_str(),
            score.probability,
            score.strategy
        );

        PredictionResponse {
            species: species.to_string(),
            success_probability: round2(score.probability),
            best_time: insights::best_time(kb, species),
            baits: recommend::baits(kb, request),
            lures: recommend::lures(kb, request, &features),
            rigs: recommend::rigs(kb, request),
            techniques: recommend::techniques(kb, request),
            nearby_spots: recommend::nearby_spots(request, rng),
            weather_impact: insights::weather_impact(request.conditions()),
            seasonal_notes: insights::seasonal_notes(kb, features.season),
            confidence_score: round2(confidence),
            model_used: score.strategy,
            prediction_timestamp: Utc::now(),
        }
    }
}

/// Inbound entry point. Inference may block, so the prediction runs on the
/// blocking pool; a panic there surfaces as an internal error and no partial
/// response.
pub async fn generate_prediction(
    predictor: Arc<Predictor>,
    request: PredictionRequest,
) -> Result<PredictionResponse, ApiError> {
    tokio::task::spawn_blocking(move || predictor.predict(&request))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))
}
