use std::path::Path;

use crate::features::DerivedFeatures;
use crate::knowledge::KnowledgeBase;
use crate::model::{self, SuccessModel};
use crate::types::{PredictionRequest, Strategy};

pub const BASE_PROBABILITY: f64 = 0.5;
/// Heuristic results never claim certainty or impossibility.
pub const HEURISTIC_FLOOR: f64 = 0.1;
pub const HEURISTIC_CEILING: f64 = 0.95;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score {
    pub probability: f64,
    pub strategy: Strategy,
}

/// Deterministic rules over the species and seasonal profiles.
#[derive(Debug, Clone, Copy)]
pub struct HeuristicScorer {
    knowledge: KnowledgeBase,
}

impl HeuristicScorer {
    pub fn new(knowledge: KnowledgeBase) -> Self {
        Self { knowledge }
    }

    /// Base probability plus the species-specific terms, before the seasonal
    /// factor and clamping. Unknown species get the bare base.
    pub fn species_adjusted(&self, request: &PredictionRequest, features: &DerivedFeatures) -> f64 {
        let mut p = BASE_PROBABILITY;
        let Some(profile) = self.knowledge.species(request.species()) else {
            return p;
        };
        let c = request.conditions();

        if profile.is_active(features.time_of_day) {
            p += 0.15;
        }

        if let Some(t) = c.water_temp {
            if profile.optimal_temp.contains(t) {
                p += 0.15;
            } else if (t - profile.optimal_temp.midpoint()).abs() > 10.0 {
                p -= 0.2;
            }
        }

        if c.depth.is_some_and(|d| profile.optimal_depth.contains(d)) {
            p += 0.1;
        }

        if c.bottom_type.is_some_and(|b| profile.prefers(b)) {
            p += 0.1;
        }

        if c.wind_speed.is_some_and(|w| w > 10.0) {
            p -= 0.1;
        }

        p
    }

    pub fn score(&self, request: &PredictionRequest, features: &DerivedFeatures) -> Score {
        let factor = self.knowledge.seasonal(features.season).adjustment;
        let p = self.species_adjusted(request, features) * factor;
        Score {
            probability: p.clamp(HEURISTIC_FLOOR, HEURISTIC_CEILING),
            strategy: Strategy::Heuristic,
        }
    }
}

/// Learned model with a per-request heuristic fallback.
pub struct ModelScorer {
    model: Box<dyn SuccessModel>,
    fallback: HeuristicScorer,
}

impl ModelScorer {
    pub fn score(&self, request: &PredictionRequest, features: &DerivedFeatures) -> Score {
        match self.model.predict_probability(&features.vector) {
            Ok(p) if (0.0..=1.0).contains(&p) => Score {
                probability: p as f64,
                strategy: Strategy::Model,
            },
            Ok(p) => {
                tracing::warn!(
                    "{} model returned invalid probability {}, using heuristics",
                    self.model.name(),
                    p
                );
                self.fallback.score(request, features)
            }
            Err(e) => {
                tracing::warn!("{} model prediction failed: {:#}, using heuristics", self.model.name(), e);
                self.fallback.score(request, features)
            }
        }
    }
}

/// Scoring strategy, fixed at startup by whether a model artifact loaded.
pub enum SuccessScorer {
    Heuristic(HeuristicScorer),
    Model(ModelScorer),
}

impl SuccessScorer {
    pub fn heuristic(knowledge: KnowledgeBase) -> Self {
        SuccessScorer::Heuristic(HeuristicScorer::new(knowledge))
    }

    pub fn with_model(model: Box<dyn SuccessModel>, knowledge: KnowledgeBase) -> Self {
        SuccessScorer::Model(ModelScorer {
            model,
            fallback: HeuristicScorer::new(knowledge),
        })
    }

    /// A missing or unloadable artifact is not fatal: the scorer runs on
    /// heuristics alone.
    pub fn from_artifact(path: Option<&Path>, knowledge: KnowledgeBase) -> Self {
        let Some(path) = path else {
            tracing::info!("no model artifact configured; using heuristics");
            return Self::heuristic(knowledge);
        };
        match model::load_model(path) {
            Ok(m) => {
                tracing::info!("loaded {} success model from {}", m.name(), path.display());
                Self::with_model(m, knowledge)
            }
            Err(e) => {
                tracing::warn!("could not load model {}: {:#}; using heuristics", path.display(), e);
                Self::heuristic(knowledge)
            }
        }
    }

    pub fn model(&self) -> Option<&dyn SuccessModel> {
        match self {
            SuccessScorer::Heuristic(_) => None,
            SuccessScorer::Model(m) => Some(m.model.as_ref()),
        }
    }

    pub fn model_loaded(&self) -> bool {
        self.model().is_some()
    }

    pub fn score(&self, request: &PredictionRequest, features: &DerivedFeatures) -> Score {
        match self {
            SuccessScorer::Heuristic(h) => h.score(request, features),
            SuccessScorer::Model(m) => m.score(request, features),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::derive;
    use crate::types::{BottomType, RequestParams};
    use anyhow::{anyhow, Result};
    use chrono::NaiveDate;

    struct FixedModel(f32);

    impl SuccessModel for FixedModel {
        fn name(&self) -> &str {
            "fixed"
        }
        fn predict_probability(&self, _features: &[f32]) -> Result<f32> {
            Ok(self.0)
        }
    }

    struct BrokenModel;

    impl SuccessModel for BrokenModel {
        fn name(&self) -> &str {
            "broken"
        }
        fn predict_probability(&self, _features: &[f32]) -> Result<f32> {
            Err(anyhow!("tensor shape mismatch"))
        }
    }

    fn params(species: &str, month: u32, hour: u32) -> RequestParams {
        let mut p = RequestParams::new(species, 55.7, 12.6);
        p.timestamp = NaiveDate::from_ymd_opt(2024, month, 10).and_then(|d| d.and_hms_opt(hour, 0, 0));
        p
    }

    fn run(scorer: &SuccessScorer, p: RequestParams) -> Score {
        let req = p.validate().unwrap();
        let f = derive(&req);
        scorer.score(&req, &f)
    }

    #[test]
    fn favourable_pike_conditions_beat_base() {
        let mut p = params("Gedde", 4, 6);
        p.water_temp = Some(15.0);
        p.bottom_type = Some(BottomType::Vegetation);
        let req = p.validate().unwrap();
        let f = derive(&req);

        let h = HeuristicScorer::new(KnowledgeBase::builtin());
        assert!(h.species_adjusted(&req, &f) > BASE_PROBABILITY);
        // 0.5 + 0.15 (active) + 0.15 (temp) + 0.1 (bottom), spring factor 1.0
        let s = h.score(&req, &f);
        assert!((s.probability - 0.9).abs() < 1e-9, "got {}", s.probability);
        assert_eq!(s.strategy, Strategy::Heuristic);
    }

    #[test]
    fn temperature_bounds_are_inclusive() {
        let scorer = SuccessScorer::heuristic(KnowledgeBase::builtin());
        // afternoon is not an active pike time, spring factor 1.0
        let mut p = params("Gedde", 4, 13);
        p.water_temp = Some(10.0);
        assert!((run(&scorer, p).probability - 0.65).abs() < 1e-9);

        let mut p = params("Gedde", 4, 13);
        p.water_temp = Some(20.0);
        assert!((run(&scorer, p).probability - 0.65).abs() < 1e-9);
    }

    #[test]
    fn temperature_middle_band_is_neutral() {
        let scorer = SuccessScorer::heuristic(KnowledgeBase::builtin());
        // 22°C: outside [10, 20] but only 7 from the midpoint
        let mut p = params("Gedde", 4, 13);
        p.water_temp = Some(22.0);
        assert!((run(&scorer, p).probability - 0.5).abs() < 1e-9);

        // 30°C: 15 from the midpoint
        let mut p = params("Gedde", 4, 13);
        p.water_temp = Some(30.0);
        assert!((run(&scorer, p).probability - 0.3).abs() < 1e-9);
    }

    #[test]
    fn wind_and_season_adjust() {
        let scorer = SuccessScorer::heuristic(KnowledgeBase::builtin());
        let mut p = params("Aborre", 1, 13);
        p.wind_speed = Some(14.0);
        // (0.5 + 0.15 active - 0.1 wind) * 0.7 winter
        assert!((run(&scorer, p).probability - 0.385).abs() < 1e-9);
    }

    #[test]
    fn clamped_to_ceiling() {
        let scorer = SuccessScorer::heuristic(KnowledgeBase::builtin());
        let mut p = params("Gedde", 7, 6);
        p.water_temp = Some(15.0);
        p.depth = Some(3.0);
        p.bottom_type = Some(BottomType::Mixed);
        assert_eq!(run(&scorer, p).probability, HEURISTIC_CEILING);
    }

    #[test]
    fn unknown_species_gets_seasonal_base() {
        let scorer = SuccessScorer::heuristic(KnowledgeBase::builtin());
        let mut p = params("UnknownFish", 7, 6);
        p.water_temp = Some(15.0);
        p.wind_speed = Some(20.0);
        assert!((run(&scorer, p).probability - 0.6).abs() < 1e-9);
        assert!((run(&scorer, params("UnknownFish", 12, 6)).probability - 0.35).abs() < 1e-9);
    }

    #[test]
    fn model_path_is_labelled_and_unclamped() {
        let scorer = SuccessScorer::with_model(Box::new(FixedModel(0.99)), KnowledgeBase::builtin());
        assert!(scorer.model_loaded());
        let s = run(&scorer, params("Gedde", 4, 6));
        assert_eq!(s.strategy, Strategy::Model);
        assert!((s.probability - 0.99).abs() < 1e-6);
    }

    #[test]
    fn failing_model_falls_back() {
        let scorer = SuccessScorer::with_model(Box::new(BrokenModel), KnowledgeBase::builtin());
        let s = run(&scorer, params("UnknownFish", 4, 6));
        assert_eq!(s.strategy, Strategy::Heuristic);
        assert!((s.probability - 0.5).abs() < 1e-9);
    }

    #[test]
    fn invalid_model_output_falls_back() {
        for bad in [f32::NAN, 1.5, -0.1] {
            let scorer = SuccessScorer::with_model(Box::new(FixedModel(bad)), KnowledgeBase::builtin());
            assert_eq!(run(&scorer, params("Gedde", 4, 6)).strategy, Strategy::Heuristic);
        }
    }

    #[test]
    fn missing_artifact_means_heuristics() {
        let kb = KnowledgeBase::builtin();
        assert!(!SuccessScorer::from_artifact(None, kb).model_loaded());
        let scorer = SuccessScorer::from_artifact(Some(Path::new("/nonexistent/success_model.json")), kb);
        assert!(!scorer.model_loaded());
    }
}
