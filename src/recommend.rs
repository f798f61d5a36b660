//! Gear, technique and spot suggestions. Each generator is independent and
//! returns nothing for species missing from the knowledge base.

use rand::Rng;

use crate::features::DerivedFeatures;
use crate::knowledge::KnowledgeBase;
use crate::types::{
    BaitRecommendation, LureRecommendation, PredictionRequest, RigRecommendation,
    SpotRecommendation, TechniqueRecommendation,
};

/// Entries taken from each ranked knowledge-base list.
pub const MAX_SUGGESTIONS: usize = 3;

pub const RIG_BASE_CONFIDENCE: f64 = 0.8;
pub const RIG_MAX_CONFIDENCE: f64 = 0.95;
pub const TECHNIQUE_CONFIDENCE: f64 = 0.8;

const GENERIC_TIPS: [&str; 3] = [
    "Be patient and vary your retrieve speed",
    "Stay responsive to changes in the weather",
    "Experiment with different depths",
];

pub const SPOT_COUNT: usize = 3;
pub const SPOT_MAX_OFFSET_DEG: f64 = 0.05;
/// Degrees to kilometres, equatorial approximation.
pub const KM_PER_DEGREE: f64 = 111.0;

pub fn baits(kb: &KnowledgeBase, request: &PredictionRequest) -> Vec<BaitRecommendation> {
    let Some(profile) = kb.species(request.species()) else {
        return Vec::new();
    };
    let mut reason = format!("Effective for {} in these conditions", request.species());
    if let Some(t) = request.conditions().water_temp {
        reason.push_str(&format!(" at {:.1}°C", t));
    }
    profile
        .baits
        .iter()
        .take(MAX_SUGGESTIONS)
        .map(|b| BaitRecommendation {
            name: b.name.to_string(),
            kind: b.kind,
            confidence: b.confidence,
            reason: reason.clone(),
        })
        .collect()
}

pub fn lures(
    kb: &KnowledgeBase,
    request: &PredictionRequest,
    features: &DerivedFeatures,
) -> Vec<LureRecommendation> {
    let Some(profile) = kb.species(request.species()) else {
        return Vec::new();
    };
    let light = if features.time_of_day.is_low_light() {
        "low light"
    } else {
        "good light"
    };
    let reason = format!("Good choice for {} in {}", request.species(), light);
    profile
        .lures
        .iter()
        .take(MAX_SUGGESTIONS)
        .map(|l| LureRecommendation {
            name: l.name.to_string(),
            kind: l.kind,
            color: l.color.to_string(),
            size: l.size.to_string(),
            confidence: l.confidence,
            reason: reason.clone(),
        })
        .collect()
}

/// Float rigs gain in shallow water, drop rigs in deep water. Both checks
/// run independently before the cap.
pub fn rig_confidence(name: &str, depth: Option<f64>) -> f64 {
    let mut confidence = RIG_BASE_CONFIDENCE;
    if let Some(depth) = depth {
        let name = name.to_lowercase();
        if depth < 2.0 && name.contains("float") {
            confidence += 0.1;
        }
        if depth > 5.0 && name.contains("drop") {
            confidence += 0.1;
        }
    }
    confidence.min(RIG_MAX_CONFIDENCE)
}

pub fn rigs(kb: &KnowledgeBase, request: &PredictionRequest) -> Vec<RigRecommendation> {
    let Some(profile) = kb.species(request.species()) else {
        return Vec::new();
    };
    let depth = request.conditions().depth;
    profile
        .rigs
        .iter()
        .take(MAX_SUGGESTIONS)
        .map(|name| RigRecommendation {
            name: name.to_string(),
            description: format!("Recommended setup for {} fishing", request.species()),
            confidence: rig_confidence(name, depth),
        })
        .collect()
}

fn specific_tip(technique: &str) -> Option<&'static str> {
    let name = technique.to_lowercase();
    if name.contains("jigging") {
        Some("Use short, sharp jerks with pauses")
    } else if name.contains("trolling") {
        Some("Keep a constant speed around 2-4 km/h")
    } else if name.contains("bottom") {
        Some("Keep the line tight and feel for bottom contact")
    } else {
        None
    }
}

/// The specific tip is appended to the generic ones and the list is then cut
/// to [`MAX_SUGGESTIONS`], so it only survives if there is room for it.
pub fn technique_tips(technique: &str) -> Vec<String> {
    let mut tips: Vec<String> = GENERIC_TIPS.iter().map(|t| t.to_string()).collect();
    if let Some(tip) = specific_tip(technique) {
        tips.push(tip.to_string());
    }
    tips.truncate(MAX_SUGGESTIONS);
    tips
}

pub fn techniques(kb: &KnowledgeBase, request: &PredictionRequest) -> Vec<TechniqueRecommendation> {
    let Some(profile) = kb.species(request.species()) else {
        return Vec::new();
    };
    profile
        .techniques
        .iter()
        .take(MAX_SUGGESTIONS)
        .map(|name| TechniqueRecommendation {
            name: name.to_string(),
            description: format!("Effective technique for {}", request.species()),
            confidence: TECHNIQUE_CONFIDENCE,
            tips: technique_tips(name),
        })
        .collect()
}

/// Placeholder spots scattered around the request location. Not backed by
/// catch history; sorted nearest first.
pub fn nearby_spots<R: Rng>(request: &PredictionRequest, rng: &mut R) -> Vec<SpotRecommendation> {
    let mut spots: Vec<SpotRecommendation> = (0..SPOT_COUNT)
        .map(|_| {
            let d_lat = rng.gen_range(-SPOT_MAX_OFFSET_DEG..=SPOT_MAX_OFFSET_DEG);
            let d_lon = rng.gen_range(-SPOT_MAX_OFFSET_DEG..=SPOT_MAX_OFFSET_DEG);
            let distance = (d_lat * d_lat + d_lon * d_lon).sqrt() * KM_PER_DEGREE;
            SpotRecommendation {
                latitude: (request.latitude() + d_lat).clamp(-90.0, 90.0),
                longitude: (request.longitude() + d_lon).clamp(-180.0, 180.0),
                distance_km: (distance * 10.0).round() / 10.0,
                success_rate: rng.gen_range(0.6..=0.9),
                recent_catches: rng.gen_range(5..25),
                reason: format!("Popular spot for {}", request.species()),
            }
        })
        .collect();
    spots.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    spots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::derive;
    use crate::types::{BaitKind, RequestParams};
    use chrono::NaiveDate;
    use rand::{rngs::StdRng, SeedableRng};

    fn request(species: &str, hour: u32) -> RequestParams {
        let mut p = RequestParams::new(species, 55.7, 12.6);
        p.timestamp = NaiveDate::from_ymd_opt(2024, 5, 20).and_then(|d| d.and_hms_opt(hour, 15, 0));
        p
    }

    #[test]
    fn baits_keep_ranking_and_confidence() {
        let kb = KnowledgeBase::builtin();
        let mut p = request("Gedde", 6);
        p.water_temp = Some(12.34);
        let out = baits(&kb, &p.validate().unwrap());

        let names: Vec<&str> = out.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, ["Live trout", "Dead fish", "Large worms"]);
        assert_eq!(out[0].confidence, 0.9);
        assert_eq!(out[0].kind, BaitKind::Live);
        assert_eq!(out[0].reason, "Effective for Gedde in these conditions at 12.3°C");
    }

    #[test]
    fn bait_reason_without_water_temp() {
        let kb = KnowledgeBase::builtin();
        let out = baits(&kb, &request("Karpe", 6).validate().unwrap());
        assert_eq!(out[0].reason, "Effective for Karpe in these conditions");
    }

    #[test]
    fn lure_reason_follows_light() {
        let kb = KnowledgeBase::builtin();
        for (hour, light) in [(6, "low light"), (9, "good light"), (14, "good light"), (19, "low light"), (23, "low light")] {
            let req = request("Sandart", hour).validate().unwrap();
            let out = lures(&kb, &req, &derive(&req));
            assert_eq!(out.len(), 3);
            assert_eq!(out[0].reason, format!("Good choice for Sandart in {light}"), "hour {hour}");
        }
    }

    #[test]
    fn carp_has_single_lure() {
        let kb = KnowledgeBase::builtin();
        let req = request("Karpe", 9).validate().unwrap();
        let out = lures(&kb, &req, &derive(&req));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "Method feeder");
    }

    #[test]
    fn rig_depth_bonuses() {
        assert_eq!(rig_confidence("Carolina rig", Some(1.0)), RIG_BASE_CONFIDENCE);
        assert!((rig_confidence("Float rig", Some(1.5)) - 0.9).abs() < 1e-9);
        assert!((rig_confidence("Basic FLOAT", Some(1.9)) - 0.9).abs() < 1e-9);
        assert_eq!(rig_confidence("Float rig", Some(2.0)), RIG_BASE_CONFIDENCE);
        assert!((rig_confidence("Drop shot", Some(6.0)) - 0.9).abs() < 1e-9);
        assert_eq!(rig_confidence("Drop shot", Some(5.0)), RIG_BASE_CONFIDENCE);
        assert_eq!(rig_confidence("Drop shot", None), RIG_BASE_CONFIDENCE);
        assert!(rig_confidence("Float drop", Some(1.0)) <= RIG_MAX_CONFIDENCE);
    }

    #[test]
    fn rigs_for_deep_zander() {
        let kb = KnowledgeBase::builtin();
        let mut p = request("Sandart", 6);
        p.depth = Some(8.0);
        let out = rigs(&kb, &p.validate().unwrap());
        let names: Vec<&str> = out.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Jig head", "Carolina rig", "Drop shot"]);
        assert_eq!(out[0].confidence, RIG_BASE_CONFIDENCE);
        assert!((out[2].confidence - 0.9).abs() < 1e-9);
        assert_eq!(out[0].description, "Recommended setup for Sandart fishing");
    }

    #[test]
    fn technique_tips_truncate_after_append() {
        let generic: Vec<String> = GENERIC_TIPS.iter().map(|t| t.to_string()).collect();
        assert_eq!(technique_tips("Jigging"), generic);
        assert_eq!(technique_tips("Trolling"), generic);
        assert_eq!(technique_tips("Bottom fishing"), generic);
        assert_eq!(technique_tips("Fly fishing"), generic);
        assert_eq!(specific_tip("Vertical jigging"), Some("Use short, sharp jerks with pauses"));
        assert_eq!(specific_tip("Bottom bouncing"), Some("Keep the line tight and feel for bottom contact"));
        assert_eq!(specific_tip("Spinning"), None);
    }

    #[test]
    fn techniques_have_fixed_confidence() {
        let kb = KnowledgeBase::builtin();
        let out = techniques(&kb, &request("Aborre", 9).validate().unwrap());
        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|t| t.confidence == TECHNIQUE_CONFIDENCE && t.tips.len() == 3));
        assert_eq!(out[0].name, "Vertical jigging");
    }

    #[test]
    fn unknown_species_gets_nothing() {
        let kb = KnowledgeBase::builtin();
        let req = request("UnknownFish", 9).validate().unwrap();
        assert!(baits(&kb, &req).is_empty());
        assert!(lures(&kb, &req, &derive(&req)).is_empty());
        assert!(rigs(&kb, &req).is_empty());
        assert!(techniques(&kb, &req).is_empty());
    }

    #[test]
    fn spots_are_sorted_and_bounded() {
        let req = request("UnknownFish", 9).validate().unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let spots = nearby_spots(&req, &mut rng);
            assert_eq!(spots.len(), SPOT_COUNT);
            for w in spots.windows(2) {
                assert!(w[0].distance_km <= w[1].distance_km);
            }
            for s in &spots {
                assert!((s.latitude - 55.7).abs() <= SPOT_MAX_OFFSET_DEG + 1e-9);
                assert!((s.longitude - 12.6).abs() <= SPOT_MAX_OFFSET_DEG + 1e-9);
                // max offset is 0.05 * sqrt(2) degrees
                assert!(s.distance_km <= 7.9);
                assert!((0.6..=0.9).contains(&s.success_rate));
                assert!((5..25).contains(&s.recent_catches));
                assert_eq!(s.reason, "Popular spot for UnknownFish");
            }
        }
    }
}
