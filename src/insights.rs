use crate::knowledge::KnowledgeBase;
use crate::types::{Conditions, Season};

pub const IMPACT_SEPARATOR: &str = " • ";
pub const ACCEPTABLE_CONDITIONS: &str = "Generally acceptable weather conditions";
pub const GENERIC_BEST_TIME: &str = "Early morning or late afternoon";

/// One phrase per triggered threshold, each reading judged on its own.
pub fn weather_impact(c: &Conditions) -> String {
    let mut impacts: Vec<&str> = Vec::new();

    if let Some(t) = c.water_temp {
        if t < 8.0 {
            impacts.push("Cold water - slow activity");
        } else if (12.0..=20.0).contains(&t) {
            impacts.push("Optimal water temperature");
        } else if t > 25.0 {
            impacts.push("Warm water - reduced oxygen levels");
        }
    }

    if let Some(w) = c.wind_speed {
        if w < 3.0 {
            impacts.push("Calm weather - use natural baits");
        } else if (3.0..=8.0).contains(&w) {
            impacts.push("Moderate wind - good conditions");
        } else if w > 12.0 {
            impacts.push("Strong wind - difficult conditions");
        }
    }

    if let Some(p) = c.pressure {
        if p < 1000.0 {
            impacts.push("Low pressure - fish are active before the storm");
        } else if p > 1025.0 {
            impacts.push("High pressure - stable conditions");
        }
    }

    if let Some(cc) = c.cloud_cover {
        if cc > 70.0 {
            impacts.push("Overcast - use visible, bright colors");
        } else if cc < 30.0 {
            impacts.push("Sunny - use natural colors");
        }
    }

    if impacts.is_empty() {
        ACCEPTABLE_CONDITIONS.to_string()
    } else {
        impacts.join(IMPACT_SEPARATOR)
    }
}

pub fn seasonal_notes(kb: &KnowledgeBase, season: Season) -> String {
    kb.seasonal(season).notes.to_string()
}

pub fn best_time(kb: &KnowledgeBase, species: &str) -> String {
    match kb.species(species) {
        Some(profile) => profile
            .active_times
            .iter()
            .map(|t| t.display_name())
            .collect::<Vec<_>>()
            .join(", "),
        None => GENERIC_BEST_TIME.to_string(),
    }
}
