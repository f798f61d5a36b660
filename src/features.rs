use chrono::{Datelike, Timelike};

use crate::types::{BottomType, PredictionRequest, Season, TimeOfDay};

pub const FEATURE_COUNT: usize = 27;

/// Authoritative input order of the model feature vector. Model artifacts
/// carry their own copy of this list and must match it exactly.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "latitude",
    "longitude",
    "month",
    "hour",
    "weekday",
    "season_spring",
    "season_summer",
    "season_fall",
    "season_winter",
    "time_early_morning",
    "time_morning",
    "time_afternoon",
    "time_evening",
    "time_night",
    "water_temp",
    "wind_speed",
    "depth",
    "air_temp",
    "cloud_cover",
    "precipitation",
    "pressure",
    "bottom_sand",
    "bottom_mud",
    "bottom_rock",
    "bottom_gravel",
    "bottom_vegetation",
    "bottom_mixed",
];

const SEASON_OFFSET: usize = 5;
const TIME_OFFSET: usize = 9;
const ENV_OFFSET: usize = 14;
const BOTTOM_OFFSET: usize = 21;

/// Values substituted for missing readings.
pub mod defaults {
    pub const WATER_TEMP: f64 = 15.0;
    pub const WIND_SPEED: f64 = 5.0;
    pub const DEPTH: f64 = 3.0;
    pub const AIR_TEMP: f64 = 18.0;
    pub const CLOUD_COVER: f64 = 50.0;
    pub const PRECIPITATION: f64 = 0.0;
    pub const PRESSURE: f64 = 1013.0;
}

#[derive(Debug, Clone, PartialEq)]
pub struct DerivedFeatures {
    pub season: Season,
    pub time_of_day: TimeOfDay,
    pub vector: [f32; FEATURE_COUNT],
}

impl DerivedFeatures {
    pub fn get(&self, name: &str) -> Option<f32> {
        FEATURE_NAMES
            .iter()
            .position(|n| *n == name)
            .map(|i| self.vector[i])
    }

    /// One-line digest of the vector for debug logging.
    pub fn summary(&self) -> String {
        let v = &self.vector;
        let n = v.len() as f32;
        let nz = v.iter().filter(|x| **x != 0.0).count();
        let mean = v.iter().sum::<f32>() / n;
        let std = (v.iter().map(|x| (x - mean) * (x - mean)).sum::<f32>() / n).sqrt();
        let sample: Vec<String> = FEATURE_NAMES
            .iter()
            .zip(v.iter())
            .take(6)
            .map(|(name, x)| format!("{}={:.3}", name, x))
            .collect();
        format!(
            "in_dim={} nonzero={} mean={:.3} std={:.3} sample=[{}]",
            v.len(),
            nz,
            mean,
            std,
            sample.join(", ")
        )
    }
}

fn one_hot(hit: bool) -> f32 {
    if hit {
        1.0
    } else {
        0.0
    }
}

/// Pure function of the request: season and time-of-day labels plus the
/// ordered model input. Missing readings are replaced by [`defaults`]; a
/// reading of `0.0` is a real measurement and is passed through unchanged.
pub fn derive(request: &PredictionRequest) -> DerivedFeatures {
    let ts = request.timestamp();
    let season = Season::from_month(ts.month());
    let time_of_day = TimeOfDay::from_hour(ts.hour());
    let c = request.conditions();

    let mut vector = [0.0f32; FEATURE_COUNT];
    vector[0] = request.latitude() as f32;
    vector[1] = request.longitude() as f32;
    vector[2] = ts.month() as f32;
    vector[3] = ts.hour() as f32;
    vector[4] = ts.weekday().num_days_from_monday() as f32;

    for (i, s) in Season::ALL.iter().enumerate() {
        vector[SEASON_OFFSET + i] = one_hot(*s == season);
    }
    for (i, t) in TimeOfDay::ALL.iter().enumerate() {
        vector[TIME_OFFSET + i] = one_hot(*t == time_of_day);
    }

    let env = [
        c.water_temp.unwrap_or(defaults::WATER_TEMP),
        c.wind_speed.unwrap_or(defaults::WIND_SPEED),
        c.depth.unwrap_or(defaults::DEPTH),
        c.air_temp.unwrap_or(defaults::AIR_TEMP),
        c.cloud_cover.unwrap_or(defaults::CLOUD_COVER),
        c.precipitation.unwrap_or(defaults::PRECIPITATION),
        c.pressure.unwrap_or(defaults::PRESSURE),
    ];
    for (i, x) in env.iter().enumerate() {
        vector[ENV_OFFSET + i] = *x as f32;
    }

    for (i, b) in BottomType::ALL.iter().enumerate() {
        vector[BOTTOM_OFFSET + i] = one_hot(c.bottom_type == Some(*b));
    }

    DerivedFeatures {
        season,
        time_of_day,
        vector,
    }
}
