use chrono::{DateTime, Local, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ValidationError;

// ---------- Categorical labels ----------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Fall, Season::Winter];

    /// Northern-hemisphere meteorological seasons.
    pub fn from_month(month: u32) -> Self {
        match month {
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            9..=11 => Season::Fall,
            _ => Season::Winter,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Fall => "fall",
            Season::Winter => "winter",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    EarlyMorning, // 5-8
    Morning,      // 8-12
    Afternoon,    // 12-17
    Evening,      // 17-21
    Night,        // 21-5
}

impl TimeOfDay {
    pub const ALL: [TimeOfDay; 5] = [
        TimeOfDay::EarlyMorning,
        TimeOfDay::Morning,
        TimeOfDay::Afternoon,
        TimeOfDay::Evening,
        TimeOfDay::Night,
    ];

    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=7 => TimeOfDay::EarlyMorning,
            8..=11 => TimeOfDay::Morning,
            12..=16 => TimeOfDay::Afternoon,
            17..=20 => TimeOfDay::Evening,
            _ => TimeOfDay::Night,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TimeOfDay::EarlyMorning => "early_morning",
            TimeOfDay::Morning => "morning",
            TimeOfDay::Afternoon => "afternoon",
            TimeOfDay::Evening => "evening",
            TimeOfDay::Night => "night",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            TimeOfDay::EarlyMorning => "Early morning (5-8)",
            TimeOfDay::Morning => "Morning (8-12)",
            TimeOfDay::Afternoon => "Afternoon (12-17)",
            TimeOfDay::Evening => "Evening (17-21)",
            TimeOfDay::Night => "Night (21-5)",
        }
    }

    pub fn is_low_light(self) -> bool {
        matches!(self, TimeOfDay::EarlyMorning | TimeOfDay::Evening | TimeOfDay::Night)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BottomType {
    Sand,
    Mud,
    Rock,
    Gravel,
    Vegetation,
    Mixed,
}

impl BottomType {
    /// One-hot encoding order of the feature vector.
    pub const ALL: [BottomType; 6] = [
        BottomType::Sand,
        BottomType::Mud,
        BottomType::Rock,
        BottomType::Gravel,
        BottomType::Vegetation,
        BottomType::Mixed,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaitKind {
    Live,
    Natural,
    Artificial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LureKind {
    Spinner,
    Spoon,
    Jig,
    Jerkbait,
    Crankbait,
    SoftPlastic,
    Feeder,
}

/// Which scoring path produced `success_probability`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Model,
    Heuristic,
}

// ---------- Request ----------

/// Unvalidated request as it arrives over the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct RequestParams {
    pub species: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub timestamp: Option<NaiveDateTime>,

    // environmental readings
    #[serde(default)]
    pub water_temp: Option<f64>, // °C
    #[serde(default)]
    pub wind_speed: Option<f64>, // m/s
    #[serde(default)]
    pub depth: Option<f64>, // m
    #[serde(default)]
    pub bottom_type: Option<BottomType>,

    // weather
    #[serde(default)]
    pub air_temp: Option<f64>, // °C
    #[serde(default)]
    pub cloud_cover: Option<f64>, // %
    #[serde(default)]
    pub precipitation: Option<f64>, // mm
    #[serde(default)]
    pub pressure: Option<f64>, // hPa
}

impl RequestParams {
    pub fn new(species: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            species: species.into(),
            latitude,
            longitude,
            timestamp: None,
            water_temp: None,
            wind_speed: None,
            depth: None,
            bottom_type: None,
            air_temp: None,
            cloud_cover: None,
            precipitation: None,
            pressure: None,
        }
    }

    /// Checks every bound and produces an immutable request.
    /// Out-of-range values are rejected, never clamped.
    pub fn validate(self) -> Result<PredictionRequest, ValidationError> {
        // Identifiers are matched and echoed exactly as sent.
        if self.species.trim().is_empty() {
            return Err(ValidationError::EmptySpecies);
        }

        let latitude = in_range("latitude", self.latitude, -90.0, 90.0)?;
        let longitude = in_range("longitude", self.longitude, -180.0, 180.0)?;

        let conditions = Conditions {
            water_temp: opt_in_range("water_temp", self.water_temp, -5.0, 35.0)?,
            wind_speed: opt_in_range("wind_speed", self.wind_speed, 0.0, 50.0)?,
            depth: opt_in_range("depth", self.depth, 0.0, 100.0)?,
            bottom_type: self.bottom_type,
            air_temp: opt_in_range("air_temp", self.air_temp, -30.0, 45.0)?,
            cloud_cover: opt_in_range("cloud_cover", self.cloud_cover, 0.0, 100.0)?,
            precipitation: self
                .precipitation
                .map(|v| non_negative("precipitation", v))
                .transpose()?,
            pressure: opt_in_range("pressure", self.pressure, 950.0, 1050.0)?,
        };

        Ok(PredictionRequest {
            species: self.species,
            latitude,
            longitude,
            timestamp: self.timestamp.unwrap_or_else(|| Local::now().naive_local()),
            conditions,
        })
    }
}

impl TryFrom<RequestParams> for PredictionRequest {
    type Error = ValidationError;

    fn try_from(params: RequestParams) -> Result<Self, Self::Error> {
        params.validate()
    }
}

fn in_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<f64, ValidationError> {
    // NaN fails `contains`, so it is rejected here too
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(ValidationError::OutOfRange { field, value, min, max })
    }
}

fn opt_in_range(
    field: &'static str,
    value: Option<f64>,
    min: f64,
    max: f64,
) -> Result<Option<f64>, ValidationError> {
    value.map(|v| in_range(field, v, min, max)).transpose()
}

fn non_negative(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ValidationError::Negative { field, value })
    }
}

/// Accepts naive local datetimes as well as RFC 3339 with an offset; with an
/// offset the wall-clock time at that offset is kept.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => Ok(dt.naive_local()),
        Err(_) => raw.parse::<NaiveDateTime>(),
    }
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    raw.map(|s| parse_timestamp(&s).map_err(serde::de::Error::custom))
        .transpose()
}

/// Optional readings of a validated request. All present values are in bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Conditions {
    pub water_temp: Option<f64>,
    pub wind_speed: Option<f64>,
    pub depth: Option<f64>,
    pub bottom_type: Option<BottomType>,
    pub air_temp: Option<f64>,
    pub cloud_cover: Option<f64>,
    pub precipitation: Option<f64>,
    pub pressure: Option<f64>,
}

/// A validated prediction request. Only obtainable through
/// [`RequestParams::validate`].
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRequest {
    species: String,
    latitude: f64,
    longitude: f64,
    timestamp: NaiveDateTime,
    conditions: Conditions,
}

impl PredictionRequest {
    pub fn species(&self) -> &str {
        &self.species
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    pub fn conditions(&self) -> &Conditions {
        &self.conditions
    }
}

// ---------- Response ----------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaitRecommendation {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: BaitKind,
    pub confidence: f64,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LureRecommendation {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: LureKind,
    pub color: String,
    pub size: String,
    pub confidence: f64,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RigRecommendation {
    pub name: String,
    pub description: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechniqueRecommendation {
    pub name: String,
    pub description: String,
    pub confidence: f64,
    pub tips: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotRecommendation {
    pub latitude: f64,
    pub longitude: f64,
    pub distance_km: f64,
    pub success_rate: f64,
    pub recent_catches: u32,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub species: String,
    pub success_probability: f64,
    pub best_time: String,

    pub baits: Vec<BaitRecommendation>,
    pub lures: Vec<LureRecommendation>,
    pub rigs: Vec<RigRecommendation>,
    pub techniques: Vec<TechniqueRecommendation>,
    pub nearby_spots: Vec<SpotRecommendation>,

    pub weather_impact: String,
    pub seasonal_notes: String,
    pub confidence_score: f64,

    pub model_used: Strategy,
    pub prediction_timestamp: DateTime<Utc>,
}
