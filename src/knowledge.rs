//! Static fishing reference data: one typed profile per species and one per
//! season. Everything here is immutable and lives for the whole process.

use crate::types::{BaitKind, BottomType, LureKind, Season, TimeOfDay};

/// Inclusive numeric range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaitEntry {
    pub name: &'static str,
    pub kind: BaitKind,
    pub confidence: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LureEntry {
    pub name: &'static str,
    pub kind: LureKind,
    pub color: &'static str,
    pub size: &'static str,
    pub confidence: f64,
}

/// Reference record for one species. List order is ranking order: earlier
/// entries are the more canonical suggestions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeciesProfile {
    /// Identifier clients send, e.g. "Gedde".
    pub id: &'static str,
    pub common_name: &'static str,
    pub optimal_temp: Range, // °C
    pub optimal_depth: Range, // m
    pub active_times: &'static [TimeOfDay],
    pub preferred_bottoms: &'static [BottomType],
    pub baits: &'static [BaitEntry],
    pub lures: &'static [LureEntry],
    pub rigs: &'static [&'static str],
    pub techniques: &'static [&'static str],
}

impl SpeciesProfile {
    pub fn is_active(&self, time_of_day: TimeOfDay) -> bool {
        self.active_times.contains(&time_of_day)
    }

    pub fn prefers(&self, bottom: BottomType) -> bool {
        self.preferred_bottoms.contains(&bottom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeasonalProfile {
    pub notes: &'static str,
    /// Multiplier applied to the heuristic probability.
    pub adjustment: f64,
}

static SPRING: SeasonalProfile = SeasonalProfile {
    notes: "Fish are active after the winter period. Look for shallower water.",
    adjustment: 1.0,
};
static SUMMER: SeasonalProfile = SeasonalProfile {
    notes: "Peak season! Fish early in the morning or late in the evening.",
    adjustment: 1.2,
};
static FALL: SeasonalProfile = SeasonalProfile {
    notes: "Fish feed heavily before winter. A good catch period.",
    adjustment: 1.1,
};
static WINTER: SeasonalProfile = SeasonalProfile {
    notes: "Slow activity. Fish deeper and slower.",
    adjustment: 0.7,
};

pub static SPECIES: [SpeciesProfile; 5] = [
    SpeciesProfile {
        id: "Gedde",
        common_name: "Pike",
        optimal_temp: Range::new(10.0, 20.0),
        optimal_depth: Range::new(1.0, 5.0),
        active_times: &[TimeOfDay::EarlyMorning, TimeOfDay::Evening],
        preferred_bottoms: &[BottomType::Vegetation, BottomType::Mixed],
        baits: &[
            BaitEntry { name: "Live trout", kind: BaitKind::Live, confidence: 0.9 },
            BaitEntry { name: "Dead fish", kind: BaitKind::Natural, confidence: 0.85 },
            BaitEntry { name: "Large worms", kind: BaitKind::Natural, confidence: 0.7 },
        ],
        lures: &[
            LureEntry {
                name: "Large spinner",
                kind: LureKind::Spinner,
                color: "silver/red",
                size: "4-5",
                confidence: 0.9,
            },
            LureEntry {
                name: "Jerkbait",
                kind: LureKind::Jerkbait,
                color: "natural/green",
                size: "12-15cm",
                confidence: 0.85,
            },
            LureEntry {
                name: "Soft bait",
                kind: LureKind::SoftPlastic,
                color: "white/chartreuse",
                size: "10-15cm",
                confidence: 0.8,
            },
        ],
        rigs: &["Carolina rig", "Texas rig", "Drop shot"],
        techniques: &["Cast & retrieve", "Jigging", "Trolling"],
    },
    SpeciesProfile {
        id: "Aborre",
        common_name: "Perch",
        optimal_temp: Range::new(12.0, 22.0),
        optimal_depth: Range::new(2.0, 6.0),
        active_times: &[TimeOfDay::Morning, TimeOfDay::Afternoon],
        preferred_bottoms: &[BottomType::Rock, BottomType::Gravel],
        baits: &[
            BaitEntry { name: "Worms", kind: BaitKind::Live, confidence: 0.9 },
            BaitEntry { name: "Small fish", kind: BaitKind::Live, confidence: 0.85 },
            BaitEntry { name: "Shrimp", kind: BaitKind::Natural, confidence: 0.75 },
        ],
        lures: &[
            LureEntry {
                name: "Spinners",
                kind: LureKind::Spinner,
                color: "gold/silver",
                size: "1-3",
                confidence: 0.9,
            },
            LureEntry {
                name: "Small crankbaits",
                kind: LureKind::Crankbait,
                color: "perch/natural",
                size: "3-5cm",
                confidence: 0.85,
            },
            LureEntry {
                name: "Jigs",
                kind: LureKind::Jig,
                color: "orange/red",
                size: "2-5g",
                confidence: 0.8,
            },
        ],
        rigs: &["Drop shot", "Split shot", "Basic float"],
        techniques: &["Vertical jigging", "Cast & retrieve", "Bottom bouncing"],
    },
    SpeciesProfile {
        id: "Sandart",
        common_name: "Zander",
        optimal_temp: Range::new(8.0, 18.0),
        optimal_depth: Range::new(3.0, 10.0),
        active_times: &[TimeOfDay::Night, TimeOfDay::EarlyMorning, TimeOfDay::Evening],
        preferred_bottoms: &[BottomType::Sand, BottomType::Gravel],
        baits: &[
            BaitEntry { name: "Live fish", kind: BaitKind::Live, confidence: 0.95 },
            BaitEntry { name: "Cut dead fish", kind: BaitKind::Natural, confidence: 0.8 },
            BaitEntry { name: "Large worms", kind: BaitKind::Natural, confidence: 0.7 },
        ],
        lures: &[
            LureEntry {
                name: "Rubber fish",
                kind: LureKind::SoftPlastic,
                color: "white/pearl",
                size: "8-12cm",
                confidence: 0.95,
            },
            LureEntry {
                name: "Jigs",
                kind: LureKind::Jig,
                color: "white/chartreuse",
                size: "10-20g",
                confidence: 0.9,
            },
            LureEntry {
                name: "Crankbait",
                kind: LureKind::Crankbait,
                color: "silver/blue",
                size: "8-12cm",
                confidence: 0.8,
            },
        ],
        rigs: &["Jig head", "Carolina rig", "Drop shot"],
        techniques: &["Jigging", "Trolling", "Bottom fishing"],
    },
    SpeciesProfile {
        id: "Ørred",
        common_name: "Trout",
        optimal_temp: Range::new(10.0, 16.0),
        optimal_depth: Range::new(1.0, 4.0),
        active_times: &[TimeOfDay::EarlyMorning, TimeOfDay::Evening],
        preferred_bottoms: &[BottomType::Gravel, BottomType::Rock],
        baits: &[
            BaitEntry { name: "Flies", kind: BaitKind::Artificial, confidence: 0.9 },
            BaitEntry { name: "Worms", kind: BaitKind::Live, confidence: 0.85 },
            BaitEntry { name: "Maggots", kind: BaitKind::Live, confidence: 0.8 },
        ],
        lures: &[
            LureEntry {
                name: "Spinners",
                kind: LureKind::Spinner,
                color: "gold/silver",
                size: "1-2",
                confidence: 0.85,
            },
            LureEntry {
                name: "Small wobblers",
                kind: LureKind::Crankbait,
                color: "natural",
                size: "3-5cm",
                confidence: 0.8,
            },
            LureEntry {
                name: "Spoons",
                kind: LureKind::Spoon,
                color: "silver/red",
                size: "2-4cm",
                confidence: 0.75,
            },
        ],
        rigs: &["Fly fishing setup", "Float rig", "Spinning rig"],
        techniques: &["Fly fishing", "Spinning", "Float fishing"],
    },
    SpeciesProfile {
        id: "Karpe",
        common_name: "Carp",
        optimal_temp: Range::new(15.0, 25.0),
        optimal_depth: Range::new(1.0, 3.0),
        active_times: &[TimeOfDay::Morning, TimeOfDay::Evening],
        preferred_bottoms: &[BottomType::Mud, BottomType::Vegetation],
        baits: &[
            BaitEntry { name: "Boilies", kind: BaitKind::Artificial, confidence: 0.95 },
            BaitEntry { name: "Sweetcorn", kind: BaitKind::Natural, confidence: 0.9 },
            BaitEntry { name: "Bread", kind: BaitKind::Natural, confidence: 0.85 },
        ],
        lures: &[LureEntry {
            name: "Method feeder",
            kind: LureKind::Feeder,
            color: "N/A",
            size: "medium",
            confidence: 0.8,
        }],
        rigs: &["Hair rig", "Method feeder", "Float rig"],
        techniques: &["Bottom fishing", "Method feeder", "Float fishing"],
    },
];

/// Read-only handle over the species table. Cheap to copy and share.
#[derive(Debug, Clone, Copy)]
pub struct KnowledgeBase {
    species: &'static [SpeciesProfile],
}

impl KnowledgeBase {
    pub fn builtin() -> Self {
        Self::new(&SPECIES)
    }

    pub fn new(species: &'static [SpeciesProfile]) -> Self {
        Self { species }
    }

    /// Exact, case-sensitive lookup by identifier.
    pub fn species(&self, id: &str) -> Option<&'static SpeciesProfile> {
        let species = self.species;
        species.iter().find(|p| p.id == id)
    }

    pub fn is_known(&self, id: &str) -> bool {
        self.species(id).is_some()
    }

    pub fn species_ids(&self) -> impl Iterator<Item = &'static str> {
        let species = self.species;
        species.iter().map(|p| p.id)
    }

    pub fn seasonal(&self, season: Season) -> &'static SeasonalProfile {
        match season {
            Season::Spring => &SPRING,
            Season::Summer => &SUMMER,
            Season::Fall => &FALL,
            Season::Winter => &WINTER,
        }
    }
}
