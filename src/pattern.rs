//! Movement pattern types shared by every resolution path.
//!
//! A [`MovementPattern`] drives the particle animation on the client. Every
//! value that leaves this crate has passed through [`MovementPattern::clamped`],
//! so each numeric field lies inside its [`FieldRange`] and the behavior is
//! always one of the four [`Behavior`] modes.

use serde::{Deserialize, Serialize};

/// Inclusive numeric range of one pattern field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRange {
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
}

impl FieldRange {
    const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Returns true if `value` lies within the range.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// How fast particles move.
pub const SPEED_RANGE: FieldRange = FieldRange::new(0.2, 2.0);
/// How strongly particles cluster together.
pub const COHESION_RANGE: FieldRange = FieldRange::new(0.0, 0.3);
/// How far particles keep away from each other.
pub const SEPARATION_RANGE: FieldRange = FieldRange::new(10.0, 60.0);
/// How much random, organic curvature the paths have.
pub const CURVE_RANGE: FieldRange = FieldRange::new(0.0, 1.0);

/// Flocking behavior mode of the animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Behavior {
    /// Organic flowing.
    #[default]
    Standard,
    /// Chase/flee dynamics.
    Predator,
    /// Group movement.
    Swarm,
    /// Circular/spiral flow.
    Spiral,
}

impl Behavior {
    /// All behaviors, in the order they are presented to the model.
    pub const ALL: [Behavior; 4] = [
        Behavior::Standard,
        Behavior::Predator,
        Behavior::Swarm,
        Behavior::Spiral,
    ];

    /// Wire label of this behavior.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Predator => "predator",
            Self::Swarm => "swarm",
            Self::Spiral => "spiral",
        }
    }

    /// Looks up a behavior by its exact wire label.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.as_str() == label)
    }

    /// One-line description used in the model prompt.
    pub fn description(self) -> &'static str {
        match self {
            Self::Standard => "organic flowing",
            Self::Predator => "chase/flee dynamics",
            Self::Swarm => "group movement",
            Self::Spiral => "circular/spiral flow",
        }
    }
}

impl std::fmt::Display for Behavior {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The five parameters driving the particle animation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovementPattern {
    /// Particle speed, see [`SPEED_RANGE`].
    pub speed: f64,
    /// Clustering strength, see [`COHESION_RANGE`].
    pub cohesion: f64,
    /// Avoidance distance, see [`SEPARATION_RANGE`].
    pub separation: f64,
    /// Path curvature, see [`CURVE_RANGE`].
    pub curve: f64,
    /// Flocking mode.
    pub behavior: Behavior,
}

impl MovementPattern {
    /// Returns a copy with every numeric field forced into its range.
    ///
    /// Non-finite values are replaced by the field's value in `fallback`.
    pub fn clamped_or(self, fallback: &MovementPattern) -> Self {
        Self {
            speed: clamp_field(self.speed, fallback.speed, SPEED_RANGE),
            cohesion: clamp_field(self.cohesion, fallback.cohesion, COHESION_RANGE),
            separation: clamp_field(self.separation, fallback.separation, SEPARATION_RANGE),
            curve: clamp_field(self.curve, fallback.curve, CURVE_RANGE),
            behavior: self.behavior,
        }
    }

    /// Same as [`clamped_or`](Self::clamped_or) with the AI-path defaults.
    pub fn clamped(self) -> Self {
        self.clamped_or(&AI_DEFAULT_PATTERN)
    }

    /// Returns true if every numeric field lies within its range.
    pub fn is_within_bounds(&self) -> bool {
        SPEED_RANGE.contains(self.speed)
            && COHESION_RANGE.contains(self.cohesion)
            && SEPARATION_RANGE.contains(self.separation)
            && CURVE_RANGE.contains(self.curve)
    }
}

fn clamp_field(value: f64, fallback: f64, range: FieldRange) -> f64 {
    if value.is_nan() {
        return fallback;
    }
    value.clamp(range.min, range.max)
}

/// Per-field defaults for values the model leaves out.
pub const AI_DEFAULT_PATTERN: MovementPattern = MovementPattern {
    speed: 1.0,
    cohesion: 0.12,
    separation: 25.0,
    curve: 0.3,
    behavior: Behavior::Standard,
};

/// Which path produced a [`ResolutionResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// The external model produced the pattern.
    Ai,
    /// The keyword classifier produced the pattern.
    RuleBased,
}

/// A validated pattern with its natural-language interpretation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionResult {
    /// The movement parameters.
    pub pattern: MovementPattern,
    /// Human-readable description of the pattern.
    pub interpretation: String,
    /// Which path produced this result.
    pub provenance: Provenance,
}

impl ResolutionResult {
    /// Returns true if the external model produced this result.
    pub fn ai_used(&self) -> bool {
        self.provenance == Provenance::Ai
    }
}
