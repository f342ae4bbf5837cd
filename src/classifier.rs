//! Keyword classifier used when the model is unavailable.
//!
//! Scans lower-cased emotion text against an ordered table of categories.
//! A category matches when the text contains any of its keywords as a
//! substring, so `"enraged"` matches `rage`. The first matching row wins;
//! later rows are never consulted, which makes the table order part of the
//! contract.

use crate::pattern::{Behavior, MovementPattern, Provenance, ResolutionResult};

/// Pattern returned when no category matches.
pub const DEFAULT_PATTERN: MovementPattern = MovementPattern {
    speed: 0.8,
    cohesion: 0.12,
    separation: 25.0,
    curve: 0.3,
    behavior: Behavior::Standard,
};

/// One row of the classification table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Category {
    name: &'static str,
    keywords: &'static [&'static str],
    pattern: MovementPattern,
    interpretation: &'static str,
}

impl Category {
    /// Short label of the category (e.g. `"anger"`).
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Keywords that trigger this category.
    pub fn keywords(&self) -> &'static [&'static str] {
        self.keywords
    }

    /// Pattern returned for this category.
    pub fn pattern(&self) -> MovementPattern {
        self.pattern
    }

    /// Interpretation returned for this category.
    pub fn interpretation(&self) -> &'static str {
        self.interpretation
    }

    fn matches(&self, lower: &str) -> bool {
        self.keywords.iter().any(|kw| lower.contains(kw))
    }
}

// ── Category table ──────────────────────────────────────────────────────

/// Ordered by priority: high-energy, anger, sadness, anxiety, love, joy,
/// calm, confusion.
pub const CATEGORIES: &[Category] = &[
    Category {
        name: "high-energy",
        keywords: &["excited", "energetic", "manic", "hyper", "frantic", "wild"],
        pattern: MovementPattern {
            speed: 1.8,
            curve: 0.8,
            behavior: Behavior::Swarm,
            ..DEFAULT_PATTERN
        },
        interpretation: "High energy, chaotic movement",
    },
    Category {
        name: "anger",
        keywords: &["angry", "rage", "furious", "aggressive", "violent"],
        pattern: MovementPattern {
            speed: 1.5,
            separation: 45.0,
            behavior: Behavior::Predator,
            ..DEFAULT_PATTERN
        },
        interpretation: "Aggressive, confrontational movement",
    },
    Category {
        name: "sadness",
        keywords: &["sad", "depressed", "melancholy", "sorrow", "grief"],
        pattern: MovementPattern {
            speed: 0.4,
            curve: 0.1,
            cohesion: 0.05,
            ..DEFAULT_PATTERN
        },
        interpretation: "Slow, isolated, downward movement",
    },
    Category {
        name: "anxiety",
        keywords: &["anxious", "nervous", "scared", "fear", "panic"],
        pattern: MovementPattern {
            speed: 1.2,
            separation: 35.0,
            curve: 0.6,
            behavior: Behavior::Predator,
            ..DEFAULT_PATTERN
        },
        interpretation: "Nervous, erratic, avoidant movement",
    },
    Category {
        name: "love",
        keywords: &["love", "affection", "romance", "tender", "caring"],
        pattern: MovementPattern {
            speed: 0.9,
            cohesion: 0.25,
            separation: 15.0,
            behavior: Behavior::Standard,
            ..DEFAULT_PATTERN
        },
        interpretation: "Gentle, clustering, harmonious movement",
    },
    Category {
        name: "joy",
        keywords: &["happy", "joy", "cheerful", "bliss", "elated"],
        pattern: MovementPattern {
            speed: 1.3,
            cohesion: 0.18,
            curve: 0.5,
            behavior: Behavior::Swarm,
            ..DEFAULT_PATTERN
        },
        interpretation: "Joyful, bouncy, grouped movement",
    },
    Category {
        name: "calm",
        keywords: &["calm", "peaceful", "serene", "tranquil", "zen"],
        pattern: MovementPattern {
            speed: 0.6,
            curve: 0.2,
            cohesion: 0.08,
            ..DEFAULT_PATTERN
        },
        interpretation: "Slow, peaceful, flowing movement",
    },
    Category {
        name: "confusion",
        keywords: &["confused", "chaos", "disorder", "random", "lost"],
        pattern: MovementPattern {
            speed: 1.0,
            curve: 0.9,
            separation: 20.0,
            behavior: Behavior::Spiral,
            ..DEFAULT_PATTERN
        },
        interpretation: "Chaotic, unpredictable movement",
    },
];

/// Returns the first category whose keywords occur in `text`.
pub fn category_for(text: &str) -> Option<&'static Category> {
    let lower = text.to_lowercase();
    CATEGORIES.iter().find(|c| c.matches(&lower))
}

/// Classifies emotion text into a fixed pattern. Never fails.
pub fn classify(text: &str) -> ResolutionResult {
    match category_for(text) {
        Some(category) => ResolutionResult {
            pattern: category.pattern,
            interpretation: category.interpretation.to_owned(),
            provenance: Provenance::RuleBased,
        },
        None => ResolutionResult {
            pattern: DEFAULT_PATTERN,
            interpretation: format!("Simple pattern for '{text}'"),
            provenance: Provenance::RuleBased,
        },
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    #[test]
    fn categories_in_priority_order() {
        let names: Vec<_> = CATEGORIES.iter().map(Category::name).collect();
        assert_eq!(
            names,
            [
                "high-energy",
                "anger",
                "sadness",
                "anxiety",
                "love",
                "joy",
                "calm",
                "confusion"
            ]
        );
    }

    #[test]
    fn every_table_pattern_is_within_bounds() {
        assert!(DEFAULT_PATTERN.is_within_bounds());
        for category in CATEGORIES {
            assert!(category.pattern.is_within_bounds(), "{}", category.name);
        }
    }

    #[test]
    fn high_energy() {
        let r = classify("I feel wild tonight");
        assert_eq!(r.pattern.speed, 1.8);
        assert_eq!(r.pattern.curve, 0.8);
        assert_eq!(r.pattern.cohesion, 0.12);
        assert_eq!(r.pattern.behavior, Behavior::Swarm);
        assert_eq!(r.interpretation, "High energy, chaotic movement");
    }

    #[test]
    fn anger_from_substring() {
        let r = classify("furious and enraged");
        assert_eq!(r.pattern.behavior, Behavior::Predator);
        assert_eq!(r.pattern.speed, 1.5);
        assert_eq!(r.pattern.separation, 45.0);
        assert_eq!(r.pattern.curve, 0.3);
        assert_eq!(r.interpretation, "Aggressive, confrontational movement");
    }

    #[test]
    fn sadness() {
        let r = classify("deep sorrow");
        assert_eq!(r.pattern.speed, 0.4);
        assert_eq!(r.pattern.curve, 0.1);
        assert_eq!(r.pattern.cohesion, 0.05);
        assert_eq!(r.pattern.behavior, Behavior::Standard);
    }

    #[test]
    fn anxiety() {
        let r = classify("a little NERVOUS");
        assert_eq!(r.pattern.speed, 1.2);
        assert_eq!(r.pattern.separation, 35.0);
        assert_eq!(r.pattern.curve, 0.6);
        assert_eq!(r.pattern.behavior, Behavior::Predator);
    }

    #[test]
    fn love() {
        let r = classify("tender affection");
        assert_eq!(r.pattern.speed, 0.9);
        assert_eq!(r.pattern.cohesion, 0.25);
        assert_eq!(r.pattern.separation, 15.0);
        assert_eq!(r.interpretation, "Gentle, clustering, harmonious movement");
    }

    #[test]
    fn joy() {
        let r = classify("pure bliss");
        assert_eq!(r.pattern.speed, 1.3);
        assert_eq!(r.pattern.cohesion, 0.18);
        assert_eq!(r.pattern.curve, 0.5);
        assert_eq!(r.pattern.behavior, Behavior::Swarm);
    }

    #[test]
    fn calm() {
        let r = classify("zen and tranquil");
        assert_eq!(r.pattern.behavior, Behavior::Standard);
        assert_eq!(r.pattern.speed, 0.6);
        assert_eq!(r.pattern.curve, 0.2);
        assert_eq!(r.pattern.cohesion, 0.08);
        assert_eq!(r.interpretation, "Slow, peaceful, flowing movement");
    }

    #[test]
    fn confusion() {
        let r = classify("lost in chaos");
        assert_eq!(r.pattern.speed, 1.0);
        assert_eq!(r.pattern.curve, 0.9);
        assert_eq!(r.pattern.separation, 20.0);
        assert_eq!(r.pattern.behavior, Behavior::Spiral);
    }

    #[test]
    fn anger_wins_over_joy() {
        let r = classify("happy but angry");
        assert_eq!(category_for("happy but angry").unwrap().name(), "anger");
        assert_eq!(r.pattern.behavior, Behavior::Predator);
    }

    #[test]
    fn high_energy_wins_over_everything() {
        assert_eq!(
            category_for("excited, sad, calm and lost").unwrap().name(),
            "high-energy"
        );
    }

    #[test]
    fn unmatched_text_uses_default_and_echoes_input() {
        let r = classify("Overwhelming Nostalgia");
        assert_eq!(r.pattern, DEFAULT_PATTERN);
        assert_eq!(r.interpretation, "Simple pattern for 'Overwhelming Nostalgia'");
        assert_eq!(r.provenance, Provenance::RuleBased);
        assert!(category_for("Overwhelming Nostalgia").is_none());
    }

    #[test]
    fn behavior_is_always_valid() {
        for text in ["", "???", "wild", "rage", "sad", "fear", "love", "joy", "zen", "lost"] {
            let r = classify(text);
            assert!(Behavior::ALL.contains(&r.pattern.behavior));
            assert!(r.pattern.is_within_bounds());
            assert!(!r.interpretation.is_empty());
        }
    }
}
