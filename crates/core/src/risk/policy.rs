//! Risk policy: the rule table that maps reading fields to weights.
//!
//! Two presets are built in:
//!
//! | Preset     | Rules                                                    | Bands (Medium / High) | Zero score |
//! |------------|----------------------------------------------------------|-----------------------|------------|
//! | `weighted` | tiered keywords, rain 40/20, soil 30/10, vibration 20/10, temperature 10 | > 30 / > 60 | `Low`  |
//! | `flags`    | one 25-point flag per category                           | >= 50 / >= 75         | `Safe`     |
//!
//! `weighted` is canonical. `flags` reproduces the earlier policy revision for
//! compatibility testing. Custom policies can be loaded from JSON.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::field_names::{FIELD_RAIN, FIELD_SOIL, FIELD_TEMPERATURE, FIELD_VIBRATION};
use crate::reading::SensorReading;

use super::assessment::RiskLevel;

/// Upper bound of a risk score.
pub const MAX_RISK_PERCENT: u32 = 100;

/// Name of the canonical preset.
pub const PRESET_WEIGHTED: &str = "weighted";

/// Name of the legacy flag-based preset.
pub const PRESET_FLAGS: &str = "flags";

// ---------------------------------------------------------------------------
// RiskCategory
// ---------------------------------------------------------------------------

/// A scored aspect of a reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskCategory {
    Rainfall,
    Soil,
    Vibration,
    Temperature,
}

impl RiskCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rainfall => "Rainfall",
            Self::Soil => "Soil",
            Self::Vibration => "Vibration",
            Self::Temperature => "Temperature",
        }
    }

    /// Canonical reading field this category reads.
    pub fn field(self) -> &'static str {
        match self {
            Self::Rainfall => FIELD_RAIN,
            Self::Soil => FIELD_SOIL,
            Self::Vibration => FIELD_VIBRATION,
            Self::Temperature => FIELD_TEMPERATURE,
        }
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// One severity tier of a keyword rule.
///
/// Matches when the descriptor contains any of `any_of` and none of `none_of`
/// (both case-insensitive substring checks).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordTier {
    pub any_of: Vec<String>,
    #[serde(default)]
    pub none_of: Vec<String>,
    pub weight: u32,
}

impl KeywordTier {
    fn new(any_of: &[&str], none_of: &[&str], weight: u32) -> Self {
        Self {
            any_of: any_of.iter().map(|s| s.to_string()).collect(),
            none_of: none_of.iter().map(|s| s.to_string()).collect(),
            weight,
        }
    }

    /// `descriptor` must already be lowercased.
    fn matches(&self, descriptor: &str) -> bool {
        self.any_of
            .iter()
            .any(|k| descriptor.contains(k.to_lowercase().as_str()))
            && !self
                .none_of
                .iter()
                .any(|k| descriptor.contains(k.to_lowercase().as_str()))
    }
}

/// How a category turns its field into a weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum CategoryRule {
    /// Ordered tiers, most severe first. The first matching tier wins.
    Keywords { tiers: Vec<KeywordTier> },
    /// Numeric field strictly greater than `threshold`.
    Above { threshold: f64, weight: u32 },
}

/// A category together with its rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryPolicy {
    pub category: RiskCategory,
    #[serde(flatten)]
    pub rule: CategoryRule,
}

impl CategoryPolicy {
    /// Weight this category contributes for `reading` (0 when no rule matches).
    pub fn contribution(&self, reading: &SensorReading) -> u32 {
        match &self.rule {
            CategoryRule::Keywords { tiers } => {
                let descriptor = reading.descriptor(self.category.field());
                tiers
                    .iter()
                    .find(|tier| tier.matches(&descriptor))
                    .map_or(0, |tier| tier.weight)
            }
            CategoryRule::Above { threshold, weight } => {
                if reading.numeric(self.category.field()) > *threshold {
                    *weight
                } else {
                    0
                }
            }
        }
    }

    /// Largest weight this category can contribute.
    fn max_weight(&self) -> u32 {
        match &self.rule {
            CategoryRule::Keywords { tiers } => tiers.iter().map(|t| t.weight).max().unwrap_or(0),
            CategoryRule::Above { weight, .. } => *weight,
        }
    }

    fn validate(&self) -> Result<(), CoreError> {
        let name = self.category.as_str();
        match &self.rule {
            CategoryRule::Keywords { tiers } => {
                if tiers.is_empty() {
                    return Err(CoreError::Validation(format!(
                        "{name}: keyword rule needs at least one tier"
                    )));
                }
                for tier in tiers {
                    if tier.weight == 0 {
                        return Err(CoreError::Validation(format!(
                            "{name}: tier weights must be non-zero"
                        )));
                    }
                    if tier.any_of.is_empty() || tier.any_of.iter().any(|k| k.is_empty()) {
                        return Err(CoreError::Validation(format!(
                            "{name}: every tier needs non-empty keywords"
                        )));
                    }
                }
            }
            CategoryRule::Above { threshold, weight } => {
                if !threshold.is_finite() {
                    return Err(CoreError::Validation(format!(
                        "{name}: threshold must be a finite number"
                    )));
                }
                if *weight == 0 {
                    return Err(CoreError::Validation(format!(
                        "{name}: weight must be non-zero"
                    )));
                }
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// LevelBands
// ---------------------------------------------------------------------------

/// Score -> level classification.
///
/// A zero score maps to `zero_level`; other scores are `High` from
/// `high_from`, `Medium` from `medium_from`, `Low` otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelBands {
    pub medium_from: u32,
    pub high_from: u32,
    pub zero_level: RiskLevel,
}

impl LevelBands {
    pub fn classify(&self, score: u32) -> RiskLevel {
        if score == 0 {
            self.zero_level
        } else if score >= self.high_from {
            RiskLevel::High
        } else if score >= self.medium_from {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    fn validate(&self) -> Result<(), CoreError> {
        if self.medium_from == 0
            || self.medium_from > self.high_from
            || self.high_from > MAX_RISK_PERCENT
        {
            return Err(CoreError::Validation(format!(
                "level bands must satisfy 0 < medium_from <= high_from <= {MAX_RISK_PERCENT}, \
                 got medium_from={} high_from={}",
                self.medium_from, self.high_from
            )));
        }
        if !matches!(self.zero_level, RiskLevel::Safe | RiskLevel::Low) {
            return Err(CoreError::Validation(format!(
                "zero_level must be Safe or Low, got {}",
                self.zero_level
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// RiskPolicy
// ---------------------------------------------------------------------------

/// Complete scoring policy.
///
/// The order of `categories` is the tie-break order for the main factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskPolicy {
    pub categories: Vec<CategoryPolicy>,
    pub bands: LevelBands,
}

impl RiskPolicy {
    /// Canonical tiered policy.
    pub fn weighted() -> Self {
        Self {
            categories: vec![
                CategoryPolicy {
                    category: RiskCategory::Rainfall,
                    rule: CategoryRule::Keywords {
                        tiers: vec![
                            KeywordTier::new(&["heavy"], &[], 40),
                            KeywordTier::new(&["light"], &[], 20),
                        ],
                    },
                },
                CategoryPolicy {
                    category: RiskCategory::Soil,
                    rule: CategoryRule::Keywords {
                        tiers: vec![
                            KeywordTier::new(&["wet"], &[], 30),
                            KeywordTier::new(&["dry"], &[], 10),
                        ],
                    },
                },
                CategoryPolicy {
                    category: RiskCategory::Vibration,
                    rule: CategoryRule::Keywords {
                        tiers: vec![
                            KeywordTier::new(&["strong"], &[], 20),
                            KeywordTier::new(&["mild"], &[], 10),
                        ],
                    },
                },
                CategoryPolicy {
                    category: RiskCategory::Temperature,
                    rule: CategoryRule::Above {
                        threshold: 35.0,
                        weight: 10,
                    },
                },
            ],
            bands: LevelBands {
                medium_from: 31,
                high_from: 61,
                zero_level: RiskLevel::Low,
            },
        }
    }

    /// Earlier flag-based revision: 25 points per triggered category.
    pub fn flags() -> Self {
        Self {
            categories: vec![
                CategoryPolicy {
                    category: RiskCategory::Temperature,
                    rule: CategoryRule::Above {
                        threshold: 35.0,
                        weight: 25,
                    },
                },
                CategoryPolicy {
                    category: RiskCategory::Soil,
                    rule: CategoryRule::Keywords {
                        tiers: vec![KeywordTier::new(&["dry"], &[], 25)],
                    },
                },
                CategoryPolicy {
                    category: RiskCategory::Rainfall,
                    rule: CategoryRule::Keywords {
                        tiers: vec![KeywordTier::new(&["rain"], &["no"], 25)],
                    },
                },
                CategoryPolicy {
                    category: RiskCategory::Vibration,
                    rule: CategoryRule::Keywords {
                        tiers: vec![KeywordTier::new(&["strong", "high"], &[], 25)],
                    },
                },
            ],
            bands: LevelBands {
                medium_from: 50,
                high_from: 75,
                zero_level: RiskLevel::Safe,
            },
        }
    }

    /// Look up a built-in preset by name.
    pub fn preset(name: &str) -> Result<Self, CoreError> {
        match name.trim().to_ascii_lowercase().as_str() {
            PRESET_WEIGHTED => Ok(Self::weighted()),
            PRESET_FLAGS => Ok(Self::flags()),
            other => Err(CoreError::Validation(format!(
                "unknown risk policy '{other}', expected '{PRESET_WEIGHTED}' or '{PRESET_FLAGS}'"
            ))),
        }
    }

    /// Parse and validate a policy from JSON.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let policy: Self = serde_json::from_str(json)
            .map_err(|e| CoreError::Validation(format!("invalid risk policy JSON: {e}")))?;
        policy.validate()?;
        Ok(policy)
    }

    /// Highest score this policy can produce.
    pub fn max_score(&self) -> u32 {
        self.categories.iter().map(CategoryPolicy::max_weight).sum()
    }

    /// Check structural invariants. Scores from a valid policy never exceed 100.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.categories.is_empty() {
            return Err(CoreError::Validation(
                "risk policy needs at least one category".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for category in &self.categories {
            if !seen.insert(category.category) {
                return Err(CoreError::Validation(format!(
                    "category {} appears more than once",
                    category.category
                )));
            }
            category.validate()?;
        }

        let max = self.max_score();
        if max > MAX_RISK_PERCENT {
            return Err(CoreError::Validation(format!(
                "maximum attainable score is {max}, must not exceed {MAX_RISK_PERCENT}"
            )));
        }

        self.bands.validate()
    }
}

impl Default for RiskPolicy {
    fn default() -> Self {
        Self::weighted()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn presets_are_valid() {
        assert!(RiskPolicy::weighted().validate().is_ok());
        assert!(RiskPolicy::flags().validate().is_ok());
        assert_eq!(RiskPolicy::weighted().max_score(), 100);
        assert_eq!(RiskPolicy::flags().max_score(), 100);
    }

    #[test]
    fn preset_lookup_is_case_insensitive() {
        assert_eq!(RiskPolicy::preset("Flags").unwrap(), RiskPolicy::flags());
        assert_matches!(RiskPolicy::preset("fuzzy"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn weighted_bands() {
        let bands = RiskPolicy::weighted().bands;
        assert_eq!(bands.classify(0), RiskLevel::Low);
        assert_eq!(bands.classify(30), RiskLevel::Low);
        assert_eq!(bands.classify(31), RiskLevel::Medium);
        assert_eq!(bands.classify(60), RiskLevel::Medium);
        assert_eq!(bands.classify(61), RiskLevel::High);
    }

    #[test]
    fn flag_bands() {
        let bands = RiskPolicy::flags().bands;
        assert_eq!(bands.classify(0), RiskLevel::Safe);
        assert_eq!(bands.classify(25), RiskLevel::Low);
        assert_eq!(bands.classify(50), RiskLevel::Medium);
        assert_eq!(bands.classify(75), RiskLevel::High);
    }

    #[test]
    fn json_policy_round_trips_through_validation() {
        let json = r#"{
            "categories": [
                {"category": "Soil", "rule": "keywords",
                 "tiers": [{"any_of": ["saturated", "wet"], "weight": 60}]},
                {"category": "Temperature", "rule": "above", "threshold": 40.0, "weight": 40}
            ],
            "bands": {"medium_from": 40, "high_from": 80, "zero_level": "Safe"}
        }"#;
        let policy = RiskPolicy::from_json(json).unwrap();
        assert_eq!(policy.categories.len(), 2);
        assert_eq!(policy.max_score(), 100);
    }

    #[test]
    fn overweight_policy_is_rejected() {
        let mut policy = RiskPolicy::weighted();
        policy.categories[0].rule = CategoryRule::Keywords {
            tiers: vec![KeywordTier::new(&["heavy"], &[], 41)],
        };
        assert_matches!(policy.validate(), Err(CoreError::Validation(msg)) if msg.contains("101"));
    }

    #[test]
    fn duplicate_category_is_rejected() {
        let mut policy = RiskPolicy::weighted();
        let soil = policy.categories[1].clone();
        policy.categories.push(soil);
        assert_matches!(policy.validate(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn unordered_bands_are_rejected() {
        let mut policy = RiskPolicy::weighted();
        policy.bands.medium_from = 70;
        assert_matches!(policy.validate(), Err(CoreError::Validation(_)));

        let mut policy = RiskPolicy::weighted();
        policy.bands.zero_level = RiskLevel::High;
        assert_matches!(policy.validate(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn malformed_json_is_a_validation_error() {
        assert_matches!(RiskPolicy::from_json("{"), Err(CoreError::Validation(_)));
    }
}
