//! Risk evaluation engine.
//!
//! Turns a [`SensorReading`](crate::reading::SensorReading) into a
//! [`RiskAssessment`] using a data-driven [`RiskPolicy`]. All logic in this
//! module is pure; the caller owns the reading and the policy.

pub mod assessment;
pub mod policy;
pub mod scorer;

pub use assessment::{FactorContribution, MainFactor, RiskAssessment, RiskLevel};
pub use policy::{CategoryPolicy, CategoryRule, KeywordTier, LevelBands, RiskCategory, RiskPolicy};
pub use scorer::{assess, assess_latest, assess_payload};
