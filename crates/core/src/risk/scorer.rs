//! The risk scorer.

use crate::reading::{ReadingPayload, SensorReading};

use super::assessment::{FactorContribution, MainFactor, RiskAssessment};
use super::policy::{RiskPolicy, MAX_RISK_PERCENT};

/// Score a structured reading.
///
/// Each category contributes at most one weight. The main factor is the
/// largest contribution; ties go to the category listed first in the policy.
pub fn assess(reading: &SensorReading, policy: &RiskPolicy) -> RiskAssessment {
    let factors: Vec<FactorContribution> = policy
        .categories
        .iter()
        .map(|c| FactorContribution {
            category: c.category,
            weight: c.contribution(reading),
        })
        .filter(|f| f.weight > 0)
        .collect();

    let risk_percent = factors
        .iter()
        .map(|f| f.weight)
        .sum::<u32>()
        .min(MAX_RISK_PERCENT);

    let mut main: Option<&FactorContribution> = None;
    for factor in &factors {
        if main.map_or(true, |m| factor.weight > m.weight) {
            main = Some(factor);
        }
    }
    let main_factor = main.map_or(MainFactor::None, |f| MainFactor::Category(f.category));

    RiskAssessment {
        risk_percent,
        risk_level: policy.bands.classify(risk_percent),
        main_factor,
        factors,
    }
}

/// Score whatever the device sent; unstructured payloads get the `Error` sentinel.
pub fn assess_payload(payload: &ReadingPayload, policy: &RiskPolicy) -> RiskAssessment {
    match payload {
        ReadingPayload::Record(reading) => assess(reading, policy),
        ReadingPayload::Malformed(_) => {
            tracing::warn!("Stored payload is not a structured reading, reporting risk error");
            RiskAssessment::error()
        }
    }
}

/// Score the latest stored payload, or report `No Data` if there is none.
pub fn assess_latest(latest: Option<&ReadingPayload>, policy: &RiskPolicy) -> RiskAssessment {
    latest.map_or_else(RiskAssessment::no_data, |payload| {
        assess_payload(payload, policy)
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
