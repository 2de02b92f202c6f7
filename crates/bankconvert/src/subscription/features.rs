//! Derived features reproduced from training-time feature engineering.
//!
//! Every rule is a standalone pure function so the boundaries can be pinned by tests; the
//! bucket edges must match the training notebook exactly.

use serde::{Deserialize, Serialize};

use super::domain::{categorical, CustomerProfile, PreviousOutcome, NEVER_CONTACTED_PDAYS};
use super::thresholds::Thresholds;

categorical! {
    AgeGroup, column = "age_group", {
        Young => "Young",
        Middle => "Middle",
        Senior => "Senior",
        Elderly => "Elderly",
    }
}

categorical! {
    /// Macro signal from employment variation and employment level against training medians.
    EconomicCondition, column = "economic_condition", {
        Good => "Good",
        Neutral => "Neutral",
        Bad => "Bad",
    }
}

categorical! {
    ContactRecency, column = "contact_recency", {
        Never => "Never",
        Recent => "Recent",
        Medium => "Medium",
        Long => "Long",
    }
}

/// The five engineered columns appended to a profile before encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineeredFeatures {
    pub age_group: AgeGroup,
    pub contacted_before: u8,
    pub prev_success: u8,
    pub economic_condition: EconomicCondition,
    pub contact_recency: ContactRecency,
}

pub fn engineer(profile: &CustomerProfile, thresholds: Thresholds) -> EngineeredFeatures {
    EngineeredFeatures {
        age_group: age_group(profile.age),
        contacted_before: contacted_before(profile.pdays),
        prev_success: prev_success(profile.poutcome),
        economic_condition: economic_condition(
            profile.emp_var_rate,
            profile.nr_employed,
            thresholds,
        ),
        contact_recency: contact_recency(profile.pdays),
    }
}

pub fn age_group(age: u16) -> AgeGroup {
    if age <= 30 {
        AgeGroup::Young
    } else if age <= 45 {
        AgeGroup::Middle
    } else if age <= 60 {
        AgeGroup::Senior
    } else {
        AgeGroup::Elderly
    }
}

pub fn contacted_before(pdays: u16) -> u8 {
    u8::from(pdays != NEVER_CONTACTED_PDAYS)
}

pub fn prev_success(outcome: PreviousOutcome) -> u8 {
    u8::from(outcome == PreviousOutcome::Success)
}

/// Both indicators above their medians is Good, both at or below is Bad, a split is Neutral.
pub fn economic_condition(
    emp_var_rate: f64,
    nr_employed: f64,
    thresholds: Thresholds,
) -> EconomicCondition {
    let employment_rising = emp_var_rate > thresholds.emp_median;
    let employment_high = nr_employed > thresholds.nr_median;

    match (employment_rising, employment_high) {
        (true, true) => EconomicCondition::Good,
        (false, false) => EconomicCondition::Bad,
        _ => EconomicCondition::Neutral,
    }
}

pub fn contact_recency(pdays: u16) -> ContactRecency {
    if pdays == NEVER_CONTACTED_PDAYS {
        ContactRecency::Never
    } else if pdays <= 7 {
        ContactRecency::Recent
    } else if pdays <= 30 {
        ContactRecency::Medium
    } else {
        ContactRecency::Long
    }
}
