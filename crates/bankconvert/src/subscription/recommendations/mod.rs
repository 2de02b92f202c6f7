//! Talking points and business insights for the relationship manager.

mod rules;

pub use rules::RecommendationRule;

use serde::{Deserialize, Serialize};

use super::domain::{CustomerProfile, PredictionResult, PreviousOutcome};

/// Ordered talking points for a prediction; never empty.
///
/// Rules are keyed on the label alone. The probability is carried on the result for callers
/// but no rule reads it.
pub fn recommend(prediction: &PredictionResult, profile: &CustomerProfile) -> Vec<String> {
    recommendation_rules(prediction, profile)
        .into_iter()
        .map(|rule| rule.message().to_string())
        .collect()
}

pub fn recommendation_rules(
    prediction: &PredictionResult,
    profile: &CustomerProfile,
) -> Vec<RecommendationRule> {
    rules::fired_rules(prediction.label, profile)
}

/// Campaign-history and economic-context notes shown next to the recommendations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessInsights {
    pub previous_outcome: PreviousOutcome,
    pub campaign_history: String,
    pub emp_var_rate: f64,
    pub economic_context: String,
}

impl BusinessInsights {
    pub fn for_profile(profile: &CustomerProfile) -> Self {
        let campaign_history = if profile.poutcome == PreviousOutcome::Success {
            "Prior success - strong positive signal for subscription"
        } else {
            "No prior success - focus on relationship building first"
        };

        let economic_context = if profile.emp_var_rate > 0.0 {
            "Strong economy - customers may prefer higher-risk investments over term deposits"
        } else {
            "Weaker economy - customers seek safe investments like term deposits"
        };

        Self {
            previous_outcome: profile.poutcome,
            campaign_history: campaign_history.to_string(),
            emp_var_rate: profile.emp_var_rate,
            economic_context: economic_context.to_string(),
        }
    }
}
