use super::common::*;
use crate::subscription::domain::{
    ContactMethod, CreditDefault, Education, HousingLoan, PredictionResult, PreviousOutcome,
    SubscriptionLabel,
};
use crate::subscription::recommendations::{
    recommend, recommendation_rules, BusinessInsights, RecommendationRule,
};

fn likely() -> PredictionResult {
    PredictionResult::from_model(SubscriptionLabel::Likely, 0.82)
}

fn unlikely() -> PredictionResult {
    PredictionResult::from_model(SubscriptionLabel::Unlikely, 0.12)
}

#[test]
fn retiree_with_prior_success_gets_ladder_in_order() {
    let mut profile = retiree_profile();
    profile.emp_var_rate = 0.0;

    let rules = recommendation_rules(&likely(), &profile);

    assert_eq!(
        rules,
        vec![
            RecommendationRule::PriorSuccess,
            RecommendationRule::Retirement,
            RecommendationRule::DebtFree,
            RecommendationRule::MobileFollowUp,
        ]
    );
    let messages = recommend(&likely(), &profile);
    assert!(messages[0].starts_with("Previous campaign was successful"));
    assert!(messages[1].starts_with("Customer is retired/elderly"));
    assert!(messages[2].starts_with("Customer has no existing debt"));
    assert!(messages[3].starts_with("Contact via cellular"));
}

#[test]
fn weak_economy_fires_for_likely_subscribers() {
    let rules = recommendation_rules(&likely(), &retiree_profile());
    assert!(rules.contains(&RecommendationRule::WeakEconomy));
}

#[test]
fn likely_fallback_when_nothing_fires() {
    let mut profile = profile();
    profile.housing = HousingLoan::Yes;
    profile.contact = ContactMethod::Telephone;
    profile.emp_var_rate = 0.5;

    assert_eq!(
        recommendation_rules(&likely(), &profile),
        vec![RecommendationRule::HighPotential]
    );
}

#[test]
fn unlikely_ladder_accumulates_independent_rules() {
    let mut profile = profile();
    profile.poutcome = PreviousOutcome::Failure;
    profile.default = CreditDefault::Yes;
    profile.education = Education::Basic4y;

    let rules = recommendation_rules(&unlikely(), &profile);

    assert_eq!(
        rules,
        vec![
            RecommendationRule::PriorFailure,
            RecommendationRule::FirstContact,
            RecommendationRule::CreditDefaulted,
            RecommendationRule::StrongEconomy,
            RecommendationRule::PlainLanguage,
        ]
    );
}

#[test]
fn unlikely_fallback_when_nothing_fires() {
    let mut profile = profile();
    profile.pdays = 12;
    profile.previous = 1;
    profile.emp_var_rate = -0.1;

    let messages = recommend(&unlikely(), &profile);
    assert_eq!(messages, vec![RecommendationRule::LowPotential.message().to_string()]);
}

#[test]
fn recommendations_depend_on_label_not_probability() {
    let profile = retiree_profile();
    let high = PredictionResult::from_model(SubscriptionLabel::Likely, 0.99);
    let marginal = PredictionResult::from_model(SubscriptionLabel::Likely, 0.51);
    let placeholder = PredictionResult::placeholder(SubscriptionLabel::Likely);

    let expected = recommend(&high, &profile);
    assert_eq!(recommend(&marginal, &profile), expected);
    assert_eq!(recommend(&placeholder, &profile), expected);
}

#[test]
fn insights_follow_outcome_and_economy() {
    let insights = BusinessInsights::for_profile(&retiree_profile());
    assert!(insights.campaign_history.starts_with("Prior success"));
    assert!(insights.economic_context.starts_with("Weaker economy"));

    let mut profile = profile();
    profile.emp_var_rate = 1.4;
    let insights = BusinessInsights::for_profile(&profile);
    assert!(insights.campaign_history.starts_with("No prior success"));
    assert!(insights.economic_context.starts_with("Strong economy"));
}
