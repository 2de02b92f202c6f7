use crate::subscription::domain::{
    ContactMethod, CreditDefault, CustomerProfile, Education, HousingLoan, PersonalLoan,
    PreviousOutcome, SubscriptionLabel,
};

/// A single talking point with its trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecommendationRule {
    PriorSuccess,
    Retirement,
    SavingsDiscipline,
    WeakEconomy,
    DebtFree,
    MobileFollowUp,
    HighPotential,
    PriorFailure,
    FirstContact,
    CreditDefaulted,
    StrongEconomy,
    PlainLanguage,
    LowPotential,
}

/// Rules considered for a likely subscriber, in presentation order.
pub(crate) const LIKELY_LADDER: [RecommendationRule; 6] = [
    RecommendationRule::PriorSuccess,
    RecommendationRule::Retirement,
    RecommendationRule::SavingsDiscipline,
    RecommendationRule::WeakEconomy,
    RecommendationRule::DebtFree,
    RecommendationRule::MobileFollowUp,
];

pub(crate) const UNLIKELY_LADDER: [RecommendationRule; 5] = [
    RecommendationRule::PriorFailure,
    RecommendationRule::FirstContact,
    RecommendationRule::CreditDefaulted,
    RecommendationRule::StrongEconomy,
    RecommendationRule::PlainLanguage,
];

impl RecommendationRule {
    pub const fn ladder(label: SubscriptionLabel) -> &'static [RecommendationRule] {
        match label {
            SubscriptionLabel::Likely => &LIKELY_LADDER,
            SubscriptionLabel::Unlikely => &UNLIKELY_LADDER,
        }
    }

    /// Emitted only when nothing on the ladder fires.
    pub const fn fallback(label: SubscriptionLabel) -> RecommendationRule {
        match label {
            SubscriptionLabel::Likely => RecommendationRule::HighPotential,
            SubscriptionLabel::Unlikely => RecommendationRule::LowPotential,
        }
    }

    pub fn applies(self, profile: &CustomerProfile) -> bool {
        match self {
            Self::PriorSuccess => profile.poutcome == PreviousOutcome::Success,
            Self::Retirement => profile.age > 60,
            Self::SavingsDiscipline => profile.age <= 30,
            Self::WeakEconomy => profile.emp_var_rate < 0.0,
            Self::DebtFree => {
                profile.default == CreditDefault::No
                    && profile.loan == PersonalLoan::No
                    && profile.housing == HousingLoan::No
            }
            Self::MobileFollowUp => profile.contact == ContactMethod::Cellular,
            Self::PriorFailure => profile.poutcome == PreviousOutcome::Failure,
            Self::FirstContact => profile.never_contacted() && profile.previous == 0,
            Self::CreditDefaulted => profile.default == CreditDefault::Yes,
            Self::StrongEconomy => profile.emp_var_rate > 0.0,
            Self::PlainLanguage => matches!(
                profile.education,
                Education::Basic4y | Education::Basic6y | Education::Illiterate
            ),
            Self::HighPotential | Self::LowPotential => true,
        }
    }

    pub const fn message(self) -> &'static str {
        match self {
            Self::PriorSuccess => "Previous campaign was successful - You may want to reference their past term deposit experience and highlight improved rates from then",
            Self::Retirement => "Customer is retired/elderly - You may want to emphasise guaranteed returns, and deposit insurance protection from SDIC",
            Self::SavingsDiscipline => "Customer is young - You may want to position and phrase term deposit subscription as a disciplined savings tool to build financial foundation as well as grow the money",
            Self::WeakEconomy => "Economy is weakening - You may want to highlight term deposits as a safe investment to customers especially during market uncertainty",
            Self::DebtFree => "Customer has no existing debt - likely has disposable income available for investment",
            Self::MobileFollowUp => "Contact via cellular - customer is reachable on mobile, you may want to consider sending follow-up SMS to check in with them",
            Self::HighPotential => "Customer profile shows strong subscription signals - You may want to prioritise them for immediate follow-ups",
            Self::PriorFailure => "Previous campaign failed - You may want to avoid hard-sell approach and focus on explaining changed circumstances to them",
            Self::FirstContact => "Customer was never contacted before - You may want to introduce yourself first to build rapport before pitching",
            Self::CreditDefaulted => "Customer has credit default - They may face financial difficulties so you may want to approach sensibly",
            Self::StrongEconomy => "Economy is strong - customer may prefer higher-risk investments, you may want to mention flexibility of shorter term deposits",
            Self::PlainLanguage => "Consider using simpler language to explain term deposit benefits and avoid financial jargon",
            Self::LowPotential => "Customer shows low subscription likelihood - You may want to deprioritise and allocate time to higher-potential prospects",
        }
    }
}

pub(crate) fn fired_rules(label: SubscriptionLabel, profile: &CustomerProfile) -> Vec<RecommendationRule> {
    let fired: Vec<RecommendationRule> = RecommendationRule::ladder(label)
        .iter()
        .copied()
        .filter(|rule| rule.applies(profile))
        .collect();

    if fired.is_empty() {
        vec![RecommendationRule::fallback(label)]
    } else {
        fired
    }
}
