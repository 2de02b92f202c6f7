use serde::{Serialize, Serializer};
use std::fmt;

use super::domain::{CustomerProfile, Job, PreviousOutcome};

/// Advisory inconsistency in a profile. Never blocks a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputWarning {
    ContactDaysWithoutContacts,
    SuccessWithoutContact,
    OutcomeWithoutContacts,
    YoungRetiree,
    SeniorStudent,
}

impl InputWarning {
    pub const fn ordered() -> [InputWarning; 5] {
        [
            Self::ContactDaysWithoutContacts,
            Self::SuccessWithoutContact,
            Self::OutcomeWithoutContacts,
            Self::YoungRetiree,
            Self::SeniorStudent,
        ]
    }

    pub fn applies(self, profile: &CustomerProfile) -> bool {
        match self {
            Self::ContactDaysWithoutContacts => !profile.never_contacted() && profile.previous == 0,
            Self::SuccessWithoutContact => {
                profile.poutcome == PreviousOutcome::Success && profile.never_contacted()
            }
            Self::OutcomeWithoutContacts => {
                profile.poutcome != PreviousOutcome::Nonexistent && profile.previous == 0
            }
            Self::YoungRetiree => profile.age < 25 && profile.job == Job::Retired,
            Self::SeniorStudent => profile.age > 65 && profile.job == Job::Student,
        }
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::ContactDaysWithoutContacts => "contact_days_without_contacts",
            Self::SuccessWithoutContact => "success_without_contact",
            Self::OutcomeWithoutContacts => "outcome_without_contacts",
            Self::YoungRetiree => "young_retiree",
            Self::SeniorStudent => "senior_student",
        }
    }

    pub const fn message(self) -> &'static str {
        match self {
            Self::ContactDaysWithoutContacts => "You set days since last contact but previous contacts is 0. If the customer was contacted before, previous contacts should be at least 1.",
            Self::SuccessWithoutContact => "Previous outcome is 'success' but days since contact is 999 (never contacted). These are contradictory - please verify.",
            Self::OutcomeWithoutContacts => "Previous outcome is set but previous contacts is 0. If there was a previous campaign, contacts should be at least 1.",
            Self::YoungRetiree => "Customer is under 25 but listed as retired - please verify age and occupation.",
            Self::SeniorStudent => "Customer is over 65 but listed as student - please verify age and occupation.",
        }
    }
}

impl fmt::Display for InputWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl Serialize for InputWarning {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("InputWarning", 2)?;
        state.serialize_field("code", self.code())?;
        state.serialize_field("message", self.message())?;
        state.end()
    }
}

/// Every check runs independently; the result lists all that fire, in a fixed order.
pub fn validate(profile: &CustomerProfile) -> Vec<InputWarning> {
    InputWarning::ordered()
        .into_iter()
        .filter(|warning| warning.applies(profile))
        .collect()
}
