use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// `pdays` value recorded for customers never reached in an earlier campaign.
pub const NEVER_CONTACTED_PDAYS: u16 = 999;

pub const MIN_AGE: u16 = 18;
pub const MAX_AGE: u16 = 95;

/// A categorical column as it appeared in the training frame.
///
/// `raw` is the exact string the dataset used, which is also the suffix of the one-hot column
/// name (`<COLUMN>_<raw>`).
pub trait Category: Copy + PartialEq + 'static {
    const COLUMN: &'static str;

    fn domain() -> &'static [Self];

    fn raw(self) -> &'static str;

    /// Category that carries no indicator column: the lexicographically smallest value.
    fn baseline() -> &'static str {
        Self::domain()
            .iter()
            .map(|value| value.raw())
            .min()
            .unwrap_or_default()
    }
}

macro_rules! categorical {
    (
        $(#[$meta:meta])*
        $name:ident, column = $column:literal, { $($variant:ident => $raw:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $raw)]
                $variant,
            )+
        }

        impl $name {
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $raw,)+
                }
            }
        }

        impl $crate::subscription::domain::Category for $name {
            const COLUMN: &'static str = $column;

            fn domain() -> &'static [Self] {
                &[$(Self::$variant),+]
            }

            fn raw(self) -> &'static str {
                self.as_str()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub(crate) use categorical;

categorical! {
    /// Occupation as recorded by the bank.
    Job, column = "job", {
        Admin => "admin.",
        BlueCollar => "blue-collar",
        Entrepreneur => "entrepreneur",
        Housemaid => "housemaid",
        Management => "management",
        Retired => "retired",
        SelfEmployed => "self-employed",
        Services => "services",
        Student => "student",
        Technician => "technician",
        Unemployed => "unemployed",
        Unknown => "unknown",
    }
}

categorical! {
    MaritalStatus, column = "marital", {
        Divorced => "divorced",
        Married => "married",
        Single => "single",
        Unknown => "unknown",
    }
}

categorical! {
    /// Highest completed education level.
    Education, column = "education", {
        Basic4y => "basic.4y",
        Basic6y => "basic.6y",
        Basic9y => "basic.9y",
        HighSchool => "high.school",
        Illiterate => "illiterate",
        ProfessionalCourse => "professional.course",
        UniversityDegree => "university.degree",
        Unknown => "unknown",
    }
}

categorical! {
    /// Whether the customer has credit in default.
    CreditDefault, column = "default", {
        No => "no",
        Yes => "yes",
        Unknown => "unknown",
    }
}

categorical! {
    HousingLoan, column = "housing", {
        No => "no",
        Yes => "yes",
        Unknown => "unknown",
    }
}

categorical! {
    PersonalLoan, column = "loan", {
        No => "no",
        Yes => "yes",
        Unknown => "unknown",
    }
}

categorical! {
    ContactMethod, column = "contact", {
        Cellular => "cellular",
        Telephone => "telephone",
    }
}

categorical! {
    /// Month of the last contact in the current campaign.
    ContactMonth, column = "month", {
        Jan => "jan",
        Feb => "feb",
        Mar => "mar",
        Apr => "apr",
        May => "may",
        Jun => "jun",
        Jul => "jul",
        Aug => "aug",
        Sep => "sep",
        Oct => "oct",
        Nov => "nov",
        Dec => "dec",
    }
}

categorical! {
    ContactDay, column = "day_of_week", {
        Mon => "mon",
        Tue => "tue",
        Wed => "wed",
        Thu => "thu",
        Fri => "fri",
    }
}

categorical! {
    /// Outcome of the previous marketing campaign for this customer.
    PreviousOutcome, column = "poutcome", {
        Nonexistent => "nonexistent",
        Failure => "failure",
        Success => "success",
    }
}

/// One customer's raw attributes for a single prediction request.
///
/// Field names follow Rust conventions; the dotted dataset names (`emp.var.rate`, ...) are
/// accepted as aliases so rows exported from the training data can be posted unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub age: u16,
    pub job: Job,
    pub marital: MaritalStatus,
    pub education: Education,
    pub default: CreditDefault,
    pub housing: HousingLoan,
    pub loan: PersonalLoan,
    pub contact: ContactMethod,
    pub month: ContactMonth,
    pub day_of_week: ContactDay,
    pub pdays: u16,
    pub previous: u32,
    pub poutcome: PreviousOutcome,
    #[serde(alias = "emp.var.rate")]
    pub emp_var_rate: f64,
    #[serde(alias = "cons.price.idx")]
    pub cons_price_idx: f64,
    #[serde(alias = "cons.conf.idx")]
    pub cons_conf_idx: f64,
    pub euribor3m: f64,
    #[serde(alias = "nr.employed")]
    pub nr_employed: f64,
}

impl CustomerProfile {
    /// Reject values outside the ranges the model was trained on.
    pub fn check_domain(&self) -> Result<(), ProfileError> {
        if !(MIN_AGE..=MAX_AGE).contains(&self.age) {
            return Err(ProfileError::AgeOutOfRange(self.age));
        }

        if self.pdays > NEVER_CONTACTED_PDAYS {
            return Err(ProfileError::PdaysOutOfRange(self.pdays));
        }

        let indicators = [
            ("emp.var.rate", self.emp_var_rate),
            ("cons.price.idx", self.cons_price_idx),
            ("cons.conf.idx", self.cons_conf_idx),
            ("euribor3m", self.euribor3m),
            ("nr.employed", self.nr_employed),
        ];
        if let Some((field, value)) = indicators.iter().find(|(_, value)| !value.is_finite()) {
            return Err(ProfileError::NonFinite {
                field: *field,
                value: *value,
            });
        }

        Ok(())
    }

    pub fn never_contacted(&self) -> bool {
        self.pdays == NEVER_CONTACTED_PDAYS
    }

    pub fn last_contact_label(&self) -> String {
        if self.never_contacted() {
            "Never contacted".to_string()
        } else {
            format!("{} days ago", self.pdays)
        }
    }
}

/// Hard input errors; unlike advisory warnings these stop the request.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProfileError {
    #[error("age {0} is outside the supported range 18-95")]
    AgeOutOfRange(u16),
    #[error("pdays {0} is outside 0-999 (999 means never contacted)")]
    PdaysOutOfRange(u16),
    #[error("{field} must be a finite number, found {value}")]
    NonFinite { field: &'static str, value: f64 },
}

/// Binary class emitted by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubscriptionLabel {
    Unlikely,
    Likely,
}

impl SubscriptionLabel {
    pub const fn class(self) -> u8 {
        match self {
            Self::Unlikely => 0,
            Self::Likely => 1,
        }
    }

    pub const fn from_class(class: u8) -> Option<Self> {
        match class {
            0 => Some(Self::Unlikely),
            1 => Some(Self::Likely),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Unlikely => "Unlikely to subscribe",
            Self::Likely => "Likely to subscribe",
        }
    }
}

impl fmt::Display for SubscriptionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for SubscriptionLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.class())
    }
}

impl<'de> Deserialize<'de> for SubscriptionLabel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let class = u8::deserialize(deserializer)?;
        Self::from_class(class)
            .ok_or_else(|| serde::de::Error::custom(format!("label must be 0 or 1, got {class}")))
    }
}

/// Where a prediction's probability came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbabilitySource {
    Model,
    /// Fixed stand-in keyed on the label; not a confidence estimate.
    Placeholder,
}

const PLACEHOLDER_LIKELY: f64 = 0.7;
const PLACEHOLDER_UNLIKELY: f64 = 0.3;

/// Label plus class-1 probability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub label: SubscriptionLabel,
    pub probability: f64,
    pub probability_source: ProbabilitySource,
}

impl PredictionResult {
    pub fn from_model(label: SubscriptionLabel, probability: f64) -> Self {
        Self {
            label,
            probability: probability.clamp(0.0, 1.0),
            probability_source: ProbabilitySource::Model,
        }
    }

    pub fn placeholder(label: SubscriptionLabel) -> Self {
        let probability = match label {
            SubscriptionLabel::Likely => PLACEHOLDER_LIKELY,
            SubscriptionLabel::Unlikely => PLACEHOLDER_UNLIKELY,
        };
        Self {
            label,
            probability,
            probability_source: ProbabilitySource::Placeholder,
        }
    }

    /// Probability of the predicted class rather than of class 1.
    pub fn confidence(&self) -> f64 {
        match self.label {
            SubscriptionLabel::Likely => self.probability,
            SubscriptionLabel::Unlikely => 1.0 - self.probability,
        }
    }

    pub fn band(&self) -> ProbabilityBand {
        ProbabilityBand::for_probability(self.probability)
    }
}

/// Coarse zones used when presenting the class-1 probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbabilityBand {
    Low,
    Moderate,
    High,
}

impl ProbabilityBand {
    pub fn for_probability(probability: f64) -> Self {
        if probability < 0.3 {
            Self::Low
        } else if probability < 0.5 {
            Self::Moderate
        } else {
            Self::High
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
        }
    }
}
