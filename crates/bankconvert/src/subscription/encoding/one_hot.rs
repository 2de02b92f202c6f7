use super::schema::RawFrame;
use crate::subscription::domain::{Category, CustomerProfile};
use crate::subscription::features::EngineeredFeatures;

/// Numeric columns in training frame order.
pub const NUMERIC_COLUMNS: [&str; 10] = [
    "age",
    "pdays",
    "previous",
    "emp.var.rate",
    "cons.price.idx",
    "cons.conf.idx",
    "euribor3m",
    "nr.employed",
    "contacted_before",
    "prev_success",
];

/// Categorical columns in the order they were dummy-encoded.
pub const CATEGORICAL_COLUMNS: [&str; 13] = [
    "job",
    "marital",
    "education",
    "default",
    "housing",
    "loan",
    "contact",
    "month",
    "day_of_week",
    "poutcome",
    "age_group",
    "economic_condition",
    "contact_recency",
];

/// Build the unaligned training-style frame for one profile.
///
/// Each categorical expands to one indicator per value of its full domain except the baseline
/// (lexicographically first) value, so a single row encodes the same way the training frame did.
pub fn one_hot_frame(profile: &CustomerProfile, engineered: &EngineeredFeatures) -> RawFrame {
    let mut frame = RawFrame::default();

    let numerics = [
        f64::from(profile.age),
        f64::from(profile.pdays),
        f64::from(profile.previous),
        profile.emp_var_rate,
        profile.cons_price_idx,
        profile.cons_conf_idx,
        profile.euribor3m,
        profile.nr_employed,
        f64::from(engineered.contacted_before),
        f64::from(engineered.prev_success),
    ];
    for (column, value) in NUMERIC_COLUMNS.iter().zip(numerics) {
        frame.push(*column, value);
    }

    push_dummies(&mut frame, profile.job);
    push_dummies(&mut frame, profile.marital);
    push_dummies(&mut frame, profile.education);
    push_dummies(&mut frame, profile.default);
    push_dummies(&mut frame, profile.housing);
    push_dummies(&mut frame, profile.loan);
    push_dummies(&mut frame, profile.contact);
    push_dummies(&mut frame, profile.month);
    push_dummies(&mut frame, profile.day_of_week);
    push_dummies(&mut frame, profile.poutcome);
    push_dummies(&mut frame, engineered.age_group);
    push_dummies(&mut frame, engineered.economic_condition);
    push_dummies(&mut frame, engineered.contact_recency);

    frame
}

pub fn dummy_column<C: Category>(value: C) -> String {
    format!("{}_{}", C::COLUMN, value.raw())
}

/// Indicator columns a categorical contributes, baseline excluded, sorted by raw value.
pub fn dummy_columns<C: Category>() -> Vec<String> {
    let baseline = C::baseline();
    let mut values: Vec<C> = C::domain()
        .iter()
        .copied()
        .filter(|value| value.raw() != baseline)
        .collect();
    values.sort_by_key(|value| value.raw());
    values.into_iter().map(dummy_column).collect()
}

fn push_dummies<C: Category>(frame: &mut RawFrame, selected: C) {
    let baseline = C::baseline();
    for value in C::domain().iter().copied() {
        if value.raw() == baseline {
            continue;
        }
        frame.push(dummy_column(value), if value == selected { 1.0 } else { 0.0 });
    }
}
