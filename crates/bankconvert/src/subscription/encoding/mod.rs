//! Profile-to-vector encoding bit-compatible with the training frame.
//!
//! Encoding runs in three steps: one-hot expansion ([`one_hot_frame`]), alignment to the
//! training column list ([`align_to_schema`]), then standard scaling of the numeric columns.

mod one_hot;
mod scaler;
mod schema;

pub use one_hot::{dummy_column, dummy_columns, one_hot_frame, CATEGORICAL_COLUMNS, NUMERIC_COLUMNS};
pub use scaler::{ScalerParams, StandardScaler};
pub use schema::{align_to_schema, AlignedRow, FeatureSchema, RawFrame};

use serde::Serialize;

use super::domain::CustomerProfile;
use super::features::EngineeredFeatures;

/// Problems with the schema or scaler artifacts, detected when they are loaded.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ArtifactError {
    #[error("feature column list is empty")]
    EmptySchema,
    #[error("column '{0}' appears more than once")]
    DuplicateColumn(String),
    #[error("scaler arrays disagree in length (feature_names_in {names}, mean {mean}, scale {scale})")]
    ScalerLengthMismatch {
        names: usize,
        mean: usize,
        scale: usize,
    },
    #[error("scaler parameters for '{0}' are not finite")]
    NonFiniteScaler(String),
}

/// Per-request encoding failure; no prediction is produced for that request.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    #[error("scaler column '{0}' is absent from the aligned frame")]
    ScalerColumnMissing(String),
    #[error("encoded frame repeats column '{0}'")]
    DuplicateFrameColumn(String),
    #[error("feature vector has {found} values, expected {expected}")]
    LengthMismatch { expected: usize, found: usize },
    #[error("column {position} is '{found}', expected '{expected}'")]
    OrderMismatch {
        position: usize,
        expected: String,
        found: String,
    },
    #[error("column '{column}' encoded to non-finite value {value}")]
    NonFinite { column: String, value: f64 },
}

/// Scaled values in training column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Training schema plus fitted scaler.
#[derive(Debug, Clone)]
pub struct Encoder {
    schema: FeatureSchema,
    scaler: StandardScaler,
}

impl Encoder {
    pub fn new(schema: FeatureSchema, scaler: StandardScaler) -> Self {
        Self { schema, scaler }
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn encode(
        &self,
        profile: &CustomerProfile,
        engineered: &EngineeredFeatures,
    ) -> Result<FeatureVector, SchemaError> {
        let frame = one_hot_frame(profile, engineered);
        let mut row = align_to_schema(&frame, &self.schema)?;
        self.scaler.transform(&mut row)?;

        if let Some((column, value)) = row
            .columns()
            .iter()
            .zip(row.values())
            .find(|(_, value)| !value.is_finite())
        {
            return Err(SchemaError::NonFinite {
                column: column.clone(),
                value: *value,
            });
        }

        Ok(FeatureVector(row.values))
    }
}
