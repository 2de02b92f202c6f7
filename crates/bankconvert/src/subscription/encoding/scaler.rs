use serde::{Deserialize, Serialize};

use super::schema::AlignedRow;
use super::{ArtifactError, SchemaError};

/// Fitted standard-scaler parameters as exported next to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalerParams {
    pub feature_names_in: Vec<String>,
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
struct ScaledColumn {
    name: String,
    mean: f64,
    scale: f64,
}

/// Standard scaling over the named numeric columns; every other column passes through.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    columns: Vec<ScaledColumn>,
}

impl StandardScaler {
    pub fn from_params(params: ScalerParams) -> Result<Self, ArtifactError> {
        let ScalerParams {
            feature_names_in,
            mean,
            scale,
        } = params;

        if feature_names_in.len() != mean.len() || feature_names_in.len() != scale.len() {
            return Err(ArtifactError::ScalerLengthMismatch {
                names: feature_names_in.len(),
                mean: mean.len(),
                scale: scale.len(),
            });
        }

        let mut columns = Vec::with_capacity(feature_names_in.len());
        for ((name, mean), scale) in feature_names_in.into_iter().zip(mean).zip(scale) {
            if !mean.is_finite() || !scale.is_finite() {
                return Err(ArtifactError::NonFiniteScaler(name));
            }
            if columns.iter().any(|column: &ScaledColumn| column.name == name) {
                return Err(ArtifactError::DuplicateColumn(name));
            }
            // A constant training column has zero spread and is left unscaled.
            let scale = if scale == 0.0 { 1.0 } else { scale };
            columns.push(ScaledColumn { name, mean, scale });
        }

        Ok(Self { columns })
    }

    pub fn feature_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|column| column.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Scale the named columns of an aligned row in place, locating each by the row's own columns.
    pub fn transform(&self, row: &mut AlignedRow<'_>) -> Result<(), SchemaError> {
        for column in &self.columns {
            let position = row
                .columns
                .iter()
                .position(|name| *name == column.name)
                .ok_or_else(|| SchemaError::ScalerColumnMissing(column.name.clone()))?;
            let value = &mut row.values[position];
            *value = (*value - column.mean) / column.scale;
        }

        Ok(())
    }
}
