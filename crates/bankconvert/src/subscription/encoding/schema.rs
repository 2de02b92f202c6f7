use std::collections::HashMap;

use super::{ArtifactError, SchemaError};

/// Ordered training column names, exactly as the classifier consumed them.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSchema {
    columns: Vec<String>,
    positions: HashMap<String, usize>,
}

impl FeatureSchema {
    pub fn new(columns: Vec<String>) -> Result<Self, ArtifactError> {
        if columns.is_empty() {
            return Err(ArtifactError::EmptySchema);
        }

        let mut positions = HashMap::with_capacity(columns.len());
        for (position, column) in columns.iter().enumerate() {
            if positions.insert(column.clone(), position).is_some() {
                return Err(ArtifactError::DuplicateColumn(column.clone()));
            }
        }

        Ok(Self { columns, positions })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn position(&self, column: &str) -> Option<usize> {
        self.positions.get(column).copied()
    }
}

/// Named values produced by one-hot encoding, before alignment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawFrame {
    entries: Vec<(String, f64)>,
}

impl RawFrame {
    pub fn push(&mut self, column: impl Into<String>, value: f64) {
        self.entries.push((column.into(), value));
    }

    pub fn get(&self, column: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| *value)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A row laid out in schema order.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedRow<'a> {
    pub(crate) columns: &'a [String],
    pub(crate) values: Vec<f64>,
}

impl AlignedRow<'_> {
    pub fn columns(&self) -> &[String] {
        self.columns
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn value(&self, column: &str) -> Option<f64> {
        self.columns
            .iter()
            .position(|name| name == column)
            .map(|position| self.values[position])
    }
}

/// Lay `frame` out in the order of `schema`: schema columns absent from the frame become 0 and
/// frame columns unknown to the schema are dropped.
///
/// The frame must not repeat a column; the result always has the schema's length and order.
pub fn align_to_schema<'a>(
    frame: &RawFrame,
    schema: &'a FeatureSchema,
) -> Result<AlignedRow<'a>, SchemaError> {
    let mut lookup: HashMap<&str, f64> = HashMap::with_capacity(frame.len());
    for (column, value) in &frame.entries {
        if lookup.insert(column.as_str(), *value).is_some() {
            return Err(SchemaError::DuplicateFrameColumn(column.clone()));
        }
    }

    let values: Vec<f64> = schema
        .columns()
        .iter()
        .map(|column| lookup.get(column.as_str()).copied().unwrap_or(0.0))
        .collect();

    let row = AlignedRow {
        columns: schema.columns(),
        values,
    };
    check_alignment(&row, schema)?;
    Ok(row)
}

fn check_alignment(row: &AlignedRow<'_>, schema: &FeatureSchema) -> Result<(), SchemaError> {
    if row.values.len() != schema.len() || row.columns.len() != schema.len() {
        return Err(SchemaError::LengthMismatch {
            expected: schema.len(),
            found: row.values.len(),
        });
    }

    if let Some((position, (found, expected))) = row
        .columns
        .iter()
        .zip(schema.columns())
        .enumerate()
        .find(|(_, (found, expected))| found != expected)
    {
        return Err(SchemaError::OrderMismatch {
            position,
            expected: expected.clone(),
            found: found.clone(),
        });
    }

    Ok(())
}
