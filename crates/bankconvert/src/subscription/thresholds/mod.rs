//! Resolution of the two economic medians behind the `economic_condition` feature.
//!
//! Sources are tried in order: the persisted thresholds artifact, a recomputation over the
//! historical campaign dataset using the training split, then the known training medians.
//! The first source that exists decides; a source that exists but cannot be read is an error,
//! never a silent fall-through.

mod dataset;
mod random;
mod split;

pub use dataset::{median, read_dataset, DatasetError, HistoricalDataset, LEAKAGE_COLUMNS};
pub use split::{
    partition_sizes, stratified_train_indices, SplitError, TRAINING_SPLIT_SEED,
    TRAINING_TEST_FRACTION,
};

use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, info, warn};

/// Training-partition medians of `emp.var.rate` and `nr.employed`.
pub const FALLBACK_THRESHOLDS: Thresholds = Thresholds {
    emp_median: 1.1,
    nr_median: 5191.0,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub emp_median: f64,
    pub nr_median: f64,
}

impl Thresholds {
    fn checked(self) -> Result<Self, ThresholdError> {
        if self.emp_median.is_finite() && self.nr_median.is_finite() {
            Ok(self)
        } else {
            Err(ThresholdError::NonFinite(self))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdSource {
    Artifact,
    Dataset,
    Fallback,
}

impl ThresholdSource {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Artifact => "thresholds artifact",
            Self::Dataset => "historical dataset recomputation",
            Self::Fallback => "built-in training medians",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResolvedThresholds {
    pub thresholds: Thresholds,
    pub source: ThresholdSource,
}

#[derive(Debug, thiserror::Error)]
pub enum ThresholdError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("thresholds artifact {path} is malformed: {source}")]
    Artifact {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error("historical dataset cannot be split: {0}")]
    Split(#[from] SplitError),
    #[error("resolved thresholds are not finite: {0:?}")]
    NonFinite(Thresholds),
    #[error("no threshold source available (artifact {artifact}, dataset {dataset}) and the built-in fallback is disabled")]
    Unavailable { artifact: PathBuf, dataset: PathBuf },
}

/// Resolves the medians once and serves the cached pair afterwards.
#[derive(Debug)]
pub struct ThresholdProvider {
    artifact_path: PathBuf,
    dataset_path: PathBuf,
    allow_fallback: bool,
    resolved: OnceLock<ResolvedThresholds>,
}

impl ThresholdProvider {
    pub fn new(artifact_path: impl Into<PathBuf>, dataset_path: impl Into<PathBuf>) -> Self {
        Self {
            artifact_path: artifact_path.into(),
            dataset_path: dataset_path.into(),
            allow_fallback: true,
            resolved: OnceLock::new(),
        }
    }

    pub fn with_fallback(mut self, allow_fallback: bool) -> Self {
        self.allow_fallback = allow_fallback;
        self
    }

    pub fn get_thresholds(&self) -> Result<Thresholds, ThresholdError> {
        self.resolve().map(|resolved| resolved.thresholds)
    }

    pub fn resolve(&self) -> Result<ResolvedThresholds, ThresholdError> {
        if let Some(resolved) = self.resolved.get() {
            return Ok(*resolved);
        }

        let resolved = self.resolve_uncached()?;
        info!(
            source = resolved.source.label(),
            emp_median = resolved.thresholds.emp_median,
            nr_median = resolved.thresholds.nr_median,
            "economic thresholds resolved"
        );
        Ok(*self.resolved.get_or_init(|| resolved))
    }

    fn resolve_uncached(&self) -> Result<ResolvedThresholds, ThresholdError> {
        if let Some(thresholds) = read_if_present(&self.artifact_path, load_artifact)? {
            return Ok(ResolvedThresholds {
                thresholds: thresholds.checked()?,
                source: ThresholdSource::Artifact,
            });
        }
        debug!(path = %self.artifact_path.display(), "thresholds artifact not found");

        if let Some(thresholds) = read_if_present(&self.dataset_path, recompute_from_dataset)? {
            return Ok(ResolvedThresholds {
                thresholds: thresholds.checked()?,
                source: ThresholdSource::Dataset,
            });
        }
        debug!(path = %self.dataset_path.display(), "historical dataset not found");

        if self.allow_fallback {
            warn!("no threshold artifact or dataset located; using built-in training medians");
            return Ok(ResolvedThresholds {
                thresholds: FALLBACK_THRESHOLDS,
                source: ThresholdSource::Fallback,
            });
        }

        Err(ThresholdError::Unavailable {
            artifact: self.artifact_path.clone(),
            dataset: self.dataset_path.clone(),
        })
    }
}

fn read_if_present<F>(path: &Path, parse: F) -> Result<Option<Thresholds>, ThresholdError>
where
    F: FnOnce(&Path, std::fs::File) -> Result<Thresholds, ThresholdError>,
{
    match std::fs::File::open(path) {
        Ok(file) => parse(path, file).map(Some),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(ThresholdError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn load_artifact(path: &Path, file: std::fs::File) -> Result<Thresholds, ThresholdError> {
    serde_json::from_reader(std::io::BufReader::new(file)).map_err(|source| {
        ThresholdError::Artifact {
            path: path.to_path_buf(),
            source,
        }
    })
}

fn recompute_from_dataset(_path: &Path, file: std::fs::File) -> Result<Thresholds, ThresholdError> {
    thresholds_from_reader(std::io::BufReader::new(file))
}

/// Recompute the medians over the training partition of the historical dataset.
pub fn thresholds_from_reader<R: Read>(reader: R) -> Result<Thresholds, ThresholdError> {
    let dataset = read_dataset(reader)?;
    thresholds_from_dataset(&dataset)
}

pub fn thresholds_from_dataset(dataset: &HistoricalDataset) -> Result<Thresholds, ThresholdError> {
    let train = stratified_train_indices(
        &dataset.labels,
        TRAINING_TEST_FRACTION,
        TRAINING_SPLIT_SEED,
    )?;
    debug!(
        rows = dataset.len(),
        duplicates_dropped = dataset.duplicates_dropped,
        train_rows = train.len(),
        "recomputing thresholds from training partition"
    );

    let emp: Vec<f64> = train.iter().map(|&row| dataset.emp_var_rate[row]).collect();
    let nr: Vec<f64> = train.iter().map(|&row| dataset.nr_employed[row]).collect();

    // The split guarantees a non-empty training partition.
    let thresholds = Thresholds {
        emp_median: median(&emp).unwrap_or(f64::NAN),
        nr_median: median(&nr).unwrap_or(f64::NAN),
    };
    thresholds.checked()
}
