use bankconvert::config::ArtifactConfig;
use bankconvert::subscription::{ModelContext, PredictionCapability, PredictionService};
use clap::Args;
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) capability: PredictionCapability,
}

/// Artifact location overrides shared by the offline commands.
#[derive(Args, Debug, Default, Clone)]
pub(crate) struct ArtifactArgs {
    /// Directory holding best_model.json, scaler.json and feature_columns.json
    #[arg(long)]
    pub(crate) artifact_dir: Option<PathBuf>,
    /// Historical dataset used to recompute thresholds when thresholds.json is absent
    #[arg(long)]
    pub(crate) dataset: Option<PathBuf>,
    /// Fail instead of using the training-time median constants
    #[arg(long)]
    pub(crate) no_fallback: bool,
}

impl ArtifactArgs {
    pub(crate) fn apply(&self, configured: ArtifactConfig) -> ArtifactConfig {
        let mut config = match &self.artifact_dir {
            Some(dir) => ArtifactConfig {
                model_path: rebase(dir, &configured.model_path),
                scaler_path: rebase(dir, &configured.scaler_path),
                feature_columns_path: rebase(dir, &configured.feature_columns_path),
                thresholds_path: rebase(dir, &configured.thresholds_path),
                ..configured
            },
            None => configured,
        };
        if let Some(dataset) = &self.dataset {
            config.dataset_path = dataset.clone();
        }
        if self.no_fallback {
            config.threshold_fallback = false;
        }
        config
    }
}

/// Keeps the configured file name and swaps only its directory.
fn rebase(dir: &Path, path: &Path) -> PathBuf {
    match path.file_name() {
        Some(name) => dir.join(name),
        None => path.to_path_buf(),
    }
}

/// Load the model context once; a failure disables scoring but not the server.
pub(crate) fn load_capability(config: &ArtifactConfig) -> PredictionCapability {
    match ModelContext::load(config) {
        Ok(context) => {
            info!(
                model = context.classifier().name(),
                thresholds = context.threshold_source().label(),
                "prediction capability ready"
            );
            PredictionCapability::Ready(Arc::new(PredictionService::new(Arc::new(context))))
        }
        Err(err) => {
            error!(%err, "prediction capability unavailable");
            PredictionCapability::Unavailable(err.to_string())
        }
    }
}

#[cfg(test)]
pub(crate) fn fixture_artifacts() -> ArtifactConfig {
    let root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../crates/bankconvert/tests/fixtures/artifacts");
    let mut config = ArtifactConfig::in_dir(root);
    config.dataset_path = PathBuf::from("absent.csv");
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_dir_override_keeps_threshold_settings() {
        let mut configured = ArtifactConfig::in_dir("artifacts");
        configured.dataset_path = PathBuf::from("/data/bank.csv");
        configured.threshold_fallback = false;

        let args = ArtifactArgs {
            artifact_dir: Some(PathBuf::from("/srv/models")),
            ..ArtifactArgs::default()
        };
        let config = args.apply(configured);

        assert_eq!(config.model_path, PathBuf::from("/srv/models/best_model.json"));
        assert_eq!(config.dataset_path, PathBuf::from("/data/bank.csv"));
        assert!(!config.threshold_fallback);
    }

    #[test]
    fn artifact_dir_override_keeps_configured_file_names() {
        let mut configured = ArtifactConfig::in_dir("/opt/artifacts");
        configured.model_path = PathBuf::from("/opt/artifacts/forest.json");
        configured.scaler_path = PathBuf::from("/opt/artifacts/scaler-v2.json");
        configured.feature_columns_path = PathBuf::from("/opt/artifacts/columns.json");
        configured.thresholds_path = PathBuf::from("/opt/artifacts/medians.json");

        let args = ArtifactArgs {
            artifact_dir: Some(PathBuf::from("/srv/models")),
            ..ArtifactArgs::default()
        };
        let config = args.apply(configured);

        assert_eq!(config.model_path, PathBuf::from("/srv/models/forest.json"));
        assert_eq!(config.scaler_path, PathBuf::from("/srv/models/scaler-v2.json"));
        assert_eq!(config.feature_columns_path, PathBuf::from("/srv/models/columns.json"));
        assert_eq!(config.thresholds_path, PathBuf::from("/srv/models/medians.json"));
    }

    #[test]
    fn no_fallback_flag_disables_constants() {
        let args = ArtifactArgs {
            no_fallback: true,
            ..ArtifactArgs::default()
        };
        assert!(!args.apply(ArtifactConfig::in_dir("artifacts")).threshold_fallback);
    }

    #[test]
    fn fixture_artifacts_load_into_ready_capability() {
        assert!(load_capability(&fixture_artifacts()).is_ready());
    }

    #[test]
    fn missing_artifacts_leave_capability_unavailable_with_reason() {
        let capability = load_capability(&ArtifactConfig::in_dir("/nonexistent/models"));
        match capability {
            PredictionCapability::Unavailable(reason) => assert!(reason.contains("best_model.json")),
            PredictionCapability::Ready(_) => panic!("capability should be unavailable"),
        }
    }
}
