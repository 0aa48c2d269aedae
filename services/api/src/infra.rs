use clap::Args;
use metrics_exporter_prometheus::PrometheusHandle;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use study_advisor::advisor::{AdvisorService, ArtifactModel, ArtifactPaths, RawFields};
use study_advisor::config::AppConfig;
use study_advisor::error::AppError;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Args, Debug, Default, Clone)]
pub(crate) struct ArtifactArgs {
    /// Override the configured regressor artifact
    #[arg(long)]
    pub(crate) model: Option<PathBuf>,
    /// Override the configured preprocessor artifact
    #[arg(long)]
    pub(crate) preprocessor: Option<PathBuf>,
}

impl ArtifactArgs {
    pub(crate) fn apply(self, paths: &mut ArtifactPaths) {
        if let Some(model) = self.model {
            paths.model = model;
        }
        if let Some(preprocessor) = self.preprocessor {
            paths.preprocessor = preprocessor;
        }
    }
}

/// Load configuration with CLI artifact overrides applied.
pub(crate) fn load_config(artifacts: ArtifactArgs) -> Result<AppConfig, AppError> {
    let mut config = AppConfig::load()?;
    artifacts.apply(&mut config.artifacts);
    Ok(config)
}

pub(crate) fn load_service(
    config: &AppConfig,
) -> Result<Arc<AdvisorService<ArtifactModel>>, AppError> {
    let model = ArtifactModel::load(&config.artifacts)?;
    Ok(Arc::new(AdvisorService::new(
        Arc::new(model),
        config.feedback.clone(),
    )))
}

/// Read a JSON object of raw field values.
pub(crate) fn read_form(path: &Path) -> Result<RawFields, AppError> {
    let contents = fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|source| AppError::Input {
        path: path.to_path_buf(),
        source,
    })
}
