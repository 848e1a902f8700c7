use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use training_tracker::config::AppConfig;
use training_tracker::workflows::roster::FileRosterSource;
use training_tracker::workflows::training::TrainingService;

pub(crate) type RosterService = TrainingService<FileRosterSource>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn build_service(config: &AppConfig) -> RosterService {
    TrainingService::new(
        config.roster.source(),
        config.roster.importer(),
        config.classification.clone(),
    )
}

/// Progress bar drawn with a fixed width for terminal output.
pub(crate) fn progress_meter(value: u8, width: usize) -> String {
    let filled = (usize::from(value.min(100)) * width + 50) / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meter_scales_to_width() {
        assert_eq!(progress_meter(0, 10), "[----------]");
        assert_eq!(progress_meter(40, 10), "[####------]");
        assert_eq!(progress_meter(100, 4), "[####]");
        assert_eq!(progress_meter(255, 4), "[####]");
    }
}
